//! `$GITHUB_OUTPUT` writer

use crate::error::Result;
use crate::types::ResolvedRefSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Heredoc delimiter for multi-line values
const DELIMITER: &str = "PRREF_EOF";

/// Appends named outputs to the file GitHub Actions reads step outputs from
pub struct GithubOutputWriter {
    path: PathBuf,
}

impl GithubOutputWriter {
    /// Writer for an explicit output file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Writer for `$GITHUB_OUTPUT`, `None` when unset or empty
    pub fn from_env() -> Option<Self> {
        std::env::var("GITHUB_OUTPUT")
            .ok()
            .filter(|p| !p.is_empty())
            .map(Self::new)
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append every `output_key=reference` pair in registry order
    pub fn write_refs(&self, set: &ResolvedRefSet) -> Result<()> {
        self.write_pairs(set.outputs())
    }

    /// Append arbitrary `name=value` pairs
    pub fn write_pairs<'a, I>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut buf = String::new();
        for (name, value) in pairs {
            push_entry(&mut buf, name, value);
        }

        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        f.write_all(buf.as_bytes())?;
        Ok(())
    }
}

fn push_entry(buf: &mut String, name: &str, value: &str) {
    if value.contains(['\n', '\r']) {
        buf.push_str(name);
        buf.push_str("<<");
        buf.push_str(DELIMITER);
        buf.push('\n');
        buf.push_str(value);
        buf.push('\n');
        buf.push_str(DELIMITER);
        buf.push('\n');
    } else {
        buf.push_str(name);
        buf.push('=');
        buf.push_str(value);
        buf.push('\n');
    }
}
