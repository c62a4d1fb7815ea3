//! Target registry: which references to look for and what to fall back to

use crate::error::{Error, Result};
use crate::refs::classify;
use crate::types::ValidationOutcome;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Default reference for built-in targets
pub const DEFAULT_REF: &str = "develop";

/// Built-in target names, in registry order
pub const BUILTIN_TARGETS: [&str; 3] = ["core", "solana", "sdk"];

/// One named target: how to find its reference and where to publish it
#[derive(Debug, Clone)]
pub struct TargetSpec {
    name: String,
    pattern: Regex,
    default_ref: String,
    output_key: String,
}

impl TargetSpec {
    /// Build and validate a target.
    ///
    /// The pattern is compiled case-insensitively and must contain exactly one
    /// capture group. The default reference must itself pass classification.
    pub fn new(name: &str, pattern: &str, default_ref: &str, output_key: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::Config("target name must not be empty".to_string()));
        }

        if output_key.is_empty()
            || !output_key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(Error::Config(format!(
                "target '{}': output key '{}' must be non-empty and use only [A-Za-z0-9_-]",
                name, output_key
            )));
        }

        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Pattern(format!("target '{}': {}", name, e)))?;

        // captures_len counts the implicit whole-match group
        let groups = pattern.captures_len() - 1;
        if groups != 1 {
            return Err(Error::Config(format!(
                "target '{}': pattern must have exactly one capture group, found {}",
                name, groups
            )));
        }

        if let ValidationOutcome::Rejected(reason) = classify(default_ref) {
            return Err(Error::Config(format!(
                "target '{}': default reference '{}' is invalid: {}",
                name, default_ref, reason
            )));
        }

        Ok(Self {
            name: name.to_string(),
            pattern,
            default_ref: default_ref.to_string(),
            output_key: output_key.to_string(),
        })
    }

    /// Built-in target shape: `<name> ref: <candidate>`, default `develop`,
    /// published as `<name>_ref`
    pub fn builtin(name: &str) -> Result<Self> {
        Self::new(name, &builtin_pattern(name), DEFAULT_REF, &format!("{}_ref", name))
    }

    /// Target name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled extraction pattern
    #[inline]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Fallback reference when the text does not mention this target
    #[inline]
    pub fn default_ref(&self) -> &str {
        &self.default_ref
    }

    /// Output name the resolved reference is published under
    #[inline]
    pub fn output_key(&self) -> &str {
        &self.output_key
    }
}

/// Ordered, validated set of targets
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    specs: Vec<TargetSpec>,
}

impl TargetRegistry {
    /// Build a registry, rejecting duplicate names or output keys
    pub fn new(specs: Vec<TargetSpec>) -> Result<Self> {
        {
            let mut names = HashSet::with_capacity(specs.len());
            let mut keys = HashSet::with_capacity(specs.len());

            for spec in &specs {
                if !names.insert(spec.name()) {
                    return Err(Error::Config(format!(
                        "duplicate target name '{}'",
                        spec.name()
                    )));
                }
                if !keys.insert(spec.output_key()) {
                    return Err(Error::Config(format!(
                        "duplicate output key '{}' (target '{}')",
                        spec.output_key(),
                        spec.name()
                    )));
                }
            }
        }

        Ok(Self { specs })
    }

    /// The built-in targets: `core`, `solana`, `sdk`
    pub fn builtin() -> Self {
        let specs = BUILTIN_TARGETS
            .iter()
            .map(|name| TargetSpec::builtin(name).expect("built-in target spec is valid"))
            .collect();
        Self { specs }
    }

    /// Load targets from YAML.
    ///
    /// ```yaml
    /// targets:
    ///   - name: core
    ///     pattern: '\bcore\s+ref[ \t]*:[ \t]*(\S+)'
    ///     default: develop
    ///     output: core_ref
    /// ```
    ///
    /// `pattern` defaults to the built-in `<name> ref: <candidate>` shape,
    /// `default` to `develop`, and `output` to `<name>_ref`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: TargetFile = serde_yaml::from_str(yaml)?;

        if file.targets.is_empty() {
            return Err(Error::Config(
                "targets file must define at least one target".to_string(),
            ));
        }

        let specs = file
            .targets
            .into_iter()
            .map(TargetEntry::into_spec)
            .collect::<Result<Vec<_>>>()?;

        Self::new(specs)
    }

    /// Load targets from a YAML file on disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read targets file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Iterate targets in registry order
    pub fn iter(&self) -> std::slice::Iter<'_, TargetSpec> {
        self.specs.iter()
    }

    /// Look up a target by name
    pub fn get(&self, name: &str) -> Option<&TargetSpec> {
        self.specs.iter().find(|s| s.name() == name)
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True when there are no targets
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a TargetRegistry {
    type Item = &'a TargetSpec;
    type IntoIter = std::slice::Iter<'a, TargetSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

/// `<name> ref: <candidate>`. Blanks around the colon stay on one line, so an
/// unfilled `<name> ref:` line never captures the next line's first word.
fn builtin_pattern(name: &str) -> String {
    format!(r"\b{}\s+ref[ \t]*:[ \t]*(\S+)", regex::escape(name))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetFile {
    targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetEntry {
    name: String,
    pattern: Option<String>,
    default: Option<String>,
    output: Option<String>,
}

impl TargetEntry {
    fn into_spec(self) -> Result<TargetSpec> {
        let pattern = self
            .pattern
            .unwrap_or_else(|| builtin_pattern(&self.name));
        let default = self.default.as_deref().unwrap_or(DEFAULT_REF);
        let output = self
            .output
            .unwrap_or_else(|| format!("{}_ref", self.name));
        TargetSpec::new(&self.name, &pattern, default, &output)
    }
}
