//! Output formatting and GitHub Actions integration

pub mod annotation;
pub mod format;
pub mod writer;

pub use annotation::Annotation;
pub use format::{format_json, format_text, safe_output_escape};
pub use writer::GithubOutputWriter;
