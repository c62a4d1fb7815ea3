//! # prref core
//!
//! Extract git references declared in a pull request description and check
//! that each one is safe to hand to a downstream git command.
//!
//! A description such as
//!
//! ```text
//! Bumps the pinned dependencies.
//!
//! core ref: abc1234
//! solana ref: v1.18.2
//! ```
//!
//! resolves, against the built-in registry, to `core_ref=abc1234`,
//! `solana_ref=v1.18.2` and `sdk_ref=develop`. A candidate that is not a
//! commit hash, a SemVer tag, or a safe branch/tag name fails the whole run.
//!
//! ## Example
//!
//! ```
//! use prref_core::{resolve, TargetRegistry};
//!
//! let registry = TargetRegistry::builtin();
//! let refs = resolve("core ref: feature/login", &registry).unwrap();
//! assert_eq!(refs.get("core"), Some("feature/login"));
//! assert_eq!(refs.get("sdk"), Some("develop"));
//!
//! let err = resolve("solana ref: v1.02", &registry).unwrap_err();
//! assert_eq!(err.target(), Some("solana"));
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod error;
pub mod output;
pub mod refs;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod traits;
pub mod types;

pub use error::{Error, ErrorKind, RejectReason, Result};
pub use registry::{TargetRegistry, TargetSpec};
pub use resolver::{resolve, RefResolver};
pub use traits::{RefClassifier, StrictClassifier, TextSource};
pub use types::{
    ExtractionResult, RefKind, RefOrigin, ResolvedRef, ResolvedRefSet, ValidationOutcome,
};

/// Fetch text from `source` and resolve every target in `registry`
///
/// The source is awaited once; resolution itself is synchronous.
pub async fn resolve_pull_request<S: TextSource>(
    source: &S,
    registry: &TargetRegistry,
) -> Result<ResolvedRefSet> {
    let text = source.fetch_text().await?;
    resolve(&text, registry)
}

/// Synchronous variant of `resolve_pull_request`
///
/// This creates a new Tokio runtime and blocks on the async version.
/// Prefer the async version if you're already in an async context.
pub fn resolve_pull_request_sync<S: TextSource>(
    source: &S,
    registry: &TargetRegistry,
) -> Result<ResolvedRefSet> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?
        .block_on(resolve_pull_request(source, registry))
}
