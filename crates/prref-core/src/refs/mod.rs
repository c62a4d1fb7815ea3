//! Reference extraction and classification

pub mod classifier;
pub mod extractor;

pub use classifier::classify;
pub use extractor::extract;
