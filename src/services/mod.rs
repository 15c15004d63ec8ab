//! Business logic services.

pub mod extractor;

pub use extractor::{ContentExtractor, ReadabilityExtractor};
