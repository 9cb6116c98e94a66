//! # dotfeat Prelude
//!
//! Convenient glob import of the types most callers need.

/// The main error type for all dotfeat operations
pub use crate::Error;

/// The result type used throughout dotfeat
pub use crate::Result;

/// File-level extractor for .NET binaries
pub use crate::extractor::DotnetFileExtractor;

/// The interface rule-matching engines drive
pub use crate::extractor::{FeatureExtractor, Granularity};

/// The feature vocabulary
pub use crate::features::{Arch, Feature, Format, Os};

/// Parsed .NET binary with metadata access
pub use crate::metadata::view::DotnetFile;

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Metadata root constant
pub use crate::metadata::root::CIL_HEADER_MAGIC;

/// Low-level PE file access
pub use crate::file::File;
