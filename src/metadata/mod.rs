//! .NET metadata parsing.
//!
//! Implements the pieces of ECMA-335 Partition II needed for file-level
//! feature extraction: the COR20 header, the metadata root with its stream
//! directory, the `#Strings` heap, and the `#~` tables stream.
//!
//! The entry point is [`crate::metadata::view::DotnetFile`], which owns the
//! underlying [`crate::file::File`] and parses all of the above lazily at
//! load time.

pub mod cor20;
pub mod root;
pub mod strings;
pub mod tables;
pub mod token;
pub mod view;
