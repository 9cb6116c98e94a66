// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # dotfeat
//!
//! File-level feature extraction from .NET PE executables, built for
//! capability rule-matching engines. `dotfeat` parses the ECMA-335 metadata
//! of a managed binary in pure Rust, without Windows or the .NET runtime,
//! and reports what the binary imports, defines and claims about itself.
//!
//! ## Features
//!
//! - **Managed imports** - MemberRef rows resolved to `Namespace.Type::Method`
//! - **Native imports** - P/Invoke mappings with ANSI/wide name variants
//! - **Defined methods** - every MethodDef with its owning type's name
//! - **Namespaces and classes** - from the TypeDef and TypeRef tables
//! - **Header facts** - format, architecture restriction, mixed-mode flag
//! - **Strings** - printable ASCII and UTF-16LE runs in the raw bytes
//!
//! Every feature is paired with the address it was observed at: the
//! metadata token of the originating row, a file offset for strings, or 0
//! for file-global facts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotfeat::prelude::*;
//! use std::path::Path;
//!
//! let extractor = DotnetFileExtractor::open(Path::new("app.exe"))?;
//! for (feature, address) in extractor.file_features() {
//!     println!("0x{address:08X} {feature}");
//! }
//! # Ok::<(), dotfeat::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`crate::file`] - PE container access over pluggable backends
//! - [`crate::metadata`] - COR20 header, metadata root, streams and tables
//! - [`crate::extract`] - the feature rules themselves
//! - [`crate::extractor`] - the [`FeatureExtractor`] facade engines drive

#[macro_use]
pub(crate) mod error;

/// PE container access.
pub mod file;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// ECMA-335 metadata parsing.
pub mod metadata;

/// The feature vocabulary.
pub mod features;

/// Feature rules at file and global scope.
pub mod extract;

/// The extractor facade.
pub mod extractor;

pub use error::{Error, Result};

pub use extractor::{DotnetFileExtractor, FeatureExtractor, Granularity};
pub use features::{Arch, Feature, Format, Os};
pub use file::File;
pub use metadata::view::DotnetFile;
