//! The extractor facade.
//!
//! [`FeatureExtractor`] is the interface a rule-matching engine drives. A
//! file-level extractor answers the file and global operations and rejects
//! everything that needs disassembly with [`crate::Error::Unsupported`],
//! so callers can distinguish "not supported here" from "failed".

use std::path::{Path, PathBuf};

use crate::{
    extract,
    features::Feature,
    metadata::{cor20::CorFlags, view::DotnetFile},
    Error, Result,
};

/// How deep an extractor can look into a binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Headers, tables and raw bytes only.
    File,
    /// Per-function disassembly as well.
    Function,
}

/// The operations a rule-matching engine drives an extractor through.
///
/// Function-level operations have defaults that return
/// [`crate::Error::Unsupported`]; a file-level implementation only provides
/// the rest.
pub trait FeatureExtractor {
    /// The granularity this extractor works at.
    fn granularity(&self) -> Granularity;

    /// The base address features are relative to.
    fn base_address(&self) -> u32 {
        0
    }

    /// The entry point field of the COR20 header, a MethodDef token or a
    /// native RVA depending on the `NATIVE_ENTRYPOINT` flag.
    fn entry_point(&self) -> u32;

    /// Extracts features that hold regardless of file content, such as the
    /// targeted OS and architecture.
    fn global_features(&self) -> Vec<(Feature, u32)>;

    /// Extracts all file-scope features.
    fn file_features(&self) -> Vec<(Feature, u32)>;

    /// Lists the addresses of disassemblable functions.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn functions(&self) -> Result<Vec<u32>> {
        Err(Error::Unsupported("functions"))
    }

    /// Lists the basic blocks of a function.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn basic_blocks(&self, function: u32) -> Result<Vec<u32>> {
        let _ = function;
        Err(Error::Unsupported("basic_blocks"))
    }

    /// Lists the instructions of a basic block.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn instructions(&self, function: u32, basic_block: u32) -> Result<Vec<u32>> {
        let _ = (function, basic_block);
        Err(Error::Unsupported("instructions"))
    }

    /// Extracts features scoped to one function.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn function_features(&self, function: u32) -> Result<Vec<(Feature, u32)>> {
        let _ = function;
        Err(Error::Unsupported("function_features"))
    }

    /// Extracts features scoped to one basic block.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn basic_block_features(&self, function: u32, basic_block: u32) -> Result<Vec<(Feature, u32)>> {
        let _ = (function, basic_block);
        Err(Error::Unsupported("basic_block_features"))
    }

    /// Extracts features scoped to one instruction.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn instruction_features(
        &self,
        function: u32,
        basic_block: u32,
        instruction: u32,
    ) -> Result<Vec<(Feature, u32)>> {
        let _ = (function, basic_block, instruction);
        Err(Error::Unsupported("instruction_features"))
    }

    /// Reports whether the function at `address` is recognized library
    /// code.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn is_library_function(&self, address: u32) -> Result<bool> {
        let _ = address;
        Err(Error::Unsupported("is_library_function"))
    }

    /// Returns the name of the function at `address`.
    ///
    /// # Errors
    /// Unsupported at file granularity.
    fn function_name(&self, address: u32) -> Result<String> {
        let _ = address;
        Err(Error::Unsupported("function_name"))
    }
}

/// File-level feature extractor for .NET binaries.
///
/// Opening parses everything needed up front; the extraction operations
/// themselves cannot fail, they only skip what does not resolve.
pub struct DotnetFileExtractor {
    path: Option<PathBuf>,
    file: DotnetFile,
}

impl DotnetFileExtractor {
    /// Opens and parses the binary at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a .NET PE, or
    /// its metadata headers are malformed.
    pub fn open(path: &Path) -> Result<DotnetFileExtractor> {
        Ok(DotnetFileExtractor {
            path: Some(path.to_path_buf()),
            file: DotnetFile::from_file(path)?,
        })
    }

    /// Parses a binary already held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is not a .NET PE or its metadata
    /// headers are malformed.
    pub fn from_bytes(data: Vec<u8>) -> Result<DotnetFileExtractor> {
        Ok(DotnetFileExtractor {
            path: None,
            file: DotnetFile::from_mem(data)?,
        })
    }

    /// The path this extractor was opened from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The underlying parsed binary.
    #[must_use]
    pub fn dotnet_file(&self) -> &DotnetFile {
        &self.file
    }

    /// Always `true`: construction rejects everything that is not a .NET
    /// binary.
    #[must_use]
    pub fn is_dotnet_file(&self) -> bool {
        true
    }

    /// Returns `true` if the image mixes native and managed code.
    #[must_use]
    pub fn is_mixed_mode(&self) -> bool {
        !self.file.cor_flags().contains(CorFlags::ILONLY)
    }

    /// The runtime version pair from the COR20 header.
    #[must_use]
    pub fn runtime_version(&self) -> (u16, u16) {
        let cor20 = self.file.cor20();
        (cor20.major_runtime_version, cor20.minor_runtime_version)
    }

    /// The version string from the metadata root, e.g. `v4.0.30319`.
    #[must_use]
    pub fn metadata_version_string(&self) -> String {
        self.file.root().version.clone()
    }
}

impl FeatureExtractor for DotnetFileExtractor {
    fn granularity(&self) -> Granularity {
        Granularity::File
    }

    fn entry_point(&self) -> u32 {
        self.file.cor20().entry_point_token
    }

    fn global_features(&self) -> Vec<(Feature, u32)> {
        extract::global_features(&self.file)
    }

    fn file_features(&self) -> Vec<(Feature, u32)> {
        extract::file_features(&self.file)
    }
}
