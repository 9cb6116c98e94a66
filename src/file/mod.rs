//! PE file abstraction for .NET executables.
//!
//! Wraps a parsed PE image and abstracts over the data source, so the same
//! code paths work for files on disk and for buffers already in memory.
//!
//! # Key Components
//!
//! - [`crate::file::File`] - Loaded PE image with CLR-specific accessors
//! - [`crate::file::Backend`] - Trait for data sources (disk files, memory buffers)
//! - [`crate::file::io`] - Low-level little-endian read helpers
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotfeat::file::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("app.exe"))?;
//! let (clr_rva, clr_size) = file.clr();
//! println!("CLR header at RVA 0x{:x}, size: {} bytes", clr_rva, clr_size);
//! # Ok::<(), dotfeat::Error>(())
//! ```

pub mod io;

mod memory;
mod physical;

use std::path::Path;

use goblin::pe::{
    options::{ParseMode, ParseOptions},
    PE,
};
use ouroboros::self_referencing;

use crate::{
    Error::{Empty, GoblinErr, OutOfBounds},
    Result,
};
use memory::Memory;
use physical::Physical;

/// Backend trait for file data sources.
///
/// Abstracts over the source of PE data, allowing both in-memory and on-disk
/// representations. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Errors
    /// Returns an error if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded PE image that carries a CLR runtime header.
///
/// Loading validates that the image is a PE with an optional header and a
/// non-empty CLR runtime header data directory. Anything else is rejected
/// up front so the metadata layers above can rely on both being present.
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Loads a PE file from the given path.
    ///
    /// The file is memory-mapped for efficient access.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or opened
    /// - The file is empty or not a valid PE
    /// - The PE has no optional header or no CLR runtime header directory
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads a PE file from a memory buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty, not a valid PE, or
    /// missing the CLR runtime header directory.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        // Permissive mode: goblin must not reject the image over damaged
        // optional payloads (its own CLR metadata decoding included). The
        // headers and sections stay strict, and all metadata parsing above
        // this layer is done by this crate.
        let options = ParseOptions::default().with_parse_mode(ParseMode::Permissive);

        File::try_new(data, |data| {
            let data = data.as_ref();
            match PE::parse_with_opts(data.data(), &options) {
                Ok(pe) => match pe.header.optional_header {
                    Some(optional_header) => {
                        if optional_header
                            .data_directories
                            .get_clr_runtime_header()
                            .is_none()
                        {
                            Err(malformed_error!(
                                "File does not have a CLR runtime header directory"
                            ))
                        } else {
                            Ok(pe)
                        }
                    }
                    None => Err(malformed_error!("File does not have an OptionalHeader")),
                },
                Err(error) => Err(GoblinErr(error)),
            }
        })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the image is PE32+ (64-bit).
    ///
    /// PE32 carries optional header magic 0x10B, PE32+ carries 0x20B.
    #[must_use]
    pub fn is_pe64(&self) -> bool {
        self.with_pe(|pe| match pe.header.optional_header {
            Some(optional_header) => optional_header.standard_fields.magic == 0x20B,
            None => false,
        })
    }

    /// Returns the RVA and size (in bytes) of the CLR runtime header.
    ///
    /// # Panics
    ///
    /// Panics if the CLR runtime header is missing. Loading rejects files
    /// without one, so this cannot happen for a constructed `File`.
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            let optional_header = pe.header.optional_header.unwrap();
            let clr_dir = optional_header
                .data_directories
                .get_clr_runtime_header()
                .unwrap();

            (clr_dir.virtual_address as usize, clr_dir.size as usize)
        })
    }

    /// Returns the raw data of the loaded file.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns a slice of the file data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Converts a relative virtual address (RVA) to a file offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the RVA falls outside every section.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        self.with_pe(|pe| {
            let rva_u32 = u32::try_from(rva).map_err(|_| OutOfBounds)?;

            for section in &pe.sections {
                let Some(section_max) = section.virtual_address.checked_add(section.virtual_size)
                else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section.virtual_size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
