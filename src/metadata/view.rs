//! Loaded view of a .NET binary.
//!
//! [`DotnetFile`] owns the underlying [`crate::file::File`] and borrows all
//! parsed metadata structures from its bytes. Construction performs the
//! whole header chain: CLR data directory, COR20 header, metadata root,
//! then the `#~` tables stream and `#Strings` heap.

use std::path::Path;
use std::sync::Arc;

use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        cor20::{Cor20Header, CorFlags},
        root::Root,
        strings::Strings,
        tables::TablesStream,
    },
    Result,
};

/// The borrowed metadata of one binary.
pub struct DotnetFileData<'a> {
    /// The COR20 header.
    pub cor20: Cor20Header,
    /// The metadata root.
    pub root: Root,
    /// The tables stream, if the binary carries one.
    pub tables: Option<TablesStream<'a>>,
    /// The `#Strings` heap, if the binary carries one.
    pub strings: Option<Strings<'a>>,
}

impl<'a> DotnetFileData<'a> {
    fn from_file(file: &File, data: &'a [u8]) -> Result<DotnetFileData<'a>> {
        let (clr_rva, clr_size) = file.clr();
        if clr_size < 72 {
            return Err(malformed_error!(
                "CLR runtime header directory is too small - {}",
                clr_size
            ));
        }

        let clr_offset = file.rva_to_offset(clr_rva)?;
        if clr_offset
            .checked_add(72)
            .is_none_or(|end| end > data.len())
        {
            return Err(crate::Error::OutOfBounds);
        }
        let cor20 = Cor20Header::read(&data[clr_offset..])?;

        let meta_offset = file.rva_to_offset(cor20.meta_data_rva as usize)?;
        let meta_end = meta_offset
            .checked_add(cor20.meta_data_size as usize)
            .ok_or(crate::Error::OutOfBounds)?;
        if meta_end > data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        let meta = &data[meta_offset..meta_end];
        let root = Root::read(meta)?;

        let mut tables = None;
        let mut strings = None;
        for header in &root.stream_headers {
            let start = header.offset as usize;
            let end = start
                .checked_add(header.size as usize)
                .ok_or(crate::Error::OutOfBounds)?;
            if end > meta.len() {
                return Err(malformed_error!(
                    "Stream {} exceeds the metadata - {}..{}",
                    header.name,
                    start,
                    end
                ));
            }

            match header.name.as_str() {
                "#~" | "#-" => tables = Some(TablesStream::from(&meta[start..end])?),
                "#Strings" => strings = Some(Strings::from(&meta[start..end])?),
                _ => {}
            }
        }

        Ok(DotnetFileData {
            cor20,
            root,
            tables,
            strings,
        })
    }
}

#[self_referencing]
/// A loaded .NET binary with its metadata parsed.
pub struct DotnetFile {
    file: Arc<File>,
    #[borrows(file)]
    #[not_covariant]
    data: DotnetFileData<'this>,
}

impl DotnetFile {
    /// Loads and parses the binary at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a .NET PE, or
    /// its metadata headers are malformed.
    pub fn from_file(path: &Path) -> Result<DotnetFile> {
        Self::load(Arc::new(File::from_file(path)?))
    }

    /// Parses a binary already held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is not a .NET PE or its metadata
    /// headers are malformed.
    pub fn from_mem(data: Vec<u8>) -> Result<DotnetFile> {
        Self::load(Arc::new(File::from_mem(data)?))
    }

    fn load(file: Arc<File>) -> Result<DotnetFile> {
        DotnetFile::try_new(file, |file| {
            DotnetFileData::from_file(file.as_ref(), file.data())
        })
    }

    /// Returns the underlying PE file.
    #[must_use]
    pub fn file(&self) -> &File {
        self.borrow_file()
    }

    /// Returns the raw bytes of the binary.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.file().data()
    }

    /// Returns the COR20 header.
    #[must_use]
    pub fn cor20(&self) -> Cor20Header {
        self.with_data(|data| data.cor20)
    }

    /// Returns the typed COR20 runtime flags.
    #[must_use]
    pub fn cor_flags(&self) -> CorFlags {
        self.with_data(|data| data.cor20.cor_flags())
    }

    /// Returns the metadata root.
    #[must_use]
    pub fn root(&self) -> &Root {
        self.with_data(|data| &data.root)
    }

    /// Returns the tables stream, if present.
    #[must_use]
    pub fn tables(&self) -> Option<&TablesStream<'_>> {
        self.with_data(|data| data.tables.as_ref())
    }

    /// Returns the `#Strings` heap, if present.
    #[must_use]
    pub fn strings(&self) -> Option<&Strings<'_>> {
        self.with_data(|data| data.strings.as_ref())
    }
}
