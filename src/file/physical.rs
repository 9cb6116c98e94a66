//! Physical file backend using memory-mapped I/O.

use std::path::Path;

use memmap2::Mmap;

use super::Backend;
use crate::{Error::OutOfBounds, Result};

/// Input file backed by a memory-mapped file on disk
pub struct Physical {
    map: Mmap,
}

impl Physical {
    /// Create a new memory-mapped backend for the file at `path`
    ///
    /// ## Arguments
    /// * 'path' - The file to map
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or mapped.
    pub fn new(path: &Path) -> Result<Physical> {
        let file = std::fs::File::open(path)?;

        // Safety: the mapping is read-only and the file is never truncated
        // by this process while the map is alive.
        let map = unsafe { Mmap::map(&file)? };

        Ok(Physical { map })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if offset_end > self.map.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.map[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        &self.map
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn maps_file_contents() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"MZdata").unwrap();
        tmp.flush().unwrap();

        let physical = Physical::new(tmp.path()).unwrap();
        assert_eq!(physical.len(), 6);
        assert_eq!(physical.data_slice(0, 2).unwrap(), b"MZ");
        assert!(physical.data_slice(4, 8).is_err());
    }

    #[test]
    fn missing_file_fails() {
        assert!(Physical::new(Path::new("/nonexistent/definitely-not-here.dll")).is_err());
    }
}
