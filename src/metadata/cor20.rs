//! COR20 (CLR runtime) header parsing.
//!
//! The COR20 header is the 72-byte structure located through the PE CLR
//! runtime data directory. It carries the runtime version the image targets,
//! the location of the physical metadata, the runtime flags, and the managed
//! entry point token.

use bitflags::bitflags;

use crate::{file::io::read_le_at, Result};

bitflags! {
    /// Runtime flags from the COR20 header (`CorHdr.h` `COMIMAGE_FLAGS_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CorFlags: u32 {
        /// The image contains only IL code, no native code.
        const ILONLY = 0x0000_0001;
        /// The image can only be loaded into a 32-bit process.
        const BIT32_REQUIRED = 0x0000_0002;
        /// Obsolete, IL library image.
        const IL_LIBRARY = 0x0000_0004;
        /// The image is strong-name signed.
        const STRONGNAME_SIGNED = 0x0000_0008;
        /// The entry point field holds an RVA of native code, not a token.
        const NATIVE_ENTRYPOINT = 0x0000_0010;
        /// Debugger tracking data is present.
        const TRACKDEBUGDATA = 0x0001_0000;
        /// The image prefers, but does not require, a 32-bit process.
        const BIT32_PREFERRED = 0x0002_0000;
    }
}

/// The parsed COR20 header.
#[derive(Debug, Clone, Copy)]
pub struct Cor20Header {
    /// Size of the header in bytes, always 72.
    pub cb: u32,
    /// Major version of the runtime required to run this image.
    pub major_runtime_version: u16,
    /// Minor version of the runtime required to run this image.
    pub minor_runtime_version: u16,
    /// RVA of the physical metadata root.
    pub meta_data_rva: u32,
    /// Size in bytes of the physical metadata.
    pub meta_data_size: u32,
    /// Runtime flags, see [`CorFlags`].
    pub flags: u32,
    /// MethodDef or File token of the entry point, 0 if none.
    pub entry_point_token: u32,
    /// RVA of implementation-specific resources.
    pub resource_rva: u32,
    /// Size of implementation-specific resources.
    pub resource_size: u32,
    /// RVA of the strong name signature hash.
    pub strong_name_signature_rva: u32,
    /// Size of the strong name signature hash.
    pub strong_name_signature_size: u32,
    /// Deprecated, always 0.
    pub code_manager_table_rva: u32,
    /// Deprecated, always 0.
    pub code_manager_table_size: u32,
    /// RVA of the VTable fixup array for mixed-mode images.
    pub vtable_fixups_rva: u32,
    /// Size of the VTable fixup array.
    pub vtable_fixups_size: u32,
    /// Deprecated, always 0.
    pub export_address_table_jumps_rva: u32,
    /// Deprecated, always 0.
    pub export_address_table_jumps_size: u32,
    /// Deprecated, always 0.
    pub managed_native_header_rva: u32,
    /// Deprecated, always 0.
    pub managed_native_header_size: u32,
}

impl Cor20Header {
    /// All flag bits a well-formed image may set.
    const VALID_FLAGS: u32 = 0x0003_001F;

    /// Parses the COR20 header from `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is shorter than 72 bytes, if the recorded
    /// header size is not 72, if the metadata directory is zero, or if
    /// unknown flag bits are set.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        let mut offset = 0;

        let header = Cor20Header {
            cb: read_le_at::<u32>(data, &mut offset)?,
            major_runtime_version: read_le_at::<u16>(data, &mut offset)?,
            minor_runtime_version: read_le_at::<u16>(data, &mut offset)?,
            meta_data_rva: read_le_at::<u32>(data, &mut offset)?,
            meta_data_size: read_le_at::<u32>(data, &mut offset)?,
            flags: read_le_at::<u32>(data, &mut offset)?,
            entry_point_token: read_le_at::<u32>(data, &mut offset)?,
            resource_rva: read_le_at::<u32>(data, &mut offset)?,
            resource_size: read_le_at::<u32>(data, &mut offset)?,
            strong_name_signature_rva: read_le_at::<u32>(data, &mut offset)?,
            strong_name_signature_size: read_le_at::<u32>(data, &mut offset)?,
            code_manager_table_rva: read_le_at::<u32>(data, &mut offset)?,
            code_manager_table_size: read_le_at::<u32>(data, &mut offset)?,
            vtable_fixups_rva: read_le_at::<u32>(data, &mut offset)?,
            vtable_fixups_size: read_le_at::<u32>(data, &mut offset)?,
            export_address_table_jumps_rva: read_le_at::<u32>(data, &mut offset)?,
            export_address_table_jumps_size: read_le_at::<u32>(data, &mut offset)?,
            managed_native_header_rva: read_le_at::<u32>(data, &mut offset)?,
            managed_native_header_size: read_le_at::<u32>(data, &mut offset)?,
        };

        if header.cb != 72 {
            return Err(malformed_error!(
                "COR20 header size is invalid - {}",
                header.cb
            ));
        }

        if header.meta_data_rva == 0 || header.meta_data_size == 0 {
            return Err(malformed_error!("COR20 header has no metadata directory"));
        }

        if header.flags & !Self::VALID_FLAGS != 0 {
            return Err(malformed_error!(
                "COR20 header flags are invalid - 0x{:X}",
                header.flags
            ));
        }

        Ok(header)
    }

    /// Returns the runtime flags as typed [`CorFlags`].
    #[must_use]
    pub fn cor_flags(&self) -> CorFlags {
        CorFlags::from_bits_truncate(self.flags)
    }
}
