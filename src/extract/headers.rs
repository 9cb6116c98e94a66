//! Header-derived facts.

use crate::{features::Arch, metadata::cor20::CorFlags};

/// Infers the architecture restriction from the COR20 flags and PE format.
///
/// `32BITREQUIRED` on a PE32 image pins it to i386. A PE32+ image without
/// that flag is amd64 only. Every other combination runs anywhere the
/// runtime does.
#[must_use]
pub fn infer_arch(flags: CorFlags, pe64: bool) -> Arch {
    if flags.contains(CorFlags::BIT32_REQUIRED) && !pe64 {
        Arch::I386
    } else if !flags.contains(CorFlags::BIT32_REQUIRED) && pe64 {
        Arch::Amd64
    } else {
        Arch::Any
    }
}

/// Returns `true` if the image mixes native and managed code.
///
/// An image without `ILONLY` carries native code alongside the IL.
#[must_use]
pub fn is_mixed_mode(flags: CorFlags) -> bool {
    !flags.contains(CorFlags::ILONLY)
}
