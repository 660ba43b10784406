//! Register layout of the MAX 10 BMC.
//!
//! Absolute addresses are byte addresses on the register bus. Offsets named
//! without a `_BASE` suffix are relative to [`M10BMC_SYS_BASE`].

/// Old system register block, kept only to detect legacy parts.
pub const M10BMC_LEGACY_SYS_BASE: u32 = 0x0030_0400;
/// System register block.
pub const M10BMC_SYS_BASE: u32 = 0x0030_0800;
pub const M10BMC_SYS_END: u32 = 0x0030_0fff;
/// Flash window, also used for image staging during secure update.
pub const M10BMC_FLASH_BASE: u32 = 0x1000_0000;
pub const M10BMC_FLASH_END: u32 = 0x1fff_ffff;
pub const M10BMC_MEM_END: u32 = M10BMC_FLASH_END;

/// Register width and stride in bytes.
pub const M10BMC_REG_STRIDE: u32 = 4;

pub const M10BMC_BUILD_VER: u32 = 0x0;
pub const NIOS2_FW_VERSION: u32 = 0x4;
pub const M10BMC_MACADDR1: u32 = 0x10;
pub const M10BMC_MACADDR2: u32 = 0x14;

/// Value read from the legacy build version register on supported parts.
pub const M10BMC_VER_LEGACY_INVALID: u32 = 0xffff_ffff;

// MACADDR1
pub const M10BMC_MAC_BYTE4: u32 = genmask(7, 0);
pub const M10BMC_MAC_BYTE3: u32 = genmask(15, 8);
pub const M10BMC_MAC_BYTE2: u32 = genmask(23, 16);
pub const M10BMC_MAC_BYTE1: u32 = genmask(31, 24);
// MACADDR2
pub const M10BMC_MAC_BYTE6: u32 = genmask(7, 0);
pub const M10BMC_MAC_BYTE5: u32 = genmask(15, 8);
pub const M10BMC_MAC_COUNT: u32 = genmask(23, 16);

/// Telemetry block shared with the BMC firmware during secure update.
pub const M10BMC_N3000_TELEM_START: u32 = 0x100;
pub const M10BMC_N3000_TELEM_END: u32 = 0x250;
pub const M10BMC_D5005_TELEM_START: u32 = 0x100;
pub const M10BMC_D5005_TELEM_END: u32 = 0x300;

/// Contiguous bitmask covering bits `low..=high`.
pub const fn genmask(high: u32, low: u32) -> u32 {
    (u32::MAX >> (31 - high)) & (u32::MAX << low)
}

/// Extracts the field selected by `mask` from `reg`, shifted down to bit 0.
pub const fn field_get(mask: u32, reg: u32) -> u32 {
    (reg & mask) >> mask.trailing_zeros()
}
