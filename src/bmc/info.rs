//! Typed read-outs of the BMC identification registers.
//!
//! These go through the gated accessor like any other caller, so they fail
//! with [`BmcError::Busy`] only if the registers they touch are handshake
//! registers of the attached variant.

use crate::bmc::{
    BmcError,
    device::M10Bmc,
    regs::{
        M10BMC_BUILD_VER, M10BMC_MAC_BYTE1, M10BMC_MAC_BYTE2, M10BMC_MAC_BYTE3, M10BMC_MAC_BYTE4,
        M10BMC_MAC_BYTE5, M10BMC_MAC_BYTE6, M10BMC_MAC_COUNT, M10BMC_MACADDR1, M10BMC_MACADDR2,
        NIOS2_FW_VERSION, field_get,
    },
    transport::RegisterTransport,
};

/// Base MAC address of the board's network ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Decodes the address from the two MAC address registers.
    pub fn from_regs(macaddr1: u32, macaddr2: u32) -> Self {
        MacAddress([
            field_get(M10BMC_MAC_BYTE1, macaddr1) as u8,
            field_get(M10BMC_MAC_BYTE2, macaddr1) as u8,
            field_get(M10BMC_MAC_BYTE3, macaddr1) as u8,
            field_get(M10BMC_MAC_BYTE4, macaddr1) as u8,
            field_get(M10BMC_MAC_BYTE5, macaddr2) as u8,
            field_get(M10BMC_MAC_BYTE6, macaddr2) as u8,
        ])
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl<T: RegisterTransport> M10Bmc<T> {
    /// BMC build version.
    pub fn bmc_version(&self) -> Result<u32, BmcError> {
        self.sys_read(M10BMC_BUILD_VER)
    }

    /// NIOS firmware version.
    pub fn bmcfw_version(&self) -> Result<u32, BmcError> {
        self.sys_read(NIOS2_FW_VERSION)
    }

    pub fn mac_address(&self) -> Result<MacAddress, BmcError> {
        let macaddr1 = self.sys_read(M10BMC_MACADDR1)?;
        let macaddr2 = self.sys_read(M10BMC_MACADDR2)?;
        Ok(MacAddress::from_regs(macaddr1, macaddr2))
    }

    /// Number of consecutive MAC addresses assigned from the base address.
    pub fn mac_count(&self) -> Result<u8, BmcError> {
        let macaddr2 = self.sys_read(M10BMC_MACADDR2)?;
        Ok(field_get(M10BMC_MAC_COUNT, macaddr2) as u8)
    }
}
