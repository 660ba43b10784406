use crate::bmc::variant::MfdCell;

/// Failures reported by a sub-device registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// No driver accepted the named cell.
    NoDriver,
    /// The registry ran out of slots for new devices.
    NoSpace,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::NoDriver => write!(f, "no driver for sub-device"),
            RegistryError::NoSpace => write!(f, "no space for sub-device"),
        }
    }
}

/// Receives the companion functional units of an attached BMC.
pub trait SubDeviceRegistry {
    /// Instantiates every cell, or none of them on error.
    fn add_devices(&mut self, cells: &[MfdCell<'_>]) -> Result<(), RegistryError>;
}

/// Registry that accepts every cell and instantiates nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSubDevices;

impl SubDeviceRegistry for NoSubDevices {
    fn add_devices(&mut self, _cells: &[MfdCell<'_>]) -> Result<(), RegistryError> {
        Ok(())
    }
}
