use crate::bmc::{subdev::RegistryError, transport::TransportError};

/// Errors that can occur while attaching to or accessing the BMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmcError {
    /// Requested firmware state transition is not allowed (entering `Normal`).
    InvalidArgument,
    /// Another update phase owns the device, or a handshake register is gated.
    Busy,
    /// Failure reported by the register transport, passed through unchanged.
    Transport(TransportError),
    /// The legacy version probe did not identify a supported BMC.
    UnsupportedDevice,
    /// The bus identity does not name a known BMC variant.
    UnknownVariant,
    /// Companion sub-devices could not be registered.
    SubDevice(RegistryError),
}

impl From<TransportError> for BmcError {
    fn from(err: TransportError) -> Self {
        BmcError::Transport(err)
    }
}

impl From<RegistryError> for BmcError {
    fn from(err: RegistryError) -> Self {
        BmcError::SubDevice(err)
    }
}

impl core::fmt::Display for BmcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BmcError::InvalidArgument => write!(f, "invalid firmware state transition"),
            BmcError::Busy => write!(f, "device busy with firmware update"),
            BmcError::Transport(err) => write!(f, "register transport error: {err}"),
            BmcError::UnsupportedDevice => write!(f, "unsupported or absent BMC"),
            BmcError::UnknownVariant => write!(f, "unknown BMC variant"),
            BmcError::SubDevice(err) => write!(f, "failed to register sub-devices: {err}"),
        }
    }
}
