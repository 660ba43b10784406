use crate::bmc::{
    BmcError,
    regs::{M10BMC_BUILD_VER, M10BMC_LEGACY_SYS_BASE, M10BMC_VER_LEGACY_INVALID},
    transport::RegisterTransport,
};

/// Filters out legacy BMC parts before the register layout is trusted.
///
/// Old BMCs kept their build version in the legacy system block, so the
/// register reads back a real version there. On supported parts the same
/// register reads as [`M10BMC_VER_LEGACY_INVALID`].
///
/// # Errors
/// * [`BmcError::UnsupportedDevice`] - if the probe fails or finds a legacy part
pub fn check_version<T: RegisterTransport>(transport: &T) -> Result<(), BmcError> {
    let version = transport
        .read(M10BMC_LEGACY_SYS_BASE + M10BMC_BUILD_VER)
        .map_err(|err| {
            log::error!("failed to read BMC version: {err}");
            BmcError::UnsupportedDevice
        })?;

    if version != M10BMC_VER_LEGACY_INVALID {
        log::error!("bad version M10BMC detected: {version:#x}");
        return Err(BmcError::UnsupportedDevice);
    }

    Ok(())
}
