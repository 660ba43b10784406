use core::marker::PhantomData;

use crate::bmc::{
    BmcError,
    device::M10Bmc,
    subdev::{NoSubDevices, SubDeviceRegistry},
    transport::RegisterTransport,
    variant::{BmcVariant, PlatformData},
    version::check_version,
};

// Builder states
pub struct NeedTransport;
pub struct NeedIdentity;
pub struct Ready;

/// Attaches to a BMC in three steps: transport, bus identity, then
/// [`attach`](BmcBuilder::attach).
pub struct BmcBuilder<'a, T, State> {
    transport: T,
    id: &'a str,
    pdata: Option<PlatformData<'a>>,
    _phantom: PhantomData<State>,
}

// Start the builder
impl<'a> BmcBuilder<'a, (), NeedTransport> {
    pub fn new() -> Self {
        BmcBuilder {
            transport: (),
            id: "",
            pdata: None,
            _phantom: PhantomData,
        }
    }
}

impl Default for BmcBuilder<'_, (), NeedTransport> {
    fn default() -> Self {
        Self::new()
    }
}

// Set transport
impl<'a> BmcBuilder<'a, (), NeedTransport> {
    pub fn transport<T: RegisterTransport>(self, transport: T) -> BmcBuilder<'a, T, NeedIdentity> {
        BmcBuilder {
            transport,
            id: self.id,
            pdata: self.pdata,
            _phantom: PhantomData,
        }
    }
}

// Set bus identity
impl<'a, T: RegisterTransport> BmcBuilder<'a, T, NeedIdentity> {
    /// Sets the identity token reported by the bus, e.g. `"m10-n3000"`.
    pub fn identity(self, id: &'a str) -> BmcBuilder<'a, T, Ready> {
        BmcBuilder {
            transport: self.transport,
            id,
            pdata: self.pdata,
            _phantom: PhantomData,
        }
    }
}

// Attach
impl<'a, T: RegisterTransport> BmcBuilder<'a, T, Ready> {
    /// Supplies the optional platform data blob.
    pub fn platform_data(mut self, pdata: PlatformData<'a>) -> Self {
        self.pdata = Some(pdata);
        self
    }

    /// Validates the hardware, selects the variant and registers its
    /// sub-devices with `registry`.
    ///
    /// No device is returned unless every step succeeds.
    ///
    /// # Errors
    /// * [`BmcError::UnsupportedDevice`] - if the version probe rejects the part
    /// * [`BmcError::UnknownVariant`] - if the identity is not recognized
    /// * [`BmcError::SubDevice`] - if `registry` refuses the cells
    pub fn attach<R: SubDeviceRegistry>(self, registry: &mut R) -> Result<M10Bmc<T>, BmcError> {
        check_version(&self.transport).inspect_err(|_| {
            log::error!("failed to identify m10bmc hardware");
        })?;

        let variant = BmcVariant::from_id(self.id)?;
        let cells = variant.cells(self.pdata.as_ref());
        let bmc = M10Bmc::new(self.transport, variant);

        registry.add_devices(&cells).inspect_err(|err| {
            log::error!("failed to register sub-devices: {err}");
        })?;

        log::debug!("attached {:?} BMC with {} sub-devices", variant, cells.len());
        Ok(bmc)
    }

    /// Attaches without registering any sub-devices.
    pub fn attach_standalone(self) -> Result<M10Bmc<T>, BmcError> {
        self.attach(&mut NoSubDevices)
    }
}
