use crate::bmc::{
    BmcError,
    fw_state::{FwState, FwStateGuard, FwStateLock},
    range::RangeTable,
    regs::M10BMC_SYS_BASE,
    transport::{RegisterTransport, TransportError},
    variant::BmcVariant,
};

/// An attached MAX 10 BMC.
///
/// Every caller shares one instance. System register accesses go through
/// [`sys_read`](Self::sys_read) and [`sys_update_bits`](Self::sys_update_bits),
/// which refuse handshake registers with [`BmcError::Busy`] while secure update
/// owns them. Other registers are never held up by an update.
///
/// Instances are created with [`BmcBuilder`](crate::bmc::BmcBuilder).
pub struct M10Bmc<T: RegisterTransport> {
    transport: T,
    variant: BmcVariant,
    handshake: RangeTable,
    fw_state: FwStateLock,
}

impl<T: RegisterTransport> core::fmt::Debug for M10Bmc<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("M10Bmc")
            .field("variant", &self.variant)
            .field("fw_state", &self.fw_state)
            .finish_non_exhaustive()
    }
}

impl<T: RegisterTransport> M10Bmc<T> {
    pub(crate) fn new(transport: T, variant: BmcVariant) -> Self {
        Self::with_handshake_table(transport, variant, variant.handshake_table())
    }

    pub(crate) fn with_handshake_table(
        transport: T,
        variant: BmcVariant,
        handshake: RangeTable,
    ) -> Self {
        Self {
            transport,
            variant,
            handshake,
            fw_state: FwStateLock::new(),
        }
    }

    pub fn variant(&self) -> BmcVariant {
        self.variant
    }

    pub fn handshake_table(&self) -> RangeTable {
        self.handshake
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reads the system register at `offset`.
    ///
    /// # Errors
    /// * [`BmcError::Busy`] - if `offset` is a handshake register and secure update is active
    /// * [`BmcError::Transport`] - if the transport fails
    pub fn sys_read(&self, offset: u32) -> Result<u32, BmcError> {
        self.gated(offset, |transport, addr| transport.read(addr))
    }

    /// Updates the bits selected by `mask` in the system register at `offset`.
    ///
    /// # Errors
    /// Same as [`sys_read`](Self::sys_read).
    pub fn sys_update_bits(&self, offset: u32, mask: u32, value: u32) -> Result<(), BmcError> {
        self.gated(offset, |transport, addr| {
            transport.update_bits(addr, mask, value)
        })
    }

    fn gated<R>(
        &self,
        offset: u32,
        f: impl FnOnce(&T, u32) -> Result<R, TransportError>,
    ) -> Result<R, BmcError> {
        let addr = M10BMC_SYS_BASE
            .checked_add(offset)
            .ok_or(BmcError::Transport(TransportError::Unmapped { addr: offset }))?;

        if !self.handshake.is_handshake(offset) {
            return Ok(f(&self.transport, addr)?);
        }

        self.fw_state.with_shared(|state| {
            if state.gates_handshake() {
                log::trace!("handshake register {offset:#x} gated by {state:?}");
                return Err(BmcError::Busy);
            }
            Ok(f(&self.transport, addr)?)
        })
    }

    /// Reads the register at absolute address `addr`, bypassing state gating.
    pub fn raw_read(&self, addr: u32) -> Result<u32, BmcError> {
        Ok(self.transport.read(addr)?)
    }

    /// Reads consecutive registers at absolute addresses, bypassing state gating.
    pub fn raw_bulk_read(&self, addr: u32, out: &mut [u32]) -> Result<(), BmcError> {
        Ok(self.transport.bulk_read(addr, out)?)
    }

    /// Writes consecutive registers at absolute addresses, bypassing state gating.
    pub fn raw_bulk_write(&self, addr: u32, data: &[u32]) -> Result<(), BmcError> {
        Ok(self.transport.bulk_write(addr, data)?)
    }

    /// Moves the firmware update state out of `Normal`.
    ///
    /// See [`FwStateLock::enter`].
    pub fn fw_state_enter(&self, new_state: FwState) -> Result<(), BmcError> {
        self.fw_state.enter(new_state)
    }

    /// Returns the firmware update state to `Normal`.
    pub fn fw_state_exit(&self) {
        self.fw_state.exit()
    }

    /// Enters `new_state` until the returned guard is dropped.
    ///
    /// When `new_state` is already active the guard does not own it, and
    /// dropping it leaves the current owner's update in place.
    pub fn fw_state_guard(&self, new_state: FwState) -> Result<FwStateGuard<'_>, BmcError> {
        self.fw_state.enter_guarded(new_state)
    }

    pub fn fw_state(&self) -> FwState {
        self.fw_state.current()
    }
}
