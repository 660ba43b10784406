use crate::bmc::regs::M10BMC_REG_STRIDE;

/// Failures reported by a register transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Address lies outside the readable/writable register windows.
    Unmapped { addr: u32 },
    /// Address is not a multiple of the register stride.
    Unaligned { addr: u32 },
    /// The bus transaction failed.
    Bus,
    /// The bus did not answer in time.
    Timeout,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::Unmapped { addr } => write!(f, "address {addr:#x} is not mapped"),
            TransportError::Unaligned { addr } => {
                write!(f, "address {addr:#x} is not register aligned")
            }
            TransportError::Bus => write!(f, "bus transaction failed"),
            TransportError::Timeout => write!(f, "bus transaction timed out"),
        }
    }
}

/// Raw 32-bit register access at absolute byte addresses.
///
/// Implementations are shared between every caller of the device, so all
/// methods take `&self` and must handle their own synchronization. Addresses
/// outside the device's register windows are rejected here.
pub trait RegisterTransport {
    /// Reads one register.
    fn read(&self, addr: u32) -> Result<u32, TransportError>;

    /// Writes one register.
    fn write(&self, addr: u32, value: u32) -> Result<(), TransportError>;

    /// Replaces the bits selected by `mask` with the matching bits of `value`.
    fn update_bits(&self, addr: u32, mask: u32, value: u32) -> Result<(), TransportError>;

    /// Reads consecutive registers starting at `addr` into `out`.
    fn bulk_read(&self, addr: u32, out: &mut [u32]) -> Result<(), TransportError> {
        for (slot, reg) in out.iter_mut().zip(reg_addrs(addr)) {
            *slot = self.read(reg?)?;
        }
        Ok(())
    }

    /// Writes `data` to consecutive registers starting at `addr`.
    fn bulk_write(&self, addr: u32, data: &[u32]) -> Result<(), TransportError> {
        for (value, reg) in data.iter().zip(reg_addrs(addr)) {
            self.write(reg?, *value)?;
        }
        Ok(())
    }
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &T {
    fn read(&self, addr: u32) -> Result<u32, TransportError> {
        (**self).read(addr)
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), TransportError> {
        (**self).write(addr, value)
    }

    fn update_bits(&self, addr: u32, mask: u32, value: u32) -> Result<(), TransportError> {
        (**self).update_bits(addr, mask, value)
    }

    fn bulk_read(&self, addr: u32, out: &mut [u32]) -> Result<(), TransportError> {
        (**self).bulk_read(addr, out)
    }

    fn bulk_write(&self, addr: u32, data: &[u32]) -> Result<(), TransportError> {
        (**self).bulk_write(addr, data)
    }
}

// Yields successive register addresses; running past the end of the address
// space is reported as an unmapped access.
fn reg_addrs(start: u32) -> impl Iterator<Item = Result<u32, TransportError>> {
    (0u32..).map(move |idx| {
        idx.checked_mul(M10BMC_REG_STRIDE)
            .and_then(|off| start.checked_add(off))
            .ok_or(TransportError::Unmapped { addr: start })
    })
}
