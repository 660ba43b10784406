//! Register map layer over a word-level bus.
//!
//! [`Regmap`] turns a [`RawBus`] into a [`RegisterTransport`] by enforcing the
//! register windows, stride and upper bound described by a [`RegmapConfig`].
//! Rejected accesses never reach the bus. Writes and read-modify-write cycles
//! are serialized, so concurrent updates of disjoint bits are never lost.

use spin::Mutex;

use crate::bmc::{
    range::{RegRange, reg_in_ranges},
    regs::{
        M10BMC_FLASH_BASE, M10BMC_LEGACY_SYS_BASE, M10BMC_MEM_END, M10BMC_REG_STRIDE,
        M10BMC_SYS_END,
    },
    transport::{RegisterTransport, TransportError},
};

/// Single-word bus transactions, as framed by the underlying bus driver.
pub trait RawBus {
    fn read_word(&self, addr: u32) -> Result<u32, TransportError>;
    fn write_word(&self, addr: u32, value: u32) -> Result<(), TransportError>;
}

impl<B: RawBus + ?Sized> RawBus for &B {
    fn read_word(&self, addr: u32) -> Result<u32, TransportError> {
        (**self).read_word(addr)
    }

    fn write_word(&self, addr: u32, value: u32) -> Result<(), TransportError> {
        (**self).write_word(addr, value)
    }
}

/// Static description of the accessible register space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegmapConfig {
    pub reg_stride: u32,
    pub max_register: u32,
    pub rd_ranges: &'static [RegRange],
    pub wr_ranges: &'static [RegRange],
}

static M10_REGMAP_RANGES: [RegRange; 2] = [
    RegRange::new(M10BMC_LEGACY_SYS_BASE, M10BMC_SYS_END),
    RegRange::new(M10BMC_FLASH_BASE, M10BMC_MEM_END),
];

/// Register map of every supported MAX 10 BMC.
pub static M10BMC_REGMAP_CONFIG: RegmapConfig = RegmapConfig {
    reg_stride: M10BMC_REG_STRIDE,
    max_register: M10BMC_MEM_END,
    rd_ranges: &M10_REGMAP_RANGES,
    wr_ranges: &M10_REGMAP_RANGES,
};

#[derive(Clone, Copy)]
enum Access {
    Read,
    Write,
}

impl RegmapConfig {
    fn check(&self, addr: u32, access: Access) -> Result<(), TransportError> {
        if self.reg_stride > 1 && addr % self.reg_stride != 0 {
            return Err(TransportError::Unaligned { addr });
        }

        let ranges = match access {
            Access::Read => self.rd_ranges,
            Access::Write => self.wr_ranges,
        };
        if addr > self.max_register || !reg_in_ranges(addr, ranges) {
            return Err(TransportError::Unmapped { addr });
        }

        Ok(())
    }

    /// Returns `Ok` if `addr` may be read.
    pub fn check_readable(&self, addr: u32) -> Result<(), TransportError> {
        self.check(addr, Access::Read)
    }

    /// Returns `Ok` if `addr` may be written.
    pub fn check_writeable(&self, addr: u32) -> Result<(), TransportError> {
        self.check(addr, Access::Write)
    }
}

/// Window-checked register transport.
#[derive(Debug)]
pub struct Regmap<B: RawBus> {
    bus: B,
    config: &'static RegmapConfig,
    // Serializes writes with read-modify-write cycles.
    lock: Mutex<()>,
}

impl<B: RawBus> Regmap<B> {
    pub fn new(bus: B, config: &'static RegmapConfig) -> Self {
        Self {
            bus,
            config,
            lock: Mutex::new(()),
        }
    }

    /// Regmap using the standard MAX 10 BMC layout.
    pub fn m10bmc(bus: B) -> Self {
        Self::new(bus, &M10BMC_REGMAP_CONFIG)
    }

    pub fn config(&self) -> &'static RegmapConfig {
        self.config
    }

    pub fn into_inner(self) -> B {
        self.bus
    }
}

impl<B: RawBus> RegisterTransport for Regmap<B> {
    fn read(&self, addr: u32) -> Result<u32, TransportError> {
        self.config.check_readable(addr)?;
        self.bus.read_word(addr)
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), TransportError> {
        self.config.check_writeable(addr)?;
        let _lock = self.lock.lock();
        self.bus.write_word(addr, value)
    }

    fn update_bits(&self, addr: u32, mask: u32, value: u32) -> Result<(), TransportError> {
        self.config.check_readable(addr)?;
        self.config.check_writeable(addr)?;

        let _lock = self.lock.lock();
        let orig = self.bus.read_word(addr)?;
        let updated = (orig & !mask) | (value & mask);
        if updated == orig {
            return Ok(());
        }
        self.bus.write_word(addr, updated)
    }
}
