//! Test support utilities - only compiled in test builds.

use core::{
    sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    time::Duration,
};

use heapless::{LinearMap, Vec};
use spin::Mutex;

use crate::bmc::{
    device::M10Bmc,
    range::RangeTable,
    regmap::RawBus,
    regs::{M10BMC_BUILD_VER, M10BMC_LEGACY_SYS_BASE, M10BMC_VER_LEGACY_INVALID},
    subdev::{RegistryError, SubDeviceRegistry},
    transport::{RegisterTransport, TransportError},
    variant::{BmcVariant, MfdCell},
};

const MOCK_REGS: usize = 64;

/// In-memory register file. Unwritten registers read as zero.
#[derive(Default)]
struct RegFile {
    regs: Mutex<LinearMap<u32, u32, MOCK_REGS>>,
    faults: Mutex<LinearMap<u32, TransportError, 8>>,
}

impl RegFile {
    fn set(&self, addr: u32, value: u32) {
        self.regs
            .lock()
            .insert(addr, value)
            .expect("mock register file full");
    }

    fn get(&self, addr: u32) -> Option<u32> {
        self.regs.lock().get(&addr).copied()
    }

    // Read-modify-write under one lock, like the device's own update logic.
    fn update(&self, addr: u32, mask: u32, value: u32) {
        let mut regs = self.regs.lock();
        let orig = regs.get(&addr).copied().unwrap_or(0);
        regs.insert(addr, (orig & !mask) | (value & mask))
            .expect("mock register file full");
    }

    fn fault(&self, addr: u32) -> Result<(), TransportError> {
        match self.faults.lock().get(&addr) {
            Some(err) => Err(*err),
            None => Ok(()),
        }
    }

    fn fail_at(&self, addr: u32, err: TransportError) {
        self.faults
            .lock()
            .insert(addr, err)
            .expect("mock fault table full");
    }
}

/// Artificial read latency, in microseconds.
#[derive(Default)]
struct ReadDelay(AtomicU64);

impl ReadDelay {
    fn set(&self, delay: Duration) {
        self.0.store(delay.as_micros() as u64, Ordering::SeqCst);
    }

    fn wait(&self) {
        let micros = self.0.load(Ordering::SeqCst);
        if micros > 0 {
            std::thread::sleep(Duration::from_micros(micros));
        }
    }
}

/// Register transport that records how often it is used.
///
/// Reads can be parked with [`hold_reads`](Self::hold_reads) to keep callers
/// inside a transaction until [`release_reads`](Self::release_reads).
#[derive(Default)]
pub struct MockTransport {
    file: RegFile,
    reads: AtomicUsize,
    writes: AtomicUsize,
    updates: AtomicUsize,
    hold: AtomicBool,
    in_flight: AtomicUsize,
    read_delay: ReadDelay,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, addr: u32, value: u32) {
        self.file.set(addr, value)
    }

    pub fn get(&self, addr: u32) -> Option<u32> {
        self.file.get(addr)
    }

    /// Makes every access to `addr` fail with `err`.
    pub fn fail_at(&self, addr: u32, err: TransportError) {
        self.file.fail_at(addr, err)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn reset_counts(&self) {
        self.reads.store(0, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
        self.updates.store(0, Ordering::SeqCst);
    }

    pub fn hold_reads(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release_reads(&self) {
        self.hold.store(false, Ordering::SeqCst);
    }

    /// Makes every read take at least `delay`.
    pub fn slow_reads(&self, delay: Duration) {
        self.read_delay.set(delay)
    }

    /// Number of reads currently parked or executing.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl RegisterTransport for MockTransport {
    fn read(&self, addr: u32) -> Result<u32, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        while self.hold.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
        self.read_delay.wait();
        let result = self
            .file
            .fault(addr)
            .map(|()| self.file.get(addr).unwrap_or(0));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), TransportError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.file.fault(addr)?;
        self.file.set(addr, value);
        Ok(())
    }

    fn update_bits(&self, addr: u32, mask: u32, value: u32) -> Result<(), TransportError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.file.fault(addr)?;
        self.file.update(addr, mask, value);
        Ok(())
    }
}

/// Word-level bus backing [`Regmap`](crate::bmc::regmap::Regmap) tests.
#[derive(Default)]
pub struct MockBus {
    file: RegFile,
    fail: Mutex<Option<TransportError>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    read_delay: ReadDelay,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, addr: u32, value: u32) {
        self.file.set(addr, value)
    }

    pub fn get(&self, addr: u32) -> u32 {
        self.file.get(addr).unwrap_or(0)
    }

    /// Makes every word read take at least `delay`.
    pub fn slow_reads(&self, delay: Duration) {
        self.read_delay.set(delay)
    }

    /// Makes every transaction fail with `err`.
    pub fn fail_with(&self, err: TransportError) {
        *self.fail.lock() = Some(err);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), TransportError> {
        match *self.fail.lock() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl RawBus for MockBus {
    fn read_word(&self, addr: u32) -> Result<u32, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let value = self.get(addr);
        self.read_delay.wait();
        Ok(value)
    }

    fn write_word(&self, addr: u32, value: u32) -> Result<(), TransportError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.set(addr, value);
        Ok(())
    }
}

/// Registry that records the cells it is given.
#[derive(Default)]
pub struct RecordingRegistry {
    pub names: Vec<&'static str, 8>,
    pub pdata_sizes: Vec<usize, 8>,
    pub fail: Option<RegistryError>,
}

impl RecordingRegistry {
    pub fn failing(err: RegistryError) -> Self {
        Self {
            fail: Some(err),
            ..Self::default()
        }
    }
}

impl SubDeviceRegistry for RecordingRegistry {
    fn add_devices(&mut self, cells: &[MfdCell<'_>]) -> Result<(), RegistryError> {
        if let Some(err) = self.fail {
            return Err(err);
        }
        for cell in cells {
            self.names.push(cell.name).map_err(|_| RegistryError::NoSpace)?;
            self.pdata_sizes
                .push(cell.pdata_size())
                .map_err(|_| RegistryError::NoSpace)?;
        }
        Ok(())
    }
}

/// Transport that passes the legacy version probe.
pub fn supported_transport() -> MockTransport {
    let transport = MockTransport::new();
    transport.set(
        M10BMC_LEGACY_SYS_BASE + M10BMC_BUILD_VER,
        M10BMC_VER_LEGACY_INVALID,
    );
    transport
}

/// Attached device of `variant` with zeroed counters.
pub fn test_bmc(variant: BmcVariant) -> M10Bmc<MockTransport> {
    let bmc = M10Bmc::new(supported_transport(), variant);
    bmc.transport().reset_counts();
    bmc
}

/// Device with a custom handshake table.
pub fn test_bmc_with_table(table: RangeTable) -> M10Bmc<MockTransport> {
    let bmc = M10Bmc::with_handshake_table(supported_transport(), BmcVariant::N3000, table);
    bmc.transport().reset_counts();
    bmc
}
