//! Secure update example: monitoring keeps running while an image is staged
//!
//! This example demonstrates:
//! - Attaching through the regmap layer over a simulated bus
//! - A monitor thread polling telemetry and identification registers
//! - Secure update claiming the handshake registers with a state guard
//! - Telemetry reads failing fast with `Busy` instead of stalling

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use m10_bmc::{
    bmc::regs::{M10BMC_FLASH_BASE, M10BMC_LEGACY_SYS_BASE, M10BMC_SYS_BASE},
    prelude::*,
};

/// Simulated SPI-to-Avalon bridge backed by a hash map.
#[derive(Default)]
struct SimBus {
    regs: Mutex<HashMap<u32, u32>>,
}

impl SimBus {
    fn new() -> Self {
        let bus = Self::default();
        {
            let mut regs = bus.regs.lock().unwrap();
            // Supported parts read all ones from the legacy version register
            regs.insert(M10BMC_LEGACY_SYS_BASE, 0xffff_ffff);
            regs.insert(M10BMC_SYS_BASE, 0x0011_0203);
            regs.insert(M10BMC_SYS_BASE + 0x10, 0x0012_3456);
            regs.insert(M10BMC_SYS_BASE + 0x14, 0x0008_789a);
            regs.insert(M10BMC_SYS_BASE + 0x100, 42);
        }
        bus
    }
}

impl RawBus for SimBus {
    fn read_word(&self, addr: u32) -> Result<u32, TransportError> {
        let regs = self.regs.lock().map_err(|_| TransportError::Bus)?;
        Ok(regs.get(&addr).copied().unwrap_or(0))
    }

    fn write_word(&self, addr: u32, value: u32) -> Result<(), TransportError> {
        let mut regs = self.regs.lock().map_err(|_| TransportError::Bus)?;
        regs.insert(addr, value);
        Ok(())
    }
}

/// Prints every cell the BMC asks for.
struct PrintRegistry;

impl SubDeviceRegistry for PrintRegistry {
    fn add_devices(&mut self, cells: &[MfdCell<'_>]) -> Result<(), RegistryError> {
        for cell in cells {
            println!("sub-device {} ({} bytes of platform data)", cell.name, cell.pdata_size());
        }
        Ok(())
    }
}

fn main() -> Result<(), BmcError> {
    env_logger::init();

    let retimer_cfg = [0x01, 0x00, 0x02, 0x00];
    let bmc = BmcBuilder::new()
        .transport(Regmap::m10bmc(SimBus::new()))
        .identity("m10-n3000")
        .platform_data(PlatformData {
            retimer: Some(&retimer_cfg),
        })
        .attach(&mut PrintRegistry)?;

    println!("BMC version {:#x}", bmc.bmc_version()?);
    println!("MAC {:02x?} x{}", bmc.mac_address()?.octets(), bmc.mac_count()?);

    let done = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                match bmc.sys_read(0x100) {
                    Ok(temp) => println!("monitor: telemetry {temp}"),
                    Err(BmcError::Busy) => println!("monitor: telemetry busy, retry later"),
                    Err(err) => println!("monitor: {err}"),
                }
                if let Ok(mac) = bmc.mac_address() {
                    println!("monitor: mac {:02x?}", mac.octets());
                }
                thread::sleep(Duration::from_millis(20));
            }
        });

        let result = (|| -> Result<(), BmcError> {
            let _update = bmc.fw_state_guard(FwState::SecUpdate)?;
            let image = [0xdead_beef_u32; 16];
            for (idx, chunk) in image.chunks(4).enumerate() {
                bmc.raw_bulk_write(M10BMC_FLASH_BASE + (idx as u32) * 16, chunk)?;
                thread::sleep(Duration::from_millis(30));
            }
            println!("update: staged {} words", image.len());
            Ok(())
        })();

        thread::sleep(Duration::from_millis(40));
        done.store(true, Ordering::Relaxed);
        result
    })?;

    println!("final state {:?}", bmc.fw_state());
    Ok(())
}
