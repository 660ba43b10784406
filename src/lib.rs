//! A `no_std`, no-alloc access layer for MAX 10 board management controllers.
//!
//! The BMC exposes one register space to several independent users: attribute
//! readers, hardware monitoring, and secure update. Secure update runs for
//! minutes and uses a block of "handshake" registers to talk to the BMC
//! firmware. While it does, nobody else may touch that block, but everything
//! else must stay reachable.
//!
//! # Features
//!
//! - **Per-device update state** - `Normal` or one update phase, under a reader/writer lock
//! - **Fail-fast gating** - handshake registers return `Busy` instead of blocking
//! - **Unrestricted fast path** - ordinary registers never touch the lock
//! - **Checked attach** - legacy hardware and unknown variants are refused up front
//! - **Register windows** - a regmap layer rejects unmapped and unaligned addresses
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐        ┌──────────────────────────┐
//! │ hwmon / attrs    │        │ secure update            │
//! │                  │        │                          │
//! │  sys_read()      │        │  fw_state_enter()        │
//! │  sys_update_bits │        │  raw_bulk_write()        │
//! │                  │        │  fw_state_exit()         │
//! └────────┬─────────┘        └────────────┬─────────────┘
//!          │ shared (handshake only)       │ exclusive
//!          ▼                               ▼
//! ┌──────────────────────────────────────────────────────┐
//! │ M10Bmc: RangeTable + FwStateLock                     │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//!              RegisterTransport (Regmap<RawBus>)
//! ```
//!
//! - **Ordinary offsets** go straight to the transport
//! - **Handshake offsets** take the state lock shared and fail with `Busy` during `SecUpdate`
//! - **Transitions** take the lock exclusive, so they wait for in-flight handshake accesses
//!
//! # Example
//!
//! ```rust,no_run
//! use m10_bmc::prelude::*;
//!
//! struct SpiAvmm;
//!
//! impl RawBus for SpiAvmm {
//!     fn read_word(&self, _addr: u32) -> Result<u32, TransportError> {
//!         Ok(0xffff_ffff)
//!     }
//!     fn write_word(&self, _addr: u32, _value: u32) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! let bmc = BmcBuilder::new()
//!     .transport(Regmap::m10bmc(SpiAvmm))
//!     .identity("m10-n3000")
//!     .attach(&mut NoSubDevices)
//!     .unwrap();
//!
//! // Secure update claims the handshake registers...
//! let guard = bmc.fw_state_guard(FwState::SecUpdate).unwrap();
//! assert_eq!(bmc.sys_read(0x100), Err(BmcError::Busy));
//!
//! // ...while identification registers stay readable.
//! let _version = bmc.bmc_version().unwrap();
//!
//! drop(guard);
//! assert!(bmc.sys_read(0x100).is_ok());
//! ```

#![deny(unsafe_code)]
#![no_std]

#[cfg(test)]
extern crate std;

pub mod bmc;

pub mod prelude {
    pub use crate::bmc::prelude::*;
}
