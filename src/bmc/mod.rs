pub mod builder;
pub mod device;
pub mod error;
pub mod fw_state;
pub mod info;
pub mod range;
pub mod regmap;
pub mod regs;
pub mod subdev;
pub mod transport;
pub mod variant;
pub mod version;

#[cfg(test)]
mod test_support;

pub use builder::BmcBuilder;
pub use device::M10Bmc;
pub use error::BmcError;
pub use fw_state::{FwState, FwStateGuard, FwStateLock};
pub use info::MacAddress;
pub use range::{RangeTable, RegRange};
pub use regmap::{M10BMC_REGMAP_CONFIG, RawBus, Regmap, RegmapConfig};
pub use subdev::{NoSubDevices, RegistryError, SubDeviceRegistry};
pub use transport::{RegisterTransport, TransportError};
pub use variant::{BmcVariant, CellList, MfdCell, PlatformData};
pub use version::check_version;

pub mod prelude {
    pub use super::{
        BmcBuilder, BmcError, BmcVariant, FwState, FwStateGuard, M10Bmc, MacAddress, MfdCell,
        NoSubDevices, PlatformData, RawBus, RegisterTransport, Regmap, RegistryError,
        SubDeviceRegistry, TransportError,
    };
}
