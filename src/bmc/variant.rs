//! Hardware variants and their static configuration.

use crate::bmc::{
    BmcError,
    range::{RangeTable, RegRange},
    regs::{
        M10BMC_D5005_TELEM_END, M10BMC_D5005_TELEM_START, M10BMC_N3000_TELEM_END,
        M10BMC_N3000_TELEM_START,
    },
};

/// Upper bound on companion cells of any variant.
pub const MAX_CELLS: usize = 4;

/// Bound cell list handed to the sub-device registry.
pub type CellList<'a> = heapless::Vec<MfdCell<'a>, MAX_CELLS>;

const N3000_CELLS: [&str; 3] = ["n3000bmc-hwmon", "n3000bmc-retimer", "n3000bmc-secure"];
const D5005_CELLS: [&str; 2] = ["d5005bmc-hwmon", "d5005bmc-secure"];

const _: () = assert!(N3000_CELLS.len() <= MAX_CELLS);
const _: () = assert!(D5005_CELLS.len() <= MAX_CELLS);

const RETIMER_CELL: &str = "n3000bmc-retimer";

static N3000_HANDSHAKE_REGS: [RegRange; 1] = [RegRange::new(
    M10BMC_N3000_TELEM_START,
    M10BMC_N3000_TELEM_END,
)];
static D5005_HANDSHAKE_REGS: [RegRange; 1] = [RegRange::new(
    M10BMC_D5005_TELEM_START,
    M10BMC_D5005_TELEM_END,
)];

/// Supported BMC board variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmcVariant {
    /// PAC N3000.
    N3000,
    /// PAC D5005.
    D5005,
}

/// Bus identity token and the variant it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub name: &'static str,
    pub variant: BmcVariant,
}

/// Identity tokens this crate binds to.
pub static M10BMC_DEVICE_IDS: [DeviceId; 2] = [
    DeviceId {
        name: "m10-n3000",
        variant: BmcVariant::N3000,
    },
    DeviceId {
        name: "m10-d5005",
        variant: BmcVariant::D5005,
    },
];

impl BmcVariant {
    /// Looks up the variant for a bus identity token.
    pub fn from_id(id: &str) -> Result<Self, BmcError> {
        M10BMC_DEVICE_IDS
            .iter()
            .find(|entry| entry.name == id)
            .map(|entry| entry.variant)
            .ok_or(BmcError::UnknownVariant)
    }

    /// Handshake registers of this variant, as system register offsets.
    pub fn handshake_table(self) -> RangeTable {
        match self {
            BmcVariant::N3000 => RangeTable::new(&N3000_HANDSHAKE_REGS),
            BmcVariant::D5005 => RangeTable::new(&D5005_HANDSHAKE_REGS),
        }
    }

    /// Names of the companion sub-devices.
    pub fn cell_names(self) -> &'static [&'static str] {
        match self {
            BmcVariant::N3000 => &N3000_CELLS,
            BmcVariant::D5005 => &D5005_CELLS,
        }
    }

    /// Builds the cell list, binding platform data to the cells that take it.
    pub fn cells<'a>(self, pdata: Option<&PlatformData<'a>>) -> CellList<'a> {
        let retimer = pdata.and_then(|pdata| pdata.retimer);
        let mut cells = CellList::new();
        cells.extend(self.cell_names().iter().map(|&name| MfdCell {
            name,
            platform_data: if name == RETIMER_CELL { retimer } else { None },
        }));
        cells
    }
}

/// Platform data supplied by the bus at attach time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlatformData<'a> {
    /// Configuration payload for the retimer sub-device.
    pub retimer: Option<&'a [u8]>,
}

/// Descriptor of one companion sub-device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MfdCell<'a> {
    pub name: &'static str,
    pub platform_data: Option<&'a [u8]>,
}

impl MfdCell<'_> {
    /// Size of the attached platform payload in bytes.
    pub fn pdata_size(&self) -> usize {
        self.platform_data.map_or(0, <[u8]>::len)
    }
}
