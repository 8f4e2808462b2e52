//! Catalog Entity Schema
//!
//! Data structures for variants, pins, circuits, boards, board pinouts and
//! circuit schematics. Catalog entries are hand-maintained and inconsistently
//! populated, so every attribute that may be missing is an `Option` or a
//! defaulted collection. Matchers treat an absent field as "no match".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::Esp32RefError;

/// Deserialize a list element by element, dropping (and logging) the
/// elements that do not parse so one bad row does not sink its owner.
fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let mut items = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!("Skipped list element #{}: {}", index, e),
        }
    }
    Ok(items)
}

/// A chip family, e.g. ESP32-S3 or ESP32-C3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Globally unique id, referenced by boards and pins
    pub id: String,

    /// Short display name ("ESP32-S3")
    pub name: String,

    pub full_name: Option<String>,

    pub tagline: Option<String>,

    pub cpu: Option<CpuSpec>,

    pub memory: Option<MemorySpec>,

    pub wireless: Option<WirelessSpec>,

    pub peripherals: Option<PeripheralSpec>,

    /// Typical applications
    #[serde(default)]
    pub best_for: Vec<String>,

    /// Chip pin map, owned by this variant
    #[serde(default, deserialize_with = "skip_invalid")]
    pub pins: Vec<Pin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSpec {
    pub architecture: Option<String>,
    pub cores: Option<u8>,
    pub clock_speed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySpec {
    pub sram: Option<String>,
    pub flash: Option<String>,
    pub psram: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WirelessSpec {
    pub wifi: Option<String>,
    pub wifi6: Option<bool>,
    pub ble: Option<String>,
    pub thread: Option<bool>,
    pub zigbee: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeripheralSpec {
    pub gpio: Option<u32>,
    pub adc: Option<String>,
    pub dac: Option<String>,
    pub touch: Option<u32>,
    pub spi: Option<u32>,
    pub i2c: Option<u32>,
    pub uart: Option<u32>,
    pub usb: Option<String>,
}

/// Which edge of the package or board a pin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl fmt::Display for PinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinSide::Left => write!(f, "left"),
            PinSide::Right => write!(f, "right"),
            PinSide::Top => write!(f, "top"),
            PinSide::Bottom => write!(f, "bottom"),
        }
    }
}

/// Identifies a pin row within its owner (variant or board).
pub type PinKey = (PinSide, u32);

/// A single physical contact on a chip or board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub position: u32,

    pub side: PinSide,

    /// Silkscreen label
    pub label: Option<String>,

    /// Logical name ("GPIO21", "3V3")
    pub name: String,

    #[serde(rename = "type")]
    pub pin_type: PinType,

    /// Power, ground and NC pins have no GPIO number
    pub gpio: Option<u8>,

    pub description: Option<String>,

    /// Alternate functions ("I2C_SDA", "ADC1_CH0")
    #[serde(default)]
    pub functions: Vec<String>,

    /// Facet list used by the pinout filter. Kept separate from `strapping`.
    #[serde(default)]
    pub categories: Vec<PinCategory>,

    pub strapping: Option<bool>,

    pub reserved: Option<bool>,

    pub input_only: Option<bool>,

    pub warning: Option<String>,
}

impl Pin {
    pub fn key(&self) -> PinKey {
        (self.side, self.position)
    }

    pub fn is_strapping(&self) -> bool {
        self.strapping.unwrap_or(false)
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved.unwrap_or(false)
    }

    pub fn is_input_only(&self) -> bool {
        self.input_only.unwrap_or(false)
    }

    pub fn has_category(&self, category: &PinCategory) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    Power,
    Ground,
    Gpio,
    Input,
    Reserved,
    Nc,
    Usb,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PinType::Power => "power",
            PinType::Ground => "ground",
            PinType::Gpio => "gpio",
            PinType::Input => "input",
            PinType::Reserved => "reserved",
            PinType::Nc => "nc",
            PinType::Usb => "usb",
            PinType::Other(other) => other.as_str(),
        };
        f.write_str(s)
    }
}

/// Pinout filter facet values. Unknown names are preserved as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinCategory {
    Power,
    Gpio,
    Adc,
    Dac,
    Touch,
    Spi,
    I2c,
    Uart,
    Usb,
    Flash,
    Special,
    #[serde(untagged)]
    Other(String),
}

impl PinCategory {
    pub fn as_str(&self) -> &str {
        match self {
            PinCategory::Power => "power",
            PinCategory::Gpio => "gpio",
            PinCategory::Adc => "adc",
            PinCategory::Dac => "dac",
            PinCategory::Touch => "touch",
            PinCategory::Spi => "spi",
            PinCategory::I2c => "i2c",
            PinCategory::Uart => "uart",
            PinCategory::Usb => "usb",
            PinCategory::Flash => "flash",
            PinCategory::Special => "special",
            PinCategory::Other(other) => other.as_str(),
        }
    }
}

impl From<&str> for PinCategory {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "power" => PinCategory::Power,
            "gpio" => PinCategory::Gpio,
            "adc" => PinCategory::Adc,
            "dac" => PinCategory::Dac,
            "touch" => PinCategory::Touch,
            "spi" => PinCategory::Spi,
            "i2c" => PinCategory::I2c,
            "uart" => PinCategory::Uart,
            "usb" => PinCategory::Usb,
            "flash" => PinCategory::Flash,
            "special" => PinCategory::Special,
            other => PinCategory::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PinCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circuit difficulty is a closed set; entries with any other value are rejected at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Esp32RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(Esp32RefError::unknown("difficulty", s)),
        }
    }
}

/// A circuit recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: String,

    /// Display category ("Power", "Output"), matched exactly by the category facet
    pub category: String,

    pub title: String,

    pub difficulty: Difficulty,

    pub description: Option<String>,

    #[serde(default)]
    pub components: Vec<CircuitComponent>,

    #[serde(default)]
    pub connections: Vec<Connection>,

    /// Example firmware snippet
    pub code: Option<String>,

    #[serde(default)]
    pub notes: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitComponent {
    pub name: String,
    pub value: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub note: Option<String>,
}

/// A physical development board built around one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,

    pub name: String,

    pub manufacturer: String,

    /// Foreign key into the variant table
    pub variant: String,

    /// Module or chip package fitted to the board
    pub module: Option<String>,

    pub description: Option<String>,

    pub form_factor: Option<String>,

    pub features: Option<BoardFeatures>,

    /// Short pinout summary ("38 pins, 2 rows")
    pub pinout: Option<String>,

    pub power: Option<String>,

    pub price: Option<String>,

    #[serde(default)]
    pub pros: Vec<String>,

    #[serde(default)]
    pub cons: Vec<String>,

    pub url: Option<String>,
}

impl Board {
    /// True only when the board explicitly declares a camera.
    pub fn has_camera(&self) -> bool {
        self.features
            .as_ref()
            .and_then(|f| f.camera)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardFeatures {
    pub camera: Option<bool>,
    pub sd_card: Option<bool>,
    pub battery: Option<bool>,
    pub display: Option<String>,
    pub usb: Option<String>,
    pub led: Option<String>,
    pub button: Option<String>,
    pub antenna: Option<String>,
}

/// Header-level pin map of a specific board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPinout {
    pub board_id: String,
    pub layout: Option<String>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub pins: Vec<Pin>,
}

/// Parts and nets drawn by the schematic view of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitSchematic {
    pub circuit_id: String,
    #[serde(default)]
    pub parts: Vec<SchematicPart>,
    #[serde(default)]
    pub nets: Vec<SchematicNet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicPart {
    pub reference: String,
    pub kind: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicNet {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// The entity tables, in the order the catalog scans them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Variant,
    Pin,
    Circuit,
    Board,
    BoardPinout,
    Schematic,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Variant => "variant",
            EntityKind::Pin => "pin",
            EntityKind::Circuit => "circuit",
            EntityKind::Board => "board",
            EntityKind::BoardPinout => "board pinout",
            EntityKind::Schematic => "schematic",
        };
        f.write_str(s)
    }
}
