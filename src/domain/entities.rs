use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Position code on the cargo deck (e.g. `22L`, `21P`, `52`).
pub type PositionCode = String;

/// Session-stable load identifier, handed out monotonically by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(pub u32);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three mutually exclusive position categories on the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UldClass {
    Container,
    Pallet,
    Bulk,
}

impl UldClass {
    pub fn name(&self) -> &'static str {
        match self {
            UldClass::Container => "container",
            UldClass::Pallet => "pallet",
            UldClass::Bulk => "bulk",
        }
    }
}

impl fmt::Display for UldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ULD type codes the planner knows about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UldKind {
    #[default]
    Ake,
    Akn,
    Pag,
    Pmc,
    Paj,
    Blk,
}

impl UldKind {
    pub const ALL: [UldKind; 6] = [
        UldKind::Ake,
        UldKind::Akn,
        UldKind::Blk,
        UldKind::Pag,
        UldKind::Pmc,
        UldKind::Paj,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            UldKind::Ake => "AKE",
            UldKind::Akn => "AKN",
            UldKind::Pag => "PAG",
            UldKind::Pmc => "PMC",
            UldKind::Paj => "PAJ",
            UldKind::Blk => "BLK",
        }
    }

    pub fn class(&self) -> UldClass {
        match self {
            UldKind::Ake | UldKind::Akn => UldClass::Container,
            UldKind::Pag | UldKind::Pmc | UldKind::Paj => UldClass::Pallet,
            UldKind::Blk => UldClass::Bulk,
        }
    }

    /// Empty weight in kilograms subtracted to get net cargo weight.
    pub fn tare_kg(&self) -> u32 {
        match self.class() {
            UldClass::Container => 80,
            UldClass::Pallet => 103,
            UldClass::Bulk => 0,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self.class(), UldClass::Bulk)
    }
}

impl fmt::Display for UldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Load category tag carried next to the ULD type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulkCode {
    /// Ordinary freight.
    #[default]
    #[serde(rename = "BY")]
    Standard,
    /// Filler content: counts as occupied without a ULD identifier.
    #[serde(rename = "FKT")]
    Filler,
    /// ULD shell on the deck with nothing inside.
    #[serde(rename = "EMPTY")]
    EmptyShell,
}

impl BulkCode {
    pub fn code(&self) -> &'static str {
        match self {
            BulkCode::Standard => "BY",
            BulkCode::Filler => "FKT",
            BulkCode::EmptyShell => "EMPTY",
        }
    }

    /// Code printed in the load messages. Filler maps to `E`, everything
    /// else reports as standard freight.
    pub fn message_code(&self) -> &'static str {
        match self {
            BulkCode::Filler => "E",
            BulkCode::Standard | BulkCode::EmptyShell => "BY",
        }
    }

    pub fn is_filler(&self) -> bool {
        matches!(self, BulkCode::Filler)
    }
}

impl fmt::Display for BulkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One cargo item or reserved slot in the current session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Load {
    pub id: LoadId,
    pub kind: UldKind,
    /// External ULD serial. Empty means the slot is reserved without a unit;
    /// for bulk loads it is a free-text description.
    pub identifier: String,
    pub bulk_code: BulkCode,
    pub gross_weight: u32,
    pub position: Option<PositionCode>,
}

impl Load {
    pub(crate) fn new(id: LoadId) -> Self {
        Self {
            id,
            kind: UldKind::default(),
            identifier: String::new(),
            bulk_code: BulkCode::default(),
            gross_weight: 0,
            position: None,
        }
    }

    pub fn has_identifier(&self) -> bool {
        !self.identifier.is_empty()
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Committed for blocking purposes: a ULD with an identifier, filler
    /// content, or any bulk load.
    pub fn is_committed(&self) -> bool {
        self.has_identifier() || self.bulk_code.is_filler() || self.kind.is_bulk()
    }

    /// Gross minus tare, floored at zero.
    pub fn net_weight(&self) -> u32 {
        self.gross_weight.saturating_sub(self.kind.tare_kg())
    }

    /// Type code plus identifier, or the type code alone when unidentified.
    pub fn label(&self) -> String {
        if self.has_identifier() {
            format!("{}{}", self.kind.code(), self.identifier)
        } else {
            self.kind.code().to_string()
        }
    }
}

/// Partial update applied by [`LoadRegistry::update_load`](super::LoadRegistry::update_load).
///
/// `position: Some(None)` clears the position, `None` leaves it untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadUpdate {
    #[serde(default)]
    pub kind: Option<UldKind>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub bulk_code: Option<BulkCode>,
    #[serde(default)]
    pub gross_weight: Option<u32>,
    #[serde(default, with = "position_patch")]
    pub position: Option<Option<PositionCode>>,
}

impl LoadUpdate {
    pub fn kind(mut self, kind: UldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn bulk_code(mut self, bulk_code: BulkCode) -> Self {
        self.bulk_code = Some(bulk_code);
        self
    }

    pub fn gross_weight(mut self, gross_weight: u32) -> Self {
        self.gross_weight = Some(gross_weight);
        self
    }

    pub fn position(mut self, position: impl Into<PositionCode>) -> Self {
        self.position = Some(Some(position.into()));
        self
    }

    pub fn clear_position(mut self) -> Self {
        self.position = Some(None);
        self
    }
}

// An empty string in a load sheet means "unassigned", matching the form field.
mod position_patch {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            None => serializer.serialize_none(),
            Some(None) => serializer.serialize_str(""),
            Some(Some(code)) => serializer.serialize_str(code),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|code| {
            let trimmed = code.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_uppercase())
            }
        }))
    }
}

/// Flight data typed into the sidebar form, consumed by the message export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightDetails {
    pub flight_number: Option<String>,
    pub destination: Option<String>,
    /// Day of month printed in both message headers; today (UTC) when unset.
    pub day_of_month: Option<u8>,
    pub passengers: PassengerCounts,
    pub total_pieces: u32,
}

impl FlightDetails {
    pub fn destination(&self) -> &str {
        non_blank(self.destination.as_deref()).unwrap_or("XXX")
    }

    pub fn flight_number_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_blank(self.flight_number.as_deref()).unwrap_or(fallback)
    }

    pub fn day_label(&self) -> String {
        let day = self
            .day_of_month
            .unwrap_or_else(|| OffsetDateTime::now_utc().day());
        format!("{day:02}")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassengerCounts {
    pub male: u32,
    pub female: u32,
    pub child: u32,
    pub infant: u32,
}

impl PassengerCounts {
    /// Seated passengers; infants travel on a lap and are not counted.
    pub fn total(&self) -> u32 {
        self.male + self.female + self.child
    }
}
