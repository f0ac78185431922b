//! Placement, blocking and load message export for the cargo deck.

pub mod blocking;
pub mod entities;
pub mod error;
pub mod manifest;
pub mod profile;
pub mod registry;
pub mod session;

pub use blocking::BlockingEngine;
pub use entities::{
    BulkCode, FlightDetails, Load, LoadId, LoadUpdate, PassengerCounts, PositionCode, UldClass,
    UldKind,
};
pub use error::{ExportError, PlacementError, ProfileError};
pub use manifest::{
    distribution_totals, export_cargo_manifest, export_layout_report, export_load_distribution,
    net_cargo_weight, DeckSnapshot, DistributionTotals, SlotState,
};
pub use profile::{AircraftProfile, AircraftProfileSpec, DeckLayout, HoldLayout, LdmSettings};
pub use registry::LoadRegistry;
pub use session::DeckSession;
