//! Fixed-format load messages built from a validated registry.
//!
//! - `cpm`: cargo position manifest, one line per reportable deck position.
//! - `ldm`: load distribution manifest with compartment totals.
//! - `layout_report`: plain listing of placed loads for the loading crew.
//!
//! All three are pure transforms. The two airline messages refuse to run
//! while any placed load lacks an identifier (see
//! [`LoadRegistry::ensure_exportable`]); the layout report skips such loads.

pub mod cpm;
pub mod layout_report;
pub mod ldm;

use std::collections::{HashMap, HashSet};

use super::entities::{Load, PositionCode};
use super::profile::AircraftProfile;
use super::registry::LoadRegistry;

pub use cpm::{export_cargo_manifest, net_cargo_weight};
pub use layout_report::export_layout_report;
pub use ldm::{distribution_totals, export_load_distribution, DistributionTotals};

/// How a position reads for message purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing there, or a ULD reserved without identifier.
    Empty,
    /// Filler content; reported even without an identifier.
    Filler,
    /// Identified ULD or bulk freight.
    Occupied,
}

/// Occupancy view shared by the CPM derivation steps.
pub struct DeckSnapshot<'a> {
    profile: &'a AircraftProfile,
    by_position: HashMap<&'a str, &'a Load>,
    blocked: HashSet<&'a str>,
    pallet_only: Vec<&'a PositionCode>,
    suppressed: HashSet<&'a str>,
}

impl<'a> DeckSnapshot<'a> {
    pub fn new(profile: &'a AircraftProfile, registry: &'a LoadRegistry) -> Self {
        let by_position: HashMap<&str, &Load> = registry
            .iter()
            .filter_map(|load| load.position().map(|position| (position, load)))
            .collect();

        let mut snapshot = Self {
            profile,
            by_position,
            blocked: HashSet::new(),
            pallet_only: Vec::new(),
            suppressed: HashSet::new(),
        };
        snapshot.blocked = snapshot.derive_blocked();
        snapshot.derive_pallet_only();
        snapshot
    }

    pub fn load_at(&self, position: &str) -> Option<&'a Load> {
        self.by_position.get(position).copied()
    }

    pub fn state(&self, position: &str) -> SlotState {
        match self.load_at(position) {
            None => SlotState::Empty,
            Some(load) if load.kind.is_bulk() => SlotState::Occupied,
            Some(load) if load.bulk_code.is_filler() => SlotState::Filler,
            Some(load) if load.has_identifier() => SlotState::Occupied,
            Some(_) => SlotState::Empty,
        }
    }

    pub fn is_empty(&self, position: &str) -> bool {
        self.state(position) == SlotState::Empty
    }

    pub fn is_blocked(&self, position: &str) -> bool {
        self.blocked.contains(position)
    }

    pub fn is_suppressed(&self, position: &str) -> bool {
        self.suppressed.contains(position)
    }

    /// Empty pallets whose covered containers are all empty, in profile order.
    pub fn pallet_only(&self) -> &[&'a PositionCode] {
        &self.pallet_only
    }

    pub fn is_pallet_only(&self, position: &str) -> bool {
        self.pallet_only.iter().any(|p| p.as_str() == position)
    }

    /// A left/right container pair gets a combined line only when neither
    /// side is blocked or folded into a pallet-only line.
    pub fn pair_allowed(&self, left: &str, right: &str) -> bool {
        [left, right]
            .iter()
            .all(|side| !self.is_blocked(side) && !self.is_suppressed(side))
    }

    fn derive_blocked(&self) -> HashSet<&'a str> {
        let profile = self.profile;
        let mut blocked = HashSet::new();
        for (pallet, containers) in profile.pallet_blocks() {
            if !self.is_empty(pallet) {
                blocked.extend(containers.iter().map(String::as_str));
            }
            if containers.iter().any(|c| !self.is_empty(c)) {
                blocked.insert(pallet.as_str());
            }
        }
        blocked
    }

    fn derive_pallet_only(&mut self) {
        let profile = self.profile;
        for pallet in profile.pallet_positions() {
            if self.is_blocked(pallet) {
                continue;
            }
            let containers = profile.containers_blocked_by(pallet);
            if self.is_empty(pallet) && containers.iter().all(|c| self.is_empty(c)) {
                self.pallet_only.push(pallet);
                self.suppressed
                    .extend(containers.iter().map(String::as_str));
            }
        }
    }
}

/// Compartment/sort number: the leading digits of a position code.
pub fn numeric_prefix(position: &str) -> Option<u32> {
    let digits = position
        .find(|c: char| !c.is_ascii_digit())
        .map_or(position, |end| &position[..end]);
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BulkCode, LoadUpdate, UldKind};

    fn profile() -> AircraftProfile {
        AircraftProfile::ec_nog().unwrap()
    }

    #[test]
    fn numeric_prefix_reads_leading_digits() {
        assert_eq!(numeric_prefix("21P"), Some(21));
        assert_eq!(numeric_prefix("52"), Some(52));
        assert_eq!(numeric_prefix("P1"), None);
    }

    #[test]
    fn untouched_deck_is_all_pallet_only() {
        let profile = profile();
        let registry = LoadRegistry::new();
        let snapshot = DeckSnapshot::new(&profile, &registry);
        assert_eq!(snapshot.pallet_only().len(), profile.pallet_positions().len());
        assert!(snapshot.is_suppressed("22L"));
        assert!(!snapshot.pair_allowed("22L", "22R"));
    }

    #[test]
    fn filler_counts_as_occupied_for_blocking() {
        let profile = profile();
        let mut registry = LoadRegistry::new();
        let id = registry.add_load().id;
        registry
            .update_load(
                &profile,
                id,
                LoadUpdate::default()
                    .bulk_code(BulkCode::Filler)
                    .position("31L"),
            )
            .unwrap();

        let snapshot = DeckSnapshot::new(&profile, &registry);
        assert_eq!(snapshot.state("31L"), SlotState::Filler);
        assert!(snapshot.is_blocked("31P"));
        assert!(!snapshot.is_pallet_only("31P"));
        assert!(snapshot.pair_allowed("31L", "31R"));
    }

    #[test]
    fn reserved_uld_reads_as_empty() {
        let profile = profile();
        let mut registry = LoadRegistry::new();
        let id = registry.add_load().id;
        registry
            .update_load(
                &profile,
                id,
                LoadUpdate::default().kind(UldKind::Pmc).position("11P"),
            )
            .unwrap();

        let snapshot = DeckSnapshot::new(&profile, &registry);
        assert_eq!(snapshot.state("11P"), SlotState::Empty);
        assert!(snapshot.is_pallet_only("11P"));
    }
}
