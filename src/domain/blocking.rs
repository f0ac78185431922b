use std::collections::{BTreeSet, HashSet};

use super::entities::{Load, LoadId, PositionCode, UldClass, UldKind};
use super::profile::AircraftProfile;
use super::registry::LoadRegistry;

/// Pallet/container mutual exclusion derived from the profile's block table.
///
/// Pure reads over a registry snapshot; nothing is cached between calls.
#[derive(Clone, Copy, Debug)]
pub struct BlockingEngine<'a> {
    profile: &'a AircraftProfile,
}

impl<'a> BlockingEngine<'a> {
    pub fn new(profile: &'a AircraftProfile) -> Self {
        Self { profile }
    }

    /// True when some other committed load makes `load.position` unusable.
    pub fn is_position_blocked(&self, load: &Load, registry: &LoadRegistry) -> bool {
        load.position()
            .and_then(|position| self.blocker(load.kind, position, Some(load.id), registry))
            .is_some()
    }

    /// First occupied position that rules out `position` for a ULD of `kind`.
    ///
    /// Loads with id `ignore` do not count as occupants, which lets a load
    /// being moved release its old slot before the new one is checked.
    pub fn blocker(
        &self,
        kind: UldKind,
        position: &str,
        ignore: Option<LoadId>,
        registry: &LoadRegistry,
    ) -> Option<&'a PositionCode> {
        let candidates = match kind.class() {
            UldClass::Bulk => return None,
            UldClass::Pallet => self.profile.containers_blocked_by(position),
            UldClass::Container => self.profile.pallets_blocked_by(position),
        };
        candidates
            .iter()
            .find(|other| registry.committed_at(other, ignore).is_some())
    }

    /// Every position currently unusable given the full registry state.
    pub fn compute_blocked_set(&self, registry: &LoadRegistry) -> BTreeSet<PositionCode> {
        let occupied: HashSet<&str> = registry
            .iter()
            .filter(|load| load.is_committed())
            .filter_map(Load::position)
            .collect();

        let mut blocked = BTreeSet::new();
        for (pallet, containers) in self.profile.pallet_blocks() {
            if occupied.contains(pallet.as_str()) {
                blocked.extend(containers.iter().cloned());
            }
            if containers.iter().any(|c| occupied.contains(c.as_str())) {
                blocked.insert(pallet.clone());
            }
        }
        blocked
    }
}
