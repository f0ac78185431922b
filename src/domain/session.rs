use std::collections::BTreeSet;

use tracing::info;

use super::blocking::BlockingEngine;
use super::entities::{FlightDetails, Load, LoadId, LoadUpdate, PositionCode};
use super::error::{ExportError, PlacementError};
use super::manifest;
use super::profile::AircraftProfile;
use super::registry::LoadRegistry;

/// One planning session: an aircraft profile, its loads and the flight
/// fields typed next to them.
///
/// This is the whole surface the deck view talks to. Every call runs to
/// completion synchronously; the view re-reads [`DeckSession::compute_blocked_set`]
/// after each mutation to refresh slot styling.
#[derive(Clone, Debug)]
pub struct DeckSession {
    profile: AircraftProfile,
    registry: LoadRegistry,
    pub flight: FlightDetails,
}

impl DeckSession {
    pub fn new(profile: AircraftProfile) -> Self {
        info!(
            registration = profile.registration(),
            aircraft = profile.type_designator(),
            "deck session opened"
        );
        Self {
            profile,
            registry: LoadRegistry::new(),
            flight: FlightDetails::default(),
        }
    }

    pub fn profile(&self) -> &AircraftProfile {
        &self.profile
    }

    pub fn registry(&self) -> &LoadRegistry {
        &self.registry
    }

    pub fn add_load(&mut self) -> &Load {
        self.registry.add_load()
    }

    pub fn update_load(&mut self, id: LoadId, update: LoadUpdate) -> Result<&Load, PlacementError> {
        self.registry.update_load(&self.profile, id, update)
    }

    pub fn move_load(
        &mut self,
        id: LoadId,
        position: impl Into<PositionCode>,
    ) -> Result<&Load, PlacementError> {
        self.registry.move_load(&self.profile, id, position)
    }

    pub fn remove_load(&mut self, id: LoadId) -> Option<Load> {
        self.registry.remove_load(id)
    }

    /// Drops every load. Confirmation is the caller's business.
    pub fn clear(&mut self) {
        self.registry.clear();
    }

    pub fn is_position_blocked(&self, id: LoadId) -> bool {
        self.registry
            .get(id)
            .is_some_and(|load| self.blocking().is_position_blocked(load, &self.registry))
    }

    pub fn compute_blocked_set(&self) -> BTreeSet<PositionCode> {
        self.blocking().compute_blocked_set(&self.registry)
    }

    pub fn available_positions(&self, id: LoadId) -> Vec<&PositionCode> {
        self.registry.available_positions(&self.profile, id)
    }

    pub fn all_valid(&self) -> bool {
        self.registry.all_valid()
    }

    pub fn export_cargo_manifest(&self) -> Result<String, ExportError> {
        manifest::export_cargo_manifest(&self.profile, &self.registry, &self.flight)
    }

    pub fn export_load_distribution(&self) -> Result<String, ExportError> {
        manifest::export_load_distribution(&self.profile, &self.registry, &self.flight)
    }

    pub fn export_layout_report(&self) -> String {
        manifest::export_layout_report(&self.profile, &self.registry)
    }

    fn blocking(&self) -> BlockingEngine<'_> {
        BlockingEngine::new(&self.profile)
    }
}
