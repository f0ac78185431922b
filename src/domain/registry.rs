use tracing::{debug, warn};

use super::blocking::BlockingEngine;
use super::entities::{Load, LoadId, LoadUpdate, PositionCode, UldClass};
use super::error::{ExportError, PlacementError};
use super::profile::AircraftProfile;

/// Owns every load of the session.
///
/// Loads keep their insertion order, which is the order rows appear in the
/// sidebar. Ids are never reused, even across [`LoadRegistry::clear`].
#[derive(Clone, Debug)]
pub struct LoadRegistry {
    loads: Vec<Load>,
    next_id: u32,
}

impl Default for LoadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadRegistry {
    pub fn new() -> Self {
        Self {
            loads: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends an unassigned AKE row with no identifier and zero weight.
    pub fn add_load(&mut self) -> &Load {
        let id = LoadId(self.next_id);
        self.next_id += 1;
        self.loads.push(Load::new(id));
        debug!(load = %id, "load added");
        &self.loads[self.loads.len() - 1]
    }

    /// Applies `update` to load `id` as one unit, then validates the
    /// resulting position.
    ///
    /// Non-position fields always stick. When the resulting position is
    /// rejected the load ends up unassigned and the condition is returned.
    /// Changing the ULD type without naming a new position releases the
    /// current one, since it can no longer be type-compatible.
    pub fn update_load(
        &mut self,
        profile: &AircraftProfile,
        id: LoadId,
        update: LoadUpdate,
    ) -> Result<&Load, PlacementError> {
        let index = self.index_of(id).ok_or(PlacementError::LoadNotFound(id))?;

        let mut staged = self.loads[index].clone();
        let kind_changed = update.kind.is_some_and(|kind| kind != staged.kind);
        if let Some(kind) = update.kind {
            staged.kind = kind;
        }
        if let Some(identifier) = update.identifier {
            staged.identifier = identifier.trim().to_uppercase();
        }
        if let Some(bulk_code) = update.bulk_code {
            staged.bulk_code = bulk_code;
        }
        if let Some(gross_weight) = update.gross_weight {
            staged.gross_weight = gross_weight;
        }
        staged.position = match update.position {
            Some(position) => position,
            None if kind_changed => None,
            None => staged.position,
        };

        let outcome = match staged.position.as_deref() {
            Some(position) => self.check_placement(profile, &staged, position),
            None => Ok(()),
        };
        if let Err(err) = &outcome {
            warn!(load = %id, kind = %staged.kind, error = %err, "placement rejected");
            staged.position = None;
        }

        debug!(
            load = %id,
            kind = %staged.kind,
            position = staged.position.as_deref().unwrap_or("-"),
            "load updated"
        );
        self.loads[index] = staged;
        outcome.map(|()| &self.loads[index])
    }

    /// Moves load `id` onto `position`, as a drag-and-drop landing does.
    pub fn move_load(
        &mut self,
        profile: &AircraftProfile,
        id: LoadId,
        position: impl Into<PositionCode>,
    ) -> Result<&Load, PlacementError> {
        self.update_load(profile, id, LoadUpdate::default().position(position))
    }

    /// Deletes load `id`. Unknown ids are ignored.
    pub fn remove_load(&mut self, id: LoadId) -> Option<Load> {
        let index = self.index_of(id)?;
        debug!(load = %id, "load removed");
        Some(self.loads.remove(index))
    }

    pub fn clear(&mut self) {
        debug!(count = self.loads.len(), "registry cleared");
        self.loads.clear();
    }

    /// True when every placed load carries an identifier, is filler, or is
    /// bulk.
    pub fn all_valid(&self) -> bool {
        self.loads.iter().all(is_exportable)
    }

    /// Placed loads that would fail [`LoadRegistry::all_valid`].
    pub fn incomplete_loads(&self) -> Vec<LoadId> {
        self.loads
            .iter()
            .filter(|load| !is_exportable(load))
            .map(|load| load.id)
            .collect()
    }

    pub fn ensure_exportable(&self) -> Result<(), ExportError> {
        let incomplete = self.incomplete_loads();
        if incomplete.is_empty() {
            Ok(())
        } else {
            Err(ExportError::ValidationFailed { incomplete })
        }
    }

    /// Positions where load `id` could be dropped right now: type-compatible,
    /// not blocked and not held by another load. Includes its own position.
    pub fn available_positions<'p>(
        &self,
        profile: &'p AircraftProfile,
        id: LoadId,
    ) -> Vec<&'p PositionCode> {
        let Some(load) = self.get(id) else {
            return Vec::new();
        };
        profile
            .positions_of(load.kind.class())
            .iter()
            .filter(|position| self.check_placement(profile, load, position).is_ok())
            .collect()
    }

    pub fn get(&self, id: LoadId) -> Option<&Load> {
        self.loads.iter().find(|load| load.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Load> {
        self.loads.iter()
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// The load holding `position`, if any.
    pub fn load_at(&self, position: &str) -> Option<&Load> {
        self.loads
            .iter()
            .find(|load| load.position() == Some(position))
    }

    /// The committed load at `position`, skipping load `ignore`.
    pub fn committed_at(&self, position: &str, ignore: Option<LoadId>) -> Option<&Load> {
        self.loads.iter().find(|load| {
            Some(load.id) != ignore && load.position() == Some(position) && load.is_committed()
        })
    }

    fn index_of(&self, id: LoadId) -> Option<usize> {
        self.loads.iter().position(|load| load.id == id)
    }

    fn check_placement(
        &self,
        profile: &AircraftProfile,
        load: &Load,
        position: &str,
    ) -> Result<(), PlacementError> {
        let class = profile
            .class_of(position)
            .ok_or_else(|| PlacementError::UnknownPosition(position.to_string()))?;

        if load.kind.is_bulk() && class != UldClass::Bulk {
            return Err(PlacementError::InvalidBulkPosition {
                position: position.to_string(),
            });
        }
        if class != load.kind.class() {
            return Err(PlacementError::PositionIncompatible {
                position: position.to_string(),
                kind: load.kind,
                class: load.kind.class(),
            });
        }
        if let Some(occupant) = self
            .loads
            .iter()
            .find(|other| other.id != load.id && other.position() == Some(position))
        {
            return Err(PlacementError::PositionOccupied {
                position: position.to_string(),
                occupant: occupant.id,
            });
        }
        if let Some(blocker) =
            BlockingEngine::new(profile).blocker(load.kind, position, Some(load.id), self)
        {
            return Err(PlacementError::PositionBlocked {
                position: position.to_string(),
                blocked_by: blocker.clone(),
            });
        }
        Ok(())
    }
}

fn is_exportable(load: &Load) -> bool {
    !load.is_placed() || load.has_identifier() || load.bulk_code.is_filler() || load.kind.is_bulk()
}
