//! Aircraft profiles and load sheets stored as JSON files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{
    AircraftProfile, AircraftProfileSpec, DeckSession, FlightDetails, LoadId, LoadUpdate,
    PlacementError, ProfileError,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("aircraft profile {path} is inconsistent: {source}")]
    Profile {
        path: PathBuf,
        #[source]
        source: ProfileError,
    },
}

/// Reads and validates an aircraft profile, or returns the built-in deck.
pub fn load_profile(path: Option<&Path>) -> Result<AircraftProfile, StoreError> {
    let Some(path) = path else {
        return AircraftProfile::ec_nog().map_err(|source| StoreError::Profile {
            path: PathBuf::from("<built-in>"),
            source,
        });
    };

    let spec: AircraftProfileSpec = read_json(path)?;
    let profile = AircraftProfile::from_spec(spec).map_err(|source| StoreError::Profile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        registration = profile.registration(),
        "aircraft profile loaded"
    );
    Ok(profile)
}

/// Sidebar contents as saved by the planner: flight fields plus load rows.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoadSheet {
    pub flight: FlightDetails,
    pub loads: Vec<LoadUpdate>,
}

pub fn load_sheet(path: &Path) -> Result<LoadSheet, StoreError> {
    read_json(path)
}

/// A load sheet row that could not be placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub row: usize,
    pub load: LoadId,
    pub error: PlacementError,
}

impl LoadSheet {
    /// Replays the rows into `session` the way the sidebar would, one
    /// `add_load` + `update_load` per row. Rejected rows stay in the session
    /// unplaced and are returned for display.
    pub fn apply(self, session: &mut DeckSession) -> Vec<Rejection> {
        session.flight = self.flight;
        let mut rejections = Vec::new();
        for (row, update) in self.loads.into_iter().enumerate() {
            let id = session.add_load().id;
            if let Err(error) = session.update_load(id, update) {
                warn!(row = row + 1, load = %id, error = %error, "load sheet row rejected");
                rejections.push(Rejection {
                    row: row + 1,
                    load: id,
                    error,
                });
            }
        }
        rejections
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, StoreError> {
    let data = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}
