use thiserror::Error;

use super::entities::{LoadId, PositionCode, UldClass, UldKind};

/// Rejection conditions raised when a load is moved onto a deck position.
///
/// None of these are fatal: the position field of the affected load is
/// reset to unassigned and the caller surfaces the message to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("{kind} is a {class} ULD and cannot be placed at {position}")]
    PositionIncompatible {
        position: PositionCode,
        kind: UldKind,
        class: UldClass,
    },
    #[error("position {position} is blocked by {blocked_by}")]
    PositionBlocked {
        position: PositionCode,
        blocked_by: PositionCode,
    },
    #[error("position {position} already holds load {occupant}")]
    PositionOccupied {
        position: PositionCode,
        occupant: LoadId,
    },
    #[error("BLK must be placed only in bulk positions, not {position}")]
    InvalidBulkPosition { position: PositionCode },
    #[error("unknown position {0}")]
    UnknownPosition(PositionCode),
    #[error("load {0} not found")]
    LoadNotFound(LoadId),
}

impl PlacementError {
    pub fn position(&self) -> Option<&str> {
        match self {
            PlacementError::PositionIncompatible { position, .. }
            | PlacementError::PositionBlocked { position, .. }
            | PlacementError::PositionOccupied { position, .. }
            | PlacementError::InvalidBulkPosition { position }
            | PlacementError::UnknownPosition(position) => Some(position),
            PlacementError::LoadNotFound(_) => None,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("fill all ULD details before exporting (ULD ID, weight, bulk, position); incomplete loads: {}", format_ids(.incomplete))]
    ValidationFailed { incomplete: Vec<LoadId> },
}

fn format_ids(ids: &[LoadId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Aircraft profile data that is not referentially closed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("position {0} is listed in more than one position set")]
    DuplicatePosition(PositionCode),
    #[error("pallet block key {0} is not a pallet position")]
    BlockKeyNotPallet(PositionCode),
    #[error("pallet {pallet} blocks {position}, which is not a container position")]
    BlockTargetNotContainer {
        pallet: PositionCode,
        position: PositionCode,
    },
    #[error("position order pair {left}/{right} references a non-container position")]
    PairNotContainer {
        left: PositionCode,
        right: PositionCode,
    },
    #[error("layout row position {0} is not declared in the position sets")]
    UnknownLayoutPosition(PositionCode),
    #[error("profile has no bulk positions")]
    NoBulkPositions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_loads() {
        let err = ExportError::ValidationFailed {
            incomplete: vec![LoadId(2), LoadId(5)],
        };
        assert!(err.to_string().ends_with("#2, #5"));
    }

    #[test]
    fn blocked_message_names_both_positions() {
        let err = PlacementError::PositionBlocked {
            position: "21P".into(),
            blocked_by: "22L".into(),
        };
        assert_eq!(err.to_string(), "position 21P is blocked by 22L");
        assert_eq!(err.position(), Some("21P"));
    }
}
