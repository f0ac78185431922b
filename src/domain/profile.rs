//! Static per-aircraft deck configuration.
//!
//! - Position taxonomy: container, pallet and bulk position sets.
//! - Pallet blocking table plus its derived inverse (container blocks).
//! - Hold layout rows and the left/right container pairing used by CPM lines.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::entities::{PositionCode, UldClass, UldKind};
use super::error::ProfileError;

/// One hold as drawn on the deck: two container rows above a pallet row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldLayout {
    #[serde(alias = "akeLeft")]
    pub container_left: Vec<PositionCode>,
    #[serde(alias = "akeRight")]
    pub container_right: Vec<PositionCode>,
    #[serde(alias = "pallet")]
    pub pallets: Vec<PositionCode>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckLayout {
    pub forward: HoldLayout,
    pub aft: HoldLayout,
}

impl DeckLayout {
    pub fn holds(&self) -> [&HoldLayout; 2] {
        [&self.forward, &self.aft]
    }
}

/// Header fields for the load distribution message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdmSettings {
    pub station: String,
    pub seat_code: String,
    pub seat_config: String,
}

/// Raw profile as written in configuration, before closure checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftProfileSpec {
    pub registration: String,
    #[serde(alias = "type")]
    pub type_designator: String,
    #[serde(default)]
    pub layout: DeckLayout,
    pub container_positions: Vec<PositionCode>,
    pub pallet_positions: Vec<PositionCode>,
    #[serde(default = "default_bulk_positions")]
    pub bulk_positions: Vec<PositionCode>,
    pub pallet_blocks: BTreeMap<PositionCode, Vec<PositionCode>>,
    /// Left/right container pairs. Derived from the hold layout when absent.
    #[serde(default)]
    pub position_order: Option<Vec<(PositionCode, PositionCode)>>,
    #[serde(default)]
    pub ldm: LdmSettings,
}

fn default_bulk_positions() -> Vec<PositionCode> {
    vec!["51".into(), "52".into(), "53".into()]
}

/// Validated, immutable aircraft profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AircraftProfile {
    registration: String,
    type_designator: String,
    layout: DeckLayout,
    container_positions: Vec<PositionCode>,
    pallet_positions: Vec<PositionCode>,
    bulk_positions: Vec<PositionCode>,
    pallet_blocks: BTreeMap<PositionCode, Vec<PositionCode>>,
    container_blocks: BTreeMap<PositionCode, Vec<PositionCode>>,
    position_order: Vec<(PositionCode, PositionCode)>,
    ldm: LdmSettings,
    classes: HashMap<PositionCode, UldClass>,
}

impl TryFrom<AircraftProfileSpec> for AircraftProfile {
    type Error = ProfileError;

    fn try_from(spec: AircraftProfileSpec) -> Result<Self, Self::Error> {
        AircraftProfile::from_spec(spec)
    }
}

impl AircraftProfile {
    pub fn from_spec(spec: AircraftProfileSpec) -> Result<Self, ProfileError> {
        if spec.bulk_positions.is_empty() {
            return Err(ProfileError::NoBulkPositions);
        }

        let mut classes = HashMap::new();
        let sets = [
            (&spec.container_positions, UldClass::Container),
            (&spec.pallet_positions, UldClass::Pallet),
            (&spec.bulk_positions, UldClass::Bulk),
        ];
        for (positions, class) in sets {
            for position in positions {
                if classes.insert(position.clone(), class).is_some() {
                    return Err(ProfileError::DuplicatePosition(position.clone()));
                }
            }
        }

        for (pallet, containers) in &spec.pallet_blocks {
            if classes.get(pallet) != Some(&UldClass::Pallet) {
                return Err(ProfileError::BlockKeyNotPallet(pallet.clone()));
            }
            if let Some(position) = containers
                .iter()
                .find(|c| classes.get(*c) != Some(&UldClass::Container))
            {
                return Err(ProfileError::BlockTargetNotContainer {
                    pallet: pallet.clone(),
                    position: position.clone(),
                });
            }
        }

        for hold in spec.layout.holds() {
            let rows = [
                (&hold.container_left, UldClass::Container),
                (&hold.container_right, UldClass::Container),
                (&hold.pallets, UldClass::Pallet),
            ];
            for (row, class) in rows {
                if let Some(position) = row.iter().find(|p| classes.get(*p) != Some(&class)) {
                    return Err(ProfileError::UnknownLayoutPosition(position.clone()));
                }
            }
        }

        let position_order = match spec.position_order {
            Some(order) => order,
            None => derive_position_order(&spec.layout),
        };
        for (left, right) in &position_order {
            let is_container = |p: &PositionCode| classes.get(p) == Some(&UldClass::Container);
            if !is_container(left) || !is_container(right) {
                return Err(ProfileError::PairNotContainer {
                    left: left.clone(),
                    right: right.clone(),
                });
            }
        }

        let container_blocks = invert_blocks(&spec.pallet_blocks);

        Ok(Self {
            registration: spec.registration,
            type_designator: spec.type_designator,
            layout: spec.layout,
            container_positions: spec.container_positions,
            pallet_positions: spec.pallet_positions,
            bulk_positions: spec.bulk_positions,
            pallet_blocks: spec.pallet_blocks,
            container_blocks,
            position_order,
            ldm: spec.ldm,
            classes,
        })
    }

    pub fn registration(&self) -> &str {
        &self.registration
    }

    pub fn type_designator(&self) -> &str {
        &self.type_designator
    }

    pub fn layout(&self) -> &DeckLayout {
        &self.layout
    }

    pub fn container_positions(&self) -> &[PositionCode] {
        &self.container_positions
    }

    pub fn pallet_positions(&self) -> &[PositionCode] {
        &self.pallet_positions
    }

    pub fn bulk_positions(&self) -> &[PositionCode] {
        &self.bulk_positions
    }

    pub fn positions_of(&self, class: UldClass) -> &[PositionCode] {
        match class {
            UldClass::Container => &self.container_positions,
            UldClass::Pallet => &self.pallet_positions,
            UldClass::Bulk => &self.bulk_positions,
        }
    }

    /// Every position on the deck: containers, pallets, then bulk.
    pub fn all_positions(&self) -> impl Iterator<Item = &PositionCode> {
        self.container_positions
            .iter()
            .chain(&self.pallet_positions)
            .chain(&self.bulk_positions)
    }

    pub fn pallet_blocks(&self) -> &BTreeMap<PositionCode, Vec<PositionCode>> {
        &self.pallet_blocks
    }

    pub fn container_blocks(&self) -> &BTreeMap<PositionCode, Vec<PositionCode>> {
        &self.container_blocks
    }

    /// Container positions physically covered by a pallet at `pallet`.
    pub fn containers_blocked_by(&self, pallet: &str) -> &[PositionCode] {
        self.pallet_blocks
            .get(pallet)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pallet positions that a container at `container` rules out.
    pub fn pallets_blocked_by(&self, container: &str) -> &[PositionCode] {
        self.container_blocks
            .get(container)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn position_order(&self) -> &[(PositionCode, PositionCode)] {
        &self.position_order
    }

    pub fn ldm(&self) -> &LdmSettings {
        &self.ldm
    }

    pub fn class_of(&self, position: &str) -> Option<UldClass> {
        self.classes.get(position).copied()
    }

    pub fn is_bulk_position(&self, position: &str) -> bool {
        self.class_of(position) == Some(UldClass::Bulk)
    }

    /// True when a ULD of `kind` may stand at `position` at all.
    pub fn is_compatible(&self, kind: UldKind, position: &str) -> bool {
        self.class_of(position) == Some(kind.class())
    }

    /// Airbus A330-200F EC-NOG main deck.
    pub fn ec_nog() -> Result<Self, ProfileError> {
        Self::from_spec(AircraftProfileSpec::ec_nog())
    }
}

impl AircraftProfileSpec {
    pub fn ec_nog() -> Self {
        Self {
            registration: "EC-NOG".into(),
            type_designator: "A330-200F".into(),
            layout: DeckLayout {
                forward: HoldLayout {
                    container_left: codes(&[
                        "26L", "25L", "24L", "23L", "22L", "21L", "13L", "12L", "11L",
                    ]),
                    container_right: codes(&[
                        "26R", "25R", "24R", "23R", "22R", "21R", "13R", "12R", "11R",
                    ]),
                    pallets: codes(&["24P", "23P", "22P", "21P", "12P", "11P"]),
                },
                aft: HoldLayout {
                    container_left: codes(&["43L", "42L", "41L", "34L", "33L", "32L", "31L"]),
                    container_right: codes(&["43R", "42R", "41R", "34R", "33R", "32R", "31R"]),
                    pallets: codes(&["42P", "41P", "33P", "32P", "31P"]),
                },
            },
            container_positions: codes(&[
                "26L", "25L", "24L", "23L", "22L", "21L", "13L", "12L", "11L", "26R", "25R",
                "24R", "23R", "22R", "21R", "13R", "12R", "11R", "43L", "42L", "41L", "34L",
                "33L", "32L", "31L", "43R", "42R", "41R", "34R", "33R", "32R", "31R",
            ]),
            pallet_positions: codes(&[
                "24P", "23P", "22P", "21P", "12P", "11P", "42P", "41P", "33P", "32P", "31P",
            ]),
            bulk_positions: default_bulk_positions(),
            pallet_blocks: vec![
                block("24P", &["26L", "26R", "25L", "25R"]),
                block("23P", &["25L", "25R", "24L", "24R"]),
                block("22P", &["23L", "23R", "22L", "22R"]),
                block("21P", &["22L", "22R", "21L", "21R"]),
                block("12P", &["13L", "13R", "12L", "12R"]),
                block("11P", &["12L", "12R", "11L", "11R"]),
                block("42P", &["43L", "43R", "42L", "42R"]),
                block("41P", &["42L", "42R", "41L", "41R"]),
                block("33P", &["34L", "34R", "33L", "33R"]),
                block("32P", &["33L", "33R", "32L", "32R"]),
                block("31P", &["31L", "31R"]),
            ]
            .into_iter()
            .collect(),
            position_order: None,
            ldm: LdmSettings {
                station: "CZL".into(),
                seat_code: "2/2".into(),
                seat_config: "0".into(),
            },
        }
    }
}

fn block(pallet: &str, containers: &[&str]) -> (PositionCode, Vec<PositionCode>) {
    (pallet.to_string(), codes(containers))
}

fn codes(list: &[&str]) -> Vec<PositionCode> {
    list.iter().map(|code| code.to_string()).collect()
}

/// Container -> pallets inverse of the pallet block table.
fn invert_blocks(
    pallet_blocks: &BTreeMap<PositionCode, Vec<PositionCode>>,
) -> BTreeMap<PositionCode, Vec<PositionCode>> {
    let mut inverse: BTreeMap<PositionCode, Vec<PositionCode>> = BTreeMap::new();
    for (pallet, containers) in pallet_blocks {
        for container in containers {
            let pallets = inverse.entry(container.clone()).or_default();
            if !pallets.contains(pallet) {
                pallets.push(pallet.clone());
            }
        }
    }
    inverse
}

fn derive_position_order(layout: &DeckLayout) -> Vec<(PositionCode, PositionCode)> {
    layout
        .holds()
        .into_iter()
        .flat_map(|hold| {
            hold.container_left
                .iter()
                .cloned()
                .zip(hold.container_right.iter().cloned())
        })
        .collect()
}
