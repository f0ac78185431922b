use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use uld_deck_planner::domain::{
    AircraftProfile, AircraftProfileSpec, BulkCode, DeckLayout, DeckSession, ExportError,
    LdmSettings, LoadUpdate, UldKind,
};

const CONTAINERS: [&str; 8] = ["12L", "12R", "11L", "11R", "22L", "22R", "21L", "21R"];
const PALLETS: [&str; 4] = ["12P", "11P", "22P", "21P"];

fn profile_with_blocks(mask: &[Vec<bool>]) -> AircraftProfile {
    let pallet_blocks: BTreeMap<String, Vec<String>> = PALLETS
        .iter()
        .zip(mask)
        .map(|(pallet, row)| {
            let covered = CONTAINERS
                .iter()
                .zip(row)
                .filter(|(_, on)| **on)
                .map(|(c, _)| c.to_string())
                .collect();
            (pallet.to_string(), covered)
        })
        .collect();

    AircraftProfile::try_from(AircraftProfileSpec {
        registration: "PROP".into(),
        type_designator: "T1".into(),
        layout: DeckLayout::default(),
        container_positions: CONTAINERS.iter().map(|c| c.to_string()).collect(),
        pallet_positions: PALLETS.iter().map(|p| p.to_string()).collect(),
        bulk_positions: vec!["51".into(), "52".into()],
        pallet_blocks,
        position_order: Some(Vec::new()),
        ldm: LdmSettings::default(),
    })
    .unwrap()
}

fn block_mask() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), CONTAINERS.len()), PALLETS.len())
}

#[derive(Clone, Debug)]
enum Op {
    Add,
    Update {
        target: usize,
        kind: Option<UldKind>,
        identifier: Option<bool>,
        filler: bool,
        position: Option<usize>,
    },
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let kinds = prop::option::of(prop::sample::select(UldKind::ALL.to_vec()));
    prop_oneof![
        1 => Just(Op::Add),
        4 => (any::<usize>(), kinds, prop::option::of(any::<bool>()), any::<bool>(),
              prop::option::of(0usize..14))
            .prop_map(|(target, kind, identifier, filler, position)| Op::Update {
                target,
                kind,
                identifier,
                filler,
                position,
            }),
        1 => any::<usize>().prop_map(Op::Remove),
    ]
}

fn all_positions() -> Vec<&'static str> {
    CONTAINERS
        .iter()
        .chain(PALLETS.iter())
        .chain(["51", "52"].iter())
        .copied()
        .collect()
}

fn run(session: &mut DeckSession, ops: &[Op]) {
    let positions = all_positions();
    for op in ops {
        let ids: Vec<_> = session.registry().iter().map(|l| l.id).collect();
        match op {
            Op::Add => {
                session.add_load();
            }
            Op::Update {
                target,
                kind,
                identifier,
                filler,
                position,
            } => {
                let Some(id) = (!ids.is_empty()).then(|| ids[target % ids.len()]) else {
                    continue;
                };
                let mut update = LoadUpdate::default();
                if let Some(kind) = kind {
                    update = update.kind(*kind);
                }
                match identifier {
                    Some(true) => update = update.identifier(format!("U{}", id.0)),
                    Some(false) => update = update.identifier(""),
                    None => {}
                }
                if *filler {
                    update = update.bulk_code(BulkCode::Filler);
                }
                if let Some(index) = position {
                    update = update.position(positions[*index % positions.len()]);
                }
                let _ = session.update_load(id, update);
            }
            Op::Remove(target) => {
                if !ids.is_empty() {
                    session.remove_load(ids[target % ids.len()]);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn container_blocks_mirror_pallet_blocks(mask in block_mask()) {
        let profile = profile_with_blocks(&mask);
        for pallet in profile.pallet_positions() {
            for container in profile.containers_blocked_by(pallet) {
                prop_assert!(profile.pallets_blocked_by(container).contains(pallet));
            }
        }
        for container in profile.container_positions() {
            for pallet in profile.pallets_blocked_by(container) {
                prop_assert!(profile.containers_blocked_by(pallet).contains(container));
            }
        }
    }

    #[test]
    fn placement_invariants_survive_any_edit_sequence(
        mask in block_mask(),
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut session = DeckSession::new(profile_with_blocks(&mask));
        run(&mut session, &ops);
        let profile = session.profile();
        let registry = session.registry();

        // one load per position, on a position of its class
        let mut seen = HashSet::new();
        for load in registry.iter() {
            if let Some(position) = load.position() {
                prop_assert!(seen.insert(position.to_string()), "{position} used twice");
                prop_assert!(profile.is_compatible(load.kind, position));
            }
        }

        // no committed pallet shares a block with a committed container
        for (pallet, containers) in profile.pallet_blocks() {
            if registry.committed_at(pallet, None).is_none() {
                continue;
            }
            for container in containers {
                prop_assert!(registry.committed_at(container, None).is_none());
            }
        }

        let first = session.compute_blocked_set();
        prop_assert_eq!(&first, &session.compute_blocked_set());
    }

    #[test]
    fn unidentified_placed_uld_blocks_every_export(
        kind in prop::sample::select(vec![UldKind::Ake, UldKind::Akn, UldKind::Pmc, UldKind::Pag]),
    ) {
        let mut session = DeckSession::new(AircraftProfile::ec_nog().unwrap());
        let id = session.add_load().id;
        let position = match kind {
            UldKind::Ake | UldKind::Akn => "26L",
            _ => "31P",
        };
        session
            .update_load(id, LoadUpdate::default().kind(kind).position(position))
            .unwrap();

        let refused = ExportError::ValidationFailed { incomplete: vec![id] };
        prop_assert_eq!(session.export_cargo_manifest(), Err(refused.clone()));
        prop_assert_eq!(session.export_load_distribution(), Err(refused));
    }
}
