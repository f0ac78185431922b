use tracing::info;

use super::{numeric_prefix, DeckSnapshot};
use crate::domain::entities::{BulkCode, FlightDetails, Load};
use crate::domain::error::ExportError;
use crate::domain::profile::AircraftProfile;
use crate::domain::registry::LoadRegistry;

const HEADER: &str = "CPM";
const DEFAULT_FLIGHT: &str = "XX";

/// Renders the cargo position manifest.
///
/// Position lines are ordered by the numeric prefix of their position code.
/// Lines sharing a prefix keep the order they were produced in: pallet-only,
/// container pairs, loaded pallets, bulk.
pub fn export_cargo_manifest(
    profile: &AircraftProfile,
    registry: &LoadRegistry,
    flight: &FlightDetails,
) -> Result<String, ExportError> {
    registry.ensure_exportable()?;

    let dest = flight.destination();
    let snapshot = DeckSnapshot::new(profile, registry);
    let mut lines: Vec<(u32, String)> = Vec::new();

    for pallet in snapshot.pallet_only() {
        lines.push((
            sort_key(pallet),
            format_segment(pallet, snapshot.load_at(pallet), dest),
        ));
    }

    for (left, right) in profile.position_order() {
        if !snapshot.pair_allowed(left, right) {
            continue;
        }
        let text = format!(
            "{}{}",
            format_segment(left, snapshot.load_at(left), dest),
            format_segment(right, snapshot.load_at(right), dest)
        );
        lines.push((sort_key(left), text));
    }

    for pallet in profile.pallet_positions() {
        if snapshot.is_pallet_only(pallet) || snapshot.is_blocked(pallet) {
            continue;
        }
        lines.push((
            sort_key(pallet),
            format_segment(pallet, snapshot.load_at(pallet), dest),
        ));
    }

    for position in profile.bulk_positions() {
        let text = match snapshot.load_at(position) {
            None => format!("-{position}/X"),
            load => format_segment(position, load, dest),
        };
        lines.push((sort_key(position), text));
    }

    lines.sort_by_key(|(key, _)| *key);

    let mut output = Vec::with_capacity(lines.len() + 3);
    output.push(HEADER.to_string());
    output.push(format!(
        "{}/{}.{}.{}",
        flight.flight_number_or(DEFAULT_FLIGHT),
        flight.day_label(),
        profile.registration(),
        profile.ldm().seat_code
    ));
    output.extend(lines.into_iter().map(|(_, text)| text));
    output.push(format!(
        "SI {}-{} C 0 M 0 B {}/{} O 0 T 0",
        profile.ldm().station,
        dest,
        flight.total_pieces,
        net_cargo_weight(registry)
    ));

    info!(
        registration = profile.registration(),
        lines = output.len(),
        "cargo position manifest exported"
    );
    Ok(output.join("\n"))
}

/// Sum over every load, placed or not, of gross minus tare (floored at zero).
pub fn net_cargo_weight(registry: &LoadRegistry) -> u64 {
    registry
        .iter()
        .map(|load| u64::from(load.net_weight()))
        .sum()
}

/// One position segment. Container pairs are two of these back to back.
pub fn format_segment(position: &str, load: Option<&Load>, dest: &str) -> String {
    let Some(load) = load else {
        return format!("-{position}/N");
    };

    if load.kind.is_bulk() {
        return format!(
            "-{position}/{}/{}/{dest}",
            load.gross_weight,
            load.bulk_code.message_code()
        );
    }

    match load.bulk_code {
        // filler reports the type code only, never the serial
        BulkCode::Filler => format!(
            "-{position}/{}/{}/{dest}",
            load.kind.code(),
            BulkCode::Filler.message_code()
        ),
        BulkCode::EmptyShell => format!("-{position}/{}/X/BY/{dest}", load.label()),
        BulkCode::Standard => {
            let weight = match load.gross_weight {
                0 => "X".to_string(),
                kg => kg.to_string(),
            };
            format!(
                "-{position}/{}/{weight}/{}/{dest}",
                load.label(),
                load.bulk_code.message_code()
            )
        }
    }
}

fn sort_key(position: &str) -> u32 {
    numeric_prefix(position).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LoadId, LoadUpdate, UldKind};

    fn load(kind: UldKind, identifier: &str, bulk_code: BulkCode, gross_weight: u32) -> Load {
        Load {
            id: LoadId(1),
            kind,
            identifier: identifier.into(),
            bulk_code,
            gross_weight,
            position: None,
        }
    }

    #[test]
    fn segment_variants() {
        assert_eq!(format_segment("22L", None, "ALG"), "-22L/N");
        assert_eq!(
            format_segment(
                "52",
                Some(&load(UldKind::Blk, "", BulkCode::Standard, 500)),
                "ALG"
            ),
            "-52/500/BY/ALG"
        );
        assert_eq!(
            format_segment(
                "53",
                Some(&load(UldKind::Blk, "MAIL", BulkCode::Filler, 40)),
                "ALG"
            ),
            "-53/40/E/ALG"
        );
        assert_eq!(
            format_segment(
                "22L",
                Some(&load(UldKind::Ake, "", BulkCode::Filler, 0)),
                "ALG"
            ),
            "-22L/AKE/E/ALG"
        );
        assert_eq!(
            format_segment(
                "41L",
                Some(&load(UldKind::Ake, "12345AB", BulkCode::Filler, 150)),
                "ALG"
            ),
            "-41L/AKE/E/ALG"
        );
        assert_eq!(
            format_segment(
                "22L",
                Some(&load(UldKind::Ake, "12345AB", BulkCode::EmptyShell, 80)),
                "ALG"
            ),
            "-22L/AKE12345AB/X/BY/ALG"
        );
        assert_eq!(
            format_segment(
                "21P",
                Some(&load(UldKind::Pmc, "123R7", BulkCode::Standard, 2400)),
                "ALG"
            ),
            "-21P/PMC123R7/2400/BY/ALG"
        );
        assert_eq!(
            format_segment(
                "21P",
                Some(&load(UldKind::Pmc, "123R7", BulkCode::Standard, 0)),
                "ALG"
            ),
            "-21P/PMC123R7/X/BY/ALG"
        );
    }

    #[test]
    fn net_weight_sums_every_load() {
        let profile = AircraftProfile::ec_nog().unwrap();
        let mut registry = LoadRegistry::new();
        for weight in [180, 220] {
            let id = registry.add_load().id;
            registry
                .update_load(&profile, id, LoadUpdate::default().gross_weight(weight))
                .unwrap();
        }
        let pallet = registry.add_load().id;
        registry
            .update_load(
                &profile,
                pallet,
                LoadUpdate::default().kind(UldKind::Pag).gross_weight(50),
            )
            .unwrap();
        assert_eq!(net_cargo_weight(&registry), 240);
    }

    #[test]
    fn refuses_incomplete_registry() {
        let profile = AircraftProfile::ec_nog().unwrap();
        let mut registry = LoadRegistry::new();
        let id = registry.add_load().id;
        registry.move_load(&profile, id, "22L").unwrap();
        let result = export_cargo_manifest(&profile, &registry, &FlightDetails::default());
        assert!(matches!(result, Err(ExportError::ValidationFailed { .. })));
    }
}
