use crate::domain::profile::AircraftProfile;
use crate::domain::registry::LoadRegistry;

/// Plain-text loading instruction listing, one line per placed load in
/// sidebar order. ULDs without an identifier are left out, so the listing
/// is available while the deck is still being planned.
pub fn export_layout_report(profile: &AircraftProfile, registry: &LoadRegistry) -> String {
    let mut text = format!(
        "LIR EXPORT — {}\n===========================\n\n",
        profile.registration()
    );

    for load in registry.iter() {
        let Some(position) = load.position() else {
            continue;
        };
        let line = if load.kind.is_bulk() {
            format!(
                "{position}: {} - {}KG (BLK)",
                load.bulk_code, load.gross_weight
            )
        } else if load.has_identifier() {
            format!(
                "{position}: {} - {}KG ({})",
                load.identifier, load.gross_weight, load.bulk_code
            )
        } else {
            continue;
        };
        text.push_str(&line);
        text.push('\n');
    }

    text
}
