use tracing::{info, warn};

use crate::domain::entities::FlightDetails;
use crate::domain::error::ExportError;
use crate::domain::profile::AircraftProfile;
use crate::domain::registry::LoadRegistry;

const HEADER: &str = "LDM";
const DEFAULT_FLIGHT: &str = "XX000";
pub const COMPARTMENTS: usize = 5;

/// Per-compartment weights reported on the second LDM line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DistributionTotals {
    /// Index 0 is compartment 1.
    pub compartments: [u64; COMPARTMENTS],
    /// Net cargo across compartments (tare excluded).
    pub net_cargo: u64,
}

impl DistributionTotals {
    pub fn total(&self) -> u64 {
        self.compartments.iter().sum()
    }

    /// `n/weight.` for every non-zero compartment, in compartment order.
    pub fn compact(&self) -> String {
        self.compartments
            .iter()
            .enumerate()
            .filter(|(_, weight)| **weight > 0)
            .map(|(index, weight)| format!("{}/{}.", index + 1, weight))
            .collect()
    }
}

/// Compartment weights for every placed load.
///
/// Filler contributes nothing and bulk its full gross weight. Other ULDs add
/// their net weight plus their tare to the compartment, but only the net
/// weight to the cargo figure.
pub fn distribution_totals(registry: &LoadRegistry) -> DistributionTotals {
    let mut totals = DistributionTotals::default();

    for load in registry.iter() {
        let Some(position) = load.position() else {
            continue;
        };
        let Some(slot) = compartment_index(position) else {
            warn!(load = %load.id, position, "position outside compartments 1-5, skipped");
            continue;
        };

        let tare = u64::from(load.kind.tare_kg());
        let net = if load.kind.is_bulk() {
            u64::from(load.gross_weight)
        } else if load.bulk_code.is_filler() {
            0
        } else {
            u64::from(load.net_weight())
        };

        totals.compartments[slot] += net;
        totals.net_cargo += net;
        if !load.kind.is_bulk() && !load.bulk_code.is_filler() {
            totals.compartments[slot] += tare;
        }
    }

    totals
}

/// Zero-based compartment from the leading digit of a position code.
fn compartment_index(position: &str) -> Option<usize> {
    let digit = position.chars().next()?.to_digit(10)? as usize;
    (1..=COMPARTMENTS).contains(&digit).then(|| digit - 1)
}

/// Renders the load distribution manifest.
pub fn export_load_distribution(
    profile: &AircraftProfile,
    registry: &LoadRegistry,
    flight: &FlightDetails,
) -> Result<String, ExportError> {
    registry.ensure_exportable()?;

    let dest = flight.destination();
    let ldm = profile.ldm();
    let pax = &flight.passengers;
    let totals = distribution_totals(registry);

    let output = [
        HEADER.to_string(),
        format!(
            "{}/{}.{}.{}.{}.{}",
            flight.flight_number_or(DEFAULT_FLIGHT),
            flight.day_label(),
            profile.registration(),
            ldm.station,
            ldm.seat_code,
            ldm.seat_config
        ),
        format!(
            "{dest}.{}/{}/{}/{}.T{}.{}PAX/{}.PAD/0",
            pax.male,
            pax.female,
            pax.child,
            pax.infant,
            totals.total(),
            totals.compact(),
            pax.total()
        ),
        format!(
            "{dest} C 0 M 0 B {}/{} 0",
            flight.total_pieces, totals.net_cargo
        ),
    ];

    info!(
        registration = profile.registration(),
        total = totals.total(),
        "load distribution manifest exported"
    );
    Ok(output.join("\n"))
}
