//! Command handlers behind the CLI: open a session from a load sheet, then
//! print blocking state or one of the load messages.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::domain::DeckSession;
use crate::infra::config::AppConfig;
use crate::infra::profile_store::{load_profile, load_sheet, Rejection};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum MessageKind {
    /// Cargo position manifest
    Cpm,
    /// Load distribution manifest
    Ldm,
    /// Loading instruction listing
    Lir,
}

/// Flight fields given on the command line; they override the load sheet.
#[derive(Clone, Debug, Default)]
pub struct FlightOverrides {
    pub flight_number: Option<String>,
    pub destination: Option<String>,
    pub day_of_month: Option<u8>,
}

pub struct OpenedSession {
    pub session: DeckSession,
    pub rejections: Vec<Rejection>,
}

/// Builds a session from the configured profile and replays `sheet` into it.
pub fn open_session(
    config: &AppConfig,
    profile_override: Option<PathBuf>,
    sheet: &Path,
    overrides: FlightOverrides,
) -> anyhow::Result<OpenedSession> {
    let profile_path = profile_override.or_else(|| config.profile.clone());
    let profile = load_profile(profile_path.as_deref()).context("loading aircraft profile")?;
    let sheet = load_sheet(sheet).context("loading load sheet")?;

    let mut session = DeckSession::new(profile);
    let rejections = sheet.apply(&mut session);

    let flight = &mut session.flight;
    if let Some(number) = overrides.flight_number {
        flight.flight_number = Some(number);
    }
    if let Some(dest) = overrides.destination {
        flight.destination = Some(dest);
    } else if flight.destination.as_deref().map_or(true, |d| d.trim().is_empty()) {
        flight.destination = config.destination.clone();
    }
    if let Some(day) = overrides.day_of_month {
        flight.day_of_month = Some(day);
    }

    Ok(OpenedSession {
        session,
        rejections,
    })
}

pub fn export(session: &DeckSession, kind: MessageKind) -> anyhow::Result<String> {
    let text = match kind {
        MessageKind::Cpm => session.export_cargo_manifest(),
        MessageKind::Ldm => session.export_load_distribution(),
        MessageKind::Lir => Ok(session.export_layout_report()),
    }?;
    info!(?kind, "message ready");
    Ok(text)
}

/// Blocked positions, one per line, in position-code order.
pub fn blocked_report(session: &DeckSession) -> String {
    session
        .compute_blocked_set()
        .into_iter()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable validation summary: rejected rows and incomplete loads.
pub fn check_report(opened: &OpenedSession) -> String {
    let mut lines: Vec<String> = opened
        .rejections
        .iter()
        .map(|r| format!("row {} (load {}): {}", r.row, r.load, r.error))
        .collect();

    let incomplete = opened.session.registry().incomplete_loads();
    if incomplete.is_empty() {
        lines.push("ready for export".to_string());
    } else {
        for id in incomplete {
            lines.push(format!("load {id}: placed without ULD ID"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sheet(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("sheet.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn overrides_and_config_fill_flight_fields() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = write_sheet(dir.path(), r#"{ "loads": [] }"#);
        let config = AppConfig {
            destination: Some("ORN".into()),
            ..Default::default()
        };

        let opened = open_session(
            &config,
            None,
            &sheet,
            FlightOverrides {
                flight_number: Some("AH5001".into()),
                day_of_month: Some(14),
                ..Default::default()
            },
        )
        .unwrap();

        let cpm = export(&opened.session, MessageKind::Cpm).unwrap();
        let mut lines = cpm.lines();
        assert_eq!(lines.next(), Some("CPM"));
        assert_eq!(lines.next(), Some("AH5001/14.EC-NOG.2/2"));
        assert!(cpm.ends_with("SI CZL-ORN C 0 M 0 B 0/0 O 0 T 0"));
    }

    #[test]
    fn check_report_lists_problems() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = write_sheet(
            dir.path(),
            r#"{ "loads": [
                { "kind": "AKE", "position": "22L" },
                { "kind": "AKE", "identifier": "A2", "position": "22P" }
            ] }"#,
        );

        let opened =
            open_session(&AppConfig::default(), None, &sheet, FlightOverrides::default()).unwrap();
        let report = check_report(&opened);
        assert!(report.contains("row 2 (load #2)"));
        assert!(report.contains("load #1: placed without ULD ID"));
        assert!(export(&opened.session, MessageKind::Ldm).is_err());
    }

    #[test]
    fn blocked_report_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = write_sheet(
            dir.path(),
            r#"{ "loads": [ { "kind": "PMC", "identifier": "P9", "position": "31P" } ] }"#,
        );
        let opened =
            open_session(&AppConfig::default(), None, &sheet, FlightOverrides::default()).unwrap();
        assert_eq!(blocked_report(&opened.session), "31L\n31R");
    }
}
