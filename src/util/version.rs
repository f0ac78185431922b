pub const APP_NAME: &str = "ULD Deck Planner";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Release tag stamped by `build.rs`, else the crate version, plus the
/// short commit when the build ran inside a checkout.
pub fn version_label() -> String {
    let base = match GIT_TAG {
        Some(tag) => tag.to_string(),
        None => format!("v{APP_VERSION}"),
    };
    match GIT_COMMIT {
        Some(commit) => format!("{base} ({commit})"),
        None => base,
    }
}
