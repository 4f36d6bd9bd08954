//! Version string and release history.
//!
//! The build script embeds `VERGEN_GIT_SHA` (dev builds only) and
//! `REMAX_BUILD_DATE`; both are folded into the long version string.

/// Name the binary reports itself as.
pub const COMMAND_NAME: &str = "remax";

/// One released version.
#[derive(Debug)]
pub struct Change {
    pub version: &'static str,
    pub date: &'static str,
    pub notes: &'static [&'static str],
}

/// Release history, newest first.
pub const CHANGELOG: &[Change] = &[Change {
    version: "0.1.0",
    date: "2026-08-27",
    notes: &["initial release"],
}];

/// Full version string, including git SHA and build date when available.
pub fn version_string() -> String {
    let mut version = String::from(env!("CARGO_PKG_VERSION"));
    if let Some(sha) = option_env!("VERGEN_GIT_SHA") {
        version.push_str(&format!(" ({sha}"));
        if let Some(date) = option_env!("REMAX_BUILD_DATE") {
            version.push_str(&format!(" {date}"));
        }
        version.push(')');
    }
    version
}

/// Render the release history for `--changelog`.
pub fn changelog() -> String {
    let mut out = String::new();
    for change in CHANGELOG {
        out.push_str(&format!(
            "{} version {} ({})\n",
            COMMAND_NAME, change.version, change.date
        ));
        for note in change.notes {
            out.push_str(&format!("  - {note}\n"));
        }
    }
    out
}
