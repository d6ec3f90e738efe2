//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `VB_LOG_LEVEL`: Log-Level oder Filter-Ausdruck, ueberschreibt die Konfiguration
//! - `VB_LOG_FORMAT`: Format (text/json), ueberschreibt die Konfiguration
//!
//! Der Host kann die Extension mehrfach pro Prozess laden. Ist bereits ein
//! globaler Subscriber gesetzt, bleibt dieser aktiv.

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "VB_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "VB_LOG_FORMAT";

/// Initialisiert das Logging-System.
///
/// Gibt `true` zurueck wenn dieser Aufruf den globalen Subscriber gesetzt hat.
pub fn logging_initialisieren(level: &str, format: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| format.to_string());

    let ergebnis = match format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        _ => fmt().with_env_filter(filter).with_target(true).try_init(),
    };
    ergebnis.is_ok()
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    matches!(format, "text" | "json")
}
