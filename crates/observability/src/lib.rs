//! # voicebridge-observability
//!
//! Observability-Crate fuer voicebridge:
//! - Structured Logging via tracing-subscriber (text oder JSON)
//! - Panik-Meldungen ins Fehlerlog statt auf stderr
//! - Prometheus-kompatible Zaehler fuer den Sprachpfad

pub mod logging;
pub mod metrics;
pub mod panik;

pub use logging::{log_format_gueltig, log_level_gueltig, logging_initialisieren};
pub use metrics::BridgeMetrics;
pub use panik::panic_hook_installieren;
