//! Panik-Hook – leitet Panics ins Fehlerlog des Hosts
//!
//! Ein Panic innerhalb der Extension landet sonst auf stderr, das der
//! Spielserver meist verwirft.

use std::sync::Once;

/// Tracing-Target fuer Panik-Meldungen
pub const PANIK_TARGET: &str = "voicebridge::panik";

static INSTALLIERT: Once = Once::new();

/// Installiert den Hook einmal pro Prozess
pub fn panic_hook_installieren() {
    INSTALLIERT.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let nachricht = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unbekannte Panik".to_string());

            match info.location() {
                Some(ort) => tracing::error!(
                    target: PANIK_TARGET,
                    datei = ort.file(),
                    zeile = ort.line(),
                    "Panik: {}",
                    nachricht
                ),
                None => tracing::error!(target: PANIK_TARGET, "Panik: {}", nachricht),
            }
        }));
    });
}
