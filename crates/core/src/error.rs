//! Fehlertypen fuer voicebridge
//!
//! Nur Lade-/Startfehler werden als Fehler propagiert. Alles was im heissen
//! Broadcast-Pfad schiefgehen kann, endet als Pass-Through und taucht hier
//! nicht auf.

use thiserror::Error;

/// Globaler Result-Alias fuer voicebridge
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Alle Fehler, die das Laden der Extension abbrechen koennen
#[derive(Debug, Error)]
pub enum BridgeError {
    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Pflicht-Konfigurationswert fehlt: {0}")]
    FehlenderWert(&'static str),

    // --- Host-Integration ---
    #[error("Integrationspunkt nicht gefunden: {0}")]
    HookNichtGefunden(String),

    // --- Externe Engine ---
    #[error("Externe Engine konnte nicht initialisiert werden: {0}")]
    EngineInit(String),

    // --- Codec ---
    #[error("Codec-Initialisierung fehlgeschlagen: {0}")]
    Codec(String),

    // --- Virtueller Client ---
    #[error("Virtueller Client nicht verfuegbar: {0}")]
    VirtuellerClient(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl BridgeError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}
