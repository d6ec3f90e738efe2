//! Fehlertypen fuer die Codec-Bruecke

use thiserror::Error;

/// Alle moeglichen Fehler der Codec-Bruecke
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Codec-Fehler: {0}")]
    CodecFehler(String),

    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Codec fuer Slot {slot} konnte nicht erstellt werden: {grund}")]
    SlotInitialisierung { slot: usize, grund: String },

    #[error("Frame-Groesse falsch: erwartet={erwartet}, erhalten={erhalten}")]
    FrameGroesse { erwartet: usize, erhalten: usize },

    #[error("Dekodier-Puffer voll: {bytes} Bytes ueberschreiten {kapazitaet} Samples")]
    PufferVoll { bytes: usize, kapazitaet: usize },
}

pub type AudioResult<T> = Result<T, AudioError>;
