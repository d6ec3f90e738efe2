//! voicebridge-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen voicebridge-Crates gemeinsam genutzt werden: Slot-Indizes,
//! Konto-IDs, Payload-Modus und den zentralen Fehler-Enum.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{BridgeError, Result};
pub use types::{
    AccountId, PayloadMode, SlotIndex, SlotSelector, VoiceFrame, MAX_SLOTS,
    VIRTUAL_SLOT_SELECTOR,
};
