//! Gemeinsame Identifikationstypen fuer voicebridge
//!
//! Slot-Indizes und Konto-IDs verwenden das Newtype-Pattern, damit rohe
//! Host-Integer nicht mit bereits validierten Indizes verwechselt werden.

use serde::{Deserialize, Serialize};

/// Maximale Anzahl an Client-Slots des Hosts
pub const MAX_SLOTS: usize = 64;

/// Roher Slot-Selektor fuer den virtuellen (Server-)Sprecher
pub const VIRTUAL_SLOT_SELECTOR: i32 = -1;

/// Validierter Client-Slot im Bereich `[0, MAX_SLOTS)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Validiert einen rohen Host-Index. `None` ausserhalb von `[0, 64)`.
    pub fn new(raw: i32) -> Option<Self> {
        if (0..MAX_SLOTS as i32).contains(&raw) {
            Some(Self(raw as u8))
        } else {
            None
        }
    }

    /// Index als `usize` fuer Array-Zugriffe
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Alle gueltigen Slots in aufsteigender Reihenfolge
    pub fn alle() -> impl Iterator<Item = SlotIndex> {
        (0..MAX_SLOTS as u8).map(SlotIndex)
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot:{}", self.0)
    }
}

/// Ziel einer ausgehenden Sprachzustellung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotSelector {
    /// Ein konkreter Client-Slot
    Client(SlotIndex),
    /// Der virtuelle Server-Sprecher (roh: `-1`)
    Virtual,
}

impl SlotSelector {
    /// Interpretiert einen rohen Selektor der externen Engine
    pub fn from_raw(raw: i32) -> Option<Self> {
        if raw == VIRTUAL_SLOT_SELECTOR {
            Some(Self::Virtual)
        } else {
            SlotIndex::new(raw).map(Self::Client)
        }
    }
}

/// Stabile externe Identitaet eines Clients (z.B. Plattform-Konto-ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "account:{}", self.0)
    }
}

/// Interpretation der Sprach-Payload, fest pro Konfiguration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Opake, komprimierte Wire-Bytes; die Engine darf sie ersetzen
    #[default]
    Passthrough,
    /// Dekodierte 16-Bit-PCM-Samples (little-endian); die Engine beobachtet nur
    Transcode,
}

/// Ein Sprach-Frame wie er an die externe Engine uebergeben wird
#[derive(Debug, Clone, Copy)]
pub struct VoiceFrame<'a> {
    /// Sendender Slot
    pub slot: SlotIndex,
    /// Externe Identitaet des Senders
    pub account_id: AccountId,
    /// Lautstaerke-Faktor; `None` wenn er bereits lokal angewendet wurde
    pub gain: Option<f32>,
    /// Interpretation von `payload`
    pub mode: PayloadMode,
    /// Komprimierte Bytes oder PCM-Bytes je nach `mode`
    pub payload: &'a [u8],
}
