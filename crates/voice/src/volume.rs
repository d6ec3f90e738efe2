//! Lautstaerke-Zuordnung pro Slot
//!
//! Der Puffer gehoert dem Host-Skript. Die Bridge haelt nur eine geteilte
//! Referenz und liest bei jedem Frame den aktuellen Wert. Sie schreibt nie
//! hinein.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use voicebridge_core::SlotIndex;

/// Standard-Lautstaerke wenn keine Zuordnung greift
pub const DEFAULT_GAIN: f32 = 1.0;

// ---------------------------------------------------------------------------
// VolumeBuffer
// ---------------------------------------------------------------------------

/// Vom Host verwaltetes Array von Lautstaerken (f32 als Bits)
#[derive(Debug)]
pub struct VolumeBuffer {
    werte: Box<[AtomicU32]>,
}

impl VolumeBuffer {
    /// Puffer mit `len` Eintraegen, alle auf 1.0
    pub fn neu(len: usize) -> Self {
        Self {
            werte: (0..len)
                .map(|_| AtomicU32::new(DEFAULT_GAIN.to_bits()))
                .collect(),
        }
    }

    /// Puffer mit vorgegebenen Werten
    pub fn with_gains(gains: &[f32]) -> Self {
        Self {
            werte: gains.iter().map(|g| AtomicU32::new(g.to_bits())).collect(),
        }
    }

    /// Setzt einen Eintrag; Indizes ausserhalb werden ignoriert
    pub fn set(&self, index: usize, gain: f32) {
        if let Some(wert) = self.werte.get(index) {
            wert.store(gain.to_bits(), Ordering::Relaxed);
        }
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.werte
            .get(index)
            .map(|wert| f32::from_bits(wert.load(Ordering::Relaxed)))
    }

    pub fn len(&self) -> usize {
        self.werte.len()
    }

    pub fn is_empty(&self) -> bool {
        self.werte.is_empty()
    }
}

// ---------------------------------------------------------------------------
// VolumeMap
// ---------------------------------------------------------------------------

/// Optional installierte Zuordnung Slot → Lautstaerke
#[derive(Debug, Default)]
pub struct VolumeMap {
    buffer: Option<Arc<VolumeBuffer>>,
}

impl VolumeMap {
    /// Installiert einen Puffer; ein vorheriger wird ersetzt
    pub fn install(&mut self, buffer: Arc<VolumeBuffer>) {
        tracing::debug!(eintraege = buffer.len(), "Lautstaerke-Zuordnung installiert");
        self.buffer = Some(buffer);
    }

    /// Entfernt die Zuordnung; danach gilt wieder 1.0 fuer alle
    pub fn clear(&mut self) {
        if self.buffer.take().is_some() {
            tracing::debug!("Lautstaerke-Zuordnung entfernt");
        }
    }

    pub fn is_installed(&self) -> bool {
        self.buffer.is_some()
    }

    /// Aktuelle Lautstaerke eines Slots.
    ///
    /// Ohne Zuordnung oder bei zu kurzem Puffer ist das Ergebnis 1.0.
    pub fn gain(&self, slot: SlotIndex) -> f32 {
        self.buffer
            .as_ref()
            .and_then(|b| b.get(slot.index()))
            .unwrap_or(DEFAULT_GAIN)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
