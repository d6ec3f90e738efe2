//! Virtueller Client – der Bot, ueber den die Engine Sprache einspeist
//!
//! Der Slot wird gecacht, aber vor jeder Verwendung beim Host nachgeprueft.
//! Ist er verschwunden (Map-Wechsel, Kick), wird ein neuer Bot angelegt.

use voicebridge_core::{BridgeError, Result, SlotIndex};

use crate::slots::{ClientSlotTable, HostClients};

/// Standardname des Bots
pub const DEFAULT_VIRTUAL_CLIENT_NAME: &str = "Sympho";

pub struct VirtualClientManager {
    name: String,
    cached: Option<SlotIndex>,
}

impl VirtualClientManager {
    pub fn neu(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cached: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zuletzt bekannter Slot, ungeprueft
    pub fn cached(&self) -> Option<SlotIndex> {
        self.cached
    }

    /// Liefert den Slot des Bots und legt ihn bei Bedarf neu an.
    ///
    /// Ein gecachter Slot wird nur verwendet, wenn er noch aktiv ist und
    /// als Bot gefuehrt wird.
    pub fn resolve_virtual_slot<H: HostClients>(
        &mut self,
        slots: &mut ClientSlotTable<H>,
    ) -> Result<SlotIndex> {
        if let Some(slot) = self.cached {
            if slots.is_virtual(slot) {
                return Ok(slot);
            }
            tracing::debug!(slot = %slot, "Virtueller Client verschwunden, wird neu erstellt");
            self.cached = None;
        }

        let slot = slots.create_virtual(&self.name).ok_or_else(|| {
            BridgeError::VirtuellerClient(format!(
                "Host konnte '{}' nicht erstellen",
                self.name
            ))
        })?;

        // Der Host kann einen Slot melden, der (noch) nicht nutzbar ist
        if !slots.is_virtual(slot) {
            return Err(BridgeError::VirtuellerClient(format!(
                "{} ist kein aktiver Bot",
                slot
            )));
        }

        tracing::info!(slot = %slot, name = %self.name, "Virtueller Client erstellt");
        self.cached = Some(slot);
        Ok(slot)
    }
}

impl Default for VirtualClientManager {
    fn default() -> Self {
        Self::neu(DEFAULT_VIRTUAL_CLIENT_NAME)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
