//! Ausgehender Pfad – Engine spricht zu Spielern
//!
//! Reihenfolge: Selektor aufloesen → Slot pruefen → (kodieren) → Original-
//! Broadcast. Jeder Fehlschlag ist ein stilles Verwerfen.
//!
//! Im Transcode-Modus ist die Engine-Payload ein PCM-Strom: was nicht
//! einen ganzen Frame fuellt, bleibt pro Slot liegen und wird dem naechsten
//! Engine-Frame fuer denselben Slot vorangestellt.

use tracing::{debug, trace, warn};
use voicebridge_audio::le_bytes_to_samples;
use voicebridge_core::{SlotIndex, SlotSelector};

use crate::engine::OutboundSink;
use crate::hook::{BroadcastCall, InterceptionHook};
use crate::pipeline::VoicePipeline;
use crate::slots::HostClients;

/// Warum ein ausgehender Frame verworfen wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    LeererFrame,
    /// Weder `-1` noch ein Slot in [0, 64)
    SelektorUngueltig,
    HookInaktiv,
    /// Bot konnte nicht erstellt werden
    VirtuellerClient,
    ClientInaktiv,
    /// Payload enthaelt kein Sample oder der Codec scheiterte
    NichtsKodiert,
}

impl DropReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LeererFrame => "leerer_frame",
            Self::SelektorUngueltig => "selektor_ungueltig",
            Self::HookInaktiv => "hook_inaktiv",
            Self::VirtuellerClient => "virtueller_client",
            Self::ClientInaktiv => "client_inaktiv",
            Self::NichtsKodiert => "nichts_kodiert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundOutcome {
    Gesendet { slot: SlotIndex },
    /// Weniger als ein Frame, wartet auf den naechsten Engine-Frame
    Gepuffert { slot: SlotIndex },
    Verworfen(DropReason),
}

impl<H, K> VoicePipeline<H, K>
where
    H: HostClients,
    K: InterceptionHook,
{
    /// Sendet einen Frame der Engine ueber den Original-Broadcast.
    ///
    /// `selector = -1` spricht als virtueller Client. Eine leere Payload
    /// hat keinerlei Seiteneffekt, auch keine Bot-Erstellung.
    pub fn send_client_voice(&mut self, selector: i32, payload: &[u8]) -> OutboundOutcome {
        let outcome = self.ausgehend_senden(selector, payload);
        match outcome {
            OutboundOutcome::Gesendet { slot } => {
                trace!(slot = %slot, bytes = payload.len(), "Engine-Frame gesendet");
                self.stats.outbound_gesendet += 1;
            }
            OutboundOutcome::Gepuffert { slot } => {
                trace!(slot = %slot, bytes = payload.len(), "Engine-Frame gepuffert");
                self.stats.outbound_gepuffert += 1;
            }
            OutboundOutcome::Verworfen(grund) => {
                debug!(selector, grund = grund.label(), "Engine-Frame verworfen");
                self.stats.outbound_verworfen += 1;
            }
        }
        outcome
    }

    fn ausgehend_senden(&mut self, selector: i32, payload: &[u8]) -> OutboundOutcome {
        if payload.is_empty() {
            return OutboundOutcome::Verworfen(DropReason::LeererFrame);
        }
        let Some(ziel) = SlotSelector::from_raw(selector) else {
            return OutboundOutcome::Verworfen(DropReason::SelektorUngueltig);
        };
        let Some(handle) = self.hook_handle else {
            return OutboundOutcome::Verworfen(DropReason::HookInaktiv);
        };

        let slot = match ziel {
            SlotSelector::Client(slot) => slot,
            SlotSelector::Virtual => {
                match self.virtual_client.resolve_virtual_slot(&mut self.slots) {
                    Ok(slot) => slot,
                    Err(err) => {
                        warn!("Engine-Frame fuer virtuellen Client verworfen: {}", err);
                        return OutboundOutcome::Verworfen(DropReason::VirtuellerClient);
                    }
                }
            }
        };

        // Zwischen Pruefung und Verwendung kann sich der Client getrennt haben
        let Some(client) = self.slots.resolve(slot) else {
            return OutboundOutcome::Verworfen(DropReason::ClientInaktiv);
        };

        let kodiert;
        let daten: &[u8] = match self.codecs.as_mut() {
            Some(codecs) => {
                let samples = le_bytes_to_samples(payload);
                if samples.is_empty() {
                    return OutboundOutcome::Verworfen(DropReason::NichtsKodiert);
                }
                kodiert = match codecs.encode(slot, &samples, false) {
                    Ok(kodiert) => kodiert,
                    Err(err) => {
                        warn!(slot = %slot, "Engine-Frame nicht kodierbar: {}", err);
                        return OutboundOutcome::Verworfen(DropReason::NichtsKodiert);
                    }
                };
                if kodiert.is_empty() {
                    return OutboundOutcome::Gepuffert { slot };
                }
                &kodiert
            }
            None => payload,
        };

        self.hook.call_original(
            handle,
            BroadcastCall {
                client,
                payload: daten,
                flag: false,
            },
        );
        OutboundOutcome::Gesendet { slot }
    }
}

impl<H, K> OutboundSink for VoicePipeline<H, K>
where
    H: HostClients,
    K: InterceptionHook,
{
    fn deliver_outbound(&mut self, slot_selector: i32, payload: &[u8]) {
        self.send_client_voice(slot_selector, payload);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
