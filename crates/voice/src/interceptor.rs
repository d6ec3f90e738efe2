//! Voice-Interceptor – Hot Path fuer jeden gesendeten Sprach-Frame
//!
//! Der Interceptor entscheidet nur, was mit der Payload passiert. Den
//! Original-Broadcast ruft er nie selbst auf; das macht die Pipeline genau
//! einmal danach, egal welches Ergebnis hier herauskommt.
//!
//! Jeder Fehler fuehrt zu `PassThrough` mit unveraenderter Payload.

use tracing::trace;
use voicebridge_audio::{apply_gain, samples_to_le_bytes, CodecBridge};
use voicebridge_core::{PayloadMode, SlotIndex, VoiceFrame};

use crate::engine::ExternalEngine;
use crate::slots::{ClientSlotTable, HostClients};
use crate::volume::{VolumeMap, DEFAULT_GAIN};

// ---------------------------------------------------------------------------
// Ergebnis
// ---------------------------------------------------------------------------

/// Warum ein Frame unveraendert durchgereicht wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    /// Slot ausserhalb von [0, 64)
    SlotUngueltig,
    /// Nicht verbunden oder nicht im Spiel
    ClientInaktiv,
    /// Payload ohne Inhalt
    LeererFrame,
    /// Dekodieren lieferte keine Samples
    NichtsDekodiert,
    /// Mindestens ein Frame war nicht dekodierbar oder der Puffer lief voll
    DekodierFehler,
    /// Skalierte Samples liessen sich nicht neu kodieren
    KodierFehler,
    /// Engine oder Codec ist im Hot Path gepanict
    Panik,
    /// Hook nicht installiert, der Host sendet selbst
    HookInaktiv,
}

/// Was mit einem abgefangenen Frame passiert ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptOutcome {
    /// Payload unveraendert, Engine nicht beteiligt
    PassThrough(PassThroughReason),
    /// Engine hat den Frame gesehen, Payload unveraendert
    Beobachtet,
    /// Payload durch die Antwort der Engine ersetzt
    Ersetzt,
    /// Payload mit Lautstaerke skaliert und neu kodiert
    Skaliert,
}

impl InterceptOutcome {
    /// Kurzname fuer Logs und Metrik-Labels
    pub fn label(&self) -> &'static str {
        match self {
            Self::PassThrough(PassThroughReason::SlotUngueltig) => "slot_ungueltig",
            Self::PassThrough(PassThroughReason::ClientInaktiv) => "client_inaktiv",
            Self::PassThrough(PassThroughReason::LeererFrame) => "leerer_frame",
            Self::PassThrough(PassThroughReason::NichtsDekodiert) => "nichts_dekodiert",
            Self::PassThrough(PassThroughReason::DekodierFehler) => "dekodier_fehler",
            Self::PassThrough(PassThroughReason::KodierFehler) => "kodier_fehler",
            Self::PassThrough(PassThroughReason::Panik) => "panik",
            Self::PassThrough(PassThroughReason::HookInaktiv) => "hook_inaktiv",
            Self::Beobachtet => "beobachtet",
            Self::Ersetzt => "ersetzt",
            Self::Skaliert => "skaliert",
        }
    }

    pub fn ist_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough(_))
    }
}

// ---------------------------------------------------------------------------
// VoiceInterceptor
// ---------------------------------------------------------------------------

/// Borgt sich alles, was ein einzelner Frame braucht
pub struct VoiceInterceptor<'a, H, E: ?Sized> {
    pub slots: &'a ClientSlotTable<H>,
    pub volume: &'a VolumeMap,
    /// `Some` nur im Transcode-Modus
    pub codecs: Option<&'a mut CodecBridge>,
    pub engine: &'a mut E,
}

impl<'a, H, E> VoiceInterceptor<'a, H, E>
where
    H: HostClients,
    E: ExternalEngine + ?Sized,
{
    pub fn mode(&self) -> PayloadMode {
        if self.codecs.is_some() {
            PayloadMode::Transcode
        } else {
            PayloadMode::Passthrough
        }
    }

    /// Verarbeitet einen Frame. `payload` wird nur bei `Ersetzt` oder
    /// `Skaliert` veraendert.
    pub fn intercept(&mut self, raw_slot: i32, payload: &mut Vec<u8>) -> InterceptOutcome {
        let Some(slot) = SlotIndex::new(raw_slot) else {
            trace!(slot = raw_slot, "Slot ausserhalb des Bereichs");
            return InterceptOutcome::PassThrough(PassThroughReason::SlotUngueltig);
        };

        let Some(account_id) = self.slots.external_identity(slot) else {
            trace!(slot = %slot, "Client nicht aktiv");
            return InterceptOutcome::PassThrough(PassThroughReason::ClientInaktiv);
        };

        if payload.is_empty() {
            return InterceptOutcome::PassThrough(PassThroughReason::LeererFrame);
        }

        let gain = self.volume.gain(slot);

        let Some(codecs) = self.codecs.as_deref_mut() else {
            // Passthrough: Antwort der Engine ist massgeblich, auch wenn leer
            let ersatz = self.engine.deliver_inbound(VoiceFrame {
                slot,
                account_id,
                gain: Some(gain),
                mode: PayloadMode::Passthrough,
                payload: payload.as_slice(),
            });
            *payload = ersatz;
            return InterceptOutcome::Ersetzt;
        };

        let mut samples = match codecs.decode(slot, payload.as_slice()) {
            Ok(samples) => samples.to_vec(),
            Err(err) => {
                trace!(
                    slot = %slot,
                    bytes = payload.len(),
                    "Payload nicht dekodierbar: {}",
                    err
                );
                return InterceptOutcome::PassThrough(PassThroughReason::DekodierFehler);
            }
        };
        if samples.is_empty() {
            trace!(slot = %slot, bytes = payload.len(), "Nichts dekodiert");
            return InterceptOutcome::PassThrough(PassThroughReason::NichtsDekodiert);
        }

        let pcm = samples_to_le_bytes(&samples);
        // Transcode: Engine beobachtet nur, die Rueckgabe wird verworfen
        let _ = self.engine.deliver_inbound(VoiceFrame {
            slot,
            account_id,
            gain: None,
            mode: PayloadMode::Transcode,
            payload: &pcm,
        });

        if gain == DEFAULT_GAIN {
            return InterceptOutcome::Beobachtet;
        }

        apply_gain(&mut samples, gain);
        let neu = match codecs.reencode(slot, &samples) {
            Ok(neu) => neu,
            Err(err) => {
                trace!(slot = %slot, "Skalierter Frame nicht kodierbar: {}", err);
                return InterceptOutcome::PassThrough(PassThroughReason::KodierFehler);
            }
        };

        trace!(slot = %slot, gain, bytes = neu.len(), "Frame skaliert");
        *payload = neu;
        InterceptOutcome::Skaliert
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
