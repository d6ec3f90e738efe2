//! Codec-Bruecke – ein persistenter Transcoder pro Client-Slot
//!
//! Alle 64 Codecs werden beim Start auf einmal erzeugt. Schlaegt auch nur
//! einer fehl, wird die gesamte Bruecke verworfen (alles oder nichts); bereits
//! erzeugte Codecs werden dabei sofort freigegeben.
//!
//! Die Codecs gehoeren dem Slot-Index, nicht der Verbindung: ein Client, der
//! sich neu verbindet, bekommt denselben Codec-Zustand zurueck.

use tracing::{debug, info, warn};
use voicebridge_core::SlotIndex;

use crate::codec::{OpusVoiceCodec, VoiceCodec};
use crate::config::CodecConfig;
use crate::error::{AudioError, AudioResult};

/// Kapazitaet des Dekodier-Puffers in Samples
pub const DECODE_SCRATCH_SAMPLES: usize = 32 * 1024;

/// Codec eines Slots samt noch nicht kodierter Rest-Samples
struct SlotCodec {
    codec: Box<dyn VoiceCodec>,
    /// Unvollstaendiger letzter Frame aus einem `encode(.., false)`
    carry: Vec<i16>,
}

/// Besitzt genau `MAX_SLOTS` Codecs, adressiert ueber `SlotIndex`
pub struct CodecBridge {
    slots: Box<[SlotCodec]>,
    scratch: Vec<i16>,
}

impl CodecBridge {
    /// Erzeugt 64 Opus-Codecs mit derselben Qualitaetsstufe
    pub fn new(config: &CodecConfig) -> AudioResult<Self> {
        config.validieren()?;
        Self::with_factory(|_| {
            let codec = OpusVoiceCodec::new(config)?;
            Ok(Box::new(codec) as Box<dyn VoiceCodec>)
        })
    }

    /// Erzeugt die Codecs ueber eine beliebige Fabrik
    ///
    /// Bricht beim ersten Fehler ab; alle bis dahin erzeugten Codecs werden
    /// gedroppt bevor der Fehler zurueckkommt.
    pub fn with_factory<F>(mut factory: F) -> AudioResult<Self>
    where
        F: FnMut(SlotIndex) -> AudioResult<Box<dyn VoiceCodec>>,
    {
        let slots = SlotIndex::alle()
            .map(|slot| {
                factory(slot)
                    .map(|codec| SlotCodec {
                        codec,
                        carry: Vec::new(),
                    })
                    .map_err(|e| AudioError::SlotInitialisierung {
                        slot: slot.index(),
                        grund: e.to_string(),
                    })
            })
            .collect::<AudioResult<Vec<_>>>()?;

        info!(slots = slots.len(), "Codec-Bruecke initialisiert");

        Ok(Self {
            slots: slots.into_boxed_slice(),
            scratch: vec![0; DECODE_SCRATCH_SAMPLES],
        })
    }

    /// Anzahl der lebenden Codecs (immer `MAX_SLOTS`)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Dekodiert eine Payload aus aneinandergehaengten Frames
    ///
    /// Alles oder nichts: ein defekter Frame oder ein voller Puffer
    /// (`DECODE_SCRATCH_SAMPLES`) verwirft das ganze Ergebnis. Das Ergebnis
    /// liegt im internen Puffer.
    pub fn decode(&mut self, slot: SlotIndex, compressed: &[u8]) -> AudioResult<&[i16]> {
        let Self { slots, scratch } = self;
        let state = &mut slots[slot.index()];
        let frame_bytes = state.codec.frame_bytes();
        let frame_samples = state.codec.frame_samples();

        let mut written = 0usize;
        for frame in compressed.chunks(frame_bytes) {
            if written + frame_samples > scratch.len() {
                warn!(
                    slot = %slot,
                    bytes = compressed.len(),
                    "Dekodier-Puffer voll"
                );
                return Err(AudioError::PufferVoll {
                    bytes: compressed.len(),
                    kapazitaet: scratch.len(),
                });
            }
            written += state
                .codec
                .decode_frame(frame, &mut scratch[written..written + frame_samples])
                .map_err(|err| {
                    debug!(slot = %slot, "Frame nicht dekodierbar: {}", err);
                    err
                })?;
        }

        Ok(&scratch[..written])
    }

    /// Kodiert Samples zu Wire-Frames
    ///
    /// Mit `is_final = false` bleibt ein unvollstaendiger letzter Frame im
    /// Slot liegen und wird dem naechsten Aufruf vorangestellt. Mit
    /// `is_final = true` wird er mit Stille aufgefuellt und mitkodiert.
    /// Schlaegt ein Frame fehl, ist das ganze Ergebnis verworfen und der
    /// Rest des Slots geleert.
    pub fn encode(
        &mut self,
        slot: SlotIndex,
        pcm: &[i16],
        is_final: bool,
    ) -> AudioResult<Vec<u8>> {
        let state = &mut self.slots[slot.index()];
        let frame_samples = state.codec.frame_samples();

        let mut input = std::mem::take(&mut state.carry);
        input.extend_from_slice(pcm);

        let rest = input.len() % frame_samples;
        if is_final && rest != 0 {
            input.resize(input.len() + frame_samples - rest, 0);
        }
        let ganze = input.len() - if is_final { 0 } else { rest };

        let output = Self::frames_kodieren(slot, state, &input[..ganze])?;
        if !is_final && rest != 0 {
            state.carry = input[ganze..].to_vec();
        }
        Ok(output)
    }

    /// Kodiert Samples neu, ohne den gepufferten Rest von `encode` anzufassen
    ///
    /// Fuer bereits dekodierte Payloads; ein unvollstaendiger letzter Frame
    /// wird mit Stille aufgefuellt.
    pub fn reencode(&mut self, slot: SlotIndex, pcm: &[i16]) -> AudioResult<Vec<u8>> {
        let state = &mut self.slots[slot.index()];
        let frame_samples = state.codec.frame_samples();
        let rest = pcm.len() % frame_samples;
        if rest == 0 {
            return Self::frames_kodieren(slot, state, pcm);
        }
        let mut input = pcm.to_vec();
        input.resize(pcm.len() + frame_samples - rest, 0);
        Self::frames_kodieren(slot, state, &input)
    }

    /// Anzahl der Samples, die im Slot auf den naechsten `encode` warten
    pub fn pending_samples(&self, slot: SlotIndex) -> usize {
        self.slots[slot.index()].carry.len()
    }

    fn frames_kodieren(
        slot: SlotIndex,
        state: &mut SlotCodec,
        pcm: &[i16],
    ) -> AudioResult<Vec<u8>> {
        let frame_samples = state.codec.frame_samples();
        let frame_bytes = state.codec.frame_bytes();
        let mut output = vec![0u8; pcm.len() / frame_samples * frame_bytes];

        // CBR: jeder Frame belegt frame_bytes
        for (frame, ziel) in pcm
            .chunks_exact(frame_samples)
            .zip(output.chunks_exact_mut(frame_bytes))
        {
            if let Err(err) = state.codec.encode_frame(frame, ziel) {
                warn!(slot = %slot, "Frame nicht kodierbar: {}", err);
                state.carry.clear();
                return Err(err);
            }
        }
        Ok(output)
    }
}

impl Drop for CodecBridge {
    fn drop(&mut self) {
        debug!(slots = self.slots.len(), "Codec-Bruecke freigegeben");
    }
}

impl std::fmt::Debug for CodecBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecBridge")
            .field("slots", &self.slots.len())
            .finish()
    }
}
