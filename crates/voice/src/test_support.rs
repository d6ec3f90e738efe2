//! In-Memory-Fakes fuer Host, Hook und Engine (nur Tests)

use std::collections::HashMap;

use voicebridge_audio::{
    le_bytes_to_samples, samples_to_le_bytes, AudioError, AudioResult, CodecBridge, VoiceCodec,
};
use voicebridge_core::{AccountId, PayloadMode, Result, SlotIndex, VoiceFrame};

use crate::engine::{ExternalEngine, OutboundSink};
use crate::hook::{BroadcastCall, HookHandle, InterceptionHook};
use crate::slots::{ClientHandle, ClientInfo, HostClients};

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct TestHost {
    clients: HashMap<SlotIndex, ClientInfo>,
    naechster_handle: u64,
    /// Anzahl der erstellten Bots
    pub bots_erstellt: usize,
    /// Bot-Erstellung schlaegt fehl
    pub bots_verweigern: bool,
}

impl TestHost {
    fn handle(&mut self) -> ClientHandle {
        self.naechster_handle += 1;
        ClientHandle(self.naechster_handle)
    }

    pub fn verbinden(&mut self, slot: SlotIndex, account: u64) {
        let handle = self.handle();
        self.clients.insert(
            slot,
            ClientInfo {
                connected: true,
                in_game: true,
                fake: false,
                account_id: AccountId(account),
                handle,
            },
        );
    }

    pub fn im_spiel_setzen(&mut self, slot: SlotIndex, im_spiel: bool) {
        if let Some(info) = self.clients.get_mut(&slot) {
            info.in_game = im_spiel;
        }
    }

    pub fn trennen(&mut self, slot: SlotIndex) {
        self.clients.remove(&slot);
    }

    pub fn handle_von(&self, slot: SlotIndex) -> Option<ClientHandle> {
        self.clients.get(&slot).map(|info| info.handle)
    }
}

impl HostClients for TestHost {
    fn client_info(&self, slot: SlotIndex) -> Option<ClientInfo> {
        self.clients.get(&slot).copied()
    }

    fn create_fake_client(&mut self, _name: &str) -> Option<SlotIndex> {
        if self.bots_verweigern {
            return None;
        }
        let slot = SlotIndex::alle().find(|s| !self.clients.contains_key(s))?;
        let handle = self.handle();
        self.clients.insert(
            slot,
            ClientInfo {
                connected: true,
                in_game: true,
                fake: true,
                account_id: AccountId(0),
                handle,
            },
        );
        self.bots_erstellt += 1;
        Some(slot)
    }
}

// ---------------------------------------------------------------------------
// Hook
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct TestHook {
    /// Alle Aufrufe des Original-Broadcasts
    pub aufrufe: Vec<(ClientHandle, Vec<u8>, bool)>,
    pub aktiv: Option<HookHandle>,
    pub nicht_gefunden: bool,
}

impl InterceptionHook for TestHook {
    fn install(&mut self, target: &str) -> Result<HookHandle> {
        if self.nicht_gefunden {
            return Err(voicebridge_core::BridgeError::HookNichtGefunden(
                target.to_string(),
            ));
        }
        let handle = HookHandle(1);
        self.aktiv = Some(handle);
        Ok(handle)
    }

    fn call_original(&mut self, _handle: HookHandle, call: BroadcastCall<'_>) {
        self.aufrufe
            .push((call.client, call.payload.to_vec(), call.flag));
    }

    fn uninstall(&mut self, _handle: HookHandle) {
        self.aktiv = None;
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Empfangen {
    pub slot: SlotIndex,
    pub account_id: AccountId,
    pub gain: Option<f32>,
    pub mode: PayloadMode,
    pub payload: Vec<u8>,
}

#[derive(Default)]
pub struct TestEngine {
    pub empfangen: Vec<Empfangen>,
    /// Ersatz-Payload; `None` gibt die Eingabe unveraendert zurueck
    pub antwort: Option<Vec<u8>>,
    pub panik: bool,
    /// Wird beim naechsten pump() an die Senke geliefert
    pub ausgehend: Vec<(i32, Vec<u8>)>,
}

impl ExternalEngine for TestEngine {
    fn init(&mut self, _listen_address: &str) -> Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) {}

    fn pump(&mut self, sink: &mut dyn OutboundSink) {
        for (selector, payload) in self.ausgehend.drain(..) {
            sink.deliver_outbound(selector, &payload);
        }
    }

    fn deliver_inbound(&mut self, frame: VoiceFrame<'_>) -> Vec<u8> {
        self.empfangen.push(Empfangen {
            slot: frame.slot,
            account_id: frame.account_id,
            gain: frame.gain,
            mode: frame.mode,
            payload: frame.payload.to_vec(),
        });
        if self.panik {
            panic!("Engine-Fehler im Test");
        }
        self.antwort
            .clone()
            .unwrap_or_else(|| frame.payload.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Verlustfreier Test-Codec: `frame_samples` Samples ↔ doppelt so viele
/// Bytes little-endian. Ein Frame nur aus `0xFF` gilt als defekt.
pub struct PcmTestCodec {
    pub frame_samples: usize,
}

impl VoiceCodec for PcmTestCodec {
    fn frame_samples(&self) -> usize {
        self.frame_samples
    }

    fn frame_bytes(&self) -> usize {
        self.frame_samples * 2
    }

    fn decode_frame(&mut self, data: &[u8], output: &mut [i16]) -> AudioResult<usize> {
        if data.len() != self.frame_bytes() {
            return Err(AudioError::FrameGroesse {
                erwartet: self.frame_bytes(),
                erhalten: data.len(),
            });
        }
        if data.iter().all(|&b| b == 0xFF) {
            return Err(AudioError::CodecFehler("defekter Test-Frame".into()));
        }
        output[..self.frame_samples].copy_from_slice(&le_bytes_to_samples(data));
        Ok(self.frame_samples)
    }

    fn encode_frame(&mut self, pcm: &[i16], output: &mut [u8]) -> AudioResult<usize> {
        output.copy_from_slice(&samples_to_le_bytes(pcm));
        Ok(output.len())
    }
}

/// Codec-Bruecke aus 64 `PcmTestCodec`s mit 2 Samples pro Frame
pub fn pcm_bridge() -> CodecBridge {
    pcm_bridge_mit_frames(2)
}

/// Codec-Bruecke aus 64 `PcmTestCodec`s mit waehlbarer Frame-Laenge
pub fn pcm_bridge_mit_frames(frame_samples: usize) -> CodecBridge {
    CodecBridge::with_factory(|_| {
        Ok(Box::new(PcmTestCodec { frame_samples }) as Box<dyn VoiceCodec>)
    })
    .expect("Test-Codecs sind unfehlbar")
}
