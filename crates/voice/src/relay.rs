//! Relay-Engine – In-Process-Implementierung von `ExternalEngine`
//!
//! Eingehende Frames werden an alle Abonnenten verteilt (tokio mpsc, eine
//! Queue pro Abonnent). Ausgehende Frames legt beliebiger Code ueber einen
//! `RelayHandle` ab; sie werden beim naechsten `pump()` auf dem
//! Simulations-Thread zugestellt.
//!
//! ## Design-Entscheidungen
//! - Nicht-blockierend verteilen: volle Queue → Frame fuer diesen Abonnenten
//!   verwerfen
//! - Geschlossene Queues werden bei jeder Verteilung und jedem Pump entfernt
//! - Die Warteschlange wird vor der Zustellung geleert, der Lock ist waehrend
//!   `deliver_outbound` nicht gehalten

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use voicebridge_core::{AccountId, BridgeError, PayloadMode, Result, SlotIndex, VoiceFrame};

use crate::engine::{ExternalEngine, OutboundSink};

/// Groesse der Queue pro Abonnent (Frames)
pub const SUBSCRIBER_QUEUE: usize = 10;

// ---------------------------------------------------------------------------
// InboundVoice
// ---------------------------------------------------------------------------

/// Kopie eines eingehenden Frames fuer einen Abonnenten
#[derive(Debug, Clone)]
pub struct InboundVoice {
    pub slot: SlotIndex,
    pub account_id: AccountId,
    pub gain: Option<f32>,
    pub mode: PayloadMode,
    /// Einmal allokiert, zwischen allen Abonnenten geteilt
    pub payload: Arc<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// RelayHandle
// ---------------------------------------------------------------------------

/// Thread-sicherer Zugang zur Relay-Engine
#[derive(Clone, Default)]
pub struct RelayHandle {
    ausgehend: Arc<Mutex<VecDeque<(i32, Vec<u8>)>>>,
    abonnenten: Arc<Mutex<Vec<mpsc::Sender<InboundVoice>>>>,
    /// Wegen voller Queues verworfene Frames, ueber alle Abonnenten
    verworfen: Arc<AtomicU64>,
}

impl RelayHandle {
    /// Legt einen Frame fuer den naechsten Pump ab (`-1` = virtueller Client)
    pub fn queue_voice(&self, slot_selector: i32, payload: Vec<u8>) {
        self.ausgehend.lock().push_back((slot_selector, payload));
    }

    /// Abonniert alle eingehenden Frames
    pub fn subscribe(&self) -> mpsc::Receiver<InboundVoice> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE);
        self.abonnenten.lock().push(tx);
        rx
    }

    /// Anzahl der noch nicht zugestellten Frames
    pub fn pending_len(&self) -> usize {
        self.ausgehend.lock().len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.abonnenten.lock().len()
    }

    /// Frames, die ein Abonnent wegen voller Queue nicht bekommen hat
    pub fn dropped_count(&self) -> u64 {
        self.verworfen.load(Ordering::Relaxed)
    }

    fn geschlossene_entfernen(&self) {
        self.abonnenten.lock().retain(|tx| !tx.is_closed());
    }
}

// ---------------------------------------------------------------------------
// RelayEngine
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RelayEngine {
    handle: RelayHandle,
    listen_address: Option<SocketAddr>,
    initialisiert: bool,
}

impl RelayEngine {
    pub fn neu() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> RelayHandle {
        self.handle.clone()
    }

    /// Adresse aus `init`, `None` fuer reinen In-Process-Betrieb
    pub fn listen_address(&self) -> Option<SocketAddr> {
        self.listen_address
    }

    pub fn ist_initialisiert(&self) -> bool {
        self.initialisiert
    }
}

impl ExternalEngine for RelayEngine {
    fn init(&mut self, listen_address: &str) -> Result<()> {
        let adresse = listen_address.trim();
        self.listen_address = if adresse.is_empty() {
            None
        } else {
            let addr = adresse.parse::<SocketAddr>().map_err(|e| {
                BridgeError::EngineInit(format!("Ungueltige Adresse '{}': {}", adresse, e))
            })?;
            Some(addr)
        };
        self.initialisiert = true;
        tracing::info!(adresse = ?self.listen_address, "Relay-Engine gestartet");
        Ok(())
    }

    fn shutdown(&mut self) {
        let verworfen = {
            let mut queue = self.handle.ausgehend.lock();
            let n = queue.len();
            queue.clear();
            n
        };
        self.handle.abonnenten.lock().clear();
        if self.initialisiert {
            tracing::info!(verworfen, "Relay-Engine beendet");
        }
        self.initialisiert = false;
    }

    fn pump(&mut self, sink: &mut dyn OutboundSink) {
        let frames = std::mem::take(&mut *self.handle.ausgehend.lock());
        for (selector, payload) in frames {
            sink.deliver_outbound(selector, &payload);
        }
        self.handle.geschlossene_entfernen();
    }

    fn deliver_inbound(&mut self, frame: VoiceFrame<'_>) -> Vec<u8> {
        let payload = Arc::new(frame.payload.to_vec());
        let mut abonnenten = self.handle.abonnenten.lock();

        abonnenten.retain(|tx| {
            let kopie = InboundVoice {
                slot: frame.slot,
                account_id: frame.account_id,
                gain: frame.gain,
                mode: frame.mode,
                payload: Arc::clone(&payload),
            };
            match tx.try_send(kopie) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // Nur der erste Verlust wird gewarnt, danach trace
                    if self.handle.verworfen.fetch_add(1, Ordering::Relaxed) == 0 {
                        tracing::warn!(
                            slot = %frame.slot,
                            "Abonnenten-Queue voll – Frames werden verworfen"
                        );
                    } else {
                        tracing::trace!(slot = %frame.slot, "Abonnenten-Queue voll");
                    }
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!("Abonnent getrennt");
                    false
                }
            }
        });

        frame.payload.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
