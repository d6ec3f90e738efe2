//! Gemeinsame Fakes fuer die Integrationstests
//!
//! Hook und Engine schreiben in ein geteiltes Protokoll, damit die
//! Reihenfolge beim Laden und Entladen pruefbar ist.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use voicebridge_core::{AccountId, BridgeError, PayloadMode, Result, SlotIndex, VoiceFrame};
use voicebridge_extension::{ExtensionConfig, VoiceExtension};
use voicebridge_voice::{
    BroadcastCall, ClientHandle, ClientInfo, ExternalEngine, HookHandle, HostClients,
    InterceptionHook, OutboundSink,
};

pub type Protokoll = Rc<RefCell<Vec<String>>>;

pub fn slot(n: i32) -> SlotIndex {
    SlotIndex::new(n).unwrap()
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeHost {
    clients: HashMap<SlotIndex, ClientInfo>,
    naechster: u64,
    pub bots_erstellt: usize,
    pub letzter_bot_name: Option<String>,
}

impl FakeHost {
    pub fn verbinden(&mut self, slot: SlotIndex, account: u64) -> ClientHandle {
        self.naechster += 1;
        let handle = ClientHandle(self.naechster);
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
        handle
    }

    pub fn ladebildschirm(&mut self, slot: SlotIndex) {
        if let Some(info) = self.clients.get_mut(&slot) {
            info.in_game = false;
        }
    }

    pub fn trennen(&mut self, slot: SlotIndex) {
        self.clients.remove(&slot);
    }

    pub fn handle_von(&self, slot: SlotIndex) -> Option<ClientHandle> {
        self.clients.get(&slot).map(|c| c.handle)
    }
}

impl HostClients for FakeHost {
    fn client_info(&self, slot: SlotIndex) -> Option<ClientInfo> {
        self.clients.get(&slot).copied()
    }

    fn create_fake_client(&mut self, name: &str) -> Option<SlotIndex> {
        let slot = SlotIndex::alle().find(|s| !self.clients.contains_key(s))?;
        self.naechster += 1;
        self.clients.insert(
            slot,
            ClientInfo {
                connected: true,
                in_game: true,
                fake: true,
                account_id: AccountId(0),
                handle: ClientHandle(self.naechster),
            },
        );
        self.bots_erstellt += 1;
        self.letzter_bot_name = Some(name.to_string());
        Some(slot)
    }
}

// ---------------------------------------------------------------------------
// Hook
// ---------------------------------------------------------------------------

pub struct ProtokollHook {
    protokoll: Protokoll,
    pub aufrufe: Vec<(ClientHandle, Vec<u8>, bool)>,
    pub ziel_fehlt: bool,
}

impl ProtokollHook {
    pub fn neu(protokoll: &Protokoll) -> Self {
        Self {
            protokoll: Rc::clone(protokoll),
            aufrufe: Vec::new(),
            ziel_fehlt: false,
        }
    }
}

impl InterceptionHook for ProtokollHook {
    fn install(&mut self, target: &str) -> Result<HookHandle> {
        if self.ziel_fehlt {
            return Err(BridgeError::HookNichtGefunden(target.to_string()));
        }
        self.protokoll
            .borrow_mut()
            .push(format!("hook_installiert:{target}"));
        Ok(HookHandle(7))
    }

    fn call_original(&mut self, _handle: HookHandle, call: BroadcastCall<'_>) {
        self.aufrufe
            .push((call.client, call.payload.to_vec(), call.flag));
    }

    fn uninstall(&mut self, _handle: HookHandle) {
        self.protokoll.borrow_mut().push("hook_deaktiviert".into());
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Eingang {
    pub slot: SlotIndex,
    pub account_id: AccountId,
    pub gain: Option<f32>,
    pub mode: PayloadMode,
    pub payload: Vec<u8>,
}

pub struct SkriptEngine {
    protokoll: Protokoll,
    pub eingaenge: Vec<Eingang>,
    /// `None` gibt die Eingabe unveraendert zurueck
    pub antwort: Option<Vec<u8>>,
    /// Wird beim naechsten Pump zugestellt
    pub ausgehend: Vec<(i32, Vec<u8>)>,
    pub init_fehler: bool,
}

impl SkriptEngine {
    pub fn neu(protokoll: &Protokoll) -> Self {
        Self {
            protokoll: Rc::clone(protokoll),
            eingaenge: Vec::new(),
            antwort: None,
            ausgehend: Vec::new(),
            init_fehler: false,
        }
    }
}

impl ExternalEngine for SkriptEngine {
    fn init(&mut self, listen_address: &str) -> Result<()> {
        if self.init_fehler {
            return Err(BridgeError::EngineInit(format!(
                "Port {listen_address} belegt"
            )));
        }
        self.protokoll
            .borrow_mut()
            .push(format!("engine_init:{listen_address}"));
        Ok(())
    }

    fn shutdown(&mut self) {
        self.protokoll.borrow_mut().push("engine_beendet".into());
    }

    fn pump(&mut self, sink: &mut dyn OutboundSink) {
        for (selector, payload) in self.ausgehend.drain(..) {
            sink.deliver_outbound(selector, &payload);
        }
    }

    fn deliver_inbound(&mut self, frame: VoiceFrame<'_>) -> Vec<u8> {
        self.eingaenge.push(Eingang {
            slot: frame.slot,
            account_id: frame.account_id,
            gain: frame.gain,
            mode: frame.mode,
            payload: frame.payload.to_vec(),
        });
        self.antwort
            .clone()
            .unwrap_or_else(|| frame.payload.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Aufbau
// ---------------------------------------------------------------------------

pub type TestExtension = VoiceExtension<FakeHost, ProtokollHook, SkriptEngine>;

pub fn passthrough_config() -> ExtensionConfig {
    ExtensionConfig::default()
}

pub fn transcode_config() -> ExtensionConfig {
    ExtensionConfig::aus_toml(
        r#"
        [bridge]
        mode = "transcode"
        listen_address = "127.0.0.1:50051"
    "#,
    )
    .unwrap()
}

/// Laedt eine Extension mit einem verbundenen Spieler in Slot 1
pub fn laden(config: &ExtensionConfig) -> (TestExtension, Protokoll, ClientHandle) {
    let protokoll = Protokoll::default();
    let mut host = FakeHost::default();
    let spieler = host.verbinden(slot(1), 76561198000000001);
    let ext = VoiceExtension::laden(
        config,
        host,
        ProtokollHook::neu(&protokoll),
        SkriptEngine::neu(&protokoll),
    )
    .expect("Laden sollte gelingen");
    (ext, protokoll, spieler)
}
