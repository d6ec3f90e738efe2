//! Abfang-Hook auf das Broadcast-Primitiv des Hosts
//!
//! Wie der Hook technisch gesetzt wird (Mustersuche, Detour, vtable) ist
//! Sache der Host-Anbindung. Der Kern sieht nur diese Schnittstelle.

use voicebridge_core::Result;

use crate::slots::ClientHandle;

/// Symbolischer Name des abgefangenen Broadcast-Primitivs
pub const BROADCAST_VOICE_TARGET: &str = "SV_BroadcastVoiceData";

/// Handle auf einen installierten Hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(pub u64);

/// Argumente fuer einen Aufruf des Original-Broadcasts
#[derive(Debug, Clone, Copy)]
pub struct BroadcastCall<'a> {
    /// Sendender Client
    pub client: ClientHandle,
    /// Sprach-Payload wie sie an die anderen Clients geht
    pub payload: &'a [u8],
    /// Vom Host durchgereichtes Flag, wird nie interpretiert
    pub flag: bool,
}

/// Faehigkeit, das Broadcast-Primitiv abzufangen und das Original aufzurufen
pub trait InterceptionHook {
    /// Sucht das Ziel und aktiviert den Hook.
    ///
    /// Ein nicht gefundenes Ziel ist ein Startfehler
    /// (`BridgeError::HookNichtGefunden`).
    fn install(&mut self, target: &str) -> Result<HookHandle>;

    /// Ruft das originale, nicht abgefangene Primitiv auf
    fn call_original(&mut self, handle: HookHandle, call: BroadcastCall<'_>);

    /// Deaktiviert den Hook; danach kommen keine Frames mehr an
    fn uninstall(&mut self, handle: HookHandle);
}
