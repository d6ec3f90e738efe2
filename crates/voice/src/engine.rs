//! Schnittstelle zur externen Sprach-Engine
//!
//! Die Engine ist die Komponente, die Sprache ausserhalb des Spielservers
//! verarbeitet. Eingehende Frames bekommt sie synchron im Broadcast-Pfad,
//! ausgehende Frames liefert sie nur innerhalb von `pump()` ab.

use voicebridge_core::{Result, VoiceFrame};

/// Tracing-Target fuer Meldungen der Engine
pub const ENGINE_LOG_TARGET: &str = "voicebridge::engine";

/// Empfaenger fuer Frames, die die Engine an Spieler senden will
pub trait OutboundSink {
    /// Liefert einen Frame an einen Slot (`-1` = virtueller Client)
    fn deliver_outbound(&mut self, slot_selector: i32, payload: &[u8]);
}

/// Externe Sprach-Engine
pub trait ExternalEngine {
    /// Startet die Engine. Ein leerer String heisst "keine Adresse".
    fn init(&mut self, listen_address: &str) -> Result<()>;

    /// Beendet die Engine; danach wird sie nicht mehr angesprochen
    fn shutdown(&mut self);

    /// Einmal pro Server-Tick: gepufferte Arbeit abarbeiten und ausgehende
    /// Frames ueber `sink` abliefern
    fn pump(&mut self, sink: &mut dyn OutboundSink);

    /// Nimmt einen eingehenden Frame entgegen und liefert die Payload,
    /// die statt des Originals gesendet werden soll
    fn deliver_inbound(&mut self, frame: VoiceFrame<'_>) -> Vec<u8>;
}

/// Leitet eine Meldung der Engine in das Fehlerlog des Hosts
pub fn engine_log(message: &str) {
    tracing::error!(target: ENGINE_LOG_TARGET, "{}", message);
}

impl<E: ExternalEngine + ?Sized> ExternalEngine for Box<E> {
    fn init(&mut self, listen_address: &str) -> Result<()> {
        (**self).init(listen_address)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }

    fn pump(&mut self, sink: &mut dyn OutboundSink) {
        (**self).pump(sink)
    }

    fn deliver_inbound(&mut self, frame: VoiceFrame<'_>) -> Vec<u8> {
        (**self).deliver_inbound(frame)
    }
}
