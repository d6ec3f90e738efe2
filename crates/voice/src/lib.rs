//! voicebridge-voice – Sprach-Abfangpfad
//!
//! Sitzt zwischen dem Broadcast-Primitiv des Spielservers und einer externen
//! Sprach-Engine.
//!
//! ## Module
//! - [`slots`] – Slot-Tabelle als Live-Sicht auf die Clients des Hosts
//! - [`volume`] – Lautstaerke pro Slot aus einem geteilten Puffer
//! - [`hook`] – Abstraktion ueber den Abfang-Hook
//! - [`engine`] – Vertrag mit der externen Engine
//! - [`interceptor`] – Hot Path fuer eingehende Frames
//! - [`pipeline`] – besitzt den Zustand und garantiert den Original-Aufruf
//! - [`outbound`] – Engine-Frames an Spieler oder den virtuellen Client
//! - [`virtual_client`] – Bot fuer Server-Sprache
//! - [`relay`] – In-Process-Engine mit Abonnenten und Warteschlange

pub mod engine;
pub mod hook;
pub mod interceptor;
pub mod outbound;
pub mod pipeline;
pub mod relay;
pub mod slots;
pub mod virtual_client;
pub mod volume;

#[cfg(test)]
mod test_support;

pub use engine::{engine_log, ExternalEngine, OutboundSink, ENGINE_LOG_TARGET};
pub use hook::{BroadcastCall, HookHandle, InterceptionHook, BROADCAST_VOICE_TARGET};
pub use interceptor::{InterceptOutcome, PassThroughReason, VoiceInterceptor};
pub use outbound::{DropReason, OutboundOutcome};
pub use pipeline::{PipelineStats, VoicePipeline};
pub use relay::{InboundVoice, RelayEngine, RelayHandle, SUBSCRIBER_QUEUE};
pub use slots::{ClientHandle, ClientInfo, ClientSlotTable, HostClients};
pub use virtual_client::{VirtualClientManager, DEFAULT_VIRTUAL_CLIENT_NAME};
pub use volume::{VolumeBuffer, VolumeMap, DEFAULT_GAIN};
