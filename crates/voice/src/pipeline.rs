//! Sprach-Pipeline – besitzt alles, was zwischen Host und Engine liegt
//!
//! Die Pipeline haelt Slot-Tabelle, Hook, Codecs, Lautstaerke und den
//! virtuellen Client. Die Engine gehoert ihr nicht: sie wird pro Aufruf
//! hineingereicht, damit `pump()` die Pipeline als `OutboundSink` benutzen
//! kann, ohne dass sich die beiden gegenseitig besitzen.

use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info};
use voicebridge_audio::CodecBridge;
use voicebridge_core::{PayloadMode, Result};

use crate::engine::ExternalEngine;
use crate::hook::{BroadcastCall, HookHandle, InterceptionHook, BROADCAST_VOICE_TARGET};
use crate::interceptor::{InterceptOutcome, PassThroughReason, VoiceInterceptor};
use crate::slots::{ClientHandle, ClientSlotTable, HostClients};
use crate::virtual_client::VirtualClientManager;
use crate::volume::VolumeMap;

// ---------------------------------------------------------------------------
// Statistik
// ---------------------------------------------------------------------------

/// Zaehler seit dem Laden
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Abgefangene Frames insgesamt
    pub frames: u64,
    /// Davon unveraendert durchgereicht
    pub pass_through: u64,
    /// Davon wegen Panik durchgereicht
    pub panics: u64,
    /// Erfolgreich zugestellte Engine-Frames
    pub outbound_gesendet: u64,
    /// Verworfene Engine-Frames
    pub outbound_verworfen: u64,
    /// Engine-Frames, die auf einen ganzen Codec-Frame warten
    pub outbound_gepuffert: u64,
}

// ---------------------------------------------------------------------------
// VoicePipeline
// ---------------------------------------------------------------------------

pub struct VoicePipeline<H, K> {
    pub(crate) slots: ClientSlotTable<H>,
    pub(crate) hook: K,
    pub(crate) hook_handle: Option<HookHandle>,
    pub(crate) codecs: Option<CodecBridge>,
    volume: VolumeMap,
    pub(crate) virtual_client: VirtualClientManager,
    pub(crate) stats: PipelineStats,
}

impl<H, K> VoicePipeline<H, K>
where
    H: HostClients,
    K: InterceptionHook,
{
    /// Erstellt die Pipeline. Mit `codecs = Some(..)` laeuft sie im
    /// Transcode-Modus, sonst im Passthrough-Modus.
    pub fn neu(host: H, hook: K, codecs: Option<CodecBridge>, virtual_client_name: &str) -> Self {
        Self {
            slots: ClientSlotTable::neu(host),
            hook,
            hook_handle: None,
            codecs,
            volume: VolumeMap::default(),
            virtual_client: VirtualClientManager::neu(virtual_client_name),
            stats: PipelineStats::default(),
        }
    }

    pub fn mode(&self) -> PayloadMode {
        if self.codecs.is_some() {
            PayloadMode::Transcode
        } else {
            PayloadMode::Passthrough
        }
    }

    // -----------------------------------------------------------------------
    // Lebenszyklus
    // -----------------------------------------------------------------------

    /// Installiert den Hook auf das Broadcast-Primitiv
    pub fn hook_installieren(&mut self) -> Result<()> {
        if self.hook_handle.is_some() {
            return Ok(());
        }
        let handle = self.hook.install(BROADCAST_VOICE_TARGET)?;
        info!(target_fn = BROADCAST_VOICE_TARGET, "Broadcast-Hook installiert");
        self.hook_handle = Some(handle);
        Ok(())
    }

    pub fn hook_aktiv(&self) -> bool {
        self.hook_handle.is_some()
    }

    /// Deaktiviert den Hook; mehrfacher Aufruf ist harmlos
    pub fn hook_deaktivieren(&mut self) {
        if let Some(handle) = self.hook_handle.take() {
            self.hook.uninstall(handle);
            info!("Broadcast-Hook deaktiviert");
        }
    }

    /// Gibt alle Slot-Codecs frei
    pub fn codecs_freigeben(&mut self) {
        if let Some(codecs) = self.codecs.take() {
            drop(codecs);
            info!("Codecs freigegeben");
        }
    }

    // -----------------------------------------------------------------------
    // Hot Path
    // -----------------------------------------------------------------------

    /// Abgefangener Broadcast-Aufruf.
    ///
    /// Ruft das Original genau einmal auf, mit der Payload, die der
    /// Interceptor bestimmt hat, oder unveraendert bei jedem Pass-Through.
    pub fn broadcast_voice<E>(
        &mut self,
        engine: &mut E,
        client: ClientHandle,
        raw_slot: i32,
        payload: &[u8],
        flag: bool,
    ) -> InterceptOutcome
    where
        E: ExternalEngine + ?Sized,
    {
        let Some(handle) = self.hook_handle else {
            return InterceptOutcome::PassThrough(PassThroughReason::HookInaktiv);
        };

        let mut frame = payload.to_vec();
        let ergebnis = {
            let Self {
                slots,
                codecs,
                volume,
                ..
            } = self;
            let mut interceptor = VoiceInterceptor {
                slots: &*slots,
                volume: &*volume,
                codecs: codecs.as_mut(),
                engine,
            };
            panic::catch_unwind(AssertUnwindSafe(|| {
                interceptor.intercept(raw_slot, &mut frame)
            }))
        };

        let outcome = ergebnis.unwrap_or_else(|_| {
            error!(slot = raw_slot, "Panik im Sprachpfad, Frame wird unveraendert gesendet");
            InterceptOutcome::PassThrough(PassThroughReason::Panik)
        });

        let gesendet: &[u8] = if outcome.ist_pass_through() {
            payload
        } else {
            &frame
        };
        self.hook.call_original(
            handle,
            BroadcastCall {
                client,
                payload: gesendet,
                flag,
            },
        );

        self.stats.frames += 1;
        if let InterceptOutcome::PassThrough(grund) = outcome {
            self.stats.pass_through += 1;
            if grund == PassThroughReason::Panik {
                self.stats.panics += 1;
            }
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Zugriff
    // -----------------------------------------------------------------------

    pub fn slots(&self) -> &ClientSlotTable<H> {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut ClientSlotTable<H> {
        &mut self.slots
    }

    pub fn volume(&self) -> &VolumeMap {
        &self.volume
    }

    pub fn volume_mut(&mut self) -> &mut VolumeMap {
        &mut self.volume
    }

    pub fn virtual_client(&self) -> &VirtualClientManager {
        &self.virtual_client
    }

    pub fn hook(&self) -> &K {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut K {
        &mut self.hook
    }

    pub fn codecs(&self) -> Option<&CodecBridge> {
        self.codecs.as_ref()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
