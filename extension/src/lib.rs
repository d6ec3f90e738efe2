//! voicebridge-extension – Einstiegspunkt fuer den Host
//!
//! Verbindet Konfiguration, Pipeline, externe Engine und Metriken zu dem
//! Lebenszyklus, den der Spielserver sieht: laden, pro Tick pumpen,
//! abgefangene Broadcasts, entladen.
//!
//! Reihenfolge beim Laden:
//! 1. Logging und Panik-Hook
//! 2. Listen-Adresse aufloesen (fehlt sie im Transcode-Modus, wird nichts allokiert)
//! 3. Slot-Codecs (nur Transcode)
//! 4. Externe Engine initialisieren
//! 5. Broadcast-Hook installieren
//!
//! Scheitert die Engine-Initialisierung, wird sie trotzdem beendet.
//!
//! Beim Entladen: Hook deaktivieren → Codecs freigeben → Engine beenden.

pub mod config;
pub mod natives;

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};
use voicebridge_audio::CodecBridge;
use voicebridge_core::{BridgeError, PayloadMode, Result};
use voicebridge_observability::{logging_initialisieren, panic_hook_installieren, BridgeMetrics};
use voicebridge_voice::{
    ClientHandle, ExternalEngine, HostClients, InterceptOutcome, InterceptionHook,
    OutboundOutcome, PipelineStats, VoicePipeline, VolumeBuffer,
};

pub use config::ExtensionConfig;
pub use natives::VolumeMapAufruf;
pub use voicebridge_voice::engine_log;

// ---------------------------------------------------------------------------
// VoiceExtension
// ---------------------------------------------------------------------------

/// Die geladene Extension
pub struct VoiceExtension<H, K, E>
where
    H: HostClients,
    K: InterceptionHook,
    E: ExternalEngine,
{
    pipeline: VoicePipeline<H, K>,
    engine: E,
    metrics: BridgeMetrics,
    /// Stand der Pipeline-Zaehler beim letzten Metrik-Abgleich
    gemeldet: PipelineStats,
    aktiv: bool,
}

impl<H, K, E> VoiceExtension<H, K, E>
where
    H: HostClients,
    K: InterceptionHook,
    E: ExternalEngine,
{
    /// Laedt die Extension. Jeder Fehler bricht das Laden ab; die Meldung
    /// ist fuer den Betreiber bestimmt.
    pub fn laden(config: &ExtensionConfig, host: H, hook: K, engine: E) -> Result<Self> {
        Self::laden_intern(config, host, hook, engine).map_err(|e| {
            error!("voicebridge konnte nicht geladen werden: {}", e);
            e
        })
    }

    fn laden_intern(config: &ExtensionConfig, host: H, hook: K, mut engine: E) -> Result<Self> {
        logging_initialisieren(&config.logging.level, &config.logging.format);
        panic_hook_installieren();

        let listen_address = config.listen_address()?;
        config.validieren()?;

        let codecs = match config.bridge.mode {
            PayloadMode::Transcode => Some(
                CodecBridge::new(&config.codec).map_err(|e| BridgeError::Codec(e.to_string()))?,
            ),
            PayloadMode::Passthrough => None,
        };

        let metrics = BridgeMetrics::neu().map_err(|e| BridgeError::intern(e.to_string()))?;

        if let Err(e) = engine.init(&listen_address) {
            engine.shutdown();
            return Err(e);
        }

        let mut pipeline =
            VoicePipeline::neu(host, hook, codecs, &config.bridge.virtual_client_name);
        if let Err(e) = pipeline.hook_installieren() {
            pipeline.codecs_freigeben();
            engine.shutdown();
            return Err(e);
        }

        let codec_slots = pipeline.codecs().map_or(0, |c| c.len());
        metrics.codec_slots.set(codec_slots as i64);

        info!(
            modus = ?config.bridge.mode,
            adresse = %listen_address,
            codec_slots,
            "voicebridge geladen"
        );

        Ok(Self {
            pipeline,
            engine,
            metrics,
            gemeldet: PipelineStats::default(),
            aktiv: true,
        })
    }

    /// Entlaedt die Extension; ein zweiter Aufruf tut nichts
    pub fn entladen(&mut self) {
        if !self.aktiv {
            return;
        }
        self.aktiv = false;

        self.pipeline.hook_deaktivieren();
        self.pipeline.codecs_freigeben();
        self.metrics.codec_slots.set(0);
        self.engine.shutdown();

        info!("voicebridge entladen");
    }

    /// Einmal pro Server-Tick
    pub fn on_game_frame(&mut self) {
        if !self.aktiv {
            return;
        }
        let Self {
            pipeline, engine, ..
        } = self;
        engine.pump(pipeline);
        self.metriken_abgleichen();
    }

    /// Abgefangener Broadcast des Hosts
    pub fn broadcast_voice(
        &mut self,
        client: ClientHandle,
        raw_slot: i32,
        payload: &[u8],
        flag: bool,
    ) -> InterceptOutcome {
        let start = Instant::now();
        let outcome =
            self.pipeline
                .broadcast_voice(&mut self.engine, client, raw_slot, payload, flag);
        self.metrics
            .inbound_seconds
            .observe(start.elapsed().as_secs_f64());
        self.metrics.frame_zaehlen(outcome.label());
        outcome
    }

    /// Direkte Zustellung an einen Slot (`-1` = virtueller Client)
    pub fn send_client_voice(&mut self, selector: i32, payload: &[u8]) -> OutboundOutcome {
        let outcome = self.pipeline.send_client_voice(selector, payload);
        self.metriken_abgleichen();
        outcome
    }

    /// Native `ClientToVoiceVolumeMap(buffer, enable)`
    pub fn client_to_voice_volume_map(&mut self, buffer: Option<Arc<VolumeBuffer>>, enable: bool) {
        match VolumeMapAufruf::aus_argumenten(buffer, enable) {
            VolumeMapAufruf::Installieren(buffer) => self.pipeline.volume_mut().install(buffer),
            VolumeMapAufruf::Entfernen => self.pipeline.volume_mut().clear(),
        }
    }

    fn metriken_abgleichen(&mut self) {
        let stats = self.pipeline.stats();
        self.metrics.outbound_zaehlen(
            "gesendet",
            stats.outbound_gesendet - self.gemeldet.outbound_gesendet,
        );
        self.metrics.outbound_zaehlen(
            "verworfen",
            stats.outbound_verworfen - self.gemeldet.outbound_verworfen,
        );
        self.metrics.outbound_zaehlen(
            "gepuffert",
            stats.outbound_gepuffert - self.gemeldet.outbound_gepuffert,
        );
        self.gemeldet = stats;
    }

    // -----------------------------------------------------------------------
    // Zugriff
    // -----------------------------------------------------------------------

    pub fn ist_aktiv(&self) -> bool {
        self.aktiv
    }

    pub fn mode(&self) -> PayloadMode {
        self.pipeline.mode()
    }

    pub fn pipeline(&self) -> &VoicePipeline<H, K> {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut VoicePipeline<H, K> {
        &mut self.pipeline
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }
}

impl<H, K, E> Drop for VoiceExtension<H, K, E>
where
    H: HostClients,
    K: InterceptionHook,
    E: ExternalEngine,
{
    fn drop(&mut self) {
        self.entladen();
    }
}
