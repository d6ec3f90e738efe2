//! Prometheus-kompatible Metriken fuer voicebridge
//!
//! Registrierte Metriken:
//! - `voicebridge_frames_total` – Counter: Abgefangene Frames (ergebnis)
//! - `voicebridge_outbound_total` – Counter: Engine-Frames (ergebnis)
//! - `voicebridge_codec_slots` – Gauge: Lebende Slot-Codecs
//! - `voicebridge_inbound_seconds` – Histogram: Dauer eines abgefangenen Broadcasts
//!
//! Jede Instanz hat ihre eigene Registry; der Host stellt sie nach Bedarf
//! ueber `als_text()` bereit.

use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Alle voicebridge-Prometheus-Metriken
#[derive(Clone)]
pub struct BridgeMetrics {
    pub registry: Arc<Registry>,

    pub frames_total: IntCounterVec,
    pub outbound_total: IntCounterVec,
    pub codec_slots: IntGauge,
    pub inbound_seconds: Histogram,
}

impl BridgeMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let frames_total = IntCounterVec::new(
            Opts::new(
                "voicebridge_frames_total",
                "Abgefangene Sprach-Frames nach Ergebnis",
            ),
            &["ergebnis"],
        )?;
        registry.register(Box::new(frames_total.clone()))?;

        let outbound_total = IntCounterVec::new(
            Opts::new(
                "voicebridge_outbound_total",
                "Von der Engine gesendete Frames nach Ergebnis",
            ),
            &["ergebnis"],
        )?;
        registry.register(Box::new(outbound_total.clone()))?;

        let codec_slots = IntGauge::with_opts(Opts::new(
            "voicebridge_codec_slots",
            "Anzahl lebender Slot-Codecs",
        ))?;
        registry.register(Box::new(codec_slots.clone()))?;

        let inbound_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "voicebridge_inbound_seconds",
                "Dauer eines abgefangenen Broadcasts in Sekunden",
            )
            .buckets(vec![
                0.000_05, 0.000_1, 0.000_25, 0.000_5, 0.001, 0.002_5, 0.005, 0.01,
            ]),
        )?;
        registry.register(Box::new(inbound_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            frames_total,
            outbound_total,
            codec_slots,
            inbound_seconds,
        })
    }

    /// Zaehlt einen abgefangenen Frame
    pub fn frame_zaehlen(&self, ergebnis: &str) {
        self.frames_total.with_label_values(&[ergebnis]).inc();
    }

    /// Zaehlt Engine-Frames seit dem letzten Tick
    pub fn outbound_zaehlen(&self, ergebnis: &str, anzahl: u64) {
        if anzahl > 0 {
            self.outbound_total
                .with_label_values(&[ergebnis])
                .inc_by(anzahl);
        }
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn als_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
