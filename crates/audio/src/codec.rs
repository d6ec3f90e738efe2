//! Opus Encoder/Decoder Wrapper
//!
//! Kapselt audiopus hinter dem `VoiceCodec`-Trait. Ein `VoiceCodec` ist ein
//! Encoder/Decoder-Paar fuer genau einen Client-Slot und arbeitet immer auf
//! einzelnen Frames mit fester Groesse.

use audiopus::{
    coder::{Decoder, Encoder},
    Application, Bitrate, Channels, SampleRate,
};
use tracing::debug;

use crate::config::{CodecConfig, SampleRate as ConfigSampleRate};
use crate::error::{AudioError, AudioResult};

/// Opaker Transcoder fuer einen Slot
///
/// Die Bruecke kennt nur diesen Trait; der konkrete Codec ist austauschbar.
pub trait VoiceCodec {
    /// PCM-Samples pro Frame
    fn frame_samples(&self) -> usize;

    /// Komprimierte Bytes pro Frame
    fn frame_bytes(&self) -> usize;

    /// Dekodiert genau einen komprimierten Frame nach `output`.
    ///
    /// `output` ist mindestens `frame_samples()` lang. Gibt die Anzahl der
    /// geschriebenen Samples zurueck.
    fn decode_frame(&mut self, data: &[u8], output: &mut [i16]) -> AudioResult<usize>;

    /// Kodiert genau `frame_samples()` Samples nach `output`.
    ///
    /// `output` ist exakt `frame_bytes()` lang. Gibt die Anzahl der
    /// geschriebenen Bytes zurueck.
    fn encode_frame(&mut self, pcm: &[i16], output: &mut [u8]) -> AudioResult<usize>;
}

/// Opus-Codec mit konstanter Bitrate (mono)
pub struct OpusVoiceCodec {
    encoder: Encoder,
    decoder: Decoder,
    decode_buf: Vec<i16>,
    frame_samples: usize,
    frame_bytes: usize,
}

impl OpusVoiceCodec {
    /// Erstellt ein Encoder/Decoder-Paar mit der gegebenen Qualitaetsstufe
    pub fn new(config: &CodecConfig) -> AudioResult<Self> {
        config.validieren()?;

        let sample_rate = config_rate_to_audiopus(config.sample_rate);

        let mut encoder = Encoder::new(sample_rate, Channels::Mono, Application::Voip)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        encoder
            .set_bitrate(Bitrate::BitsPerSecond(config.bitrate_bps as i32))
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        // CBR: jeder Frame belegt exakt frame_bytes()
        encoder
            .set_vbr(false)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        encoder
            .set_complexity(config.complexity)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        let decoder = Decoder::new(sample_rate, Channels::Mono)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        let frame_samples = config.frame_samples();
        let frame_bytes = config.frame_bytes();

        debug!(
            "OpusVoiceCodec erstellt: {} bps, {:?}, frame_samples={}, frame_bytes={}",
            config.bitrate_bps, config.sample_rate, frame_samples, frame_bytes
        );

        Ok(Self {
            encoder,
            decoder,
            decode_buf: vec![0; frame_samples],
            frame_samples,
            frame_bytes,
        })
    }
}

impl VoiceCodec for OpusVoiceCodec {
    fn frame_samples(&self) -> usize {
        self.frame_samples
    }

    fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }

    fn decode_frame(&mut self, data: &[u8], output: &mut [i16]) -> AudioResult<usize> {
        let decoded = self
            .decoder
            .decode(Some(data), &mut self.decode_buf, false)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        let n = decoded.min(output.len());
        output[..n].copy_from_slice(&self.decode_buf[..n]);
        Ok(n)
    }

    fn encode_frame(&mut self, pcm: &[i16], output: &mut [u8]) -> AudioResult<usize> {
        if pcm.len() != self.frame_samples {
            return Err(AudioError::FrameGroesse {
                erwartet: self.frame_samples,
                erhalten: pcm.len(),
            });
        }

        self.encoder
            .encode(pcm, output)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Konvertierungs-Hilfsfunktionen
// ---------------------------------------------------------------------------

fn config_rate_to_audiopus(rate: ConfigSampleRate) -> SampleRate {
    match rate {
        ConfigSampleRate::Hz8000 => SampleRate::Hz8000,
        ConfigSampleRate::Hz12000 => SampleRate::Hz12000,
        ConfigSampleRate::Hz16000 => SampleRate::Hz16000,
        ConfigSampleRate::Hz24000 => SampleRate::Hz24000,
        ConfigSampleRate::Hz48000 => SampleRate::Hz48000,
    }
}
