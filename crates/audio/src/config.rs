//! Codec-Konfiguration fuer die Wire-Frames
//!
//! Der Wire-Codec arbeitet mit fester Bitrate (CBR), damit jeder komprimierte
//! Frame exakt gleich viele Bytes belegt. Nur so laesst sich eine Payload mit
//! mehreren aneinandergehaengten Frames ohne Laengenpraefix wieder zerlegen.

use serde::{Deserialize, Serialize};

use crate::error::{AudioError, AudioResult};

/// Obergrenze fuer einen einzelnen Opus-Frame laut RFC 6716
pub const MAX_FRAME_BYTES: usize = 1275;

/// Abtastrate fuer Opus
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRate {
    /// 8 kHz – Schmalband
    Hz8000 = 8000,
    /// 12 kHz – Mittelband
    Hz12000 = 12000,
    /// 16 kHz – Breitband
    Hz16000 = 16000,
    /// 24 kHz – Superbreitband (Standard fuer Spielsprache)
    #[default]
    Hz24000 = 24000,
    /// 48 kHz – Vollband
    Hz48000 = 48000,
}

/// Frame-Groesse in Zehntelmillisekunden
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSizeMs {
    Ms2_5 = 25,
    Ms5 = 50,
    Ms10 = 100,
    /// 20 ms – Standard
    #[default]
    Ms20 = 200,
    Ms40 = 400,
    Ms60 = 600,
}

impl FrameSizeMs {
    /// Berechnet die Anzahl der Samples pro Frame bei gegebener Abtastrate
    pub fn samples_per_frame(&self, sample_rate: SampleRate) -> u32 {
        // ms_x10 / 10 * rate / 1000 = ms_x10 * rate / 10000
        (*self as u32) * (sample_rate as u32) / 10000
    }
}

/// Feste Qualitaetsstufe aller 64 Slot-Codecs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Abtastrate (mono)
    pub sample_rate: SampleRate,
    /// Frame-Groesse
    pub frame_size: FrameSizeMs,
    /// Konstante Bitrate in Bit/s
    pub bitrate_bps: u32,
    /// Komplexitaet (0–10)
    pub complexity: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        // 25.6 kbit/s bei 20 ms ergibt 64 Byte pro Frame
        Self {
            sample_rate: SampleRate::Hz24000,
            frame_size: FrameSizeMs::Ms20,
            bitrate_bps: 25_600,
            complexity: 8,
        }
    }
}

impl CodecConfig {
    /// Validiert die Konfiguration
    pub fn validieren(&self) -> AudioResult<()> {
        if !(6_000..=510_000).contains(&self.bitrate_bps) {
            return Err(AudioError::Konfiguration(format!(
                "Bitrate muss zwischen 6 und 510 kbps liegen (war: {} bps)",
                self.bitrate_bps
            )));
        }
        if self.complexity > 10 {
            return Err(AudioError::Konfiguration(format!(
                "Komplexitaet muss zwischen 0 und 10 liegen (war: {})",
                self.complexity
            )));
        }
        let bits_x10 = self.bitrate_bps as u64 * self.frame_size as u64;
        if bits_x10 % 80_000 != 0 {
            return Err(AudioError::Konfiguration(format!(
                "Bitrate {} bps ergibt bei {:?} keine ganze Byte-Anzahl pro Frame",
                self.bitrate_bps, self.frame_size
            )));
        }
        if self.frame_bytes() > MAX_FRAME_BYTES {
            return Err(AudioError::Konfiguration(format!(
                "Frame waere {} Bytes gross (max. {})",
                self.frame_bytes(),
                MAX_FRAME_BYTES
            )));
        }
        Ok(())
    }

    /// PCM-Samples pro Frame
    pub fn frame_samples(&self) -> usize {
        self.frame_size.samples_per_frame(self.sample_rate) as usize
    }

    /// Komprimierte Bytes pro Frame
    pub fn frame_bytes(&self) -> usize {
        (self.bitrate_bps as u64 * self.frame_size as u64 / 80_000) as usize
    }
}
