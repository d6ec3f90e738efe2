//! voicebridge-audio – Codec-Bruecke
//!
//! Transcodiert Sprach-Frames zwischen dem Wire-Codec und linearem PCM:
//! - Opus Encoding/Decoding (CBR, mono) hinter dem `VoiceCodec`-Trait
//! - 64 persistente Codecs, einer pro Client-Slot
//! - PCM-Hilfen fuer das little-endian Wire-Format und Lautstaerke

pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod pcm;

// Bequeme Re-Exporte der wichtigsten Typen
pub use bridge::{CodecBridge, DECODE_SCRATCH_SAMPLES};
pub use codec::{OpusVoiceCodec, VoiceCodec};
pub use config::{CodecConfig, FrameSizeMs, SampleRate};
pub use error::{AudioError, AudioResult};
pub use pcm::{apply_gain, le_bytes_to_samples, samples_to_le_bytes};
