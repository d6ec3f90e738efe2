//! PCM-Hilfsfunktionen
//!
//! Das Wire-Format fuer dekodierte Sprache ist ein Strom aus signed 16-Bit
//! Samples in little-endian. Die Frame-Laenge ergibt sich aus Bytes / 2.

/// Serialisiert Samples als little-endian Bytes
pub fn samples_to_le_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    bytes
}

/// Liest little-endian Bytes als Samples. Ein ueberzaehliges Byte am Ende
/// wird verworfen.
pub fn le_bytes_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}

/// Skaliert Samples mit `gain`; Werte ausserhalb von i16 werden gesaettigt
pub fn apply_gain(samples: &mut [i16], gain: f32) {
    for s in samples.iter_mut() {
        *s = (*s as f64 * gain as f64) as i16;
    }
}
