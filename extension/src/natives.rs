//! Scripting-Natives, die die Extension beim Host registriert

use std::sync::Arc;

use voicebridge_voice::VolumeBuffer;

/// Bibliothek, unter der die Natives registriert werden
pub const NATIVE_LIBRARY: &str = "VoiceServer";

/// `ClientToVoiceVolumeMap(buffer, enable)`
pub const CLIENT_TO_VOICE_VOLUME_MAP: &str = "ClientToVoiceVolumeMap";

/// Alle Natives dieser Extension
pub const NATIVES: &[&str] = &[CLIENT_TO_VOICE_VOLUME_MAP];

/// Was ein Aufruf von `ClientToVoiceVolumeMap` bewirkt
#[derive(Debug, Clone)]
pub enum VolumeMapAufruf {
    Installieren(Arc<VolumeBuffer>),
    Entfernen,
}

impl VolumeMapAufruf {
    /// Deutet die Argumente des Skripts. `enable` ohne Puffer entfernt die
    /// Zuordnung ebenso wie `enable = false`.
    pub fn aus_argumenten(buffer: Option<Arc<VolumeBuffer>>, enable: bool) -> Self {
        match (enable, buffer) {
            (true, Some(buffer)) => Self::Installieren(buffer),
            (true, None) => {
                tracing::warn!("{} ohne Puffer aufgerufen", CLIENT_TO_VOICE_VOLUME_MAP);
                Self::Entfernen
            }
            (false, _) => Self::Entfernen,
        }
    }
}
