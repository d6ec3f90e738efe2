//! Extension-Konfiguration
//!
//! Wird beim Laden aus einer TOML-Datei gelesen. Alle Felder haben
//! Standardwerte; nur die Listen-Adresse ist im Transcode-Modus Pflicht.

use serde::{Deserialize, Serialize};
use voicebridge_audio::CodecConfig;
use voicebridge_core::{BridgeError, PayloadMode};
use voicebridge_observability::{log_format_gueltig, log_level_gueltig};
use voicebridge_voice::DEFAULT_VIRTUAL_CLIENT_NAME;

/// Name des Konfigurationsschluessels fuer die Listen-Adresse im Host
pub const LISTEN_ADDRESS_KEY: &str = "VoiceServerListenAddress";

/// Umgebungsvariable mit dem Pfad der Konfigurationsdatei
pub const CONFIG_PFAD_ENV: &str = "VB_CONFIG";

/// Umgebungsvariable, die `bridge.listen_address` ueberschreibt
pub const LISTEN_ADDRESS_ENV: &str = "VB_LISTEN_ADDRESS";

/// Standardpfad wenn `VB_CONFIG` nicht gesetzt ist
pub const STANDARD_CONFIG_PFAD: &str = "voicebridge.toml";

/// Vollstaendige Extension-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Bruecken-Einstellungen
    pub bridge: BridgeEinstellungen,
    /// Qualitaet der Slot-Codecs (nur im Transcode-Modus verwendet)
    pub codec: CodecConfig,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Bruecken-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeEinstellungen {
    /// "passthrough" oder "transcode"
    pub mode: PayloadMode,
    /// Adresse fuer die externe Engine
    pub listen_address: Option<String>,
    /// Name des Bots fuer Server-Sprache
    pub virtual_client_name: String,
}

impl Default for BridgeEinstellungen {
    fn default() -> Self {
        Self {
            mode: PayloadMode::Passthrough,
            listen_address: None,
            virtual_client_name: DEFAULT_VIRTUAL_CLIENT_NAME.into(),
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ExtensionConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => Self::aus_toml(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Parst eine Konfiguration aus einem TOML-String
    pub fn aus_toml(inhalt: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(inhalt)?)
    }

    /// Laedt von `VB_CONFIG` (oder `voicebridge.toml`) und wendet
    /// `VB_LISTEN_ADDRESS` an
    pub fn aus_umgebung() -> anyhow::Result<Self> {
        let pfad =
            std::env::var(CONFIG_PFAD_ENV).unwrap_or_else(|_| STANDARD_CONFIG_PFAD.to_string());
        let mut config = Self::laden(&pfad)?;
        if let Ok(adresse) = std::env::var(LISTEN_ADDRESS_ENV) {
            config.bridge.listen_address = Some(adresse);
        }
        Ok(config)
    }

    /// Listen-Adresse fuer `ExternalEngine::init`.
    ///
    /// Im Transcode-Modus ist sie Pflicht, im Passthrough-Modus ist die
    /// leere Zeichenkette der Standard.
    pub fn listen_address(&self) -> Result<String, BridgeError> {
        match (&self.bridge.listen_address, self.bridge.mode) {
            (Some(adresse), _) => Ok(adresse.clone()),
            (None, PayloadMode::Transcode) => Err(BridgeError::FehlenderWert(LISTEN_ADDRESS_KEY)),
            (None, PayloadMode::Passthrough) => Ok(String::new()),
        }
    }

    /// Prueft die Werte, die erst beim Laden relevant werden
    pub fn validieren(&self) -> Result<(), BridgeError> {
        if !log_level_gueltig(&self.logging.level) {
            return Err(BridgeError::Konfiguration(format!(
                "Ungueltiges Log-Level: {}",
                self.logging.level
            )));
        }
        if !log_format_gueltig(&self.logging.format) {
            return Err(BridgeError::Konfiguration(format!(
                "Ungueltiges Log-Format: {}",
                self.logging.format
            )));
        }
        if self.bridge.virtual_client_name.trim().is_empty() {
            return Err(BridgeError::Konfiguration(
                "bridge.virtual_client_name darf nicht leer sein".into(),
            ));
        }
        if self.bridge.mode == PayloadMode::Transcode {
            self.codec
                .validieren()
                .map_err(|e| BridgeError::Konfiguration(e.to_string()))?;
        }
        Ok(())
    }
}
