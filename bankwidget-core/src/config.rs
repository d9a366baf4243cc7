//! Configuration management
//!
//! Settings live in `settings.json` inside a caller-chosen directory:
//! ```json
//! {
//!   "masking": { "cardStyle": "grouped" },
//!   "classifier": { "mode": "tolerant", "keywords": { "card": [...], "account": [...] } },
//!   "dates": { "displayFormat": "%d.%m.%Y" },
//!   "records": { "statusField": "state", "dateField": "date", "defaultStatus": "EXECUTED" }
//! }
//! ```
//! Every key is optional. Keys this crate doesn't manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::Vocabulary;
use crate::services::dates::{DateFormatter, DISPLAY_FORMAT};
use crate::services::entity::{EntityFormatter, ParseMode};
use crate::services::masking::CardMaskStyle;
use crate::services::processing::{OperationService, RecordFields};

const SETTINGS_FILE: &str = "settings.json";

/// Env var overriding `masking.cardStyle`
pub const CARD_STYLE_ENV: &str = "BANKWIDGET_CARD_MASK_STYLE";

/// Env var overriding `classifier.mode`
pub const ENTITY_MODE_ENV: &str = "BANKWIDGET_ENTITY_MODE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    masking: MaskingSettings,
    #[serde(default)]
    classifier: ClassifierSettings,
    #[serde(default)]
    dates: DateSettings,
    #[serde(default)]
    records: RecordFields,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaskingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    card_style: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifierSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keywords: Option<Vocabulary>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_format: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Bankwidget configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub card_style: CardMaskStyle,
    pub parse_mode: ParseMode,
    /// Explicit keywords; `None` uses the parse mode's own set
    pub vocabulary: Option<Vocabulary>,
    pub date_display_format: String,
    pub record_fields: RecordFields,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            card_style: CardMaskStyle::default(),
            parse_mode: ParseMode::default(),
            vocabulary: None,
            date_display_format: DISPLAY_FORMAT.to_string(),
            record_fields: RecordFields::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from a settings directory
    ///
    /// Card style and parse mode can also be set via the
    /// `BANKWIDGET_CARD_MASK_STYLE` and `BANKWIDGET_ENTITY_MODE` environment
    /// variables, which win over the file.
    pub fn load(settings_dir: &Path) -> Result<Self> {
        Self::load_with_env(settings_dir, |name| std::env::var(name).ok())
    }

    /// Load config using `env` to look up environment overrides
    pub fn load_with_env<F>(settings_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings_path = settings_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable {}: {}", settings_path.display(), e);
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let card_style: CardMaskStyle = match env_override(&env, CARD_STYLE_ENV) {
            Some(style) => style,
            None => parse_setting(raw.masking.card_style.as_deref())?,
        };

        let parse_mode: ParseMode = match env_override(&env, ENTITY_MODE_ENV) {
            Some(mode) => mode,
            None => parse_setting(raw.classifier.mode.as_deref())?,
        };

        let vocabulary = raw
            .classifier
            .keywords
            .clone()
            .map(Vocabulary::normalized);

        let date_display_format = raw
            .dates
            .display_format
            .clone()
            .unwrap_or_else(|| DISPLAY_FORMAT.to_string());
        // Fail on load rather than on first use
        DateFormatter::new(date_display_format.as_str())?;

        Ok(Self {
            card_style,
            parse_mode,
            vocabulary,
            date_display_format,
            record_fields: raw.records.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to a settings directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, settings_dir: &Path) -> Result<()> {
        let settings_path = settings_dir.join(SETTINGS_FILE);

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        // Update only the fields we manage
        settings.masking.card_style = Some(self.card_style.as_str().to_string());
        settings.classifier.mode = Some(self.parse_mode.as_str().to_string());
        settings.classifier.keywords = self.vocabulary.clone();
        settings.dates.display_format = Some(self.date_display_format.clone());
        settings.records = self.record_fields.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    pub fn entity_formatter(&self) -> EntityFormatter {
        match &self.vocabulary {
            Some(vocabulary) => {
                EntityFormatter::new(vocabulary.clone(), self.parse_mode, self.card_style)
            }
            None => EntityFormatter::for_mode(self.parse_mode, self.card_style),
        }
    }

    pub fn date_formatter(&self) -> Result<DateFormatter> {
        Ok(DateFormatter::new(self.date_display_format.as_str())?)
    }

    pub fn operation_service(&self) -> OperationService {
        OperationService::new(self.record_fields.clone())
    }
}

/// Parse an optional settings value, falling back to the type's default
fn parse_setting<T>(value: Option<&str>) -> Result<T>
where
    T: FromStr<Err = crate::domain::result::Error> + Default,
{
    match value {
        Some(v) => Ok(v.parse()?),
        None => Ok(T::default()),
    }
}

/// Unknown env values are ignored so a stray variable can't break loading
fn env_override<T, F>(env: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = env(name)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring unsupported {}={:?}", name, value);
            None
        }
    }
}
