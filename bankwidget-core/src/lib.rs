//! Bankwidget Core - display helpers for bank cards, accounts and operations
//!
//! - **domain**: entity kinds, keyword vocabulary, record abstraction, errors
//! - **services**: masking, labeled entity formatting, dates, record processing
//! - **config**: settings.json loading with environment overrides
//!
//! Every operation is a pure function of its arguments. The free functions
//! (`mask_card_number`, `mask_account_card`, `reformat_date`,
//! `filter_by_state`, `sort_by_date`) use built-in defaults; [`WidgetContext`]
//! bundles the same operations configured from `settings.json`.

pub mod config;
pub mod domain;
pub mod services;

use std::path::Path;

use anyhow::Result;

use config::Config;
use services::{DateFormatter, EntityFormatter, OperationService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{EntityKind, Field, LabeledEntity, Operation, Record, Vocabulary};
pub use services::{
    filter_by_state, mask_account_card, mask_account_number, mask_card_number,
    mask_card_number_with, only_digits, parse_date_time, reformat_date, sort_by_date,
    CardMaskStyle, ParseMode, RecordFields, DEFAULT_STATE,
};

/// Configured entry point bundling every operation
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub config: Config,
    pub entity_formatter: EntityFormatter,
    pub date_formatter: DateFormatter,
    pub operation_service: OperationService,
}

impl WidgetContext {
    /// Create a context from the settings in `settings_dir`
    pub fn new(settings_dir: &Path) -> Result<Self> {
        let config = Config::load(settings_dir)?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let entity_formatter = config.entity_formatter();
        let date_formatter = config.date_formatter()?;
        let operation_service = config.operation_service();

        log::debug!(
            "widget context ready: card style {}, {} entity parsing",
            config.card_style,
            config.parse_mode
        );

        Ok(Self {
            config,
            entity_formatter,
            date_formatter,
            operation_service,
        })
    }
}

impl Default for WidgetContext {
    fn default() -> Self {
        Self {
            config: Config::default(),
            entity_formatter: EntityFormatter::default(),
            date_formatter: DateFormatter::default(),
            operation_service: OperationService::default(),
        }
    }
}
