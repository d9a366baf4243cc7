//! Service layer - the display operations
//!
//! Each module covers one feature area and is usable on its own; only the
//! entity formatter calls into masking.

pub mod dates;
pub mod entity;
pub mod masking;
pub mod processing;

pub use dates::{parse_date_time, reformat_date, DateFormatter};
pub use entity::{mask_account_card, EntityFormatter, ParseMode};
pub use masking::{
    mask_account_number, mask_card_number, mask_card_number_with, only_digits, CardMaskStyle,
};
pub use processing::{filter_by_state, sort_by_date, OperationService, RecordFields, DEFAULT_STATE};
