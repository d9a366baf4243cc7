//! Labeled entity formatting
//!
//! Turns strings like `"Visa Platinum 7000792289606361"` into
//! `"Visa Platinum 7000 79** **** 6361"` by classifying the label as a card
//! or account and masking the trailing number.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{EntityKind, LabeledEntity, Vocabulary};
use crate::services::masking::{
    mask_account_number, mask_card_number_with, only_digits, CardMaskStyle, ACCOUNT_MIN_LENGTH,
    CARD_LENGTH,
};

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

// Whitespace is already collapsed to single spaces when this runs
static NUMERIC_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d ]*$").expect("valid numeric tail regex"));

/// How the label and number are split apart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Normalize whitespace, take the trailing digit run, fall back to digit counts
    #[default]
    Tolerant,
    /// Split on the last space; the label must contain a known keyword
    Strict,
}

impl ParseMode {
    /// Keywords used when none are configured explicitly
    pub fn default_vocabulary(&self) -> Vocabulary {
        match self {
            ParseMode::Tolerant => Vocabulary::default(),
            ParseMode::Strict => Vocabulary::strict(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Tolerant => "tolerant",
            ParseMode::Strict => "strict",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tolerant" => Ok(ParseMode::Tolerant),
            "strict" => Ok(ParseMode::Strict),
            other => Err(Error::config(format!("unknown entity parse mode '{}'", other))),
        }
    }
}

/// Classifies and masks labeled card/account strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFormatter {
    vocabulary: Vocabulary,
    mode: ParseMode,
    card_style: CardMaskStyle,
}

impl EntityFormatter {
    pub fn new(vocabulary: Vocabulary, mode: ParseMode, card_style: CardMaskStyle) -> Self {
        Self {
            vocabulary,
            mode,
            card_style,
        }
    }

    /// Formatter for `mode` using that mode's own keyword set
    pub fn for_mode(mode: ParseMode, card_style: CardMaskStyle) -> Self {
        Self::new(mode.default_vocabulary(), mode, card_style)
    }

    /// Last-space splitting with the fixed strict keyword set
    pub fn strict() -> Self {
        Self::for_mode(ParseMode::Strict, CardMaskStyle::default())
    }

    pub fn with_card_style(mut self, card_style: CardMaskStyle) -> Self {
        self.card_style = card_style;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn card_style(&self) -> CardMaskStyle {
        self.card_style
    }

    /// Split and classify without masking
    pub fn parse(&self, info: &str) -> Result<LabeledEntity> {
        let entity = match self.mode {
            ParseMode::Tolerant => self.parse_tolerant(info)?,
            ParseMode::Strict => self.parse_strict(info)?,
        };
        log::trace!("classified labeled entity as {} ({} mode)", entity.kind, self.mode);
        Ok(entity)
    }

    /// Mask the number of a labeled string, keeping its label
    ///
    /// A bare number with no label yields only the masked number, without a
    /// leading space.
    pub fn format(&self, info: &str) -> Result<String> {
        let entity = self.parse(info)?;
        let masked = self.mask(&entity)?;
        if entity.label.is_empty() {
            Ok(masked)
        } else {
            Ok(format!("{} {}", entity.label, masked))
        }
    }

    /// Mask an already classified entity's number
    pub fn mask(&self, entity: &LabeledEntity) -> Result<String> {
        match entity.kind {
            EntityKind::Card => mask_card_number_with(&entity.number, self.card_style),
            EntityKind::Account => mask_account_number(&entity.number),
        }
    }

    fn parse_tolerant(&self, info: &str) -> Result<LabeledEntity> {
        let normalized = WHITESPACE_RE.replace_all(info.trim(), " ");
        if normalized.is_empty() {
            return Err(Error::invalid_input(
                "empty entity string: expected '<label> <number>'",
            ));
        }

        let tail = NUMERIC_TAIL_RE.find(&normalized).ok_or_else(|| {
            Error::invalid_input("no numeric identifier at the end of the entity string")
        })?;

        let label = normalized[..tail.start()].trim().to_string();
        let number = tail.as_str().trim().to_string();

        let kind = match self.vocabulary.classify(&label) {
            Some(kind) => kind,
            None => Self::classify_by_length(&number)?,
        };

        Ok(LabeledEntity {
            label,
            number,
            kind,
        })
    }

    fn parse_strict(&self, info: &str) -> Result<LabeledEntity> {
        let (label, number) = info.rsplit_once(' ').ok_or_else(|| {
            Error::invalid_input("entity string must be '<label> <number>'")
        })?;

        let kind = self
            .vocabulary
            .classify(label)
            .ok_or_else(|| Error::invalid_input("unknown entity type"))?;

        Ok(LabeledEntity {
            label: label.to_string(),
            number: number.to_string(),
            kind,
        })
    }

    fn classify_by_length(number: &str) -> Result<EntityKind> {
        let count = only_digits(number).len();
        if count == CARD_LENGTH {
            Ok(EntityKind::Card)
        } else if count >= ACCOUNT_MIN_LENGTH {
            Ok(EntityKind::Account)
        } else {
            Err(Error::invalid_input(format!(
                "unrecognized entity type and invalid number length ({} digits)",
                count
            )))
        }
    }
}

/// Mask a labeled card/account string with the default settings
///
/// Tolerant parsing, default vocabulary, grouped card template.
pub fn mask_account_card(info: &str) -> Result<String> {
    EntityFormatter::default().format(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> EntityFormatter {
        EntityFormatter::strict().with_card_style(CardMaskStyle::Compact)
    }

    #[test]
    fn test_card_with_brand_label() {
        assert_eq!(
            mask_account_card("Visa Platinum 7000792289606361").unwrap(),
            "Visa Platinum 7000 79** **** 6361"
        );
    }

    #[test]
    fn test_account_label() {
        assert_eq!(
            mask_account_card("Счет 73654108430135874305").unwrap(),
            "Счет **4305"
        );
        assert_eq!(
            mask_account_card("Checking account 73654108430135874305").unwrap(),
            "Checking account **4305"
        );
    }

    #[test]
    fn test_number_with_interior_spaces() {
        assert_eq!(
            mask_account_card("MasterCard 1234 5678 9876 5432").unwrap(),
            "MasterCard 1234 56** **** 5432"
        );
    }

    #[test]
    fn test_whitespace_is_normalized() {
        assert_eq!(
            mask_account_card("  Visa\tGold   5999 4145 8346 9222  ").unwrap(),
            "Visa Gold 5999 41** **** 9222"
        );
    }

    #[test]
    fn test_parse_separates_label_and_number() {
        let entity = EntityFormatter::default()
            .parse("Maestro 1596 8378 6870 5199")
            .unwrap();
        assert_eq!(entity.label, "Maestro");
        assert_eq!(entity.number, "1596 8378 6870 5199");
        assert_eq!(entity.kind, EntityKind::Card);
    }

    #[test]
    fn test_label_with_non_digit_suffix() {
        assert_eq!(
            mask_account_card("Account № 40817810099910004312").unwrap(),
            "Account № **4312"
        );
    }

    #[test]
    fn test_fallback_by_digit_count() {
        assert_eq!(
            mask_account_card("Перевод 7000792289606361").unwrap(),
            "Перевод 7000 79** **** 6361"
        );
        assert_eq!(mask_account_card("Перевод 123456").unwrap(), "Перевод **3456");

        let err = mask_account_card("Перевод 123").unwrap_err();
        assert!(err.to_string().contains("unrecognized entity type"));
    }

    #[test]
    fn test_keyword_beats_digit_count() {
        // A card keyword with a wrong-length number fails rather than falling back
        let err = mask_account_card("Visa Classic 123456").unwrap_err();
        assert!(err.to_string().contains("16 digits"));
    }

    #[test]
    fn test_bare_number_has_no_label() {
        assert_eq!(
            mask_account_card("7000792289606361").unwrap(),
            "7000 79** **** 6361"
        );
    }

    #[test]
    fn test_empty_and_missing_tail() {
        assert!(mask_account_card("").unwrap_err().is_invalid_input());
        assert!(mask_account_card(" \n\t ").unwrap_err().is_invalid_input());
        let err = mask_account_card("Visa Platinum").unwrap_err();
        assert!(err.to_string().contains("no numeric identifier"));
    }

    #[test]
    fn test_strict_mode() {
        let formatter = strict();
        assert_eq!(
            formatter.format("Visa Platinum 7000792289606361").unwrap(),
            "Visa Platinum 7000 79 ** 6361"
        );
        assert_eq!(
            formatter.format("Счет 73654108430135874305").unwrap(),
            "Счет **4305"
        );
    }

    #[test]
    fn test_strict_mode_has_no_fallback() {
        let err = strict().format("Перевод 7000792289606361").unwrap_err();
        assert!(err.to_string().contains("unknown entity type"));
    }

    #[test]
    fn test_strict_mode_rejects_keywords_outside_fixed_set() {
        for input in [
            "Amex 7000792289606361",
            "Credit card 7000792289606361",
            "Account 40817810099910004312",
            "Счёт 40817810099910004312",
        ] {
            let err = strict().format(input).unwrap_err();
            assert!(
                err.to_string().contains("unknown entity type"),
                "expected rejection for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_strict_mode_accepts_explicit_vocabulary() {
        let formatter =
            EntityFormatter::new(Vocabulary::default(), ParseMode::Strict, CardMaskStyle::Compact);
        assert_eq!(
            formatter.format("Amex 7000792289606361").unwrap(),
            "Amex 7000 79 ** 6361"
        );
    }

    #[test]
    fn test_for_mode_picks_mode_vocabulary() {
        assert_eq!(
            EntityFormatter::for_mode(ParseMode::Tolerant, CardMaskStyle::Grouped),
            EntityFormatter::default()
        );
        assert_eq!(EntityFormatter::strict().vocabulary(), &Vocabulary::strict());
    }

    #[test]
    fn test_strict_mode_splits_on_last_space_only() {
        // the number after the last space is just "5432"
        let err = strict().format("MasterCard 1234 5678 9876 5432").unwrap_err();
        assert!(err.to_string().contains("16 digits"));
        assert!(strict().format("Visa7000792289606361").is_err());
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = Vocabulary::new(["karte"], ["konto"]);
        let formatter = EntityFormatter::new(vocab, ParseMode::Strict, CardMaskStyle::Grouped);
        assert_eq!(formatter.format("Konto 12345678").unwrap(), "Konto **5678");
        assert!(formatter.format("Visa 7000792289606361").is_err());
    }

    #[test]
    fn test_parse_mode_from_str() {
        assert_eq!("STRICT".parse::<ParseMode>().unwrap(), ParseMode::Strict);
        assert!("lenient".parse::<ParseMode>().is_err());
    }
}
