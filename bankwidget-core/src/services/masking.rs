//! Card and account number masking
//!
//! Only the first 6 and last 4 digits of a card number, and the last 4
//! digits of an account number, ever reach the output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Card numbers (PAN) are exactly this many digits
pub const CARD_LENGTH: usize = 16;

/// Account numbers need at least this many digits
pub const ACCOUNT_MIN_LENGTH: usize = 4;

/// Template used to render a masked card number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardMaskStyle {
    /// `7000 79** **** 6361`
    #[default]
    Grouped,
    /// `7000 79 ** 6361`
    Compact,
}

impl CardMaskStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardMaskStyle::Grouped => "grouped",
            CardMaskStyle::Compact => "compact",
        }
    }

    /// Render a 16-digit string; callers guarantee the length
    fn render(&self, digits: &str) -> String {
        let (head, bin_tail, last4) = (&digits[..4], &digits[4..6], &digits[12..]);
        match self {
            CardMaskStyle::Grouped => format!("{} {}** **** {}", head, bin_tail, last4),
            CardMaskStyle::Compact => format!("{} {} ** {}", head, bin_tail, last4),
        }
    }
}

impl fmt::Display for CardMaskStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardMaskStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "grouped" => Ok(CardMaskStyle::Grouped),
            "compact" => Ok(CardMaskStyle::Compact),
            other => Err(Error::config(format!("unknown card mask style '{}'", other))),
        }
    }
}

/// Keep only the ASCII digits of `input`, in order
pub fn only_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mask a card number with the default [`CardMaskStyle::Grouped`] template
///
/// Separators are ignored: `"1234 5678 9876 5432"` becomes `"1234 56** **** 5432"`.
pub fn mask_card_number(card_number: &str) -> Result<String> {
    mask_card_number_with(card_number, CardMaskStyle::default())
}

/// Mask a card number with an explicit template
pub fn mask_card_number_with(card_number: &str, style: CardMaskStyle) -> Result<String> {
    let digits = only_digits(card_number);
    if digits.len() != CARD_LENGTH {
        return Err(Error::invalid_input(format!(
            "card number must have {} digits, got {}",
            CARD_LENGTH,
            digits.len()
        )));
    }
    Ok(style.render(&digits))
}

/// Mask an account number as `**` plus its last 4 digits
pub fn mask_account_number(account_number: &str) -> Result<String> {
    let digits = only_digits(account_number);
    if digits.len() < ACCOUNT_MIN_LENGTH {
        return Err(Error::invalid_input(format!(
            "account number must have at least {} digits, got {}",
            ACCOUNT_MIN_LENGTH,
            digits.len()
        )));
    }
    Ok(format!("**{}", &digits[digits.len() - ACCOUNT_MIN_LENGTH..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_digits_strips_separators() {
        assert_eq!(only_digits("1234 5678-9876/5432"), "1234567898765432");
        assert_eq!(only_digits("no digits"), "");
    }

    #[test]
    fn test_only_digits_is_idempotent() {
        let once = only_digits("40 817 810 099 910 004 312");
        assert_eq!(only_digits(&once), once);
    }

    #[test]
    fn test_only_digits_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not part of a PAN
        assert_eq!(only_digits("١٢٣4"), "4");
    }

    #[test]
    fn test_mask_card_grouped() {
        assert_eq!(
            mask_card_number("1234 5678 9876 5432").unwrap(),
            "1234 56** **** 5432"
        );
        assert_eq!(
            mask_card_number("7000792289606361").unwrap(),
            "7000 79** **** 6361"
        );
    }

    #[test]
    fn test_mask_card_compact() {
        assert_eq!(
            mask_card_number_with("7000792289606361", CardMaskStyle::Compact).unwrap(),
            "7000 79 ** 6361"
        );
    }

    #[test]
    fn test_mask_card_keeps_first_six_and_last_four() {
        let masked = mask_card_number("1111-2222-3333-4444").unwrap();
        let visible = only_digits(&masked);
        assert_eq!(visible, "1111224444");
        assert_eq!(masked.matches('*').count(), 6);
    }

    #[test]
    fn test_mask_card_wrong_length() {
        for input in ["", "123", "123456789012345", "12345678901234567"] {
            let err = mask_card_number(input).unwrap_err();
            assert!(err.is_invalid_input(), "expected invalid input for {:?}", input);
        }
    }

    #[test]
    fn test_mask_account() {
        assert_eq!(mask_account_number("40817810099910004312").unwrap(), "**4312");
        assert_eq!(mask_account_number("1234").unwrap(), "**1234");
        assert_eq!(mask_account_number("Счет 7365 4108").unwrap(), "**4108");
    }

    #[test]
    fn test_mask_account_too_short() {
        let err = mask_account_number("12 3").unwrap_err();
        assert!(err.to_string().contains("at least 4 digits, got 3"));
    }

    #[test]
    fn test_card_mask_style_parsing() {
        assert_eq!("Compact".parse::<CardMaskStyle>().unwrap(), CardMaskStyle::Compact);
        assert_eq!(" grouped ".parse::<CardMaskStyle>().unwrap(), CardMaskStyle::Grouped);
        assert!(matches!("dots".parse::<CardMaskStyle>(), Err(Error::Config(_))));
    }
}
