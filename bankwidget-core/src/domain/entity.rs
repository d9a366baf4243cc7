//! Labeled entity model: card/account kinds and the keyword vocabulary

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a labeled number refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Card,
    Account,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Card => "card",
            EntityKind::Account => "account",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_CARD_KEYWORDS: &[&str] = &[
    "карта",
    "card",
    "visa",
    "maestro",
    "mastercard",
    "master card",
    "mir",
    "american express",
    "amex",
    "electron",
];

const DEFAULT_ACCOUNT_KEYWORDS: &[&str] = &["счет", "счёт", "account", "acct"];

// Strict parsing accepts these and nothing else
const STRICT_CARD_KEYWORDS: &[&str] = &["карта", "visa", "maestro", "mastercard"];
const STRICT_ACCOUNT_KEYWORDS: &[&str] = &["счет"];

/// Keywords recognized in entity labels, per kind
///
/// Keywords are stored lowercased and matched as substrings of the
/// lowercased label. Card keywords are checked before account keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    card: Vec<String>,
    #[serde(default)]
    account: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_CARD_KEYWORDS.iter().copied(),
            DEFAULT_ACCOUNT_KEYWORDS.iter().copied(),
        )
    }
}

impl Vocabulary {
    /// Build a vocabulary from card and account keyword lists
    ///
    /// Blank keywords are dropped; an empty keyword would match every label.
    pub fn new<C, A>(card: C, account: A) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            card: Self::normalize_keywords(card),
            account: Self::normalize_keywords(account),
        }
    }

    /// The small fixed keyword set used by strict parsing
    pub fn strict() -> Self {
        Self::new(
            STRICT_CARD_KEYWORDS.iter().copied(),
            STRICT_ACCOUNT_KEYWORDS.iter().copied(),
        )
    }

    /// Vocabulary with no keywords; classification falls back to digit counts
    pub fn empty() -> Self {
        Self {
            card: Vec::new(),
            account: Vec::new(),
        }
    }

    pub fn keywords(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Card => &self.card,
            EntityKind::Account => &self.account,
        }
    }

    /// Classify a label by keyword, card keywords first
    pub fn classify(&self, label: &str) -> Option<EntityKind> {
        let label = label.to_lowercase();
        [EntityKind::Card, EntityKind::Account]
            .into_iter()
            .find(|kind| self.keywords(*kind).iter().any(|k| label.contains(k.as_str())))
    }

    /// Re-apply normalization, e.g. after deserializing from settings
    pub fn normalized(self) -> Self {
        Self::new(self.card, self.account)
    }

    fn normalize_keywords<I>(keywords: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut result: Vec<String> = Vec::new();
        for keyword in keywords {
            let k = keyword.as_ref().trim().to_lowercase();
            if !k.is_empty() && !result.contains(&k) {
                result.push(k);
            }
        }
        result
    }
}

/// A labeled number after classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledEntity {
    /// Free-text prefix, e.g. "Visa Platinum" or "Счет"
    pub label: String,
    /// Numeric tail as written, possibly with interior spaces
    pub number: String,
    pub kind: EntityKind,
}
