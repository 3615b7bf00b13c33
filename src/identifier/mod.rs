//! Classification of user-supplied publication keys.
//!
//! A key is either a dblp record id (`DBLP:conf/spire/BastMW06`) or a DOI
//! (`doi:10.1007/11880561_13`). The type prefix is optional; when it is
//! missing the kind is guessed from the number of `/` separators.
//!
//! # Examples
//!
//! ```
//! use bibtex_dblp::identifier::{IdentifierKind, classify_key};
//!
//! let id = classify_key("DBLP:conf/spire/BastMW06");
//! assert_eq!(id.kind(), IdentifierKind::Dblp);
//! assert_eq!(id.key(), "conf/spire/BastMW06");
//! assert!(!id.is_guessed());
//! ```

mod extract;

pub use extract::{BibEntry, extract_dblp_id};

use std::fmt;

use tracing::{debug, error};

/// Separator used in both dblp ids and DOIs.
pub const KEY_SEPARATOR: char = '/';

/// The namespace a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// A dblp record id such as `conf/spire/BastMW06`.
    Dblp,
    /// A document object identifier such as `10.1007/11880561_13`.
    Doi,
    /// The key matched none of the known shapes.
    Unknown,
}

impl IdentifierKind {
    /// Returns the stable label used in log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dblp => "dblp",
            Self::Doi => "doi",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified key with its type prefix removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    kind: IdentifierKind,
    key: String,
    guessed: bool,
}

impl Identifier {
    /// Creates an explicitly typed dblp identifier.
    #[must_use]
    pub fn dblp(key: impl Into<String>) -> Self {
        Self {
            kind: IdentifierKind::Dblp,
            key: key.into(),
            guessed: false,
        }
    }

    /// Creates an explicitly typed DOI identifier.
    #[must_use]
    pub fn doi(key: impl Into<String>) -> Self {
        Self {
            kind: IdentifierKind::Doi,
            key: key.into(),
            guessed: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// The bare key, without any `DBLP:` or `doi:` prefix.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True when the kind was inferred from the separator count rather than
    /// an explicit prefix.
    #[must_use]
    pub fn is_guessed(&self) -> bool {
        self.guessed
    }

    /// True unless the key could not be classified.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        self.kind != IdentifierKind::Unknown
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IdentifierKind::Dblp => write!(f, "DBLP:{}", self.key),
            IdentifierKind::Doi => write!(f, "doi:{}", self.key),
            IdentifierKind::Unknown => f.write_str(&self.key),
        }
    }
}

/// Shape test applied to a raw key.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Case-insensitive prefix; the prefix is stripped from the key.
    Prefix(&'static str),
    /// At least this many separators; key kept verbatim.
    AtLeastSeparators(usize),
    /// Exactly this many separators; key kept verbatim.
    ExactSeparators(usize),
}

impl Matcher {
    /// Returns the bare key when the raw key matches.
    fn apply<'a>(self, raw: &'a str) -> Option<&'a str> {
        match self {
            Self::Prefix(prefix) => {
                let head = raw.get(..prefix.len())?;
                if head.eq_ignore_ascii_case(prefix) {
                    raw.get(prefix.len()..)
                } else {
                    None
                }
            }
            Self::AtLeastSeparators(min) => (separator_count(raw) >= min).then_some(raw),
            Self::ExactSeparators(count) => (separator_count(raw) == count).then_some(raw),
        }
    }

    fn is_guess(self) -> bool {
        !matches!(self, Self::Prefix(_))
    }
}

/// Classification rules in priority order; the first matching row wins.
const RULES: [(Matcher, IdentifierKind); 4] = [
    (Matcher::Prefix("DBLP:"), IdentifierKind::Dblp),
    (Matcher::Prefix("DOI:"), IdentifierKind::Doi),
    (Matcher::AtLeastSeparators(2), IdentifierKind::Dblp),
    (Matcher::ExactSeparators(1), IdentifierKind::Doi),
];

fn separator_count(raw: &str) -> usize {
    raw.matches(KEY_SEPARATOR).count()
}

/// Determines the kind of `raw` and strips its type prefix if present.
///
/// Keys that match no rule come back as [`IdentifierKind::Unknown`] with the
/// key unchanged; this is not an error, but such keys cannot be looked up.
#[must_use]
pub fn classify_key(raw: &str) -> Identifier {
    for (matcher, kind) in RULES {
        let Some(bare) = matcher.apply(raw) else {
            continue;
        };
        let guessed = matcher.is_guess();
        if guessed {
            debug!(key = %raw, kind = %kind, "key kind was guessed from separator count");
        }
        return Identifier {
            kind,
            key: bare.to_string(),
            guessed,
        };
    }

    error!(key = %raw, "could not determine the type of key");
    Identifier {
        kind: IdentifierKind::Unknown,
        key: raw.to_string(),
        guessed: false,
    }
}
