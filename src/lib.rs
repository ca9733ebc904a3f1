//! A library for cross-checking in-text scholarly citations against a
//! document's own references list.
//!
//! `refcheck` scans a plain-text document, collects the bibliography entries
//! from its references section and the author–year citations from its body
//! text, and reports the discrepancies: citations with no matching reference
//! entry, and reference entries that are never cited.
//!
//! # Key Features
//!
//! - **Reference entry parsing**: standard `Author, Given. YEAR.` entries and
//!   glossary-style `ABBREV = Title YEAR` entries
//! - **Citation extraction**: `Author (YEAR)`, `Author YEAR: pages`,
//!   `Author & Author (YEAR; YEAR)`, `Author et al. (YEAR)`,
//!   `ABBREV s.v. term` and related shapes
//! - **Inflection-tolerant matching**: Finnish surname case endings are
//!   reduced to guessed base forms when a direct comparison fails
//! - **Localized output**: English and Finnish diagnostic messages
//! - **Configurable style variants**: optional separators for documents that
//!   deviate from the default author–year punctuation
//!
//! # Basic Usage
//!
//! ```rust
//! use refcheck::RefChecker;
//!
//! let text = "As Smith (2000) argued...\n\n\
//!             References\n\
//!             Smith, John. 2000. An example monograph. Example Press.\n";
//!
//! let checker = RefChecker::new();
//! let problems = checker.check(text);
//! assert!(problems.is_empty());
//! ```
//!
//! # Diagnostics
//!
//! The output is an ordered list of ready-to-display strings; an empty list
//! means no problems were found:
//!
//! ```rust
//! use refcheck::RefChecker;
//!
//! let text = "Only Jones (1999) is cited here.\n\n\
//!             References\n\
//!             Smith, John. 2000. An example monograph. Example Press.\n";
//!
//! let problems = RefChecker::new().check(text);
//! assert_eq!(
//!     problems,
//!     vec![
//!         "Citation \"Jones 1999\" not found in references list".to_string(),
//!         "References list item \"Smith 2000\" not cited in text".to_string(),
//!     ],
//! );
//! ```
//!
//! # Error Handling
//!
//! The analysis pass itself never fails: malformed lines are skipped and a
//! document without a recognizable references section yields a single
//! sentinel diagnostic. The [`RefCheckError`] type covers the outer surface
//! only, such as resolving an unknown language code.
//!
//! # Thread Safety
//!
//! A [`RefChecker`] holds only compiled patterns and configuration; it is
//! `Send + Sync` and each call to [`RefChecker::check`] is independent, so a
//! single instance can be shared freely between threads.

use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod checker;
pub mod lang;

mod citation;
mod morphology;
mod reference;
mod regex;
mod section;
mod utils;

// Reexports
pub use checker::{CheckerConfig, RefChecker};
pub use lang::{Language, Vocabulary};

/// A specialized Result type for refcheck operations.
pub type Result<T> = std::result::Result<T, RefCheckError>;

/// Represents errors that can occur outside the analysis pass itself.
#[derive(Error, Debug)]
pub enum RefCheckError {
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),
}

/// One author of a reference entry, split on the first comma of the source
/// text into a family name and an optional given-name part.
///
/// Elision markers written into an entry's author list (`et al.`, `ym.`)
/// occupy an author slot of their own, mirroring how they are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// The author's family name (surname), verbatim from the source.
    pub family: CompactString,
    /// The given-name part after the first comma, if any. May hold full
    /// names ("John") or initials ("J. A.").
    pub given: Option<CompactString>,
}

impl Author {
    pub(crate) fn new(family: impl Into<CompactString>, given: Option<CompactString>) -> Self {
        Self {
            family: family.into(),
            given,
        }
    }
}

/// How an author was written inside an in-text citation. The shape decides
/// which comparison the matcher applies against reference entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameForm {
    /// A bare family name: `Virtanen`.
    Bare,
    /// Initials accompanying the family name: `P. Virtanen` or `Genetz A.`
    /// The stored string is the initials token, trailing period included.
    Initials(CompactString),
    /// A family name followed by an elision marker: `Virtanen ym.`
    Elided(CompactString),
}

/// One author as mentioned in an in-text citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitedAuthor {
    /// Family name, particles included (`van Dijk`).
    pub family: CompactString,
    /// The recognized shape of the mention.
    pub form: NameForm,
}

impl CitedAuthor {
    pub(crate) fn bare(family: impl Into<CompactString>) -> Self {
        Self {
            family: family.into(),
            form: NameForm::Bare,
        }
    }

    /// Renders the author the way it was cited: family name first, then the
    /// initials or elision marker if one was present.
    fn display(&self) -> String {
        match &self.form {
            NameForm::Bare => self.family.to_string(),
            NameForm::Initials(tok) | NameForm::Elided(tok) => {
                format!("{} {}", self.family, tok)
            }
        }
    }
}

/// An in-text citation candidate: an author list plus a locator.
///
/// The locator holds a year (`2001`, `2001a [1884]`, `forthcoming`) or is
/// empty for bare-name and `s.v.` citations; page numbers are stripped
/// during extraction so that only the year portion participates in matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub authors: Vec<CitedAuthor>,
    pub locator: CompactString,
}

impl Citation {
    /// Renders the citation back into display text for diagnostics.
    pub fn display(&self) -> String {
        let authors = self.authors.iter().map(CitedAuthor::display).join(" & ");
        if self.locator.is_empty() {
            authors
        } else {
            format!("{} {}", authors, self.locator)
        }
    }
}

/// One bibliography item: an author list and a publication year.
///
/// `year` may be empty (glossary entries without a year), a year with an
/// optional range or suffix letter (`1951–1961`, `2000a`), or an arbitrary
/// parenthetical string with the parentheses trimmed (`forthcoming`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub authors: Vec<Author>,
    pub year: CompactString,
}

impl ReferenceEntry {
    /// The canonical key for uncited-tracking and display: family names
    /// joined by `" & "`, with the year appended when present. Entries with
    /// identical keys collapse into a single uncited slot.
    pub fn canonical_key(&self) -> String {
        let families = self.authors.iter().map(|a| a.family.as_str()).join(" & ");
        if self.year.is_empty() {
            families
        } else {
            format!("{} {}", families, self.year)
        }
    }
}

/// Formatting-variant flags for documents deviating from the default
/// author–year punctuation. Each flag widens what the reference-entry parser
/// and the citation extractor accept; none of them disables the default
/// separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    /// Accept reference entries without the period between the author list
    /// and the year (`Smith, John 2000. Title.`).
    pub no_period_after_authors: bool,
    /// Accept a colon as the terminator after the year segment of a
    /// reference entry (`Smith, John. 2000: Title.`).
    pub colon_after_year: bool,
    /// Accept a spaced dash as an author-list separator in addition to the
    /// ampersand (`Smith – Jones 2000`).
    pub dash_between_authors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RefCheckError::UnsupportedLanguage("xx".to_string());
        assert_eq!(error.to_string(), "unsupported language code: xx");
    }

    #[test]
    fn test_citation_display() {
        let citation = Citation {
            authors: vec![
                CitedAuthor {
                    family: "Itkonen".into(),
                    form: NameForm::Initials("E.".into()),
                },
                CitedAuthor::bare("Kulonen"),
            ],
            locator: "1992".into(),
        };
        assert_eq!(citation.display(), "Itkonen E. & Kulonen 1992");
    }

    #[test]
    fn test_citation_display_without_locator() {
        let citation = Citation {
            authors: vec![CitedAuthor::bare("SSA")],
            locator: "".into(),
        };
        assert_eq!(citation.display(), "SSA");
    }

    #[test]
    fn test_canonical_key() {
        let entry = ReferenceEntry {
            authors: vec![
                Author::new("Smith", Some("John".into())),
                Author::new("Jones", None),
            ],
            year: "2000".into(),
        };
        assert_eq!(entry.canonical_key(), "Smith & Jones 2000");

        let yearless = ReferenceEntry {
            authors: vec![Author::new("SSA", None)],
            year: "".into(),
        };
        assert_eq!(yearless.canonical_key(), "SSA");
    }
}
