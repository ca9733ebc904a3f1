//! Language selection and vocabulary tables.
//!
//! The interface language ([`Language`]) only selects the diagnostic message
//! templates. Document vocabulary — section headings, elision markers,
//! year-status words — is carried separately in a [`Vocabulary`] so that a
//! Finnish-language report about an Estonian-headed document works out of
//! the box: the default vocabulary covers every supported spelling at once.

use crate::utils::regex_escape;
use crate::{RefCheckError, Result};
use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Headings that switch the line classifier into references mode when a
/// line consists of nothing else.
const SECTION_HEADINGS: &[&str] = &[
    "References",
    "Literature",
    "Literatur",
    "Lähteet",
    "Kirjallisuus",
    "Allikad",
    "Források",
];

/// Headings that end the references section when a line starts with one.
const SECTION_EXITS: &[&str] = &[
    "Appendix",
    "Liite",
    "Alaviitteet",
    "Loppuviitteet",
    "Footnotes",
    "Endnotes",
];

/// Markers standing in for an elided tail of an author list.
const ELISION_MARKERS: &[&str] = &["et al.", "ym.", "jt.", "u.a."];

/// Words accepted in the year position of a citation.
const STATUS_WORDS: &[&str] = &[
    "forthcoming",
    "in press",
    "in preparation",
    "tulossa",
    "painossa",
];

/// The interface language of the diagnostic messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Finnish,
}

impl Language {
    /// Resolves a two-letter language code.
    ///
    /// # Errors
    ///
    /// Returns [`RefCheckError::UnsupportedLanguage`] for codes other than
    /// `en` and `fi`.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "en" => Ok(Language::English),
            "fi" => Ok(Language::Finnish),
            other => Err(RefCheckError::UnsupportedLanguage(other.to_string())),
        }
    }

    /// The two-letter code of this language.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Finnish => "fi",
        }
    }

    /// The sentinel diagnostic for a document without a references section.
    pub(crate) fn reflist_not_found(self) -> &'static str {
        match self {
            Language::English => "No references list found (abnormally named section heading?)",
            Language::Finnish => "Lähdeluetteloa ei löydy (epätavallisesti nimetty otsikko?)",
        }
    }

    /// The diagnostic for a citation absent from the references list.
    pub(crate) fn citation_missing(self, citation: &str) -> String {
        match self {
            Language::English => {
                format!("Citation \"{}\" not found in references list", citation)
            }
            Language::Finnish => {
                format!("Viitettä \"{}\" ei löydy lähdeluettelosta", citation)
            }
        }
    }

    /// The diagnostic for a reference entry never cited in the text.
    pub(crate) fn uncited_reference(self, entry: &str) -> String {
        match self {
            Language::English => {
                format!("References list item \"{}\" not cited in text", entry)
            }
            Language::Finnish => {
                format!("Lähdeluettelon teokseen \"{}\" ei ole viittauksia", entry)
            }
        }
    }
}

/// The document vocabulary the parsers are compiled from.
///
/// The default tables cover English, Finnish, Estonian, Hungarian and German
/// spellings simultaneously; replace a field to narrow or extend recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Whole-line headings that open the references section.
    pub section_headings: Vec<CompactString>,
    /// Line-prefix headings that close the references section.
    pub section_exits: Vec<CompactString>,
    /// Author-list elision markers (`et al.` equivalents).
    pub elision_markers: Vec<CompactString>,
    /// Words accepted in place of a year (`forthcoming` equivalents).
    pub status_words: Vec<CompactString>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            section_headings: SECTION_HEADINGS.iter().map(|s| (*s).into()).collect(),
            section_exits: SECTION_EXITS.iter().map(|s| (*s).into()).collect(),
            elision_markers: ELISION_MARKERS.iter().map(|s| (*s).into()).collect(),
            status_words: STATUS_WORDS.iter().map(|s| (*s).into()).collect(),
        }
    }
}

impl Vocabulary {
    /// A regex alternation matching the elision markers. In `loose` mode a
    /// single trailing period is optional for every marker ("ym" matches
    /// "ym."); in strict mode only for markers written as one word with one
    /// period. Markers with several periods ("u.a.") always require them.
    pub(crate) fn elision_alternation(&self, loose: bool) -> String {
        self.elision_markers
            .iter()
            .map(|marker| {
                let has_space = marker.contains(' ');
                let dot_count = marker.matches('.').count();
                let mut pattern = marker.split(' ').map(regex_escape).join(r"\s+");
                let optional = dot_count <= 1 && (loose || !has_space);
                if optional && pattern.ends_with(r"\.") {
                    pattern.push('?');
                }
                pattern
            })
            .join("|")
    }

    /// A regex alternation matching the year-status words, with interior
    /// whitespace widened to `\s+`.
    pub(crate) fn status_alternation(&self) -> String {
        self.status_words
            .iter()
            .map(|word| word.split(' ').map(regex_escape).join(r"\s+"))
            .join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("en").unwrap(), Language::English);
        assert_eq!(Language::from_code("fi").unwrap(), Language::Finnish);
        assert!(Language::from_code("sv").is_err());
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Finnish.code(), "fi");
    }

    #[test]
    fn test_default_language_is_english() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_messages_localized() {
        assert_eq!(
            Language::English.citation_missing("Jones 1999"),
            "Citation \"Jones 1999\" not found in references list"
        );
        assert_eq!(
            Language::Finnish.citation_missing("Jones 1999"),
            "Viitettä \"Jones 1999\" ei löydy lähdeluettelosta"
        );
        assert_eq!(
            Language::Finnish.uncited_reference("Smith 2000"),
            "Lähdeluettelon teokseen \"Smith 2000\" ei ole viittauksia"
        );
    }

    #[test]
    fn test_elision_alternations() {
        let vocab = Vocabulary::default();
        assert_eq!(
            vocab.elision_alternation(false),
            r"et\s+al\.|ym\.?|jt\.?|u\.a\."
        );
        assert_eq!(
            vocab.elision_alternation(true),
            r"et\s+al\.?|ym\.?|jt\.?|u\.a\."
        );
    }

    #[test]
    fn test_status_alternation() {
        assert_eq!(
            Vocabulary::default().status_alternation(),
            r"forthcoming|in\s+press|in\s+preparation|tulossa|painossa"
        );
    }

    #[test]
    fn test_default_vocabulary_covers_all_spellings() {
        let vocab = Vocabulary::default();
        assert!(vocab.section_headings.iter().any(|h| h == "Lähteet"));
        assert!(vocab.section_headings.iter().any(|h| h == "Források"));
        assert!(vocab.section_exits.iter().any(|h| h == "Loppuviitteet"));
        assert!(vocab.elision_markers.iter().any(|m| m == "ym."));
        assert!(vocab.status_words.iter().any(|w| w == "painossa"));
    }
}
