//! The cross-checking engine.
//!
//! One call to [`RefChecker::check`] runs the whole pipeline over a single
//! document: the line loop classifies each line and feeds it to the
//! reference-entry parser or the citation extractor, the matcher then pairs
//! every citation with a reference entry (retrying with surname base forms
//! when the written form fails), and the remaining discrepancies are
//! rendered, ordered and compacted into display-ready messages.
//!
//! All state is local to the call; the checker itself holds only compiled
//! patterns and can be shared between threads.

use crate::citation::CitationGrammar;
use crate::lang::{Language, Vocabulary};
use crate::morphology::base_forms;
use crate::reference::ReferenceGrammar;
use crate::section::SectionPatterns;
use crate::{Citation, CitedAuthor, NameForm, ReferenceEntry, StyleOptions};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

/// Configuration for a [`RefChecker`].
///
/// # Examples
///
/// ```
/// use refcheck::{CheckerConfig, Language, RefChecker};
///
/// let checker = RefChecker::with_config(CheckerConfig {
///     language: Language::Finnish,
///     ..Default::default()
/// });
/// let problems = checker.check("Ei lähdeluetteloa täällä.");
/// assert_eq!(
///     problems,
///     vec!["Lähdeluetteloa ei löydy (epätavallisesti nimetty otsikko?)".to_string()]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Language of the diagnostic messages.
    pub language: Language,
    /// Formatting-variant flags threaded into both parsers.
    pub style: StyleOptions,
    /// Section-heading and marker vocabulary the parsers are compiled from.
    pub vocabulary: Vocabulary,
}

/// Cross-checks the citations and the references list of one document.
///
/// See the crate-level documentation for an overview and examples.
#[derive(Debug)]
pub struct RefChecker {
    config: CheckerConfig,
    sections: SectionPatterns,
    references: ReferenceGrammar,
    citations: CitationGrammar,
}

impl Default for RefChecker {
    fn default() -> Self {
        Self::with_config(CheckerConfig::default())
    }
}

impl RefChecker {
    /// Creates a checker with English messages and default style settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checker from the given configuration, compiling the
    /// grammars once up front.
    #[must_use]
    pub fn with_config(config: CheckerConfig) -> Self {
        let sections = SectionPatterns::compile(&config.vocabulary);
        let references = ReferenceGrammar::compile(&config.vocabulary, &config.style);
        let citations = CitationGrammar::compile(&config.vocabulary, &config.style);
        Self {
            config,
            sections,
            references,
            citations,
        }
    }

    /// Checks a whole document passed as one string.
    ///
    /// Returns the ordered diagnostic list; an empty list means no problems
    /// were found.
    pub fn check(&self, text: &str) -> Vec<String> {
        self.check_lines(text.lines())
    }

    /// Checks a document together with supplementary text (footnotes,
    /// endnote bodies) that lives outside the main flow. The supplement is
    /// appended after a literal `Footnotes` heading line so its citations
    /// are scanned as body text even when the document ends in the
    /// references section.
    pub fn check_with_supplement(&self, text: &str, supplement: &str) -> Vec<String> {
        self.check_lines(
            text.lines()
                .chain(std::iter::once("Footnotes"))
                .chain(supplement.lines()),
        )
    }

    /// Checks a document passed as individual lines.
    pub fn check_lines<'a, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries: Vec<ReferenceEntry> = Vec::new();
        let mut by_family: HashMap<CompactString, Vec<usize>> = HashMap::new();
        let mut uncited: BTreeMap<String, usize> = BTreeMap::new();
        let mut citations: Vec<Citation> = Vec::new();
        let mut possible: HashSet<CompactString> = HashSet::new();

        let mut in_refs = false;
        for line in lines {
            let was_in_refs = in_refs;
            in_refs = self.sections.classify(line, in_refs);
            if in_refs != was_in_refs {
                debug!(in_refs, line, "references section boundary");
            }
            if in_refs {
                if let Some(entry) = self.references.parse_line(line) {
                    trace!(key = %entry.canonical_key(), "parsed reference entry");
                    let idx = entries.len();
                    by_family
                        .entry(entry.authors[0].family.clone())
                        .or_default()
                        .push(idx);
                    uncited.entry(entry.canonical_key()).or_insert(idx);
                    entries.push(entry);
                }
            } else {
                let scan = self.citations.scan_line(line);
                possible.extend(scan.possible);
                citations.extend(scan.citations);
            }
        }
        debug!(
            entries = entries.len(),
            citations = citations.len(),
            "document scanned"
        );

        if entries.is_empty() {
            return vec![self.config.language.reflist_not_found().to_string()];
        }

        citations.sort_by(|a, b| {
            (a.authors[0].family.as_str(), a.locator.as_str())
                .cmp(&(b.authors[0].family.as_str(), b.locator.as_str()))
        });

        let mut messages = Vec::new();
        for citation in &citations {
            if !self.match_citation(citation, &entries, &by_family, &mut uncited) {
                messages.push(
                    self.config
                        .language
                        .citation_missing(&citation.display()),
                );
            }
        }

        for (key, &idx) in &uncited {
            if suppress_uncited(&entries[idx], &possible) {
                continue;
            }
            messages.push(self.config.language.uncited_reference(key));
        }

        compact(messages)
    }

    /// Pairs one citation with a reference entry, trying the written author
    /// forms first and the surname base forms second. A successful match
    /// clears the entry's uncited slot.
    fn match_citation(
        &self,
        citation: &Citation,
        entries: &[ReferenceEntry],
        by_family: &HashMap<CompactString, Vec<usize>>,
        uncited: &mut BTreeMap<String, usize>,
    ) -> bool {
        let reduced = base_forms(&citation.authors);
        for authors in std::iter::once(citation.authors.as_slice()).chain(reduced.as_deref()) {
            if let Some(idx) = find_match(authors, &citation.locator, entries, by_family) {
                trace!(citation = %citation.display(), entry = %entries[idx].canonical_key(), "matched");
                uncited.remove(&entries[idx].canonical_key());
                return true;
            }
        }
        false
    }
}

/// Searches the entries indexed under the citation's first family name,
/// branching on the shape of the first author mention.
fn find_match(
    authors: &[CitedAuthor],
    locator: &str,
    entries: &[ReferenceEntry],
    by_family: &HashMap<CompactString, Vec<usize>>,
) -> Option<usize> {
    let first = authors.first()?;
    let indices = by_family.get(first.family.as_str())?;
    match &first.form {
        // "Virtanen ym." trusts the elision: any co-authored entry under the
        // family with an equal year matches.
        NameForm::Elided(_) => indices
            .iter()
            .copied()
            .find(|&i| entries[i].authors.len() > 1 && entries[i].year == locator),
        // Initials are a prefix test against the entry's given names, so
        // "J." matches "John".
        NameForm::Initials(token) => {
            let prefix = drop_last_char(token);
            indices.iter().copied().find(|&i| {
                let entry = &entries[i];
                entry.authors[0]
                    .given
                    .as_ref()
                    .is_some_and(|given| given.starts_with(prefix))
                    && entry.year == locator
            })
        }
        // A full author list compares family-name sequences exactly.
        NameForm::Bare => {
            let families: Vec<&str> = authors.iter().map(|a| a.family.as_str()).collect();
            indices.iter().copied().find(|&i| {
                let entry = &entries[i];
                entry.authors.len() == families.len()
                    && entry
                        .authors
                        .iter()
                        .zip(&families)
                        .all(|(author, family)| author.family == *family)
                    && entry.year == locator
            })
        }
    }
}

/// An uncited glossary-style entry is withheld when its only textual trace
/// could be a bare capitalized word the citation scan cannot claim: no year,
/// a single author with no given part, and the family name seen among the
/// possible citations.
fn suppress_uncited(entry: &ReferenceEntry, possible: &HashSet<CompactString>) -> bool {
    entry.year.is_empty()
        && entry.authors.len() == 1
        && entry.authors[0].given.is_none()
        && possible.contains(entry.authors[0].family.as_str())
}

/// Collapses runs of consecutive identical messages into one entry suffixed
/// with the run length. Only exactly-adjacent duplicates merge.
fn compact(messages: Vec<String>) -> Vec<String> {
    let mut compacted = Vec::with_capacity(messages.len());
    let mut iter = messages.into_iter().peekable();
    while let Some(message) = iter.next() {
        let mut count = 1;
        while iter.peek() == Some(&message) {
            iter.next();
            count += 1;
        }
        if count > 1 {
            compacted.push(format!("{} (x {})", message, count));
        } else {
            compacted.push(message);
        }
    }
    compacted
}

fn drop_last_char(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next_back();
    chars.as_str()
}
