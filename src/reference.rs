//! Reference-entry parsing.
//!
//! Lines inside the references section are tried against two grammars in
//! order. The *standard* grammar covers author–year entries:
//!
//! ```plain
//! Itkonen, Erkki & Kulonen, Ulla-Maija (toim.). 1992. Suomen sanojen alkuperä.
//! ```
//!
//! The *glossary* grammar covers entries keyed by an abbreviation, with an
//! optional trailing year on the abbreviation side:
//!
//! ```plain
//! NS 1951–1961 = Nykysuomen sanakirja. Porvoo: WSOY.
//! ```
//!
//! A line matching neither grammar is not a reference entry and is skipped
//! without an error: continuation lines, blank lines and malformed entries
//! are expected between well-formed ones.

use crate::lang::Vocabulary;
use crate::regex::Regex;
use crate::utils::{split_before, split_family_given, split_on, strip_parentheticals};
use crate::{Author, ReferenceEntry, StyleOptions};

/// A four-digit year with an optional en-dash or hyphen range.
pub(crate) const YEAR_RANGE: &str = r"[12][0-9]{3}(?:[–-][0-9]+)?";

#[derive(Debug)]
pub(crate) struct ReferenceGrammar {
    standard: Regex,
    glossary_head: Regex,
    glossary_authors: Regex,
    glossary_year: Regex,
    author_sep: Regex,
    marker_split: Regex,
}

impl ReferenceGrammar {
    pub(crate) fn compile(vocab: &Vocabulary, style: &StyleOptions) -> Self {
        let sep = if style.dash_between_authors {
            r"\s+(?:&|[–—-])\s+"
        } else {
            r"\s+&\s+"
        };
        let author_year_sep = if style.no_period_after_authors {
            r"(?:\.\s*|\s+)"
        } else {
            r"\.\s*"
        };
        let terminator = if style.colon_after_year { "[.:]" } else { r"\." };

        // One author: a family segment, optionally followed by comma-separated
        // given-name parts which may carry trailing periods or brackets.
        let chunk = r"[^,.=0-9]+(?:,(?:\s+[^.=0-9]+\b\.?[\])]?)+)?";
        let year = format!(r"{YEAR_RANGE}[a-z]?(?:\s+\[{YEAR_RANGE}\])?");
        let standard = format!(
            r"^\s*({chunk}(?:{sep}{chunk})*){author_year_sep}({year}|\([^)]+\)){terminator}"
        );

        // Glossary entries: everything before " = ", free of periods.
        let glossary_chunk = r"[^,.=]+(?:,\s*[^.=]+)?";
        let glossary_authors =
            format!(r"^\s*({glossary_chunk}(?:{sep}{glossary_chunk})*)");
        let glossary_year = format!(r"\s+({YEAR_RANGE}[a-z]?|\([^)]+\))$");

        let markers = vocab.elision_alternation(false);

        Self {
            standard: Regex::new(&standard).expect("standard entry pattern"),
            glossary_head: Regex::new(r"^\s*([^.=]+)\s+=\s+").expect("glossary head pattern"),
            glossary_authors: Regex::new(&glossary_authors).expect("glossary author pattern"),
            glossary_year: Regex::new(&glossary_year).expect("glossary year pattern"),
            author_sep: Regex::new(sep).expect("author separator pattern"),
            marker_split: Regex::new(&format!(r"\s+({markers})")).expect("marker split pattern"),
        }
    }

    /// Tries the standard grammar, then the glossary grammar. Returns `None`
    /// for lines that are not reference entries.
    pub(crate) fn parse_line(&self, line: &str) -> Option<ReferenceEntry> {
        self.parse_standard(line)
            .or_else(|| self.parse_glossary(line))
    }

    fn parse_standard(&self, line: &str) -> Option<ReferenceEntry> {
        let caps = self.standard.captures(line)?;
        let segment = strip_parentheticals(caps.get(1).expect("author group").as_str());
        let year = caps.get(2).expect("year group").as_str();

        let mut authors = Vec::new();
        for chunk in split_on(&segment, &self.author_sep) {
            for part in split_before(chunk, &self.marker_split) {
                if !part.is_empty() {
                    authors.push(split_family_given(part));
                }
            }
        }
        build_entry(authors, year)
    }

    fn parse_glossary(&self, line: &str) -> Option<ReferenceEntry> {
        let head = self.glossary_head.captures(line)?;
        let lhs = head.get(1).expect("abbreviation group").as_str();
        let caps = self.glossary_authors.captures(lhs)?;
        let mut segment = caps.get(1).expect("author group").as_str();

        let mut year = "";
        if let Some(ym) = self.glossary_year.captures(segment) {
            year = ym.get(1).expect("year group").as_str();
            segment = &segment[..ym.get(0).expect("year match").start()];
        }

        let authors = split_on(segment, &self.author_sep)
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(split_family_given)
            .collect();
        build_entry(authors, year)
    }
}

/// Finalizes a parsed entry, rejecting author lists that came out empty and
/// trimming enclosing parentheses off the year.
fn build_entry(authors: Vec<Author>, year: &str) -> Option<ReferenceEntry> {
    if authors.is_empty() || authors[0].family.trim().is_empty() {
        return None;
    }
    let year = year.trim_matches(|c| c == '(' || c == ')');
    Some(ReferenceEntry {
        authors,
        year: year.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn grammar() -> ReferenceGrammar {
        ReferenceGrammar::compile(&Vocabulary::default(), &StyleOptions::default())
    }

    fn styled(style: StyleOptions) -> ReferenceGrammar {
        ReferenceGrammar::compile(&Vocabulary::default(), &style)
    }

    #[test]
    fn test_standard_entry() {
        let entry = grammar()
            .parse_line("Smith, John. 2000. An example monograph. Example Press.")
            .unwrap();
        assert_eq!(entry.authors.len(), 1);
        assert_eq!(entry.authors[0].family, "Smith");
        assert_eq!(entry.authors[0].given.as_deref(), Some("John"));
        assert_eq!(entry.year, "2000");
    }

    #[test]
    fn test_standard_entry_two_authors() {
        let entry = grammar()
            .parse_line("Itkonen, Erkki & Kulonen, Ulla-Maija. 1992. Suomen sanojen alkuperä.")
            .unwrap();
        assert_eq!(entry.authors.len(), 2);
        assert_eq!(entry.authors[0].family, "Itkonen");
        assert_eq!(entry.authors[1].family, "Kulonen");
        assert_eq!(entry.authors[1].given.as_deref(), Some("Ulla-Maija"));
        assert_eq!(entry.year, "1992");
        assert_eq!(entry.canonical_key(), "Itkonen & Kulonen 1992");
    }

    #[test]
    fn test_standard_entry_strips_editor_aside() {
        let entry = grammar()
            .parse_line("Itkonen, Erkki (toim.). 1992. Suomen sanojen alkuperä.")
            .unwrap();
        assert_eq!(entry.authors.len(), 1);
        assert_eq!(entry.authors[0].family, "Itkonen");
        assert_eq!(entry.authors[0].given.as_deref(), Some("Erkki"));
    }

    #[test]
    fn test_standard_entry_with_initials() {
        let entry = grammar()
            .parse_line("Duan, J. A. 2005. Something long.")
            .unwrap();
        assert_eq!(entry.authors[0].family, "Duan");
        assert_eq!(entry.authors[0].given.as_deref(), Some("J. A"));
        assert_eq!(entry.year, "2005");
    }

    #[rstest]
    #[case("Smith, John. 2000a. Title.", "2000a")]
    #[case("Smith, John. 1951–1961. Title.", "1951–1961")]
    #[case("Smith, John. 1917 [1903]. Title.", "1917 [1903]")]
    #[case("Smith, John. (forthcoming). Title.", "forthcoming")]
    #[case("Smith, John. (n.d.). Title.", "n.d.")]
    fn test_standard_entry_year_shapes(#[case] line: &str, #[case] year: &str) {
        let entry = grammar().parse_line(line).unwrap();
        assert_eq!(entry.year, year);
    }

    #[test]
    fn test_standard_entry_elision_marker_becomes_author_slot() {
        // "ym." loses its period to the author/year separator; the marker
        // still splits off into an author slot of its own.
        let entry = grammar()
            .parse_line("Itkonen, Terho ym. 1992. Jokin teos.")
            .unwrap();
        assert_eq!(entry.authors.len(), 2);
        assert_eq!(entry.authors[0].family, "Itkonen");
        assert_eq!(entry.authors[0].given.as_deref(), Some("Terho"));
        assert_eq!(entry.authors[1].family, "ym");
        assert_eq!(entry.authors[1].given, None);
        assert_eq!(entry.year, "1992");
    }

    #[rstest]
    #[case("This is ordinary prose without a year.")]
    #[case("")]
    #[case("   ")]
    #[case("Helsinki 2000. Printed by the university.")]
    #[case("2000. A year first is no author.")]
    fn test_non_entries_are_skipped(#[case] line: &str) {
        assert_eq!(grammar().parse_line(line), None);
    }

    #[test]
    fn test_glossary_entry_without_year() {
        let entry = grammar()
            .parse_line("SSA = Suomen sanojen alkuperä. Helsinki: SKS.")
            .unwrap();
        assert_eq!(entry.authors.len(), 1);
        assert_eq!(entry.authors[0].family, "SSA");
        assert_eq!(entry.authors[0].given, None);
        assert_eq!(entry.year, "");
        assert_eq!(entry.canonical_key(), "SSA");
    }

    #[test]
    fn test_glossary_entry_with_trailing_year() {
        let entry = grammar()
            .parse_line("NS 1951–1961 = Nykysuomen sanakirja. Porvoo: WSOY.")
            .unwrap();
        assert_eq!(entry.authors.len(), 1);
        assert_eq!(entry.authors[0].family, "NS");
        assert_eq!(entry.year, "1951–1961");
        assert_eq!(entry.canonical_key(), "NS 1951–1961");
    }

    #[test]
    fn test_glossary_head_must_be_period_free() {
        // A period on the left-hand side disqualifies the glossary grammar.
        assert_eq!(grammar().parse_line("P. Virtanen = something else"), None);
    }

    #[test]
    fn test_standard_takes_precedence_over_glossary() {
        // Matches the standard grammar even though an "=" follows later.
        let entry = grammar()
            .parse_line("Smith, John. 2000. Equations = trouble. Press.")
            .unwrap();
        assert_eq!(entry.authors[0].family, "Smith");
        assert_eq!(entry.year, "2000");
    }

    #[test]
    fn test_editor_in_own_parens_after_given_names() {
        let entry = grammar()
            .parse_line("Smith, John. (ed.). 2000. A handbook. Press.")
            .unwrap();
        assert_eq!(entry.authors.len(), 1);
        assert_eq!(entry.authors[0].family, "Smith");
        assert_eq!(entry.year, "2000");
    }

    #[test]
    fn test_no_period_after_authors_option() {
        let line = "Smith, John 2000. An example. Press.";
        assert_eq!(grammar().parse_line(line).map(|e| e.year), None);

        let entry = styled(StyleOptions {
            no_period_after_authors: true,
            ..Default::default()
        })
        .parse_line(line)
        .unwrap();
        assert_eq!(entry.authors[0].family, "Smith");
        assert_eq!(entry.year, "2000");
    }

    #[test]
    fn test_colon_after_year_option() {
        let line = "Smith, John. 2000: An example. Press.";
        assert_eq!(grammar().parse_line(line), None);

        let entry = styled(StyleOptions {
            colon_after_year: true,
            ..Default::default()
        })
        .parse_line(line)
        .unwrap();
        assert_eq!(entry.year, "2000");
    }

    #[test]
    fn test_dash_between_authors_option() {
        let line = "Smith, John – Jones, Ann. 2000. An example. Press.";
        let entry = styled(StyleOptions {
            dash_between_authors: true,
            ..Default::default()
        })
        .parse_line(line)
        .unwrap();
        assert_eq!(entry.authors.len(), 2);
        assert_eq!(entry.authors[0].family, "Smith");
        assert_eq!(entry.authors[1].family, "Jones");
    }
}
