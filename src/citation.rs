//! Citation-candidate extraction from body text.
//!
//! Two independent scans run over every line outside the references section.
//!
//! The *possible-citation* scan collects bare capitalized tokens ("SSA",
//! "KKTK") that could be glossary abbreviations. They never become citations
//! themselves; the checker only uses them to suppress spurious "uncited"
//! warnings for single-word glossary entries.
//!
//! The *span* scan extracts structured citations: an author head (optional
//! given-initial, optional particle, surname), an optional elision marker or
//! `&`-joined co-authors, an optional possessive, and a locator — either one
//! or more year/status groups with optional page numbers, or a bare
//! page/volume/`s.v.` locator. The original implementation drove this with a
//! single backtracking pattern; here the same grammar runs as anchored
//! component patterns over the line, which keeps the lookaround-free regex
//! engine sufficient and makes the precedence rules explicit.

use crate::lang::Vocabulary;
use crate::reference::YEAR_RANGE;
use crate::regex::Regex;
use crate::utils::split_before;
use crate::{Citation, CitedAuthor, NameForm, StyleOptions};
use compact_str::CompactString;

/// Uppercase letters recognized at the start of surnames and abbreviations.
const UPPER: &str = "A-ZÅÄÖÜČŠŽ";
/// Lowercase letters paired with [`UPPER`] in initial tokens.
const LOWER: &str = "a-zåäöüčšž";
/// Characters allowed inside a surname after its leading capital.
const NAME_BODY: &str = r"A-Za-zÀ-\u{1FFE}'’-";
/// Characters allowed in the term words of an `s.v.` locator.
const TERM_WORD: &str = r"A-Za-zÀ-\u{1FFE}*-";

/// Everything one line of body text contributed.
#[derive(Debug, Default)]
pub(crate) struct LineScan {
    pub(crate) citations: Vec<Citation>,
    pub(crate) possible: Vec<CompactString>,
}

#[derive(Debug)]
pub(crate) struct CitationGrammar {
    possible: Regex,
    possible_excl: Regex,
    candidate: Regex,
    initial: Regex,
    particle: Regex,
    surname: Regex,
    elision: Regex,
    coauthor_sep: Regex,
    possessive: Regex,
    ws: Regex,
    year: Regex,
    status: Regex,
    pages: Regex,
    semi: Regex,
    alt_locator: Regex,
    year_groups: Regex,
    volume: Regex,
    classify_initials: Regex,
    classify_split: Regex,
    elision_full: Regex,
}

impl CitationGrammar {
    pub(crate) fn compile(vocab: &Vocabulary, style: &StyleOptions) -> Self {
        let coauthor_sep = if style.dash_between_authors {
            r"^\s+(?:&|[–—-])\s+"
        } else {
            r"^\s+&\s+"
        };
        let particle = r"(?:[Dd][aei]|[Tt]e|[Vv]an\s+[Dd]er|[Vv][ao]n)\s+";
        let surname = format!(r"[{UPPER}][{NAME_BODY}]+");
        let year = format!(r"{YEAR_RANGE}[a-z]?(?:\s+\[{YEAR_RANGE}\])?");
        let pages = r":\s*[0-9IVXivx]+(?:[ ,–-]+[0-9IVXivx]+)*";
        let loose_markers = vocab.elision_alternation(true);
        let strict_markers = vocab.elision_alternation(false);
        let status = vocab.status_alternation();

        Self {
            possible: Regex::new(&format!(r"\b[{UPPER}]\S*[{UPPER}]\S*\b"))
                .expect("possible-citation pattern"),
            possible_excl: Regex::new(r"^\s*(?::|[0-9]{4})").expect("possible exclusion pattern"),
            candidate: Regex::new(&format!(
                r"(?:[{UPPER}]\.\s+)?(?:{particle})?{surname}"
            ))
            .expect("candidate pattern"),
            initial: Regex::new(&format!(r"^[{UPPER}]\.\s+")).expect("initial pattern"),
            particle: Regex::new(&format!("^{particle}")).expect("particle pattern"),
            surname: Regex::new(&format!("^{surname}")).expect("surname pattern"),
            elision: Regex::new(&format!(r"^\s+(?:{loose_markers})")).expect("elision pattern"),
            coauthor_sep: Regex::new(coauthor_sep).expect("co-author separator pattern"),
            possessive: Regex::new(r"^['’]s").expect("possessive pattern"),
            ws: Regex::new(r"^\s+").expect("whitespace pattern"),
            year: Regex::new(&format!("^{year}")).expect("year pattern"),
            status: Regex::new(&format!(r"^\(?(?:{status})")).expect("status pattern"),
            pages: Regex::new(&format!("^{pages}")).expect("pages pattern"),
            semi: Regex::new(r"^;\s+").expect("semicolon pattern"),
            alt_locator: Regex::new(&format!(
                r"^\s*\(?(?:[0-9]{{1,2}}|[IVX]+)?(?:{pages}|:?\s*s\.\s*v\.\s*[{TERM_WORD}]+(?:[ ,–-]+[{TERM_WORD}]+)*)(?:;\s+)?"
            ))
            .expect("page/cross-reference locator pattern"),
            year_groups: Regex::new(r"(?:^\s*|;\s*|\s*\()([^;:,.()]*\w[^;:,.()]+)")
                .expect("year group pattern"),
            volume: Regex::new(r"^[0-9IVX]{1,3}\b").expect("volume pattern"),
            classify_initials: Regex::new(&format!(r"^((?:[{UPPER}][{LOWER}]*\.\s*)+)(.*)"))
                .expect("initials classification pattern"),
            classify_split: Regex::new(&format!(
                r"\s+({strict_markers}|[{UPPER}][{LOWER}]*\.)"
            ))
            .expect("classification split pattern"),
            elision_full: Regex::new(&format!(r"^(?:{loose_markers})$"))
                .expect("elision marker pattern"),
        }
    }

    /// Runs both scans over one line of body text.
    pub(crate) fn scan_line(&self, line: &str) -> LineScan {
        let mut scan = LineScan::default();

        for m in self.possible.find_iter(line) {
            if !self.possible_excl.is_match(&line[m.end()..]) {
                scan.possible.push(CompactString::from(m.as_str()));
            }
        }

        let mut pos = 0;
        while pos < line.len() {
            let Some(m) = self.candidate.find(&line[pos..]) else {
                break;
            };
            let start = pos + m.start();
            let next = start + line[start..].chars().next().map_or(1, char::len_utf8);
            if !word_boundary_before(line, start) {
                pos = next;
                continue;
            }
            match self.try_span(line, start) {
                Some((citations, end)) => {
                    scan.citations.extend(citations);
                    pos = end;
                }
                None => pos = next,
            }
        }

        scan
    }

    /// Attempts to read a citation span starting exactly at `start`. The
    /// optional given-initial and particle are retried absent, in that
    /// order, mirroring the backtracking of the original pattern.
    fn try_span(&self, line: &str, start: usize) -> Option<(Vec<Citation>, usize)> {
        [(true, true), (true, false), (false, true), (false, false)]
            .into_iter()
            .find_map(|(with_initial, with_particle)| {
                self.try_span_with(line, start, with_initial, with_particle)
            })
    }

    fn try_span_with(
        &self,
        line: &str,
        start: usize,
        with_initial: bool,
        with_particle: bool,
    ) -> Option<(Vec<Citation>, usize)> {
        let mut p = start;
        if with_initial {
            p += self.initial.find(&line[p..])?.end();
        }
        if with_particle {
            p += self.particle.find(&line[p..])?.end();
        }
        let sm = self.surname.find(&line[p..])?;
        p += sm.end();
        p -= possessive_overhang(&line[start..p]);

        let mut chunks: Vec<(usize, usize)> = Vec::new();
        if let Some(m) = self.elision.find(&line[p..]) {
            p += m.end();
            chunks.push((start, p));
        } else {
            chunks.push((start, p));
            while let Some(sep) = self.coauthor_sep.find(&line[p..]) {
                let chunk_start = p + sep.end();
                let Some(end) = self
                    .coauthor_end(line, chunk_start, true)
                    .or_else(|| self.coauthor_end(line, chunk_start, false))
                else {
                    break;
                };
                chunks.push((chunk_start, end));
                p = end;
            }
        }

        if let Some(m) = self.possessive.find(&line[p..]) {
            p += m.end();
        }

        let end = self
            .years_locator_end(line, p)
            .or_else(|| self.alt_locator.find(&line[p..]).map(|m| p + m.end()))?;
        let locator = &line[p..end];

        let authors: Vec<CitedAuthor> = chunks
            .iter()
            .map(|&(s, e)| self.classify(&line[s..e]))
            .collect();
        if authors.is_empty() {
            return None;
        }

        let groups: Vec<&str> = self
            .year_groups
            .captures_iter(locator)
            .map(|c| c.get(1).expect("year group").as_str().trim())
            .collect();

        let mut citations = Vec::new();
        if groups.is_empty() {
            citations.push(Citation {
                authors,
                locator: CompactString::new(""),
            });
        } else {
            for group in groups {
                // A bare short numeral is a reference-work volume, not a year.
                if !self.volume.is_match(group) {
                    citations.push(Citation {
                        authors: authors.clone(),
                        locator: group.into(),
                    });
                }
            }
        }
        Some((citations, end))
    }

    /// One co-author after a separator: optional particle plus surname.
    fn coauthor_end(&self, line: &str, start: usize, with_particle: bool) -> Option<usize> {
        let mut p = start;
        if with_particle {
            p += self.particle.find(&line[p..])?.end();
        }
        let sm = self.surname.find(&line[p..])?;
        p += sm.end();
        Some(p - possessive_overhang(&line[start..p]))
    }

    /// The year-form locator: whitespace, then one or more groups of
    /// `(`? year-or-status, boundary check, pages?, `; `?.
    fn years_locator_end(&self, line: &str, p: usize) -> Option<usize> {
        let ws = self.ws.find(&line[p..])?;
        let mut pos = p + ws.end();
        let mut any = false;
        loop {
            let mut q = pos;
            if line[q..].starts_with('(') {
                q += 1;
            }
            let tok_end = if let Some(m) = self.year.find(&line[q..]) {
                q + m.end()
            } else if let Some(m) = self.status.find(&line[q..]) {
                q + m.end()
            } else {
                break;
            };
            if next_is_word(line, tok_end) {
                break;
            }
            let mut r = tok_end;
            if let Some(m) = self.pages.find(&line[r..]) {
                r += m.end();
            }
            if let Some(m) = self.semi.find(&line[r..]) {
                r += m.end();
            }
            pos = r;
            any = true;
        }
        any.then_some(pos)
    }

    /// Classifies one author chunk of a span by its written shape.
    fn classify(&self, chunk: &str) -> CitedAuthor {
        if let Some(caps) = self.classify_initials.captures(chunk) {
            let initials = caps.get(1).expect("initials").as_str().trim_end();
            let family = caps.get(2).expect("family").as_str();
            if !family.is_empty() {
                return CitedAuthor {
                    family: family.into(),
                    form: NameForm::Initials(initials.into()),
                };
            }
        }
        let parts = split_before(chunk, &self.classify_split);
        if parts.len() > 1 {
            let last = *parts.last().expect("token");
            let form = if self.elision_full.is_match(last) {
                NameForm::Elided(last.into())
            } else {
                NameForm::Initials(last.into())
            };
            return CitedAuthor {
                family: parts[0].into(),
                form,
            };
        }
        CitedAuthor::bare(chunk)
    }
}

/// Byte length of a possessive `'s` ending the matched surname run, so it
/// can be given back before the possessive marker is consumed separately.
fn possessive_overhang(surname: &str) -> usize {
    if surname.ends_with("'s") {
        2
    } else if surname.ends_with("’s") {
        '’'.len_utf8() + 1
    } else {
        0
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn word_boundary_before(line: &str, pos: usize) -> bool {
    line[..pos].chars().next_back().is_none_or(|c| !is_word_char(c))
}

fn next_is_word(line: &str, pos: usize) -> bool {
    line[pos..].chars().next().is_some_and(is_word_char)
}
