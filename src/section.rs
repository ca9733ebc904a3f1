//! References-section line classifier.
//!
//! A two-state machine: a line consisting solely of a section heading enters
//! references mode, a line starting with an appendix/footnote heading leaves
//! it. No other line affects the mode, and the entering and leaving heading
//! sets are disjoint, so the classifier cannot oscillate on a single line.

use crate::lang::Vocabulary;
use crate::regex::Regex;
use crate::utils::regex_escape;
use itertools::Itertools;

#[derive(Debug)]
pub(crate) struct SectionPatterns {
    enter: Regex,
    exit: Regex,
}

impl SectionPatterns {
    pub(crate) fn compile(vocab: &Vocabulary) -> Self {
        let enter = vocab
            .section_headings
            .iter()
            .map(|h| regex_escape(h))
            .join("|");
        let exit = vocab
            .section_exits
            .iter()
            .map(|h| regex_escape(h))
            .join("|");
        Self {
            enter: Regex::new(&format!(r"^(?:{})\s*$", enter)).expect("section entry pattern"),
            exit: Regex::new(&format!(r"^(?:{})\b", exit)).expect("section exit pattern"),
        }
    }

    /// Feeds one line through the state machine and returns the new mode.
    pub(crate) fn classify(&self, line: &str, in_refs: bool) -> bool {
        if !in_refs && self.enter.is_match(line) {
            true
        } else if in_refs && self.exit.is_match(line) {
            false
        } else {
            in_refs
        }
    }
}
