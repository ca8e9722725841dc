//! Report text segmentation.
//!
//! The model returns the report as plain text with a light structure
//! convention: a line opening with an `N.` enumerator is a numbered
//! finding, a blank line is a paragraph break, anything else is prose.
//! Renderers consume the block list instead of re-deriving the rule.

use std::sync::OnceLock;

/// One rendering block of a report, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportBlock {
    /// Line carrying a leading `N.` enumerator, verbatim.
    Item(String),
    /// Non-blank prose line, verbatim.
    Paragraph(String),
    /// Blank (whitespace-only) line.
    Break,
}

/// Split report text into rendering blocks, one block per input line.
pub fn segment_report(text: &str) -> Vec<ReportBlock> {
    static ENUMERATOR_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = ENUMERATOR_RE.get_or_init(|| regex::Regex::new(r"^\d+\.").unwrap());

    text.split('\n')
        .map(|line| {
            if re.is_match(line) {
                ReportBlock::Item(line.to_string())
            } else if line.trim().is_empty() {
                ReportBlock::Break
            } else {
                ReportBlock::Paragraph(line.to_string())
            }
        })
        .collect()
}
