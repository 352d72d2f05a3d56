//! Candidate-line pre-filter
//!
//! Reduces a full document to the subset of lines plausibly describing
//! physical assets, so the LLM sees kilobytes instead of megabytes. The
//! filter is recall-biased: false positives are resolved downstream by the
//! model, but a dropped asset mention is unrecoverable.

use crate::keywords::{ASSET_KEYWORDS, EXCLUDE_KEYWORDS};
use std::collections::BTreeSet;
use tracing::debug;

/// Number of lines pulled in after a matching line.
const CONTEXT_LINES: usize = 2;

/// Configuration for the keyword filter
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Hard cap on output lines
    pub max_lines: usize,

    /// Terms that include a line (substring, case-insensitive)
    pub asset_vocabulary: Vec<String>,

    /// Terms that drop a line unconditionally, even over an asset match
    pub exclusion_vocabulary: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_lines: 5000,
            asset_vocabulary: ASSET_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            exclusion_vocabulary: EXCLUDE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The keyword pre-filter
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    config: FilterConfig,
}

impl KeywordFilter {
    /// Create a filter with the given configuration
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Reduce `text` to its candidate lines.
    ///
    /// Each line is lowercased and tested against the exclusion vocabulary
    /// first; an excluded line never contributes, even if it also contains
    /// an asset term. An asset-term match includes the line and the next
    /// two lines; a line contributes once no matter how many keywords hit
    /// it. Output preserves original line order, deduplicated, truncated
    /// to `max_lines`. Returns an empty string when nothing matches.
    pub fn filter(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let mut selected: BTreeSet<usize> = BTreeSet::new();

        // Exclusion is absolute: an excluded line neither matches nor gets
        // pulled in as context of a neighboring match.
        let excluded: Vec<bool> = lines
            .iter()
            .map(|line| {
                let lower = line.to_lowercase();
                self.config
                    .exclusion_vocabulary
                    .iter()
                    .any(|term| lower.contains(term.as_str()))
            })
            .collect();

        let excluded_count = excluded.iter().filter(|&&e| e).count();
        let mut matched_count = 0usize;

        for (i, line) in lines.iter().enumerate() {
            if excluded[i] {
                continue;
            }

            let lower = line.to_lowercase();
            if self
                .config
                .asset_vocabulary
                .iter()
                .any(|term| lower.contains(term.as_str()))
            {
                matched_count += 1;
                for j in i..(i + 1 + CONTEXT_LINES).min(lines.len()) {
                    if !excluded[j] {
                        selected.insert(j);
                    }
                }
            }
        }

        debug!(
            total_lines = lines.len(),
            excluded = excluded_count,
            matched = matched_count,
            candidate_lines = selected.len(),
            "keyword filter pass"
        );

        let candidates: Vec<&str> = selected
            .iter()
            .take(self.config.max_lines)
            .map(|&idx| lines[idx])
            .collect();

        candidates.join("\n")
    }
}

/// Filter `text` with the default vocabularies, capped at `max_lines`.
pub fn filter_candidate_lines(text: &str, max_lines: usize) -> String {
    KeywordFilter::new(FilterConfig {
        max_lines,
        ..FilterConfig::default()
    })
    .filter(text)
}
