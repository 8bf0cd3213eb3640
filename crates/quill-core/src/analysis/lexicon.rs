//! Keyword lexicon for rhetorical categories.
//!
//! Matching is raw substring containment against the draft: no tokenization,
//! no stemming, no word boundaries. A keyword anywhere in the text is a hit.

use serde::{Deserialize, Serialize};

/// Logical connectors ("because", "therefore", "however", ...).
pub const CONNECTORS: &[&str] = &[
    "因為", "所以", "因此", "然而", "但是", "雖然", "此外", "總之", "反之",
];

/// Evidentiary markers ("for example", "according to", "research", ...).
pub const EVIDENCE_MARKERS: &[&str] = &["例如", "比如", "根據", "數據", "研究", "例子", "事實上"];

/// Stance markers ("I think", "I believe", "position", ...).
pub const STANCE_MARKERS: &[&str] = &["我認為", "我覺得", "主張", "觀點", "應當", "不應", "相信"];

/// Presence flags for the three rhetorical categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub has_connector: bool,
    pub has_evidence: bool,
    pub has_opinion: bool,
}

impl Classification {
    /// True when claim, evidence and reasoning are all present.
    pub fn is_complete(&self) -> bool {
        self.has_connector && self.has_evidence && self.has_opinion
    }
}

/// Classifies `text` against the built-in keyword sets.
pub fn classify(text: &str) -> Classification {
    Classification {
        has_connector: contains_any(text, CONNECTORS),
        has_evidence: contains_any(text, EVIDENCE_MARKERS),
        has_opinion: contains_any(text, STANCE_MARKERS),
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
