//! Rule-based structural analysis of a learner's draft.
//!
//! - `lexicon`: keyword classifier (`classify`, `Classification`)
//! - `policy`: decision chain from classification to verdict (`evaluate`, `AnalysisResult`)

mod lexicon;
mod policy;

pub use lexicon::{CONNECTORS, Classification, EVIDENCE_MARKERS, STANCE_MARKERS, classify};
pub use policy::{
    AnalysisResult, BASE_MASTERY_FLOOR, LONG_DRAFT_BONUS, LONG_DRAFT_CHARS, MIN_CHARS, Verdict,
    evaluate,
};

/// Classifies and evaluates `text` in one step.
pub fn analyze(text: &str) -> AnalysisResult {
    evaluate(text, &classify(text))
}
