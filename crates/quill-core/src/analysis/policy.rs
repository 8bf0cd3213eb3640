//! Structural analysis policy.
//!
//! Maps a draft and its [`Classification`] to exactly one [`Verdict`]. The
//! checks form a strict priority chain: the first failing check decides the
//! outcome and later checks are never consulted.

use serde::{Deserialize, Serialize};

use super::lexicon::Classification;

/// Drafts shorter than this (in characters) are judged too short.
pub const MIN_CHARS: usize = 50;
/// Drafts longer than this (in characters) earn the length bonus.
pub const LONG_DRAFT_CHARS: usize = 100;
/// Base of the mastery floor every analysis raises the learner to.
pub const BASE_MASTERY_FLOOR: u8 = 40;
/// Extra floor for drafts longer than [`LONG_DRAFT_CHARS`].
pub const LONG_DRAFT_BONUS: u8 = 10;

/// The five mutually exclusive outcomes of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    InsufficientLength,
    MissingStance,
    MissingEvidence,
    Disconnected,
    CompleteStructure,
}

impl Verdict {
    /// Mastery delta contributed to the floor.
    pub fn mastery_delta(self) -> u8 {
        match self {
            Verdict::InsufficientLength => 0,
            Verdict::MissingStance => 2,
            Verdict::MissingEvidence | Verdict::Disconnected => 5,
            Verdict::CompleteStructure => 20,
        }
    }

    /// Short English description, used in logs and status lines.
    pub fn summary(self) -> &'static str {
        match self {
            Verdict::InsufficientLength => "insufficient length, needs causal connective expansion",
            Verdict::MissingStance => "missing explicit stance",
            Verdict::MissingEvidence => "stance present but lacking concrete evidence",
            Verdict::Disconnected => "sentences are logically disconnected",
            Verdict::CompleteStructure => "complete structure, suggest addressing counter-argument",
        }
    }

    /// Whether this outcome puts the learner's cognitive load back to optimal.
    pub fn resets_cognitive_load(self) -> bool {
        matches!(self, Verdict::CompleteStructure)
    }

    fn diagnostic(self, char_count: usize) -> String {
        match self {
            Verdict::InsufficientLength => format!(
                "[字數不足] 目前僅 {char_count} 字。試著運用「因為...所以...」的句型來擴充你的論點，解釋為什麼你會有這樣的想法。"
            ),
            Verdict::MissingStance => "[觀點不明] 文章似乎在描述現象，但缺少了你的核心主張。請試著加入「我認為...」或「我的主張是...」來明確表達立場。".to_string(),
            Verdict::MissingEvidence => "[缺乏證據] 你提出了明確的觀點，這很好！但若能加入「例如...」或「根據...」來提供具體例子，說服力會大幅提升。".to_string(),
            Verdict::Disconnected => "[邏輯連接] 你的句子之間較為獨立。試著使用「然而」、「因此」或「此外」這些連接詞，讓文章讀起來更流暢。".to_string(),
            Verdict::CompleteStructure => "[表現優異] 結構完整！包含了明確主張、具體證據與邏輯連接。建議你可以挑戰反面論點：思考一下反對你的人會怎麼說？".to_string(),
        }
    }
}

/// Outcome of a single analysis run.
///
/// Ephemeral: a session only keeps the most recent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    /// Learner-facing coaching sentence.
    pub diagnostic_text: String,
    pub mastery_delta: u8,
    /// Length of the analyzed draft in Unicode scalar values.
    pub char_count: usize,
}

impl AnalysisResult {
    /// The value mastery is raised to (at least) by this result.
    ///
    /// `40 + delta + (char_count > 100 ? 10 : 0)`. Applies to every verdict,
    /// including the too-short one.
    pub fn mastery_floor(&self) -> u8 {
        let bonus = if self.char_count > LONG_DRAFT_CHARS {
            LONG_DRAFT_BONUS
        } else {
            0
        };
        BASE_MASTERY_FLOOR + self.mastery_delta + bonus
    }
}

/// Evaluates a draft against its classification.
pub fn evaluate(text: &str, classification: &Classification) -> AnalysisResult {
    let char_count = text.chars().count();

    let verdict = if char_count < MIN_CHARS {
        Verdict::InsufficientLength
    } else if !classification.has_opinion {
        Verdict::MissingStance
    } else if !classification.has_evidence {
        Verdict::MissingEvidence
    } else if !classification.has_connector {
        Verdict::Disconnected
    } else {
        Verdict::CompleteStructure
    };

    AnalysisResult {
        verdict,
        diagnostic_text: verdict.diagnostic(char_count),
        mastery_delta: verdict.mastery_delta(),
        char_count,
    }
}
