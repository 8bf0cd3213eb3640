//! Writing task shown to the learner and embedded in coaching prompts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingTask {
    pub title: String,
    pub description: String,
    /// Learning goals, one per rhetorical category.
    pub goals: Vec<String>,
}

impl Default for WritingTask {
    fn default() -> Self {
        Self {
            title: "議題探討：AI 與教育的未來".to_string(),
            description: "請撰寫一篇 200 字以內的短文，表達你對「AI 是否應該完全取代人類教師？」的看法。請包含明確的主張、支持的理由，以及具體的例子。".to_string(),
            goals: vec![
                "提出明確主張 (Claim)".to_string(),
                "提供證據/例子 (Evidence)".to_string(),
                "邏輯推論 (Reasoning)".to_string(),
            ],
        }
    }
}

/// Opening message of every coaching conversation.
pub const GREETING: &str = "你好！我是你的寫作教練。今天我們要探討 AI 是否應該取代人類教師。你不需要一開始就寫得很完美，試著先寫下你的核心觀點，我會引導你完善論述。";
