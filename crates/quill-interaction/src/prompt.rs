//! Prompt assembly for the scaffolding coach.

use quill_core::responder::CoachingRequest;
use quill_core::task::WritingTask;

const BLANK_DRAFT_MARKER: &str = "(目前是空白的)";

/// Builds the system instruction for a coaching agent working on `task`.
pub fn system_instruction(task: &WritingTask) -> String {
    format!(
        "你是一個基於「鷹架理論 (Scaffolding Theory)」的寫作與邏輯教練。
你的目標對象是大眾學習者或大學生。

當前任務：{title}
{description}

核心原則：
1. **絕對不要直接幫學生寫文章**。
2. 你的角色是引導思考 (Critical Thinking Guide)。
3. 根據學生的文章內容，檢查是否有「主張 (Claim)」、「證據 (Evidence)」與「推論 (Reasoning)」。
4. 鷹架策略：
- 如果內容太簡短，引導他們舉例。
- 如果邏輯不通，用反問句引導他們思考漏洞。
- 如果觀點單一，鼓勵他們思考反面論點 (Counter-argument)。
5. 語氣要鼓勵、客觀、具啟發性。
6. 請用繁體中文回答。",
        title = task.title,
        description = task.description,
    )
}

/// Renders a coaching request as the user prompt.
pub fn user_prompt(request: &CoachingRequest) -> String {
    let draft = if request.draft.trim().is_empty() {
        BLANK_DRAFT_MARKER
    } else {
        request.draft.as_str()
    };

    let history = request
        .history
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "[學生目前的文章草稿]:\n{draft}\n\n[學生提出的問題/對話]:\n{message}\n\n[對話歷史]:\n{history}",
        message = request.message,
    )
}
