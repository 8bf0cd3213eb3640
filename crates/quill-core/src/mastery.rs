//! Learner mastery model.
//!
//! `mastery` is a bounded score in `[0, 100]` that never goes down within a
//! session. Every update either raises it or leaves it where it is.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// Mastery every session starts at.
pub const INITIAL_MASTERY: u8 = 30;
/// Upper bound of the mastery score.
pub const MAX_MASTERY: u8 = 100;
/// Mastery gained for each successful coaching exchange.
pub const COACHING_INCREMENT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveLoad {
    Low,
    Optimal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    Active,
    Passive,
}

/// Snapshot of the learner model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryState {
    pub mastery: u8,
    pub cognitive_load: CognitiveLoad,
    pub engagement: Engagement,
}

impl Default for MasteryState {
    fn default() -> Self {
        Self {
            mastery: INITIAL_MASTERY,
            cognitive_load: CognitiveLoad::Optimal,
            engagement: Engagement::Passive,
        }
    }
}

/// Owns a [`MasteryState`] and the rules for updating it.
#[derive(Debug, Clone, Default)]
pub struct MasteryModel {
    state: MasteryState,
}

impl MasteryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MasteryState {
        self.state
    }

    pub fn mastery(&self) -> u8 {
        self.state.mastery
    }

    /// Raises mastery to the result's floor (never lowers it) and resets the
    /// cognitive load when the draft was structurally complete.
    ///
    /// Returns the mastery after the update.
    pub fn apply_analysis(&mut self, result: &AnalysisResult) -> u8 {
        let floor = result.mastery_floor();
        self.state.mastery = self.state.mastery.max(floor).min(MAX_MASTERY);
        if result.verdict.resets_cognitive_load() {
            self.state.cognitive_load = CognitiveLoad::Optimal;
        }
        self.state.mastery
    }

    /// Credits a successful coaching exchange.
    pub fn apply_coaching_success(&mut self) -> u8 {
        self.state.mastery = self
            .state
            .mastery
            .saturating_add(COACHING_INCREMENT)
            .min(MAX_MASTERY);
        self.state.engagement = Engagement::Active;
        self.state.mastery
    }

    pub fn mark_engagement_active(&mut self) {
        self.state.engagement = Engagement::Active;
    }

    /// Overrides the cognitive load flag.
    pub fn set_cognitive_load(&mut self, load: CognitiveLoad) {
        self.state.cognitive_load = load;
    }
}
