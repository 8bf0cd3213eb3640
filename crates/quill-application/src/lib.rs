pub mod coaching_session;

pub use coaching_session::{AnalysisReport, CoachingSession, SendOutcome};
