use crate::error::Result;
use crate::models::{
    CodingProblem, Difficulty, MasteryLevel, MasteryStats, NewQuestion, ProblemStats,
    QuestionItem, StudyStatus,
};

/// CRUD/listing boundary for question records. The backend acknowledges
/// writes with a bare success message, so mutating calls return `()` and
/// callers patch their local copies (see [`crate::mastery`]).
pub trait QuestionGateway {
    fn list_all(&self) -> Result<Vec<QuestionItem>>;
    fn list_by_category(&self, category: &str) -> Result<Vec<QuestionItem>>;
    fn list_categories(&self) -> Result<Vec<String>>;
    fn mastery_stats(&self) -> Result<MasteryStats>;
    /// Fails with a validation error if any field is empty after trimming;
    /// implementations must validate before going to the network.
    fn create(&self, question: &NewQuestion) -> Result<()>;
    fn update(&self, id: i64, question: &NewQuestion) -> Result<()>;
    fn update_mastery(&self, id: i64, level: MasteryLevel) -> Result<()>;
    fn delete(&self, id: i64) -> Result<()>;
}

/// Listing boundary for externally-sourced coding problems. Read-only
/// except for the study status.
pub trait ProblemGateway {
    fn list_all(&self) -> Result<Vec<CodingProblem>>;
    fn list_by_source(&self, source: &str) -> Result<Vec<CodingProblem>>;
    fn list_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<CodingProblem>>;
    /// May be transiently unavailable; implementations retry a bounded
    /// number of times before surfacing the failure.
    fn daily(&self) -> Result<CodingProblem>;
    fn daily_history(&self) -> Result<Vec<CodingProblem>>;
    fn random(&self) -> Result<CodingProblem>;
    fn stats(&self) -> Result<ProblemStats>;
    fn update_study_status(&self, id: i64, status: StudyStatus) -> Result<()>;
}
