#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod gateway;
pub mod import;
pub mod mastery;
pub mod models;
pub mod retry;
pub mod view;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fetch::{FetchTicket, RequestSequence};
pub use fingerprint::fingerprint;
pub use gateway::{ProblemGateway, QuestionGateway};
pub use import::{parse_batch, run_import, ImportReport};
pub use mastery::PendingUpdates;
pub use models::{
    CodingProblem, Difficulty, MasteryLevel, MasteryStats, NewQuestion, ProblemStats,
    QuestionItem, StudyStatus,
};
pub use view::{
    category_counts, unique_sources, Filter, FilterState, Filterable, FilteredView, ToggleMap,
};
