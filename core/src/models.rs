use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A question record with all metadata, as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionItem {
    /// Backend-assigned identifier, immutable after creation
    pub id: i64,
    /// Grouping label, free text (not a fixed enumeration)
    pub category: String,
    /// Question text (markdown)
    pub content: String,
    /// Answer text (markdown)
    pub answer: String,
    /// Per-question study state, cycled by user action
    #[serde(default)]
    pub mastery_level: MasteryLevel,
    pub ctime: DateTime<Utc>,
    pub utime: DateTime<Utc>,
}

/// Payload for creating or updating a question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewQuestion {
    pub content: String,
    pub answer: String,
    pub category: String,
}

impl NewQuestion {
    pub fn new(content: &str, answer: &str, category: &str) -> Self {
        NewQuestion {
            content: content.trim().to_string(),
            answer: answer.trim().to_string(),
            category: category.trim().to_string(),
        }
    }

    /// Every field must be non-empty after trimming. The error names the
    /// first offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("content", &self.content),
            ("answer", &self.answer),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("field '{}' is required", name)));
            }
        }
        Ok(())
    }
}

/// Mastery state, stored as an integer on the wire (0/1/2)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum MasteryLevel {
    #[default]
    Unlearned,
    Learning,
    Mastered,
}

impl MasteryLevel {
    /// The state a toggle advances to: (n + 1) mod 3
    pub fn next(self) -> Self {
        match self {
            MasteryLevel::Unlearned => MasteryLevel::Learning,
            MasteryLevel::Learning => MasteryLevel::Mastered,
            MasteryLevel::Mastered => MasteryLevel::Unlearned,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MasteryLevel::Unlearned => "unlearned",
            MasteryLevel::Learning => "learning",
            MasteryLevel::Mastered => "mastered",
        }
    }
}

impl std::fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for MasteryLevel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(MasteryLevel::Unlearned),
            1 => Ok(MasteryLevel::Learning),
            2 => Ok(MasteryLevel::Mastered),
            other => Err(format!("mastery level out of range: {}", other)),
        }
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> u8 {
        level as u8
    }
}

/// An externally-sourced coding problem. Read-only from the client's side
/// except for `study_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodingProblem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw difficulty label as stored by the backend; may be the English
    /// word or its localized equivalent (see [`Difficulty::from_label`])
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Origin site name, e.g. "leetcode"
    pub source: String,
    #[serde(default)]
    pub source_id: String,
    /// Outbound link to the problem on the origin site
    pub source_url: String,
    #[serde(default)]
    pub study_status: StudyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_studied: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_daily_problem: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_hot100: bool,
    pub ctime: DateTime<Utc>,
    pub utime: DateTime<Utc>,
}

/// Canonical difficulty bucket. Localized and English labels collapse to
/// the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Canonicalize a stored or user-supplied label. English labels match
    /// case-insensitively; unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "简单" => Some(Difficulty::Easy),
            "中等" => Some(Difficulty::Medium),
            "困难" => Some(Difficulty::Hard),
            other => match other.to_lowercase().as_str() {
                "easy" => Some(Difficulty::Easy),
                "medium" => Some(Difficulty::Medium),
                "hard" => Some(Difficulty::Hard),
                _ => None,
            },
        }
    }

    /// Lowercase filter key used by the view and the backend routes
    pub fn bucket(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("Easy"),
            Difficulty::Medium => f.write_str("Medium"),
            Difficulty::Hard => f.write_str("Hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::from_label(s)
            .ok_or_else(|| Error::Validation(format!("unknown difficulty '{}'", s)))
    }
}

/// Study progress on a coding problem
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StudyStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl StudyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudyStatus::NotStarted => "not_started",
            StudyStatus::InProgress => "in_progress",
            StudyStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StudyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "not_started" => Ok(StudyStatus::NotStarted),
            "in_progress" => Ok(StudyStatus::InProgress),
            "completed" => Ok(StudyStatus::Completed),
            other => Err(Error::Validation(format!(
                "unknown study status '{}' (expected not_started, in_progress or completed)",
                other
            ))),
        }
    }
}

/// Mastery breakdown across the whole question bank
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MasteryStats {
    pub total: u64,
    pub unlearned: u64,
    pub learning: u64,
    pub mastered: u64,
}

/// Difficulty breakdown across the coding problem set
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemStats {
    pub total: u64,
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_mastery_cycle_wraps() {
        assert_eq!(MasteryLevel::Unlearned.next(), MasteryLevel::Learning);
        assert_eq!(MasteryLevel::Learning.next(), MasteryLevel::Mastered);
        assert_eq!(MasteryLevel::Mastered.next(), MasteryLevel::Unlearned);
    }

    #[test]
    fn test_mastery_level_wire_format() {
        let level: MasteryLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level, MasteryLevel::Mastered);
        assert_eq!(serde_json::to_string(&MasteryLevel::Learning).unwrap(), "1");
        assert!(serde_json::from_str::<MasteryLevel>("3").is_err());
    }

    #[test]
    fn test_mastery_level_defaults_when_absent() {
        let item: QuestionItem = serde_json::from_str(
            r#"{
                "id": 1,
                "category": "Go",
                "content": "什么是 goroutine?",
                "answer": "轻量级线程",
                "ctime": "2024-01-01T00:00:00Z",
                "utime": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(item.mastery_level, MasteryLevel::Unlearned);
    }

    #[test]
    fn test_difficulty_label_equivalence() {
        assert_eq!(Difficulty::from_label("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("简单"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("中等"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("困难"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("unknown"), None);
    }

    #[test]
    fn test_study_status_wire_format() {
        let status: StudyStatus = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(status, StudyStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&StudyStatus::Completed).unwrap(),
            r#""completed""#
        );
    }

    #[test]
    fn test_new_question_validation() {
        let valid = NewQuestion::new("content", "answer", "Go");
        assert!(valid.validate().is_ok());

        let blank_category = NewQuestion::new("content", "answer", "   ");
        let err = blank_category.validate().unwrap_err();
        assert!(err.to_string().contains("category"));

        let blank_answer = NewQuestion::new("content", "", "Go");
        let err = blank_answer.validate().unwrap_err();
        assert!(err.to_string().contains("answer"));
    }

    #[test]
    fn test_new_question_trims_fields() {
        let question = NewQuestion::new("  what  ", " because ", " Go ");
        assert_eq!(question.content, "what");
        assert_eq!(question.answer, "because");
        assert_eq!(question.category, "Go");
    }
}
