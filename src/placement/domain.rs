use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for learners receiving a placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Area of the quiz a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionCategory {
    Background,
    Math,
    Reading,
    Writing,
    Neurodivergent,
}

impl QuestionCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "background" => Some(Self::Background),
            "math" => Some(Self::Math),
            "reading" => Some(Self::Reading),
            "writing" => Some(Self::Writing),
            "neurodivergent" => Some(Self::Neurodivergent),
            _ => None,
        }
    }

    /// Subject scored by answers in this category, if any.
    pub fn subject(self) -> Option<Subject> {
        match self {
            Self::Math => Some(Subject::Math),
            Self::Reading => Some(Subject::Reading),
            Self::Writing => Some(Subject::Writing),
            Self::Background | Self::Neurodivergent => None,
        }
    }
}

/// Presentation widget used for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    Scale,
    Text,
    Interactive,
}

impl QuestionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "multiple-choice" => Some(Self::MultipleChoice),
            "scale" => Some(Self::Scale),
            "text" => Some(Self::Text),
            "interactive" => Some(Self::Interactive),
            _ => None,
        }
    }
}

/// A selected option, a scale value, or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Numeric(f64),
    Text(String),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric reading of the answer; text is parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric(value) if value.is_finite() => Some(*value),
            Self::Numeric(_) => None,
            Self::Text(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Whole-year age reading; negative or non-finite values yield `None`.
    pub fn as_age(&self) -> Option<u32> {
        let value = self.as_number()?.round();
        (value >= 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
    }

    fn matches(&self, expected: &AnswerValue) -> bool {
        match (self, expected) {
            (Self::Text(given), Self::Text(expected)) => {
                given.trim().eq_ignore_ascii_case(expected.trim())
            }
            _ => match (self.as_number(), expected.as_number()) {
                (Some(given), Some(expected)) => (given - expected).abs() < 1e-9,
                _ => false,
            },
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Inclusive age band a question is shown to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    /// Parses `"min-max"`; anything else (including `min > max`) yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (min, max) = raw.trim().split_once('-')?;
        let min = min.trim().parse::<u32>().ok()?;
        let max = max.trim().parse::<u32>().ok()?;
        (min <= max).then_some(Self { min, max })
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }
}

/// Static quiz question loaded from the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub category: QuestionCategory,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_weight: Option<u8>,
    /// Raw `"min-max"` band; kept verbatim so malformed data stays visible to audits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
}

impl QuizQuestion {
    pub fn weight(&self) -> u8 {
        self.skill_weight.unwrap_or(1)
    }

    pub fn parsed_age_range(&self) -> Option<AgeRange> {
        self.age_range.as_deref().and_then(AgeRange::parse)
    }

    /// Grades an answer; `None` when the question has no correct answer.
    pub fn grade(&self, answer: &AnswerValue) -> Option<bool> {
        self.correct_answer
            .as_ref()
            .map(|expected| answer.matches(expected))
    }

    /// Zero-based position of the answer among the options.
    pub fn option_index(&self, answer: &AnswerValue) -> Option<usize> {
        match answer {
            AnswerValue::Text(raw) => self
                .options
                .iter()
                .position(|option| option.trim().eq_ignore_ascii_case(raw.trim())),
            AnswerValue::Numeric(_) => None,
        }
    }
}

/// One answer captured during a quiz session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: String,
    pub answer: AnswerValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    /// Seconds spent on the question; retained for analytics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

impl QuizAnswer {
    pub fn new(question_id: impl Into<String>, answer: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            answer,
            is_correct: None,
            time_spent: None,
        }
    }

    pub fn graded(question_id: impl Into<String>, answer: AnswerValue, correct: bool) -> Self {
        Self {
            is_correct: Some(correct),
            ..Self::new(question_id, answer)
        }
    }
}

/// Curriculum track, ordered from youngest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    EarlyExplorers,
    Explorers,
    Warriors,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::EarlyExplorers, Tier::Explorers, Tier::Warriors];

    pub fn index(self) -> usize {
        match self {
            Tier::EarlyExplorers => 0,
            Tier::Explorers => 1,
            Tier::Warriors => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::EarlyExplorers => "early-explorers",
            Tier::Explorers => "explorers",
            Tier::Warriors => "warriors",
        }
    }
}

/// Preferred input modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningStyle {
    Visual,
    Kinesthetic,
    Auditory,
    Mixed,
}

impl LearningStyle {
    pub fn label(self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Kinesthetic => "kinesthetic",
            LearningStyle::Auditory => "auditory",
            LearningStyle::Mixed => "mixed",
        }
    }
}

/// Scored subjects, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    Math,
    Reading,
    Writing,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Math, Subject::Reading, Subject::Writing];

    pub fn label(self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Reading => "reading",
            Subject::Writing => "writing",
        }
    }
}

/// Output of a completed placement quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub tier: Tier,
    pub math_level: u8,
    pub reading_level: u8,
    pub writing_level: u8,
    pub overall_level: u8,
    pub learning_style: LearningStyle,
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    pub recommendations: Vec<String>,
    pub neurodivergent_supports: Vec<String>,
    pub recommended_start_quest: String,
}

impl PlacementResult {
    pub fn level(&self, subject: Subject) -> u8 {
        match subject {
            Subject::Math => self.math_level,
            Subject::Reading => self.reading_level,
            Subject::Writing => self.writing_level,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} tier, overall level {} (math {}, reading {}, writing {}), {} learner",
            self.tier.label(),
            self.overall_level,
            self.math_level,
            self.reading_level,
            self.writing_level,
            self.learning_style.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_range_rejects_malformed_bands() {
        assert_eq!(AgeRange::parse("6-8"), Some(AgeRange { min: 6, max: 8 }));
        assert_eq!(AgeRange::parse(" 11 - 14 "), Some(AgeRange { min: 11, max: 14 }));
        assert_eq!(AgeRange::parse("8-6"), None);
        assert_eq!(AgeRange::parse("six-eight"), None);
        assert_eq!(AgeRange::parse("7"), None);
    }

    #[test]
    fn answer_values_deserialize_from_text_or_numbers() {
        let text: AnswerValue = serde_json::from_str("\"7\"").expect("text answer");
        let numeric: AnswerValue = serde_json::from_str("7").expect("numeric answer");
        assert_eq!(text, AnswerValue::text("7"));
        assert_eq!(numeric, AnswerValue::Numeric(7.0));
        assert_eq!(text.as_number(), numeric.as_number());
    }

    #[test]
    fn grading_compares_text_and_numbers_leniently() {
        let question = QuizQuestion {
            id: "math-x".to_string(),
            category: QuestionCategory::Math,
            question: "3 + 4".to_string(),
            kind: QuestionKind::MultipleChoice,
            options: vec!["6".to_string(), "7".to_string()],
            correct_answer: Some(AnswerValue::Numeric(7.0)),
            skill_weight: Some(2),
            age_range: None,
        };

        assert_eq!(question.grade(&AnswerValue::text(" 7 ")), Some(true));
        assert_eq!(question.grade(&AnswerValue::Numeric(6.0)), Some(false));
        assert_eq!(question.grade(&AnswerValue::text("seven")), Some(false));
    }

    #[test]
    fn tiers_serialize_in_kebab_case() {
        let json = serde_json::to_string(&Tier::EarlyExplorers).expect("serializes");
        assert_eq!(json, "\"early-explorers\"");
        assert!(Tier::EarlyExplorers < Tier::Explorers && Tier::Explorers < Tier::Warriors);
    }
}
