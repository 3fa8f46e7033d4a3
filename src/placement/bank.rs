use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer};

use super::domain::{AnswerValue, QuestionCategory, QuestionKind, QuizQuestion};

const STANDARD_BANK_CSV: &str = include_str!("data/question_bank.csv");

/// Ordered, validated set of quiz questions with an id index.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<QuizQuestion>,
    index: HashMap<String, usize>,
}

impl QuestionBank {
    /// Questions bundled with the crate, parsed once per process.
    pub fn standard() -> &'static QuestionBank {
        static STANDARD: OnceLock<QuestionBank> = OnceLock::new();
        STANDARD.get_or_init(|| {
            QuestionBank::from_reader(STANDARD_BANK_CSV.as_bytes())
                .expect("embedded question bank is valid")
        })
    }

    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuestionBankError> {
        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            validate_question(question)?;
            if index.insert(question.id.clone(), position).is_some() {
                return Err(QuestionBankError::DuplicateQuestion(question.id.clone()));
            }
        }

        Ok(Self { questions, index })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuestionBankError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut questions = Vec::new();
        for row in csv_reader.deserialize::<QuestionRow>() {
            questions.push(row?.into_question()?);
        }

        Self::new(questions)
    }

    /// Confirms the age question sits inside the prefix shown before the age is known,
    /// with only ungated questions ahead of it.
    ///
    /// Answering the age re-filters the visible list. Ungated questions keep their positions
    /// through that re-filter, so a session index pointing past the age question stays valid.
    pub fn ensure_age_question(
        &self,
        age_question_id: &str,
        preview_len: usize,
    ) -> Result<(), QuestionBankError> {
        let position = match self.index.get(age_question_id) {
            Some(position) if *position < preview_len => *position,
            _ => {
                return Err(QuestionBankError::MissingAgeQuestion {
                    id: age_question_id.to_string(),
                    preview_len,
                })
            }
        };

        match self.questions[..position]
            .iter()
            .find(|question| question.age_range.is_some())
        {
            Some(gated) => Err(QuestionBankError::GatedBeforeAgeQuestion {
                id: gated.id.clone(),
                age_question_id: age_question_id.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, id: &str) -> Option<&QuizQuestion> {
        self.index.get(id).map(|position| &self.questions[*position])
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn validate_question(question: &QuizQuestion) -> Result<(), QuestionBankError> {
    if question.id.trim().is_empty() {
        return Err(QuestionBankError::MissingId);
    }

    if let Some(weight) = question.skill_weight {
        if !(1..=5).contains(&weight) {
            return Err(QuestionBankError::InvalidWeight {
                id: question.id.clone(),
                weight,
            });
        }
    }

    if question.kind == QuestionKind::MultipleChoice && question.options.is_empty() {
        return Err(QuestionBankError::MissingOptions(question.id.clone()));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: String,
    category: String,
    question: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    options: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    correct_answer: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    skill_weight: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    age_range: Option<String>,
}

impl QuestionRow {
    fn into_question(self) -> Result<QuizQuestion, QuestionBankError> {
        let category = QuestionCategory::parse(&self.category).ok_or_else(|| {
            QuestionBankError::UnknownCategory {
                id: self.id.clone(),
                value: self.category.clone(),
            }
        })?;
        let kind =
            QuestionKind::parse(&self.kind).ok_or_else(|| QuestionBankError::UnknownKind {
                id: self.id.clone(),
                value: self.kind.clone(),
            })?;

        let skill_weight = match self.skill_weight.as_deref() {
            Some(raw) => Some(raw.parse::<u8>().map_err(|_| {
                QuestionBankError::InvalidWeight {
                    id: self.id.clone(),
                    weight: 0,
                }
            })?),
            None => None,
        };

        let options = self
            .options
            .map(|raw| {
                raw.split('|')
                    .map(|option| option.trim().to_string())
                    .filter(|option| !option.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let correct_answer = self.correct_answer.map(|raw| match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => AnswerValue::Numeric(number),
            _ => AnswerValue::Text(raw),
        });

        Ok(QuizQuestion {
            id: self.id,
            category,
            question: self.question,
            kind,
            options,
            correct_answer,
            skill_weight,
            age_range: self.age_range,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Failure loading or validating a question bank.
#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question bank CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("question without an id")]
    MissingId,
    #[error("duplicate question id '{0}'")]
    DuplicateQuestion(String),
    #[error("question '{id}' has skill weight {weight}; expected 1-5")]
    InvalidWeight { id: String, weight: u8 },
    #[error("multiple-choice question '{0}' has no options")]
    MissingOptions(String),
    #[error("question '{id}' has unknown category '{value}'")]
    UnknownCategory { id: String, value: String },
    #[error("question '{id}' has unknown type '{value}'")]
    UnknownKind { id: String, value: String },
    #[error("age question '{id}' must appear within the first {preview_len} questions")]
    MissingAgeQuestion { id: String, preview_len: usize },
    #[error("age-gated question '{id}' is asked before age question '{age_question_id}'")]
    GatedBeforeAgeQuestion { id: String, age_question_id: String },
}
