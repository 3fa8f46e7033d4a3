use std::collections::BTreeMap;

use tracing::debug;

use super::config::PlacementConfig;
use crate::placement::bank::QuestionBank;
use crate::placement::domain::{
    AnswerValue, LearningStyle, QuestionCategory, QuizAnswer, QuizQuestion, Subject,
};

const AFFIRMATIVE_ANSWERS: [&str; 3] = ["often", "yes", "always"];

/// Option positions on style-revealing questions.
const STYLE_BY_OPTION: [LearningStyle; 3] = [
    LearningStyle::Visual,
    LearningStyle::Kinesthetic,
    LearningStyle::Auditory,
];

/// Running total for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubjectScore {
    pub level: u8,
    pub assessed: bool,
}

pub(crate) struct ScoreSignals {
    pub age: Option<u32>,
    pub subjects: BTreeMap<Subject, SubjectScore>,
    pub style_votes: BTreeMap<LearningStyle, usize>,
    /// Question ids of neurodivergent indicators answered affirmatively, in answer order.
    pub affirmative_indicators: Vec<String>,
}

impl ScoreSignals {
    pub fn level(&self, subject: Subject) -> u8 {
        self.subjects
            .get(&subject)
            .map(|score| score.level)
            .unwrap_or_default()
    }

    pub fn assessed(&self) -> impl Iterator<Item = (Subject, u8)> + '_ {
        self.subjects
            .iter()
            .filter(|(_, score)| score.assessed)
            .map(|(subject, score)| (*subject, score.level))
    }
}

pub(crate) fn collect_signals(
    answers: &[QuizAnswer],
    bank: &QuestionBank,
    config: &PlacementConfig,
) -> ScoreSignals {
    let mut totals: BTreeMap<Subject, (i32, bool)> =
        Subject::ALL.iter().map(|subject| (*subject, (0, false))).collect();
    let mut age = None;
    let mut style_votes = BTreeMap::new();
    let mut affirmative_indicators = Vec::new();

    for answer in answers {
        let Some(question) = bank.get(&answer.question_id) else {
            debug!(question_id = %answer.question_id, "skipping answer for unknown question");
            continue;
        };

        if question.id == config.age_question_id {
            age = answer.answer.as_age();
        }

        if let Some(subject) = question.category.subject() {
            if let Some(contribution) = subject_contribution(question, answer, config) {
                let entry = totals.entry(subject).or_insert((0, false));
                entry.0 += contribution;
                entry.1 = true;
            }
        }

        if config.style_question_ids.contains(&question.id) {
            if let Some(style) = question
                .option_index(&answer.answer)
                .and_then(|index| STYLE_BY_OPTION.get(index))
            {
                *style_votes.entry(*style).or_insert(0) += 1;
            }
        }

        if question.category == QuestionCategory::Neurodivergent
            && is_affirmative(&answer.answer, config)
        {
            affirmative_indicators.push(question.id.clone());
        }
    }

    let baseline = i32::from(config.baseline_level);
    let subjects = totals
        .into_iter()
        .map(|(subject, (total, assessed))| {
            let level = (baseline + total).clamp(1, 10) as u8;
            (subject, SubjectScore { level, assessed })
        })
        .collect();

    ScoreSignals {
        age,
        subjects,
        style_votes,
        affirmative_indicators,
    }
}

/// Signed movement of a subject level caused by one answer.
pub(crate) fn subject_contribution(
    question: &QuizQuestion,
    answer: &QuizAnswer,
    config: &PlacementConfig,
) -> Option<i32> {
    if question.correct_answer.is_some() {
        let correct = answer
            .is_correct
            .or_else(|| question.grade(&answer.answer))
            .unwrap_or(false);
        let weight = i32::from(question.weight());
        return Some(if correct { weight } else { -((weight + 1) / 2) });
    }

    let position = scale_position(question, &answer.answer, config)?;
    let normalized = 1.0 + 9.0 * position;
    let delta = (normalized - f64::from(config.baseline_level)) / 2.0;
    Some(delta.round() as i32)
}

/// Where a self-report answer sits on its scale, from 0.0 (lowest) to 1.0 (highest).
fn scale_position(
    question: &QuizQuestion,
    answer: &AnswerValue,
    config: &PlacementConfig,
) -> Option<f64> {
    if let Some(value) = scale_value(answer) {
        let span = config.scale_max - config.scale_min;
        if span <= 0.0 {
            return None;
        }
        let clamped = value.clamp(config.scale_min, config.scale_max);
        return Some((clamped - config.scale_min) / span);
    }

    let index = question.option_index(answer)?;
    let last = question.options.len().checked_sub(1).filter(|last| *last > 0)?;
    Some(index as f64 / last as f64)
}

/// Numeric reading of a scale answer. Infinities are kept so they clamp to the nearest bound.
fn scale_value(answer: &AnswerValue) -> Option<f64> {
    let value = match answer {
        AnswerValue::Numeric(value) => *value,
        AnswerValue::Text(raw) => raw.trim().parse::<f64>().ok()?,
    };
    (!value.is_nan()).then_some(value)
}

fn is_affirmative(answer: &AnswerValue, config: &PlacementConfig) -> bool {
    if let AnswerValue::Text(raw) = answer {
        let normalized = raw.trim().to_ascii_lowercase();
        if AFFIRMATIVE_ANSWERS.contains(&normalized.as_str()) {
            return true;
        }
    }

    answer
        .as_number()
        .map(|value| value >= config.affirmative_scale_value)
        .unwrap_or(false)
}
