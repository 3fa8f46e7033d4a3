use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::{AnswerValue, QuizAnswer, QuizQuestion};
use super::filter::filter_questions_with_preview;
use super::scoring::PlacementConfig;

/// Caller-owned quiz progress. Transitions consume the session and return the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    answers: Vec<QuizAnswer>,
    current_index: usize,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn age(&self, config: &PlacementConfig) -> Option<u32> {
        self.answers
            .iter()
            .take(self.current_index)
            .find(|answer| answer.question_id == config.age_question_id)
            .and_then(|answer| answer.answer.as_age())
    }

    pub fn visible_questions<'b>(
        &self,
        bank: &'b QuestionBank,
        config: &PlacementConfig,
    ) -> Vec<&'b QuizQuestion> {
        filter_questions_with_preview(bank.questions(), self.age(config), config.preview_len)
    }

    pub fn current_question<'b>(
        &self,
        bank: &'b QuestionBank,
        config: &PlacementConfig,
    ) -> Option<&'b QuizQuestion> {
        self.visible_questions(bank, config)
            .get(self.current_index)
            .copied()
    }

    /// Records an answer for the current question, dropping anything answered after it.
    pub fn answer(
        mut self,
        bank: &QuestionBank,
        config: &PlacementConfig,
        value: AnswerValue,
        time_spent: Option<u32>,
    ) -> Self {
        let Some(question) = self.current_question(bank, config) else {
            return self;
        };

        let answer = QuizAnswer {
            question_id: question.id.clone(),
            is_correct: question.grade(&value),
            answer: value,
            time_spent,
        };

        self.answers.truncate(self.current_index);
        self.answers.push(answer);
        self.current_index += 1;
        self
    }

    /// Steps back one question; the next answer replaces the one stepped over.
    pub fn previous(mut self) -> Self {
        self.current_index = self.current_index.saturating_sub(1);
        self
    }

    pub fn is_complete(&self, bank: &QuestionBank, config: &PlacementConfig) -> bool {
        let visible = self.visible_questions(bank, config);
        !visible.is_empty() && self.current_index >= visible.len()
    }

    /// Answers in presentation order, ready for scoring.
    pub fn into_answers(mut self) -> Vec<QuizAnswer> {
        self.answers.truncate(self.current_index);
        self.answers
    }
}
