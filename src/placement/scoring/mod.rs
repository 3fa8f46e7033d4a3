mod config;
mod policy;
mod rules;

pub use config::PlacementConfig;

use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::bank::QuestionBank;
use super::domain::{PlacementResult, QuizAnswer, Subject};

/// Stateless scorer applying the placement rubric to a finished answer list.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    config: PlacementConfig,
    bank: Arc<QuestionBank>,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig, bank: Arc<QuestionBank>) -> Self {
        Self { config, bank }
    }

    /// Engine over the bundled question bank with default thresholds.
    pub fn standard() -> Self {
        Self::new(
            PlacementConfig::default(),
            Arc::new(QuestionBank::standard().clone()),
        )
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Scores the answers. Unknown question ids are skipped, so this never fails.
    pub fn score(&self, answers: &[QuizAnswer]) -> PlacementResult {
        let signals = rules::collect_signals(answers, &self.bank, &self.config);

        let math_level = signals.level(Subject::Math);
        let reading_level = signals.level(Subject::Reading);
        let writing_level = signals.level(Subject::Writing);
        let overall_level = overall_level(math_level, reading_level, writing_level);

        let tier = policy::assign_tier(signals.age, overall_level, &self.config);
        let learning_style = policy::classify_style(&signals.style_votes);

        let assessed: Vec<(Subject, u8)> = signals.assessed().collect();
        let (strengths, growth_areas) = policy::strengths_and_growth(&assessed);
        let recommendations = policy::recommendations(&assessed, learning_style);
        let neurodivergent_supports =
            policy::neurodivergent_supports(&signals.affirmative_indicators, &self.config);
        let recommended_start_quest =
            policy::start_quest(tier, policy::weakest_subject(&assessed)).to_string();

        debug!(
            answers = answers.len(),
            tier = tier.label(),
            overall_level,
            "placement scored"
        );

        PlacementResult {
            tier,
            math_level,
            reading_level,
            writing_level,
            overall_level,
            learning_style,
            strengths,
            growth_areas,
            recommendations,
            neurodivergent_supports,
            recommended_start_quest,
        }
    }
}

/// Scores answers against the bundled bank with default thresholds.
pub fn calculate_placement(answers: &[QuizAnswer]) -> PlacementResult {
    static ENGINE: OnceLock<PlacementEngine> = OnceLock::new();
    ENGINE.get_or_init(PlacementEngine::standard).score(answers)
}

/// Nearest integer to the mean of the three subject levels, clamped to 1-10.
pub fn overall_level(math: u8, reading: u8, writing: u8) -> u8 {
    let sum = u32::from(math) + u32::from(reading) + u32::from(writing);
    ((sum + 1) / 3).clamp(1, 10) as u8
}
