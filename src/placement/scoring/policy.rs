use std::collections::{BTreeMap, HashSet};

use super::config::PlacementConfig;
use crate::placement::domain::{LearningStyle, Subject, Tier};

/// Skill bracket used to pick recommendation templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelBracket {
    Low,
    Mid,
    High,
}

impl LevelBracket {
    pub fn of(level: u8) -> Self {
        match level {
            0..=3 => Self::Low,
            4..=7 => Self::Mid,
            _ => Self::High,
        }
    }
}

/// Age-implied tier, moved at most one step by the overall level.
pub(crate) fn assign_tier(age: Option<u32>, overall_level: u8, config: &PlacementConfig) -> Tier {
    let Some(age) = age else {
        return Tier::Explorers;
    };

    let base = if age <= config.early_explorers_max_age {
        Tier::EarlyExplorers
    } else if age <= config.explorers_max_age {
        Tier::Explorers
    } else {
        Tier::Warriors
    };

    if overall_level >= config.promote_at_level {
        Tier::from_index(base.index() + 1)
    } else if overall_level <= config.hold_back_at_level {
        Tier::from_index(base.index().saturating_sub(1))
    } else {
        base
    }
}

/// A single strictly dominant style wins; any tie for the lead is `Mixed`.
pub(crate) fn classify_style(votes: &BTreeMap<LearningStyle, usize>) -> LearningStyle {
    let top = votes.values().copied().max().unwrap_or(0);
    if top == 0 {
        return LearningStyle::Mixed;
    }

    let mut leaders = votes.iter().filter(|(_, count)| **count == top);
    match (leaders.next(), leaders.next()) {
        (Some((style, _)), None) => *style,
        _ => LearningStyle::Mixed,
    }
}

pub(crate) fn strength_phrase(subject: Subject) -> &'static str {
    match subject {
        Subject::Math => "Strong number sense and problem solving",
        Subject::Reading => "Confident reader who understands what they read",
        Subject::Writing => "Clear written expression and sentence structure",
    }
}

pub(crate) fn growth_phrase(subject: Subject) -> &'static str {
    match subject {
        Subject::Math => "Building number fluency and problem-solving confidence",
        Subject::Reading => "Growing decoding skills and reading comprehension",
        Subject::Writing => "Developing sentence structure and written expression",
    }
}

/// Strength and growth phrases for the highest and lowest assessed subjects; ties keep all.
pub(crate) fn strengths_and_growth(assessed: &[(Subject, u8)]) -> (Vec<String>, Vec<String>) {
    let (Some(high), Some(low)) = (
        assessed.iter().map(|(_, level)| *level).max(),
        assessed.iter().map(|(_, level)| *level).min(),
    ) else {
        return (Vec::new(), Vec::new());
    };

    let strengths = assessed
        .iter()
        .filter(|(_, level)| *level == high)
        .map(|(subject, _)| strength_phrase(*subject).to_string())
        .collect();
    let growth_areas = assessed
        .iter()
        .filter(|(_, level)| *level == low)
        .map(|(subject, _)| growth_phrase(*subject).to_string())
        .collect();

    (strengths, growth_areas)
}

pub(crate) fn subject_recommendation(subject: Subject, level: u8) -> &'static str {
    match (subject, LevelBracket::of(level)) {
        (Subject::Math, LevelBracket::Low) => {
            "Rebuild math foundations with hands-on counting and manipulatives before abstract practice"
        }
        (Subject::Math, LevelBracket::Mid) => {
            "Keep math on track with short daily problem-solving challenges"
        }
        (Subject::Math, LevelBracket::High) => {
            "Stretch math with multi-step word problems and early algebraic thinking"
        }
        (Subject::Reading, LevelBracket::Low) => {
            "Use guided phonics sessions and decodable books to build reading fluency"
        }
        (Subject::Reading, LevelBracket::Mid) => {
            "Pair shared reading with a comprehension check-in after each chapter"
        }
        (Subject::Reading, LevelBracket::High) => {
            "Advance to independent chapter books with written reading responses"
        }
        (Subject::Writing, LevelBracket::Low) => {
            "Scaffold writing with sentence frames and graphic organizers"
        }
        (Subject::Writing, LevelBracket::Mid) => {
            "Practice paragraph writing with a plan, draft and revise routine"
        }
        (Subject::Writing, LevelBracket::High) => {
            "Introduce creative and persuasive writing projects with peer feedback"
        }
    }
}

pub(crate) fn style_recommendation(style: LearningStyle) -> Option<&'static str> {
    match style {
        LearningStyle::Visual => Some("Lead lessons with diagrams and colour-coded notes"),
        LearningStyle::Kinesthetic => {
            Some("Build movement and hands-on activities into every lesson")
        }
        LearningStyle::Auditory => {
            Some("Explain new ideas out loud and encourage read-aloud practice")
        }
        LearningStyle::Mixed => None,
    }
}

pub(crate) fn recommendations(assessed: &[(Subject, u8)], style: LearningStyle) -> Vec<String> {
    let mut recommendations: Vec<String> = assessed
        .iter()
        .map(|(subject, level)| subject_recommendation(*subject, *level).to_string())
        .collect();

    if let Some(note) = style_recommendation(style) {
        recommendations.push(note.to_string());
    }

    recommendations
}

fn support_strategies(indicator_id: &str) -> &'static [&'static str] {
    match indicator_id {
        "nd-1" => &[
            "Short lesson blocks with movement breaks",
            "Visual timers to structure focus periods",
        ],
        "nd-2" => &[
            "Multisensory phonics with tracing and letter tiles",
            "Dyslexia-friendly fonts and extra spacing",
        ],
        "nd-3" => &[
            "Quiet, low-stimulation learning space",
            "Noise-reducing headphones during focused work",
        ],
        "nd-4" => &[
            "Predictable lesson routine with a visual schedule",
            "Visual timers to structure focus periods",
        ],
        _ => &["Share observations with the tutor to shape a tailored support plan"],
    }
}

/// Support strategies once enough indicators are affirmative; deduplicated in first-seen order.
pub(crate) fn neurodivergent_supports(
    affirmative_indicators: &[String],
    config: &PlacementConfig,
) -> Vec<String> {
    if affirmative_indicators.is_empty() || affirmative_indicators.len() < config.support_threshold
    {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    affirmative_indicators
        .iter()
        .flat_map(|id| support_strategies(id).iter())
        .filter(|strategy| seen.insert(**strategy))
        .map(|strategy| strategy.to_string())
        .collect()
}

/// Weakest assessed subject; ties resolve in subject order.
pub(crate) fn weakest_subject(assessed: &[(Subject, u8)]) -> Option<Subject> {
    assessed
        .iter()
        .min_by_key(|(subject, level)| (*level, *subject))
        .map(|(subject, _)| *subject)
}

pub(crate) fn start_quest(tier: Tier, weakest: Option<Subject>) -> &'static str {
    match (tier, weakest) {
        (Tier::EarlyExplorers, None) => "early-explorers-orientation",
        (Tier::EarlyExplorers, Some(Subject::Math)) => "counting-meadow",
        (Tier::EarlyExplorers, Some(Subject::Reading)) => "letter-sound-forest",
        (Tier::EarlyExplorers, Some(Subject::Writing)) => "story-scribbles",
        (Tier::Explorers, None) => "explorers-orientation",
        (Tier::Explorers, Some(Subject::Math)) => "multiplication-mountain",
        (Tier::Explorers, Some(Subject::Reading)) => "chapter-book-caves",
        (Tier::Explorers, Some(Subject::Writing)) => "paragraph-harbor",
        (Tier::Warriors, None) => "warriors-orientation",
        (Tier::Warriors, Some(Subject::Math)) => "algebra-arena",
        (Tier::Warriors, Some(Subject::Reading)) => "literary-labyrinth",
        (Tier::Warriors, Some(Subject::Writing)) => "essay-expedition",
    }
}
