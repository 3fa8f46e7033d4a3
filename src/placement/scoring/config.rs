use serde::{Deserialize, Serialize};

use crate::placement::filter::DEFAULT_PREVIEW_LEN;

/// Thresholds and lookups applied by the placement rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub age_question_id: String,
    pub preview_len: usize,
    pub baseline_level: u8,
    pub scale_min: f64,
    pub scale_max: f64,
    pub early_explorers_max_age: u32,
    pub explorers_max_age: u32,
    pub promote_at_level: u8,
    pub hold_back_at_level: u8,
    pub style_question_ids: Vec<String>,
    pub support_threshold: usize,
    pub affirmative_scale_value: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            age_question_id: "bg-1".to_string(),
            preview_len: DEFAULT_PREVIEW_LEN,
            baseline_level: 5,
            scale_min: 1.0,
            scale_max: 5.0,
            early_explorers_max_age: 7,
            explorers_max_age: 10,
            promote_at_level: 8,
            hold_back_at_level: 3,
            style_question_ids: vec!["bg-2".to_string(), "bg-3".to_string(), "bg-4".to_string()],
            support_threshold: 2,
            affirmative_scale_value: 4.0,
        }
    }
}
