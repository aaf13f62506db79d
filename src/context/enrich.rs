// src/context/enrich.rs — Advisory bundle for the tool currently in use

use serde::{Deserialize, Serialize};

use crate::context::events::ToolUsageEvent;
use crate::context::profile::LearningProfile;

/// Difficulty when the user demonstrably masters the current tool.
const DIFFICULTY_ADVANCE: u8 = 7;
/// Neutral starting difficulty.
const DIFFICULTY_DEFAULT: u8 = 5;
/// Difficulty when the user struggles (or no signal exists yet).
const DIFFICULTY_EASE: u8 = 3;

/// Windowed progress above this means the tool is mastered.
const MASTERY_THRESHOLD: f64 = 0.8;
/// Windowed progress below this means the user needs support.
const STRUGGLE_THRESHOLD: f64 = 0.4;
/// Minimum ratio for a tool to qualify as a next-step suggestion.
const NEXT_STEP_THRESHOLD: f64 = 0.7;

/// The advisory bundle computed for a user+tool pair at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub personalized_tips: Vec<String>,
    pub recommended_next_steps: Vec<String>,
    /// 1-10 scale, defaults to 5.
    pub adaptive_difficulty: u8,
    pub contextual_reminders: Vec<String>,
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            personalized_tips: Vec::new(),
            recommended_next_steps: Vec::new(),
            adaptive_difficulty: DIFFICULTY_DEFAULT,
            contextual_reminders: Vec::new(),
        }
    }
}

/// Build the enrichment for the tool currently in use.
///
/// Pure over the profile, the last-window events for that tool, and the
/// per-tool event counts; no I/O. Rules are additive and applied in order,
/// none short-circuits another.
pub(crate) fn build(
    profile: &LearningProfile,
    current_tool: &str,
    recent_events: &[&ToolUsageEvent],
    tool_counts: &[(String, usize)],
) -> Enrichment {
    let mut enrichment = Enrichment::default();
    let patterns = &profile.tool_usage_patterns;

    // Writing-style tip
    if let Some(style) = &profile.content_preferences.writing_style {
        enrichment
            .personalized_tips
            .push(format!("Based on your writing style: lean into {style} language"));
    }

    // Best proven tool other than the current one, as a next step.
    // Windowed progress when available, normalized success count otherwise.
    let best_other = tool_counts
        .iter()
        .filter(|(tool, _)| tool != current_tool)
        .filter_map(|(tool, count)| {
            let ratio = patterns
                .learning_progress
                .get(tool)
                .copied()
                .unwrap_or_else(|| profile.success_ratio(tool, *count));
            (ratio >= NEXT_STEP_THRESHOLD).then_some((tool, ratio))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((tool, _)) = best_other {
        enrichment
            .recommended_next_steps
            .push(format!("You're doing well with {tool} - give it another go"));
    }

    // Adaptive difficulty from windowed progress. No data yet counts as
    // low confidence and lands in the reassurance branch.
    match patterns.learning_progress.get(current_tool) {
        Some(&progress) if progress > MASTERY_THRESHOLD => {
            enrichment.adaptive_difficulty = DIFFICULTY_ADVANCE;
            enrichment
                .personalized_tips
                .push("You've mastered this - try the advanced options".into());
        }
        Some(&progress) if progress < STRUGGLE_THRESHOLD => {
            enrichment.adaptive_difficulty = DIFFICULTY_EASE;
            enrichment
                .personalized_tips
                .push("Take your time - we'll walk you through it step by step".into());
        }
        None => {
            enrichment.adaptive_difficulty = DIFFICULTY_EASE;
            enrichment
                .personalized_tips
                .push("Take your time - we'll walk you through it step by step".into());
        }
        _ => {}
    }

    // Resilience reminder after a recent failure with this tool
    if recent_events.iter().any(|e| !e.success) {
        enrichment
            .contextual_reminders
            .push("Remember: every expert started as a beginner. Keep practicing!".into());
    }

    // Progress celebration, independent of the difficulty tip above
    if patterns
        .learning_progress
        .get(current_tool)
        .is_some_and(|&p| p > MASTERY_THRESHOLD)
    {
        enrichment
            .contextual_reminders
            .push("Amazing! You've made real progress with this tool".into());
    }

    enrichment
}
