// src/context/predict.rs — Tool recommendations and learning path

use serde::{Deserialize, Serialize};

use crate::context::profile::LearningProfile;

/// Ratio above which a tool is worth recommending again.
const RECOMMEND_THRESHOLD: f64 = 0.6;
/// Ratio below which a tool is a predicted friction point.
const CHALLENGE_THRESHOLD: f64 = 0.4;
/// How many tools to recommend at most.
const MAX_RECOMMENDED: usize = 2;
/// How many frequently-used tools the learning path appends.
const PATH_TOOLS: usize = 3;

/// What the user should reach for next, derived from usage history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Tools the user succeeds with, best first. At most two.
    pub recommended_tools: Vec<String>,
    /// One line per tool the user struggles with.
    pub predicted_challenges: Vec<String>,
    /// Foundational tool first, then the user's most-used tools.
    pub optimal_learning_path: Vec<String>,
}

/// Build the prediction for a user.
///
/// "Ratio" is the raw success counter divided by the tool's total event
/// count, computed on demand - distinct from the windowed learning
/// progress. Tools the user never touched contribute nothing.
pub(crate) fn build(
    profile: &LearningProfile,
    tool_counts: &[(String, usize)],
    foundational_tool: &str,
) -> Prediction {
    let ratios: Vec<(&str, f64)> = tool_counts
        .iter()
        .map(|(tool, count)| (tool.as_str(), profile.success_ratio(tool, *count)))
        .collect();

    let mut recommended: Vec<(&str, f64)> = ratios
        .iter()
        .copied()
        .filter(|(_, ratio)| *ratio > RECOMMEND_THRESHOLD)
        .collect();
    recommended.sort_by(|a, b| b.1.total_cmp(&a.1));
    let recommended_tools: Vec<String> = recommended
        .into_iter()
        .take(MAX_RECOMMENDED)
        .map(|(tool, _)| tool.to_string())
        .collect();

    let predicted_challenges: Vec<String> = ratios
        .iter()
        .filter(|(_, ratio)| *ratio < CHALLENGE_THRESHOLD)
        .map(|(tool, _)| format!("Possible friction with {tool} - extra support is available"))
        .collect();

    // Learning path: foundation first, then most-used tools, de-duplicated
    // preserving first occurrence.
    let mut by_count: Vec<(&str, usize)> = tool_counts
        .iter()
        .map(|(tool, count)| (tool.as_str(), *count))
        .collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1));

    let mut optimal_learning_path: Vec<String> = vec![foundational_tool.to_string()];
    for (tool, _) in by_count.into_iter().take(PATH_TOOLS) {
        if !optimal_learning_path.iter().any(|t| t == tool) {
            optimal_learning_path.push(tool.to_string());
        }
    }

    Prediction {
        recommended_tools,
        predicted_challenges,
        optimal_learning_path,
    }
}
