// src/context/insights.rs — Cross-tool insight summary

use serde::{Deserialize, Serialize};

use crate::context::profile::LearningProfile;

/// Ratio above which a tool counts as a strength.
const STRENGTH_THRESHOLD: f64 = 0.8;
/// Ratio below which a tool needs attention.
const IMPROVEMENT_THRESHOLD: f64 = 0.5;
/// Completion rate above which the user is considered consistent.
const CONSISTENCY_THRESHOLD: f64 = 0.8;

/// Human-readable summary of where the user stands across all tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub learning_recommendations: Vec<String>,
}

pub(crate) fn build(profile: &LearningProfile, tool_counts: &[(String, usize)]) -> Insights {
    let mut insights = Insights {
        strengths: Vec::new(),
        improvement_areas: Vec::new(),
        learning_recommendations: Vec::new(),
    };

    // First-seen tool order keeps the summary stable between calls
    for (tool, count) in tool_counts {
        let ratio = profile.success_ratio(tool, *count);
        let pct = (ratio * 100.0).round() as u32;
        if ratio > STRENGTH_THRESHOLD {
            insights
                .strengths
                .push(format!("Excellent at {tool} ({pct}% success)"));
        } else if ratio < IMPROVEMENT_THRESHOLD {
            insights
                .improvement_areas
                .push(format!("{tool} needs extra attention ({pct}% success)"));
        }
    }

    if profile.behavioral_patterns.completion_rate > CONSISTENCY_THRESHOLD {
        insights
            .learning_recommendations
            .push("You're very consistent - try the advanced features".into());
    }

    if let Some(style) = &profile.content_preferences.writing_style {
        insights
            .learning_recommendations
            .push(format!("Build on your {style} writing style across every tool"));
    }

    insights
}
