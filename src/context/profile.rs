// src/context/profile.rs — Learning profile: materialized view over the usage log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::context::events::{ToolUsageEvent, UsageLog};
use crate::context::seed::SeedContext;
use crate::infra::config::EngineConfig;

/// Read-mostly personality fields, sourced from the cold-start seed.
/// The engine never mutates these itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalityInsights {
    pub communication_style: Option<String>,
    #[serde(default)]
    pub relationship_goals: Vec<String>,
    /// 0-10 scale, absent when the scan never ran.
    pub confidence_level: Option<u8>,
    /// 0-10 scale, absent when the scan never ran.
    pub social_energy: Option<u8>,
}

/// Usage-derived aggregates, recomputed on every tracked event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolUsagePatterns {
    /// Most-used tools first, capped (top 3 by default).
    pub preferred_tools: Vec<String>,
    /// Running count of successful events per tool. A raw counter, not a
    /// normalized rate; consumers that need a rate divide by the tool's
    /// event count on demand.
    pub success_rate: HashMap<String, u32>,
    /// Success ratio over the most recent window (last 10 events) per tool.
    pub learning_progress: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPreferences {
    pub writing_style: Option<String>,
    pub humor_level: u8,
    pub formality_level: u8,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Default for ContentPreferences {
    fn default() -> Self {
        Self {
            writing_style: None,
            humor_level: 5,
            formality_level: 5,
            topics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehavioralPatterns {
    /// Successful events / total events across all tools.
    pub completion_rate: f64,
    /// Reserved for future derivation; currently always zero.
    pub consistency_score: f64,
    /// Reserved for future derivation; currently always zero.
    pub adaptation_speed: f64,
}

/// The derived, continuously-updated personalization record for one user.
///
/// Never the source of truth for raw events: a materialized view over the
/// usage log plus a one-time cold-start seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningProfile {
    pub user_id: String,
    pub personality_insights: PersonalityInsights,
    pub tool_usage_patterns: ToolUsagePatterns,
    pub content_preferences: ContentPreferences,
    pub behavioral_patterns: BehavioralPatterns,
    pub last_updated: DateTime<Utc>,
}

impl LearningProfile {
    /// Build a fresh profile from an optional cold-start seed.
    /// An absent seed yields an empty-but-valid profile.
    pub fn from_seed(user_id: &str, seed: Option<SeedContext>) -> Self {
        let seed = seed.unwrap_or_default();
        Self {
            user_id: user_id.to_string(),
            personality_insights: PersonalityInsights {
                communication_style: seed.communication_style,
                relationship_goals: seed.relationship_goals,
                confidence_level: seed.confidence_level,
                social_energy: seed.social_energy,
            },
            tool_usage_patterns: ToolUsagePatterns::default(),
            content_preferences: ContentPreferences {
                writing_style: seed.writing_style,
                humor_level: seed.humor_level.unwrap_or(5),
                formality_level: seed.formality_level.unwrap_or(5),
                topics: seed.preferred_topics,
            },
            behavioral_patterns: BehavioralPatterns::default(),
            last_updated: Utc::now(),
        }
    }

    /// Success ratio for one tool: success count / total event count.
    /// Computed on demand, distinct from the windowed learning progress.
    pub fn success_ratio(&self, tool_id: &str, total_count: usize) -> f64 {
        if total_count == 0 {
            return 0.0;
        }
        let successes = self
            .tool_usage_patterns
            .success_rate
            .get(tool_id)
            .copied()
            .unwrap_or(0);
        successes as f64 / total_count as f64
    }
}

/// In-memory map of profiles, keyed by user id. Process-lifetime cache;
/// whole users are never evicted.
#[derive(Default)]
pub struct ProfileStore {
    profiles: HashMap<String, LearningProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.profiles.contains_key(user_id)
    }

    pub fn get(&self, user_id: &str) -> Option<&LearningProfile> {
        self.profiles.get(user_id)
    }

    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut LearningProfile> {
        self.profiles.get_mut(user_id)
    }

    pub fn insert(&mut self, profile: LearningProfile) {
        self.profiles.insert(profile.user_id.clone(), profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Incremental profile update, invoked once per tracked event.
/// The event must already be appended to the log.
pub fn apply_event(
    profile: &mut LearningProfile,
    log: &UsageLog,
    config: &EngineConfig,
    event: &ToolUsageEvent,
) {
    let patterns = &mut profile.tool_usage_patterns;

    // 1. Running success counter
    if event.success {
        *patterns.success_rate.entry(event.tool_id.clone()).or_insert(0) += 1;
    }

    // 2. Preferred tools: top-N by total event count, ties by first-seen
    let mut counts = log.tool_counts(&profile.user_id);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    patterns.preferred_tools = counts
        .into_iter()
        .take(config.preferred_tools)
        .map(|(tool, _)| tool)
        .collect();

    // 3. Windowed learning progress for this tool
    let window = log.recent(&profile.user_id, &event.tool_id, config.progress_window);
    if !window.is_empty() {
        let successes = window.iter().filter(|e| e.success).count();
        patterns
            .learning_progress
            .insert(event.tool_id.clone(), successes as f64 / window.len() as f64);
    }

    // 4. Completion rate across the entire log
    profile.behavioral_patterns.completion_rate = log.completion_rate(&profile.user_id);

    // 5.
    profile.last_updated = Utc::now();
}
