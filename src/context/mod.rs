// src/context/mod.rs — Cross-tool personalization context engine

pub mod enrich;
pub mod events;
pub mod insights;
pub mod predict;
pub mod profile;
pub mod seed;

use std::sync::Arc;
use tracing::warn;

use crate::infra::config::EngineConfig;
pub use enrich::Enrichment;
pub use events::ToolUsageEvent;
use events::UsageLog;
pub use insights::Insights;
pub use predict::Prediction;
pub use profile::LearningProfile;
use profile::ProfileStore;
use seed::{NullSeedSource, SeedContext, SeedSource};

/// One engine per process, handed by reference to every call site.
///
/// Owns the per-user usage log and profile cache; the injected seed source
/// is the only external collaborator. Callers serialize writes per user
/// (the HTTP layer wraps the engine in a mutex); the engine itself holds
/// no cross-request locking.
pub struct ContextEngine {
    config: EngineConfig,
    seed: Arc<dyn SeedSource>,
    mirror_profiles: bool,
    log: UsageLog,
    profiles: ProfileStore,
}

impl ContextEngine {
    pub fn new(config: EngineConfig, seed: Arc<dyn SeedSource>) -> Self {
        let log = UsageLog::new(config.max_events);
        Self {
            config,
            seed,
            mirror_profiles: false,
            log,
            profiles: ProfileStore::new(),
        }
    }

    /// Engine with default config and no external collaborator.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), Arc::new(NullSeedSource))
    }

    /// Mirror updated profiles back through the seed source after every
    /// tracked event (fire-and-forget).
    pub fn with_profile_mirroring(mut self, enabled: bool) -> Self {
        self.mirror_profiles = enabled;
        self
    }

    /// Current profile for a user, created on first access.
    ///
    /// Creation merges a best-effort cold-start seed with empty usage
    /// aggregates; a failed fetch logs and proceeds with defaults.
    /// Never fails, and never seeds the same user twice.
    pub async fn get_or_create(&mut self, user_id: &str) -> &LearningProfile {
        self.ensure_profile(user_id).await;
        self.profiles
            .get(user_id)
            .expect("profile present after ensure")
    }

    /// Record a tool interaction and synchronously update the profile.
    pub async fn track(&mut self, user_id: &str, event: ToolUsageEvent) {
        self.ensure_profile(user_id).await;
        self.log.append(user_id, event.clone());
        if let Some(profile) = self.profiles.get_mut(user_id) {
            profile::apply_event(profile, &self.log, &self.config, &event);
        }

        // Durable mirrors are fire-and-forget
        if let Err(e) = self.seed.record_event(user_id, &event).await {
            warn!("event mirror failed for {user_id}: {e:#}");
        }
        if self.mirror_profiles {
            if let Some(profile) = self.profiles.get(user_id) {
                if let Ok(snapshot) = serde_json::to_value(profile) {
                    if let Err(e) = self.seed.save_context(user_id, &snapshot).await {
                        warn!("profile mirror failed for {user_id}: {e:#}");
                    }
                }
            }
        }
    }

    /// Convenience form of [`track`](Self::track) for plain identifiers.
    pub async fn track_usage(
        &mut self,
        user_id: &str,
        tool_id: &str,
        action: &str,
        success: bool,
        data: Option<serde_json::Value>,
    ) {
        let mut event = ToolUsageEvent::new(tool_id, action, success);
        event.data = data;
        self.track(user_id, event).await;
    }

    /// Advisory bundle for the tool currently in use.
    /// Pure over profile state: identical output until the next track call.
    pub async fn enrich(
        &mut self,
        user_id: &str,
        current_tool: &str,
        _extra: Option<serde_json::Value>,
    ) -> Enrichment {
        self.ensure_profile(user_id).await;
        let profile = match self.profiles.get(user_id) {
            Some(p) => p,
            None => return Enrichment::default(),
        };
        let recent = self
            .log
            .recent(user_id, current_tool, self.config.reminder_window);
        let counts = self.log.tool_counts(user_id);
        enrich::build(profile, current_tool, &recent, &counts)
    }

    /// Rank tools by historical success and propose a learning path.
    pub async fn predict(&mut self, user_id: &str) -> Prediction {
        self.ensure_profile(user_id).await;
        let profile = match self.profiles.get(user_id) {
            Some(p) => p,
            None => {
                return predict::build(
                    &LearningProfile::from_seed(user_id, None),
                    &[],
                    &self.config.foundational_tool,
                )
            }
        };
        let counts = self.log.tool_counts(user_id);
        predict::build(profile, &counts, &self.config.foundational_tool)
    }

    /// Cross-tool strengths, weaknesses, and recommendations.
    pub async fn summarize(&mut self, user_id: &str) -> Insights {
        self.ensure_profile(user_id).await;
        let counts = self.log.tool_counts(user_id);
        match self.profiles.get(user_id) {
            Some(profile) => insights::build(profile, &counts),
            None => insights::build(&LearningProfile::from_seed(user_id, None), &counts),
        }
    }

    /// Last `n` events for one tool, chronological.
    pub fn recent(&self, user_id: &str, tool_id: &str, n: usize) -> Vec<&ToolUsageEvent> {
        self.log.recent(user_id, tool_id, n)
    }

    /// Number of events currently held for a user (≤ the configured cap).
    pub fn tracked_events(&self, user_id: &str) -> usize {
        self.log.len(user_id)
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    async fn ensure_profile(&mut self, user_id: &str) {
        if self.profiles.contains(user_id) {
            return;
        }
        let seed = match self.seed.load_seed(user_id).await {
            Ok(Some(value)) => Some(SeedContext::from_value(value)),
            Ok(None) => None,
            Err(e) => {
                warn!("cold-start fetch failed for {user_id}, using defaults: {e:#}");
                None
            }
        };
        self.profiles
            .insert(LearningProfile::from_seed(user_id, seed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Seed source whose loads always fail. Cold start must still succeed.
    struct FailingSeedSource;

    #[async_trait]
    impl SeedSource for FailingSeedSource {
        async fn load_seed(&self, _user_id: &str) -> anyhow::Result<Option<serde_json::Value>> {
            anyhow::bail!("collaborator down")
        }

        async fn save_context(
            &self,
            _user_id: &str,
            _context: &serde_json::Value,
        ) -> anyhow::Result<()> {
            anyhow::bail!("collaborator down")
        }
    }

    /// Seed source returning a fixed blob and recording saves.
    struct StaticSeedSource {
        blob: serde_json::Value,
        loads: Mutex<u32>,
        saves: Mutex<Vec<serde_json::Value>>,
    }

    impl StaticSeedSource {
        fn new(blob: serde_json::Value) -> Self {
            Self {
                blob,
                loads: Mutex::new(0),
                saves: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SeedSource for StaticSeedSource {
        async fn load_seed(&self, _user_id: &str) -> anyhow::Result<Option<serde_json::Value>> {
            *self.loads.lock().unwrap() += 1;
            Ok(Some(self.blob.clone()))
        }

        async fn save_context(
            &self,
            _user_id: &str,
            context: &serde_json::Value,
        ) -> anyhow::Result<()> {
            self.saves.lock().unwrap().push(context.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cold_start_failure_yields_valid_profile() {
        let mut engine =
            ContextEngine::new(EngineConfig::default(), Arc::new(FailingSeedSource));
        let profile = engine.get_or_create("u1").await;
        assert_eq!(profile.user_id, "u1");
        assert!(profile.personality_insights.communication_style.is_none());
    }

    #[tokio::test]
    async fn test_cold_start_failure_does_not_block_tracking() {
        let mut engine =
            ContextEngine::new(EngineConfig::default(), Arc::new(FailingSeedSource))
                .with_profile_mirroring(true);
        engine.track_usage("u1", "chat-coach", "submit", true, None).await;
        assert_eq!(engine.tracked_events("u1"), 1);
        let profile = engine.get_or_create("u1").await;
        assert_eq!(profile.tool_usage_patterns.success_rate["chat-coach"], 1);
    }

    #[tokio::test]
    async fn test_get_or_create_seeds_once() {
        let seed = Arc::new(StaticSeedSource::new(serde_json::json!({
            "communicationStyle": "direct"
        })));
        let mut engine = ContextEngine::new(EngineConfig::default(), seed.clone());

        let first = engine.get_or_create("u1").await.clone();
        let second = engine.get_or_create("u1").await.clone();
        assert_eq!(
            first.personality_insights.communication_style,
            second.personality_insights.communication_style
        );
        assert_eq!(*seed.loads.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_track_updates_profile_synchronously() {
        let mut engine = ContextEngine::with_defaults();
        for _ in 0..8 {
            engine.track_usage("u1", "chat-coach", "submit", true, None).await;
        }
        for _ in 0..2 {
            engine.track_usage("u1", "chat-coach", "submit", false, None).await;
        }
        let profile = engine.get_or_create("u1").await;
        assert!((profile.tool_usage_patterns.learning_progress["chat-coach"] - 0.8).abs() < 1e-9);
        assert!((profile.behavioral_patterns.completion_rate - 0.8).abs() < 1e-9);
        assert_eq!(profile.tool_usage_patterns.success_rate["chat-coach"], 8);
    }

    #[tokio::test]
    async fn test_eviction_at_one_hundred_events() {
        let mut engine = ContextEngine::with_defaults();
        for i in 0..101 {
            engine
                .track_usage(
                    "u1",
                    "chat-coach",
                    "submit",
                    true,
                    Some(serde_json::json!({ "seq": i })),
                )
                .await;
        }
        assert_eq!(engine.tracked_events("u1"), 100);
        let recent = engine.recent("u1", "chat-coach", 100);
        // Event #0 evicted; the window now starts at seq 1
        assert_eq!(recent[0].data.as_ref().unwrap()["seq"], 1);
        assert_eq!(recent.last().unwrap().data.as_ref().unwrap()["seq"], 100);
    }

    #[tokio::test]
    async fn test_enrich_is_pure_between_tracks() {
        let mut engine = ContextEngine::with_defaults();
        for _ in 0..9 {
            engine.track_usage("u1", "chat-coach", "submit", true, None).await;
        }
        engine.track_usage("u1", "chat-coach", "submit", false, None).await;

        let first = engine.enrich("u1", "chat-coach", None).await;
        let second = engine.enrich("u1", "chat-coach", None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_enrich_mastery_fires_tip_and_celebration_together() {
        let mut engine = ContextEngine::with_defaults();
        for _ in 0..9 {
            engine.track_usage("u1", "chat-coach", "submit", true, None).await;
        }
        engine.track_usage("u1", "chat-coach", "submit", false, None).await;
        // learning progress = 0.9

        let enrichment = engine.enrich("u1", "chat-coach", None).await;
        assert_eq!(enrichment.adaptive_difficulty, 7);
        assert!(enrichment
            .personalized_tips
            .iter()
            .any(|t| t.contains("advanced")));
        assert!(enrichment
            .contextual_reminders
            .iter()
            .any(|r| r.contains("progress")));
        // The trailing failure also triggers the resilience reminder
        assert!(enrichment
            .contextual_reminders
            .iter()
            .any(|r| r.contains("beginner")));
    }

    #[tokio::test]
    async fn test_predict_empty_user() {
        let mut engine = ContextEngine::with_defaults();
        let prediction = engine.predict("fresh-user").await;
        assert!(prediction.recommended_tools.is_empty());
        assert_eq!(prediction.optimal_learning_path, vec!["profile-builder"]);
    }

    #[tokio::test]
    async fn test_summarize_reflects_usage() {
        let mut engine = ContextEngine::with_defaults();
        for _ in 0..9 {
            engine.track_usage("u1", "bio-review", "submit", true, None).await;
        }
        engine.track_usage("u1", "bio-review", "submit", false, None).await;

        let insights = engine.summarize("u1").await;
        assert!(insights.strengths.iter().any(|s| s.contains("bio-review")));
        assert!(insights
            .learning_recommendations
            .iter()
            .any(|r| r.contains("consistent")));
    }

    #[tokio::test]
    async fn test_profile_mirroring_saves_snapshot() {
        let seed = Arc::new(StaticSeedSource::new(serde_json::json!({})));
        let mut engine = ContextEngine::new(EngineConfig::default(), seed.clone())
            .with_profile_mirroring(true);
        engine.track_usage("u1", "chat-coach", "submit", true, None).await;

        let saves = seed.saves.lock().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0]["user_id"], "u1");
    }

    #[tokio::test]
    async fn test_independent_engines_share_nothing() {
        let mut a = ContextEngine::with_defaults();
        let mut b = ContextEngine::with_defaults();
        a.track_usage("u1", "chat-coach", "submit", true, None).await;
        assert_eq!(a.tracked_events("u1"), 1);
        assert_eq!(b.tracked_events("u1"), 0);
        assert_eq!(b.profile_count(), 0);
        b.get_or_create("u1").await;
        assert_eq!(b.profile_count(), 1);
    }
}
