// src/context/seed.rs — Cold-start seed source (pluggable capability)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::events::ToolUsageEvent;

/// External collaborator behind profile creation.
///
/// Every method is best-effort from the engine's perspective: a failed
/// load falls back to an empty seed, and writes are fire-and-forget.
/// Injected at construction so the core stays testable without a database.
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Fetch the persisted context snapshot for a user, if any.
    async fn load_seed(&self, user_id: &str) -> anyhow::Result<Option<serde_json::Value>>;

    /// Mirror the current context snapshot back to durable storage.
    async fn save_context(&self, user_id: &str, context: &serde_json::Value)
        -> anyhow::Result<()>;

    /// Mirror a tracked event to durable storage. Default: drop it.
    async fn record_event(&self, user_id: &str, event: &ToolUsageEvent) -> anyhow::Result<()> {
        let _ = (user_id, event);
        Ok(())
    }
}

/// Seed source that never has anything. Used standalone and in tests.
pub struct NullSeedSource;

#[async_trait]
impl SeedSource for NullSeedSource {
    async fn load_seed(&self, _user_id: &str) -> anyhow::Result<Option<serde_json::Value>> {
        Ok(None)
    }

    async fn save_context(
        &self,
        _user_id: &str,
        _context: &serde_json::Value,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Shape of the persisted snapshot a seed source hands back.
///
/// Field names follow the platform's user-context blob (camelCase JSON).
/// Everything is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeedContext {
    pub communication_style: Option<String>,
    pub relationship_goals: Vec<String>,
    pub confidence_level: Option<u8>,
    pub social_energy: Option<u8>,
    pub writing_style: Option<String>,
    pub humor_level: Option<u8>,
    pub formality_level: Option<u8>,
    pub preferred_topics: Vec<String>,
}

impl SeedContext {
    /// Lenient parse: a malformed blob yields an empty seed, never an error.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value_full() {
        let blob = serde_json::json!({
            "communicationStyle": "direct",
            "relationshipGoals": ["long-term"],
            "confidenceLevel": 7,
            "socialEnergy": 4,
            "writingStyle": "playful",
            "humorLevel": 8,
            "formalityLevel": 2,
            "preferredTopics": ["first dates", "texting"]
        });
        let seed = SeedContext::from_value(blob);
        assert_eq!(seed.communication_style.as_deref(), Some("direct"));
        assert_eq!(seed.relationship_goals, vec!["long-term"]);
        assert_eq!(seed.confidence_level, Some(7));
        assert_eq!(seed.writing_style.as_deref(), Some("playful"));
        assert_eq!(seed.preferred_topics.len(), 2);
    }

    #[test]
    fn test_from_value_malformed_yields_default() {
        let seed = SeedContext::from_value(serde_json::json!("not an object"));
        assert!(seed.communication_style.is_none());
        assert!(seed.relationship_goals.is_empty());
    }

    #[test]
    fn test_from_value_ignores_unknown_fields() {
        let blob = serde_json::json!({ "writingStyle": "warm", "legacyField": 42 });
        let seed = SeedContext::from_value(blob);
        assert_eq!(seed.writing_style.as_deref(), Some("warm"));
    }
}
