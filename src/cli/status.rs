// src/cli/status.rs — Store statistics and context inspection

use crate::infra::paths;
use crate::persist::PersistManager;

pub async fn show_status() -> anyhow::Result<()> {
    let db = paths::db_path();
    if !db.exists() {
        println!("No store at {} yet - nothing tracked.", db.display());
        return Ok(());
    }

    let manager = PersistManager::open(&db)?;
    let contexts = manager.store.count_user_contexts()?;
    let events = manager.store.count_usage_events()?;

    println!("Store: {}", db.display());
    println!("  user contexts:    {contexts}");
    println!("  mirrored events:  {events}");
    Ok(())
}

pub async fn inspect_user(user_id: &str) -> anyhow::Result<()> {
    let manager = PersistManager::open(&paths::db_path())?;
    match manager.store.get_user_context(user_id)? {
        Some(raw) => {
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        None => println!("No stored context for '{user_id}'."),
    }
    Ok(())
}
