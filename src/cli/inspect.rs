//! CLI `inspect` command: print one user's memory list.

use anyhow::{bail, Result};
use memlog::config::MemlogConfig;
use memlog::identity::{derive_key, UserIdentity};
use memlog::memory::{MemoryStore, RecallOutcome};
use memlog::store;

/// Print every memory item stored for `user`, with the index `forget` expects.
pub fn inspect(config: &MemlogConfig, user: &str) -> Result<()> {
    let Some(identity) = UserIdentity::new(user) else {
        bail!("user identity must not be empty");
    };
    let key = derive_key(&identity);
    let memory = MemoryStore::new(store::create_store(&config.storage)?);

    let items = match memory.recall(&key) {
        RecallOutcome::Items { items } => items,
        RecallOutcome::StoreError { message } => bail!("recall failed: {message}"),
    };

    println!("Memories for {identity} ({key}, {} backend)", memory.backend());
    println!("{}", "=".repeat(40));
    if items.is_empty() {
        println!("  (none)");
    }
    for (index, item) in items.iter().enumerate() {
        println!("  [{index}] {item}");
    }

    Ok(())
}
