//! Unlock command implementation - escape hatch for a stuck advisory lock
//!
//! A process that crashes mid-run leaves the lock row behind; there is no
//! TTL, so this command is the recovery path.

use anyhow::Result;
use st_db::LockStore;

use crate::cli::GlobalArgs;
use crate::commands::common::{green, red, yellow, ProjectContext};

/// Execute the unlock command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let db = ctx.open_database(global)?;

    let lock = match db.holder().await {
        Ok(lock) => lock,
        Err(e) => {
            eprintln!("{}", red(&format!("Error checking lock: {e}")));
            return Err(e.into());
        }
    };

    let Some(lock) = lock else {
        println!("{}", yellow("No lock is currently held."));
        return Ok(());
    };

    println!(
        "{}",
        yellow(&format!(
            "Releasing lock held by {} since {} (operation: {})",
            lock.locked_by, lock.locked_at, lock.operation
        ))
    );

    if let Err(e) = db.release().await {
        eprintln!("{}", red(&format!("Error releasing lock: {e}")));
        return Err(e.into());
    }

    println!("{}", green("Lock released."));
    Ok(())
}
