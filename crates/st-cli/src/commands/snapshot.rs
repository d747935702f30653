//! Snapshot command implementation - pretty-prints a stored schema snapshot

use anyhow::Result;
use st_db::MigrationStore;

use crate::cli::{GlobalArgs, SnapshotArgs};
use crate::commands::common::{cyan, green, red, ProjectContext};

/// Execute the snapshot command
pub(crate) async fn execute(args: &SnapshotArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let db = ctx.open_database(global)?;

    // Explicit index, or fall back to the most recently captured snapshot.
    let index = match &args.index {
        Some(index) => index.clone(),
        None => match db.latest_snapshot_index().await {
            Ok(index) => index,
            Err(e) => {
                eprintln!("{}", red(&format!("Error: {e}")));
                return Err(e.into());
            }
        },
    };

    let snapshot = match db.snapshot(&index).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{}", red(&format!("Error: {e}")));
            return Err(e.into());
        }
    };

    println!(
        "{}",
        green(&format!("Schema snapshot for migration {index}:"))
    );
    println!();

    // BTreeMap iteration is already sorted by table name.
    for (table, definition) in &snapshot.tables {
        println!("{}", cyan(&format!("-- {table}")));
        println!("{};", definition.trim_end_matches(';').trim_end());
        println!();
    }

    Ok(())
}
