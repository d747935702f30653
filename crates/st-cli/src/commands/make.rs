//! Make command implementation - scaffolds a new migration file

use anyhow::Result;
use st_core::create_migration_file;

use crate::cli::{GlobalArgs, MakeArgs};
use crate::commands::common::{green, red, ProjectContext};

/// Execute the make command
pub(crate) async fn execute(args: &MakeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrations_dir = ctx.migrations_dir();

    println!(
        "{}",
        green(&format!(
            "Creating new migration file '{}' in '{}'...",
            args.name,
            migrations_dir.display()
        ))
    );

    match create_migration_file(&migrations_dir, &args.name) {
        Ok(filename) => {
            println!("{}", green(&format!("Created migration file: {filename}")));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", red(&format!("Error: {e}")));
            Err(e.into())
        }
    }
}
