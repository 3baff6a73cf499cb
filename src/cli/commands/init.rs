use crate::cli::parser::Cli;
use crate::config::Config;
use crate::context::Context;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped in test mode), then the
/// event store with its tables and indexes.
pub fn handle(cli: &Cli, ctx: &Context) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), ctx.test)?;
    let db_str = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing gltime…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Event store: {db_str}");

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let pool = DbPool::new(&db_str)?;
    init_db(&pool.conn)?;

    success(format!("Event store initialized at {db_str}"));

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Event store initialized",
        &format!("Event store initialized at {db_str}"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    Ok(())
}
