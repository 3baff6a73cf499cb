use crate::cli::parser::Commands;
use crate::context::Context;
use crate::core::log::LogLogic;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use std::io;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::new(&ctx.store().to_string_lossy())?;
        init_db(&pool.conn)?;
        LogLogic::print_log(&pool, &mut io::stdout().lock())?;
    }

    Ok(())
}
