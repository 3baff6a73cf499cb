use crate::cli::parser::Commands;
use crate::context::Context;
use crate::core::export::ExportLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use std::io;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Export { file, force } = cmd {
        let store = ctx.store();
        if !store.exists() {
            return Err(AppError::from(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Event store not found: {}", store.display()),
            )));
        }

        let mut pool = DbPool::new(&store.to_string_lossy())?;
        ExportLogic::export(&mut pool, file, *force)?;
    }
    Ok(())
}
