use crate::cli::parser::Commands;
use crate::context::Context;
use crate::core::ingest::IngestLogic;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries::count_events;
use crate::errors::{AppError, AppResult};
use crate::models::raw_event::parse_store_time;
use crate::ui::messages::success;
use std::fs;
use std::io::{self, Read};

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Ingest { file, time } = cmd {
        let body = match file {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let time = match time {
            Some(t) => Some(
                parse_store_time(t).ok_or_else(|| {
                    AppError::InvalidDate(format!("'{t}' (expected YYYY-MM-DD HH:MM:SS)"))
                })?,
            ),
            None => None,
        };

        let mut pool = DbPool::new(&ctx.store().to_string_lossy())?;
        init_db(&pool.conn)?;

        let id = IngestLogic::ingest(&mut pool, &body, time)?;
        success(format!(
            "Event {id} stored in {} ({} event(s) total)",
            ctx.store().display(),
            count_events(&pool.conn)?
        ));
    }
    Ok(())
}
