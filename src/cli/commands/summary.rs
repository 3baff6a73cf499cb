use crate::cli::commands::sources;
use crate::cli::parser::Commands;
use crate::context::Context;
use crate::errors::AppResult;
use crate::report::print_summary;
use std::io;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Summary { source, tail } = cmd {
        let ds = sources::load(source, ctx)?;
        let tail = tail.unwrap_or(ctx.cfg.list_tail);
        print_summary(&ds, &mut io::stdout().lock(), tail)?;
    }
    Ok(())
}
