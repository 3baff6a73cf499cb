use crate::cli::commands::sources;
use crate::cli::parser::Commands;
use crate::context::Context;
use crate::errors::AppResult;
use crate::models::{Column, ColumnSpec};
use crate::report::print_totals;
use std::io;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Totals {
        source,
        levels,
        sort_levels,
    } = cmd
    {
        let levels = if levels.is_empty() {
            ctx.totals_levels()?
        } else {
            Column::parse_list(levels)?
        };
        // every level becomes a grouping
        ColumnSpec::from(levels.clone()).validate()?;

        let sort_levels = if sort_levels.is_empty() {
            ctx.sort_levels()?
        } else {
            Column::parse_list(sort_levels)?
        };

        let ds = sources::load(source, ctx)?;
        print_totals(&ds, &mut io::stdout().lock(), &levels, &sort_levels)?;
    }
    Ok(())
}
