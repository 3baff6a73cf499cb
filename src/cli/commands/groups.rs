use crate::cli::commands::sources;
use crate::cli::parser::Commands;
use crate::context::Context;
use crate::errors::AppResult;
use crate::models::{Column, ColumnSpec};
use crate::ui::messages::header;
use std::io;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Groups {
        source,
        by,
        reorder,
        ascending,
    } = cmd
    {
        let spec = ColumnSpec::parse(by)?;
        let reorder = reorder.as_deref().map(str::parse::<Column>).transpose()?;

        let ds = sources::load(source, ctx)?;
        let mut groups = ds.group(spec)?;
        if reorder.is_some() {
            groups = groups.reorder(reorder, *ascending)?;
        }

        header(format!("{} group(s) by {}", groups.len(), by.join(", ")));
        groups.list(&mut io::stdout().lock())?;
    }
    Ok(())
}
