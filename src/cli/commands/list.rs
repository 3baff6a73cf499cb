use crate::cli::commands::sources;
use crate::cli::parser::Commands;
use crate::context::Context;
use crate::errors::AppResult;
use crate::models::Column;
use crate::report::print_list;
use std::io;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::List {
        source,
        columns,
        sort,
        tail,
    } = cmd
    {
        let columns = Column::parse_list(columns)?;
        let sort = sort.as_deref().map(str::parse::<Column>).transpose()?;

        let ds = sources::load(source, ctx)?;
        print_list(&ds, &mut io::stdout().lock(), &columns, sort, *tail)?;
    }
    Ok(())
}
