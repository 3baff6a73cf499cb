use crate::cli::commands::sources;
use crate::cli::parser::Commands;
use crate::context::Context;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;
use std::fs;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Dump {
        source,
        file,
        force,
    } = cmd
    {
        let ds = sources::load(source, ctx)?;
        let text = ds.to_text()?;

        match file {
            Some(f) => {
                let path = expand_tilde(f);
                ensure_writable(&path, *force)?;
                fs::write(&path, text)?;
                success(format!("{} record(s) written to {}", ds.count(), path.display()));
            }
            None => println!("{text}"),
        }
    }
    Ok(())
}
