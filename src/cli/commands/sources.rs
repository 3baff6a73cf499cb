use crate::cli::parser::SourceArgs;
use crate::context::Context;
use crate::core::{Dataset, Selection};
use crate::errors::AppResult;
use crate::ui::messages::warning;

/// Load every requested source, report skipped payloads, apply `--where`.
pub(super) fn load(args: &SourceArgs, ctx: &Context) -> AppResult<Dataset> {
    // parse filters first so a typo fails before any store is opened
    let selection = Selection::parse(&args.filters)?;
    let remote = ctx.remote(args.url.as_deref(), args.remote)?;
    let sources = ctx.sources(&args.sources, remote)?;

    let (ds, stats) = Dataset::load_with_stats(&sources)?;

    if !stats.malformed.is_empty() {
        warning(format!(
            "{} malformed event(s) skipped while reading {} store(s)",
            stats.malformed.len(),
            stats.stores
        ));
        for m in &stats.malformed {
            warning(format!("  event {}: {}", m.event_id, m.reason));
        }
    }

    if selection.is_empty() {
        Ok(ds)
    } else {
        Ok(ds.subselect(&selection))
    }
}
