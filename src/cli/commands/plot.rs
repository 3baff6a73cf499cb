use crate::cli::commands::sources;
use crate::cli::parser::Commands;
use crate::context::Context;
use crate::core::GroupKey;
use crate::errors::AppResult;
use crate::models::{Column, ColumnSpec};
use crate::report::{PlotOptions, plot, plot_overview};
use crate::ui::messages::{success, warning};
use crate::utils::path::expand_tilde;
use std::fs;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Plot {
        source,
        by,
        groups,
        top,
        title,
        column,
        out_dir,
    } = cmd
    {
        let column: Column = column.parse::<Column>()?.ensure_numeric()?;
        let out_dir = out_dir
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| ctx.plot_dir());
        fs::create_dir_all(&out_dir)?;

        let ds = sources::load(source, ctx)?;
        if ds.is_empty() {
            warning("Empty dataset, nothing to plot.");
            return Ok(());
        }

        if by.is_empty() {
            let written = plot_overview(&ds, column, top.unwrap_or(ctx.cfg.top_n), &out_dir)?;
            success(format!("{} chart(s) written to {}", written.len(), out_dir.display()));
            return Ok(());
        }

        let spec = ColumnSpec::parse(by)?;
        let grouped = ds.group(spec)?.reorder(Some(column), false)?;

        let width = grouped.columns().len();
        let names = groups
            .iter()
            .map(|g| GroupKey::parse(g, width))
            .collect::<AppResult<Vec<_>>>()?;
        let opts = PlotOptions {
            names: (!names.is_empty()).then_some(names.as_slice()),
            column,
            n: top.map(|n| n.min(grouped.len())),
            title: title.as_deref(),
        };

        plot(&grouped, &opts, &out_dir)?;
    }
    Ok(())
}
