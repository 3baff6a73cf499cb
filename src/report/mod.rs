pub mod chart;
pub mod pdf;
pub mod text;

pub use chart::{PlotOptions, StackedChart, plot, plot_overview};
pub use text::{format_hours, print_list, print_summary, print_totals};
