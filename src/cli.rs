//! CLI domain: parse, route and output only.
//! Resolution work happens in the library; handlers format results.

mod output;
mod parse;
mod route;

pub use output::{format_describe, format_plugins_table, map_error};
pub use parse::{Cli, Commands, ContextArgs, OutputFormat};
pub use route::RunContext;
