//! MCP Anywhere - Unified gateway for Model Context Protocol servers

use std::process::ExitCode;

use mcp_anywhere::app;
use mcp_anywhere::cli::{Cli, ResolveError};

fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => return report(&e),
    };
    let Some(config) = app::load_config(cli.is_connect()) else {
        return ExitCode::FAILURE;
    };
    app::run(cli.resolve(&config), &config)
}

fn report(err: &ResolveError) -> ExitCode {
    let _ = err.print();
    err.exit_code()
}
