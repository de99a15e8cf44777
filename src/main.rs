mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use crate::domain::errors::HttpError;
use crate::infrastructure::logging::init_logging;
use crate::presentation::cli::{Cli, handle_command};
use colored::Colorize;

/// mync: a small network client
///
/// `mync http [options] <server>` sends exactly one HTTP request (GET, POST
/// or HEAD) and prints the response body, or saves it with `-output`.
/// Supports custom headers, Basic auth, body files and a one-hop redirect
/// limit via `-disable-redirect`.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let mut stdout = std::io::stdout().lock();
    let Err(err) = handle_command(std::env::args_os(), &mut stdout).await else {
        return;
    };

    if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
        // clap renders help, version and parse errors itself
        let _ = clap_err.print();
        std::process::exit(clap_err.exit_code());
    }

    eprintln!("{}", err.to_string().red());
    if err
        .downcast_ref::<HttpError>()
        .is_some_and(HttpError::is_invalid_input)
    {
        eprintln!("\n{}", Cli::http_usage());
    }
    std::process::exit(1);
}
