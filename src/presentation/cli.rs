use crate::domain::config::HttpConfig;
use crate::domain::errors::HttpError;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::output::OutputSink;
use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use hyper::body::Bytes;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Long options that may also be written with a single dash, e.g. `-verb`.
const SINGLE_DASH_OPTIONS: &[&str] = &[
    "verb",
    "body",
    "body-file",
    "output",
    "disable-redirect",
    "basicauth",
    "header",
    "timeout",
    "help",
];

/// Options whose next token is their value and is never rewritten.
const VALUE_OPTIONS: &[&str] = &[
    "verb",
    "body",
    "body-file",
    "output",
    "basicauth",
    "header",
    "timeout",
];

/// CLI configuration for mync
#[derive(Parser, Debug)]
#[command(name = "mync", version)]
#[command(about = "mync: a small network client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// A HTTP client.
    Http(HttpArgs),
}

#[derive(Args, Debug)]
#[command(override_usage = "mync http [OPTIONS] <SERVER>")]
pub struct HttpArgs {
    /// HTTP method
    #[arg(long, default_value = "GET")]
    pub verb: String,

    /// JSON data for HTTP POST request
    #[arg(long, allow_hyphen_values = true)]
    pub body: Option<String>,

    /// File containing JSON data for HTTP POST request
    #[arg(long = "body-file", value_name = "PATH")]
    pub body_file: Option<PathBuf>,

    /// File path to write the response into
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Follow at most one redirect; a second redirect fails the request
    #[arg(long = "disable-redirect")]
    pub disable_redirect: bool,

    /// Add basic auth (username=password) credentials to the outgoing request
    #[arg(long = "basicauth", value_name = "USER=PASSWORD", allow_hyphen_values = true)]
    pub basic_auth: Option<String>,

    /// Add one or more headers to the outgoing request (key=value)
    #[arg(long = "header", value_name = "KEY=VALUE", allow_hyphen_values = true)]
    pub headers: Vec<String>,

    /// Give up on the request after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Remote server to send the request to
    #[arg(value_name = "SERVER")]
    pub servers: Vec<String>,
}

impl Cli {
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.command {
            Command::Http(args) => args.run(out).await,
        }
    }

    /// Usage text of the `http` sub-command, printed after input errors.
    pub fn http_usage() -> String {
        let mut command = Cli::command();
        command
            .find_subcommand_mut("http")
            .map(|http| http.render_help().to_string())
            .unwrap_or_default()
    }
}

impl HttpArgs {
    /// Turns the parsed flags into the request config. Exactly one
    /// positional server argument is required.
    pub fn to_config(&self) -> Result<HttpConfig, HttpError> {
        let [server] = self.servers.as_slice() else {
            return Err(HttpError::NoServerSpecified);
        };

        Ok(HttpConfig {
            verb: self.verb.clone(),
            post_body: Bytes::from(self.body.clone().unwrap_or_default()),
            body_file: self.body_file.clone(),
            headers: self.headers.clone(),
            basic_auth: self.basic_auth.clone(),
            disable_redirect: self.disable_redirect,
            output_file: self.output.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            ..HttpConfig::new(server.as_str())
        })
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.to_config()?;
        let sink = OutputSink::from_path(config.output_file.clone());

        let request_service = HyperHttpClient::new()
            .with_timeout(config.timeout)
            .create_request_service();
        let response = request_service.execute(config).await?;

        sink.deliver(&response.body, out)
    }
}

/// Rewrites single-dash long options (`-verb`, `-body-file=x`) into clap's
/// double-dash form. Option values, such as a `-body` of `-output`, and
/// anything else are passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut value_pending = false;

    for arg in args.into_iter().map(Into::into) {
        if std::mem::take(&mut value_pending) {
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };

        let (single_dash, rest) = match text.strip_prefix("--") {
            Some(rest) => (false, rest),
            None => match text.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => {
                    normalized.push(arg);
                    continue;
                }
            },
        };
        let (name, inline_value) = match rest.split_once('=') {
            Some((name, _)) => (name, true),
            None => (rest, false),
        };

        value_pending = !inline_value && VALUE_OPTIONS.contains(&name);
        if single_dash && SINGLE_DASH_OPTIONS.contains(&name) {
            normalized.push(OsString::from(format!("-{}", text)));
        } else {
            normalized.push(arg);
        }
    }

    normalized
}

/// Parses `args` (program name first) and runs the selected sub-command,
/// writing user-facing output to `out`.
///
/// Flag-parsing failures and help requests come back as `clap::Error`;
/// everything else as `HttpError` or an output failure, all inside
/// `anyhow::Error`.
pub async fn handle_command<I, T, W>(args: I, out: &mut W) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    W: Write,
{
    let cli = Cli::try_parse_from(normalize_args(args))?;
    cli.run(out).await
}
