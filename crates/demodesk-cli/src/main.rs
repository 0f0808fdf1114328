//! `demodesk` CLI — book demos and manage demo-request leads.
//!
//! A thin terminal front end over `demodesk-core`: `book` drives the booking
//! form, `admin` drives the password-gated session, `status` pings the
//! backend's health endpoint.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod admin;
mod book;

use std::io::{BufRead, Write as _};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use demodesk_core::{ClientConfig, HttpLeadApi};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI structure ────────────────────────────────────────────────────

/// demodesk — demo-request leads from the terminal.
#[derive(Parser)]
#[command(
    name = "demodesk",
    version,
    about = "demodesk CLI — book demos, review, delete and export demo-request leads",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         DEMODESK_API_URL          Backend address (default: http://localhost:5000)\n  \
         DEMODESK_TIMEOUT_SECS     Request timeout in seconds (default: 10)\n  \
         DEMODESK_ADMIN_PASSWORD   Admin password for `admin` commands\n  \
         DEMODESK_LOG              Log filter (default: warn)\n\n\
         {DIM}Examples:{RESET}\n  \
         demodesk status\n  \
         demodesk book --name Ada --email ada@example.com --phone 555-0199 --website https://ada.dev\n  \
         demodesk admin list\n  \
         demodesk admin export --output ./exports"
    ),
)]
struct Cli {
    /// Lead backend address.
    #[arg(long, env = "DEMODESK_API_URL", default_value = demodesk_core::config::DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "DEMODESK_TIMEOUT_SECS", default_value = "10")]
    timeout: u64,

    /// Emit logs as JSON.
    #[arg(long, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable.
    Status,
    /// Book a demo. Missing fields are prompted for on stdin.
    Book {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        website: Option<String>,
        /// Optional guest email.
        #[arg(long)]
        guests: Option<String>,
    },
    /// Password-gated lead administration.
    Admin {
        /// Admin password. When absent it is prompted for on stdin, without
        /// echo on a terminal.
        #[arg(long, env = "DEMODESK_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[command(subcommand)]
        action: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Show all demo requests.
    List,
    /// Delete a demo request.
    Delete {
        /// Lead id, as shown by `admin list`.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y', default_value = "false")]
        yes: bool,
    },
    /// Export all demo requests to CSV.
    Export {
        /// Output file or directory (default: current directory).
        #[arg(long)]
        output: Option<String>,
        /// Print the CSV to stdout instead of writing a file.
        #[arg(long, default_value = "false", conflicts_with = "output")]
        stdout: bool,
    },
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

/// Print `label` and read one trimmed line from stdin. EOF yields `""`.
fn prompt(label: &str) -> Result<String> {
    print!("  {BOLD}{label}:{RESET} ");
    std::io::stdout().flush().context("failed to flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read stdin")?;
    Ok(line.trim().to_owned())
}

/// Like [`prompt`], with terminal echo switched off while the answer is
/// typed.
fn prompt_hidden(label: &str) -> Result<String> {
    let echo_off = EchoOff::new();
    let answer = prompt(label);
    if echo_off.is_some() {
        // The newline the user typed was not echoed either.
        println!();
    }
    answer
}

/// Restores the saved terminal settings on drop.
#[cfg(unix)]
struct EchoOff {
    saved: libc::termios,
}

#[cfg(unix)]
impl EchoOff {
    /// Turn off echo on stdin. `None` when stdin is not a terminal.
    #[allow(unsafe_code)]
    fn new() -> Option<Self> {
        let fd = libc::STDIN_FILENO;
        // SAFETY: `isatty` only inspects the descriptor.
        if unsafe { libc::isatty(fd) } != 1 {
            return None;
        }

        let mut saved = std::mem::MaybeUninit::<libc::termios>::uninit();
        // SAFETY: `tcgetattr` fully initializes `saved` when it returns 0,
        // and `saved` is only read after that check.
        let saved = unsafe {
            if libc::tcgetattr(fd, saved.as_mut_ptr()) != 0 {
                return None;
            }
            saved.assume_init()
        };

        let mut silent = saved;
        silent.c_lflag &= !libc::ECHO;
        // SAFETY: `silent` is a valid `termios` copied from the terminal.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw const silent) } != 0 {
            return None;
        }
        Some(Self { saved })
    }
}

#[cfg(unix)]
impl Drop for EchoOff {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        // SAFETY: `saved` came from `tcgetattr` on the same descriptor.
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const self.saved);
        }
    }
}

#[cfg(not(unix))]
struct EchoOff;

#[cfg(not(unix))]
impl EchoOff {
    fn new() -> Option<Self> {
        None
    }
}

// ── Logging ──────────────────────────────────────────────────────────

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_env("DEMODESK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = ClientConfig::default()
        .with_base_url(cli.api_url)
        .with_timeout(Duration::from_secs(cli.timeout));
    let api = HttpLeadApi::new(&cfg).context("invalid backend configuration")?;
    tracing::debug!(api_url = api.base_url(), timeout = ?cfg.timeout, "client configured");

    match cli.command {
        Commands::Status => cmd_status(&api).await,
        Commands::Book {
            name,
            email,
            phone,
            website,
            guests,
        } => {
            let flags = book::BookFlags {
                name,
                email,
                phone,
                website,
                guests,
            };
            book::cmd_book(&api, flags).await
        }
        Commands::Admin { password, action } => {
            let password = match password {
                Some(p) => p,
                None => prompt_hidden("Admin password")?,
            };
            admin::cmd_admin(&api, password, action).await
        }
    }
}

async fn cmd_status(api: &HttpLeadApi) -> Result<()> {
    println!();
    header("🩺", "Backend status");
    kv_line("Address", api.base_url());

    let health = api.health().await;
    kv_line("Latency", &format!("{} ms", health.latency_ms));
    if !health.ok {
        anyhow::bail!("backend at {} is unreachable", api.base_url());
    }
    kv_line("Status", health.status.as_deref().unwrap_or("unknown"));
    println!();
    success("Backend is reachable");
    Ok(())
}
