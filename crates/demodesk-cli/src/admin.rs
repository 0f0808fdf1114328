//! `demodesk admin` — list, delete and export leads.
//!
//! Every invocation logs in first; the password lives only for the length of
//! the command.

use std::fmt::Write as _;
use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use demodesk_core::view::{self, COLUMNS, EMPTY_TABLE_MESSAGE};
use demodesk_core::{
    AdminCredential, AdminSession, AssumeYes, Confirm, DeleteOutcome, HttpLeadApi, LeadId,
    LoginOutcome,
};

use super::{AdminCommands, BOLD, DIM, RESET, header, kv_line, prompt, success, warning};

/// Asks on stdin; anything but `y`/`yes` declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        prompt(&format!("{question} [y/N]"))
            .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

pub async fn cmd_admin(api: &HttpLeadApi, password: String, action: AdminCommands) -> Result<()> {
    let mut session = AdminSession::new();
    match session.login(api, AdminCredential::new(password)).await {
        LoginOutcome::Authenticated { .. } => {}
        LoginOutcome::InvalidPassword | LoginOutcome::Unreachable => {
            bail!("{}", session.error().unwrap_or("login failed"));
        }
    }

    match action {
        AdminCommands::List => {
            print_table(&session);
            Ok(())
        }
        AdminCommands::Delete { id, yes } => cmd_delete(api, &mut session, &id, yes).await,
        AdminCommands::Export { output, stdout } => cmd_export(&session, output.as_deref(), stdout),
    }
}

fn print_table(session: &AdminSession) {
    let rows = view::rows(session.leads());
    println!();
    header("📋", &view::heading(rows.len()));

    if rows.is_empty() {
        println!("  {DIM}{EMPTY_TABLE_MESSAGE}{RESET}");
        println!();
        return;
    }

    let mut widths = COLUMNS.map(str::len);
    let id_width = rows.iter().map(|r| r.id.len()).max().unwrap_or(0).max(2);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut line = format!("  {BOLD}{:<id_width$}", "ID");
    for (col, w) in COLUMNS.iter().zip(widths) {
        let _ = write!(line, "  {col:<w$}");
    }
    println!("{line}{RESET}");

    let hyperlinks = std::io::stdout().is_terminal();
    for row in &rows {
        let mut line = format!("  {DIM}{:<id_width$}{RESET}", row.id);
        for ((cell, link), w) in row.cells().iter().zip(row.links()).zip(widths) {
            let link = link.filter(|_| hyperlinks);
            let _ = write!(line, "  {}", table_cell(cell, link, w));
        }
        println!("{line}");
    }
    println!();
}

/// `cell` left-aligned to `width`. With a link target the text becomes an
/// OSC 8 terminal hyperlink; the padding stays outside the link.
fn table_cell(cell: &str, link: Option<&str>, width: usize) -> String {
    let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
    match link {
        Some(target) => format!("\x1b]8;;{target}\x1b\\{cell}\x1b]8;;\x1b\\{pad}"),
        None => format!("{cell}{pad}"),
    }
}

async fn cmd_delete(
    api: &HttpLeadApi,
    session: &mut AdminSession,
    id: &str,
    yes: bool,
) -> Result<()> {
    let id = LeadId::new(id);
    if let Some(lead) = session.leads().iter().find(|l| l.id == id) {
        println!();
        header("🗑", "Delete demo request");
        kv_line("ID", id.as_str());
        kv_line("Name", &lead.name);
        kv_line("Email", &lead.email);
        println!();
    }

    let outcome = if yes {
        session.delete(api, &id, &mut AssumeYes).await
    } else {
        session.delete(api, &id, &mut StdinConfirm).await
    };

    match outcome {
        DeleteOutcome::Deleted => {
            success(&format!(
                "Deleted demo request {id} ({} remaining)",
                session.leads().len()
            ));
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            warning("Delete cancelled");
            Ok(())
        }
        DeleteOutcome::UnknownId => bail!("no demo request with id {id}"),
        DeleteOutcome::Failed | DeleteOutcome::NotAuthenticated => {
            bail!("{}", session.error().unwrap_or("delete failed"))
        }
    }
}

fn cmd_export(session: &AdminSession, output: Option<&str>, to_stdout: bool) -> Result<()> {
    let export = session.export_csv();
    if to_stdout {
        println!("{}", export.body);
        return Ok(());
    }

    let path = export_path(output, &export.filename);
    std::fs::write(&path, &export.body)
        .with_context(|| format!("failed to write {}", path.display()))?;

    success(&format!(
        "Exported {} demo requests to {} ({})",
        session.leads().len(),
        path.display(),
        export.mime
    ));
    Ok(())
}

/// An existing directory gets the dated filename appended; anything else is
/// used as the file path.
fn export_path(output: Option<&str>, filename: &str) -> PathBuf {
    match output {
        Some(out) if Path::new(out).is_dir() => Path::new(out).join(filename),
        Some(out) => PathBuf::from(out),
        None => PathBuf::from(filename),
    }
}
