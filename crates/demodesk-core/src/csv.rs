//! CSV export of the admin lead list.
//!
//! Quoting is asymmetric: `name` and `guests` are always
//! wrapped in double quotes, every other column is written raw. Embedded
//! quotes are not escaped.

use chrono::{NaiveDate, Utc};

use crate::types::Lead;

pub const CSV_HEADER: &str = "ID,Name,Email,Phone,Website,Guests,Date";
pub const CSV_MIME: &str = "text/csv";

/// A finished export, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// `demo-requests-YYYY-MM-DD.csv`.
    pub filename: String,
    pub mime: &'static str,
    pub body: String,
}

impl CsvExport {
    /// Export stamped with the current UTC date.
    #[must_use]
    pub fn now(leads: &[Lead]) -> Self {
        Self::on(leads, Utc::now().date_naive())
    }

    #[must_use]
    pub fn on(leads: &[Lead], date: NaiveDate) -> Self {
        Self {
            filename: export_filename(date),
            mime: CSV_MIME,
            body: render(leads),
        }
    }
}

#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("demo-requests-{}.csv", date.format("%Y-%m-%d"))
}

/// Header plus one row per lead, `\n`-separated, no trailing newline.
#[must_use]
pub fn render(leads: &[Lead]) -> String {
    let mut lines = Vec::with_capacity(leads.len() + 1);
    lines.push(CSV_HEADER.to_owned());
    lines.extend(leads.iter().map(|lead| {
        format!(
            "{},\"{}\",{},{},{},\"{}\",{}",
            lead.id,
            lead.name,
            lead.email,
            lead.phone,
            lead.website,
            lead.guests.as_deref().unwrap_or_default(),
            lead.created_at,
        )
    }));
    lines.join("\n")
}
