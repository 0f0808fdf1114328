//! Display model for the admin lead table.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::Lead;

pub const EMPTY_TABLE_MESSAGE: &str = "No demo requests yet";
pub const COLUMNS: [&str; 6] = ["Name", "Email", "Phone", "Website", "Guests", "Date"];

/// Title above the table.
#[must_use]
pub fn heading(count: usize) -> String {
    format!("Demo Requests ({count})")
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    /// `-` when the lead has no guests.
    pub guests: String,
    /// Date portion of `created_at`, or the raw value if it does not parse.
    pub date: String,
    pub mailto: String,
    pub tel: String,
}

impl From<&Lead> for LeadRow {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.to_string(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            website: lead.website.clone(),
            guests: lead.guests().unwrap_or("-").to_owned(),
            date: display_date(&lead.created_at),
            mailto: format!("mailto:{}", lead.email),
            tel: format!("tel:{}", lead.phone),
        }
    }
}

impl LeadRow {
    /// Cells in [`COLUMNS`] order.
    #[must_use]
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.website,
            &self.guests,
            &self.date,
        ]
    }

    /// Link target for each cell, aligned with [`LeadRow::cells`]. Only the
    /// email and phone cells link anywhere.
    #[must_use]
    pub fn links(&self) -> [Option<&str>; 6] {
        [None, Some(&self.mailto), Some(&self.tel), None, None, None]
    }
}

/// Rows for the whole list, in list order.
#[must_use]
pub fn rows(leads: &[Lead]) -> Vec<LeadRow> {
    leads.iter().map(LeadRow::from).collect()
}

/// Date portion of a backend timestamp. Accepts RFC 3339, SQL-style
/// `YYYY-MM-DD HH:MM:SS[.f]` and bare dates.
#[must_use]
pub fn display_date(created_at: &str) -> String {
    let raw = created_at.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => created_at.to_owned(),
    }
}
