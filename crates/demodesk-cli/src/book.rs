//! `demodesk book` — the booking form on a terminal.

use anyhow::{Result, bail};
use demodesk_core::booking::{Field, SubmitOutcome};
use demodesk_core::{BookingForm, HttpLeadApi};

use super::{DIM, RESET, header, prompt, success};

/// Field values given on the command line. `None` means "ask".
pub struct BookFlags {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub guests: Option<String>,
}

impl BookFlags {
    fn take(&mut self, field: Field) -> Option<String> {
        match field {
            Field::Name => self.name.take(),
            Field::Email => self.email.take(),
            Field::Phone => self.phone.take(),
            Field::Website => self.website.take(),
            Field::Guests => self.guests.take(),
        }
    }

    /// Whether any field was passed as a flag. When none were, the guest
    /// email is prompted for as well.
    fn any(&self) -> bool {
        [&self.name, &self.email, &self.phone, &self.website, &self.guests]
            .iter()
            .any(|v| v.is_some())
    }
}

pub async fn cmd_book(api: &HttpLeadApi, mut flags: BookFlags) -> Result<()> {
    println!();
    header("📅", "Book a demo");

    let interactive = !flags.any();
    let mut form = BookingForm::new();
    form.open();

    for field in Field::ALL {
        let value = match flags.take(field) {
            Some(v) => v,
            None if field.required() || interactive => {
                let label = if field.required() {
                    field.label().to_owned()
                } else {
                    format!("{} {DIM}(optional){RESET}", field.label())
                };
                prompt(&label)?
            }
            None => String::new(),
        };
        form.set(field, value);
    }

    println!();
    println!("  {DIM}Booking...{RESET}");
    let outcome = form.submit(api).await;
    let text = form
        .message()
        .map(|m| m.text.clone())
        .unwrap_or_default();

    match outcome {
        SubmitOutcome::Booked => {
            // The message already starts with a check mark.
            success(text.trim_start_matches('✓').trim_start());
            println!();
            Ok(())
        }
        SubmitOutcome::Rejected { .. } | SubmitOutcome::Failed | SubmitOutcome::Incomplete(_) => {
            bail!(text)
        }
    }
}
