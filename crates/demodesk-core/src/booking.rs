//! Booking form widget.
//!
//! Holds the five form fields, the in-flight flag and the feedback message,
//! and drives a single submit against a [`LeadApi`]. A successful submit
//! schedules an auto-close: an explicit deadline owned by the widget, so
//! dismissing or dropping the widget cancels it.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::api::LeadApi;
use crate::inflight::InFlight;
use crate::types::NewLead;

/// Shown after the backend accepts a booking.
pub const SUCCESS_MESSAGE: &str = "✓ Demo booked! We'll contact you soon.";
/// Shown when the backend rejects a booking without an error text.
pub const GENERIC_ERROR_MESSAGE: &str = "Error booking demo. Please try again.";
/// Delay between a successful submit and the widget closing itself.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(2);

/// One of the form's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Website,
    Guests,
}

impl Field {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Website,
        Self::Guests,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Website => "Website",
            Self::Guests => "Guests",
        }
    }

    /// Everything except the guest email must be filled in.
    #[must_use]
    pub fn required(self) -> bool {
        !matches!(self, Self::Guests)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// Inline feedback under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl SubmitMessage {
    fn success() -> Self {
        Self {
            kind: MessageKind::Success,
            text: SUCCESS_MESSAGE.to_owned(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind == MessageKind::Success
    }
}

/// What a call to [`BookingForm::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Backend accepted the lead; fields cleared, auto-close scheduled.
    Booked,
    /// Backend answered non-2xx.
    Rejected { status: u16 },
    /// The request never got a usable answer.
    Failed,
    /// A required field was empty; nothing was sent.
    Incomplete(Field),
}

/// The public lead-capture widget.
#[derive(Debug, Default)]
pub struct BookingForm {
    fields: NewLead,
    loading: bool,
    message: Option<SubmitMessage>,
    open: bool,
    auto_close_at: Option<Instant>,
}

impl BookingForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the widget.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the widget early. Clears the message and cancels a pending
    /// auto-close.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.message = None;
        self.auto_close_at = None;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn message(&self) -> Option<&SubmitMessage> {
        self.message.as_ref()
    }

    #[must_use]
    pub fn fields(&self) -> &NewLead {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.fields.name,
            Field::Email => &self.fields.email,
            Field::Phone => &self.fields.phone,
            Field::Website => &self.fields.website,
            Field::Guests => &self.fields.guests,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.fields.name,
            Field::Email => &mut self.fields.email,
            Field::Phone => &mut self.fields.phone,
            Field::Website => &mut self.fields.website,
            Field::Guests => &mut self.fields.guests,
        };
        *slot = value.into();
    }

    /// First required field that is still empty.
    #[must_use]
    pub fn missing_required(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.required() && self.get(*f).is_empty())
    }

    /// Submit the current fields.
    ///
    /// Taking `&mut self` keeps at most one request per widget in flight.
    /// Any submit, even one stopped by a missing field, cancels a pending
    /// auto-close.
    pub async fn submit(&mut self, api: &dyn LeadApi) -> SubmitOutcome {
        self.auto_close_at = None;
        if let Some(field) = self.missing_required() {
            self.message = Some(SubmitMessage::error(format!("{} is required", field.label())));
            return SubmitOutcome::Incomplete(field);
        }

        self.message = None;
        let in_flight = InFlight::start(&mut self.loading);
        let result = api.create_lead(&self.fields).await;
        drop(in_flight);

        match result {
            Ok(()) => {
                info!("demo request submitted");
                self.message = Some(SubmitMessage::success());
                self.fields = NewLead::default();
                self.auto_close_at = Some(Instant::now() + AUTO_CLOSE_DELAY);
                SubmitOutcome::Booked
            }
            Err(e) if e.is_transport() => {
                self.message = Some(SubmitMessage::error(format!("Error: {e}")));
                SubmitOutcome::Failed
            }
            Err(e) => {
                let text = e.backend_message().unwrap_or(GENERIC_ERROR_MESSAGE);
                self.message = Some(SubmitMessage::error(text));
                SubmitOutcome::Rejected {
                    status: e.status().unwrap_or_default(),
                }
            }
        }
    }

    /// When the pending auto-close will fire, if one is scheduled.
    #[must_use]
    pub fn auto_close_deadline(&self) -> Option<Instant> {
        self.auto_close_at
    }

    /// Fire the auto-close if its deadline has passed. Returns whether it
    /// fired.
    pub fn fire_due_auto_close(&mut self, now: Instant) -> bool {
        match self.auto_close_at {
            Some(deadline) if now >= deadline => {
                debug!("booking widget auto-closed");
                self.auto_close_at = None;
                self.open = false;
                self.message = None;
                true
            }
            _ => false,
        }
    }

    /// Wait for the pending auto-close and apply it. Returns `false`
    /// immediately when nothing is scheduled.
    pub async fn run_auto_close(&mut self) -> bool {
        let Some(deadline) = self.auto_close_at else {
            return false;
        };
        tokio::time::sleep_until(deadline).await;
        self.fire_due_auto_close(Instant::now())
    }
}
