//! Public types shared by the API client, the booking form and the admin
//! session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned lead identifier.
///
/// The backend emits integers, but the client never does arithmetic on ids,
/// so both JSON numbers and JSON strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawLeadId", into = "String")]
pub struct LeadId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLeadId {
    Int(i64),
    Text(String),
}

impl From<RawLeadId> for LeadId {
    fn from(raw: RawLeadId) -> Self {
        match raw {
            RawLeadId::Int(n) => Self(n.to_string()),
            RawLeadId::Text(s) => Self(s),
        }
    }
}

impl From<LeadId> for String {
    fn from(id: LeadId) -> Self {
        id.0
    }
}

impl LeadId {
    /// Wrap an id string as received from a user or the backend.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<i64> for LeadId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// A submitted demo request as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Backends that do not store the website omit it entirely.
    #[serde(default)]
    pub website: String,
    /// Secondary guest email. Absent, `null` and `""` all mean no guests.
    #[serde(default)]
    pub guests: Option<String>,
    /// Backend timestamp, kept verbatim.
    #[serde(default)]
    pub created_at: String,
}

impl Lead {
    /// Guest email, with empty strings folded into `None`.
    #[must_use]
    pub fn guests(&self) -> Option<&str> {
        self.guests.as_deref().filter(|g| !g.is_empty())
    }
}

/// Request body for the lead-creation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub guests: String,
}

/// Shared admin password, re-sent on every privileged request.
///
/// Held in memory only. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential(String);

impl AdminCredential {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Raw password for the `X-Admin-Password` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminCredential(***)")
    }
}

/// Health check result.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the backend answered with a 2xx.
    pub ok: bool,
    /// The `status` field reported by the backend, if any.
    pub status: Option<String>,
    /// Round-trip latency in milliseconds.
    pub latency_ms: u128,
}

// --- Internal API response types ---

#[derive(Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct HealthBody {
    pub status: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lead_id_accepts_numbers_and_strings() {
        let a: LeadId = serde_json::from_str("17").unwrap();
        let b: LeadId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "17");
    }

    #[test]
    fn lead_tolerates_missing_website_and_null_guests() {
        let lead: Lead = serde_json::from_str(
            r#"{"id":3,"name":"Ada","email":"ada@x.com","phone":"555","guests":null,
                "created_at":"2024-05-01 10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(lead.website, "");
        assert_eq!(lead.guests(), None);
        assert_eq!(lead.id, LeadId::from(3));
    }

    #[test]
    fn empty_guests_fold_to_none() {
        let lead: Lead = serde_json::from_str(
            r#"{"id":"x","name":"A","email":"a","phone":"1","website":"w","guests":""}"#,
        )
        .unwrap();
        assert_eq!(lead.guests(), None);
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = AdminCredential::new("hunter2");
        assert!(!format!("{cred:?}").contains("hunter2"));
        assert_eq!(cred.expose(), "hunter2");
    }

    #[test]
    fn new_lead_serializes_all_five_fields() {
        let body = serde_json::to_value(NewLead {
            name: "A".into(),
            ..Default::default()
        })
        .unwrap();
        let obj = body.as_object().unwrap();
        for key in ["name", "email", "phone", "website", "guests"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }
}
