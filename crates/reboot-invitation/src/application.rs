//! Contributor applications and their one-shot review

use reboot_core::{ActorId, ApplicationId, RebootError, Result, TimestampMs};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review status of a contributor application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Waiting for an admin decision
    Pending,
    /// Approved; a linked invitation was issued
    Approved,
    /// Declined; terminal
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

/// Input submitted by a public applicant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
    /// Applicant contact address
    pub email: String,
    /// Applicant full name
    pub full_name: String,
    /// Short bio
    pub bio: String,
    /// Portfolio or social links
    pub links: Vec<String>,
    /// Years of relevant experience
    pub years_experience: u32,
    /// Claimed expertise areas
    pub expertise: Vec<String>,
}

/// A contributor application under (or past) review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorApplication {
    /// Row identifier
    pub id: ApplicationId,
    /// Applicant contact address
    pub email: String,
    /// Applicant full name
    pub full_name: String,
    /// Short bio
    pub bio: String,
    /// Portfolio or social links
    pub links: Vec<String>,
    /// Years of relevant experience
    pub years_experience: u32,
    /// Claimed expertise areas
    pub expertise: Vec<String>,
    /// Review status; decided at most once
    pub status: ApplicationStatus,
    /// Admin who decided, once decided
    pub reviewed_by: Option<ActorId>,
    /// Decision time, once decided
    pub reviewed_at_ms: Option<TimestampMs>,
    /// Submission time
    pub created_at_ms: TimestampMs,
}

impl ContributorApplication {
    /// Build a fresh pending application after validating the input
    pub fn new(input: NewApplication, now_ms: TimestampMs) -> Result<Self> {
        validate_email(&input.email)?;
        if input.full_name.trim().is_empty() {
            return Err(RebootError::validation("full_name", "must not be empty"));
        }
        if input.bio.trim().is_empty() {
            return Err(RebootError::validation("bio", "must not be empty"));
        }
        Ok(Self {
            id: ApplicationId::new(),
            email: input.email,
            full_name: input.full_name,
            bio: input.bio,
            links: input.links,
            years_experience: input.years_experience,
            expertise: input.expertise,
            status: ApplicationStatus::Pending,
            reviewed_by: None,
            reviewed_at_ms: None,
            created_at_ms: now_ms,
        })
    }

    /// Whether the application is still undecided
    pub fn is_pending(&self) -> bool {
        matches!(self.status, ApplicationStatus::Pending)
    }
}

/// Minimal shape check on a contact address.
///
/// Deliverability is the notifier's problem; this only rejects obviously
/// malformed input before it becomes a row.
pub fn validate_email(email: &str) -> Result<()> {
    let ok = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if ok {
        Ok(())
    } else {
        Err(RebootError::validation("email", "not a valid address"))
    }
}
