//! Email verification requests.
//!
//! A request is created `Pending`, picked up by the dispatcher, and flipped
//! to `Done` once its mail has been handed to the mail gateway. No other
//! field changes after creation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::VERIFICATION_CODE_TTL_HOURS;
use crate::macros::string_enum;

string_enum! {
    /// What the emailed link confirms. Fixed at creation.
    pub enum VerificationType {
        ValidateEmail => "VALIDATE_EMAIL",
        ChangePassword => "CHANGE_PASSWORD",
    }
}

string_enum! {
    /// Lifecycle state; only moves `Pending -> Done`.
    pub enum VerificationStatus {
        Pending => "PENDING",
        Done => "DONE",
    }
}

/// One outstanding or completed verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: Uuid,
    pub email: String,
    pub user_id: Uuid,
    pub code: String,
    pub verification_type: VerificationType,
    pub status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl VerificationRequest {
    pub fn is_pending(&self) -> bool {
        self.status != VerificationStatus::Done
    }

    /// Whether the code can no longer be redeemed at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.created_at + Duration::hours(VERIFICATION_CODE_TTL_HOURS) < now
    }
}

/// Row to persist; the store assigns id, status and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct NewVerification {
    pub email: String,
    pub user_id: Uuid,
    pub code: String,
    pub verification_type: VerificationType,
}

/// Fresh opaque one-time code
pub fn generate_code() -> String {
    Uuid::new_v4().simple().to_string()
}
