//! User Profile and KYC
//!
//! KYC verification gates a user's ability to transact on the platform.

use super::common::{Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// KYC verification status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Pending,
    Verified,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "pending",
            KycStatus::Verified => "verified",
            KycStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(KycStatus::Pending),
            "verified" => Some(KycStatus::Verified),
            "rejected" => Some(KycStatus::Rejected),
            _ => None,
        }
    }
}

/// The signed-in identity a request acts as.
///
/// Passed explicitly through every layer instead of read from ambient
/// session state, so decision functions stay pure and testable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// A platform user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
    pub kyc_status: KycStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user_id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            display_name: display_name.into(),
            role,
            kyc_status: KycStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Only verified users may create entities or trigger transitions
    pub fn can_transact(&self) -> bool {
        self.kyc_status == KycStatus::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_cannot_transact_until_verified() {
        let mut user = UserProfile::new(UserId::new("user:1"), "Amina", Role::Farmer);
        assert!(!user.can_transact());
        user.kyc_status = KycStatus::Verified;
        assert!(user.can_transact());
    }
}
