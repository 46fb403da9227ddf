//! Caller identity as asserted by the upstream authentication layer.
//!
//! The bearer credential is verified before a request reaches this service;
//! what arrives here is a claim. [`AuthContext`] makes that trust boundary
//! explicit so operations take the claim as an argument instead of reading
//! headers themselves.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};

/// Role names as they appear in the upstream `x-user-role` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Staff,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "STAFF" => Ok(Role::Staff),
            "STUDENT" => Ok(Role::Student),
            other => Err(ClinicError::Unauthorized(format!("unknown role '{}'", other))),
        }
    }
}

/// An already-authenticated caller.
///
/// `role` and `user_id` are absent when the upstream layer did not assert
/// them; the token is always present because a context is never built
/// without a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub token: String,
    pub role: Option<Role>,
    pub user_id: Option<String>,
}

impl AuthContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role: None,
            user_id: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Fails unless the caller holds the administrative role.
    pub fn require_admin(&self) -> ClinicResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ClinicError::Unauthorized(format!(
                "administrative role required, caller has {}",
                self.role.map(|r| r.as_str()).unwrap_or("no role")
            )))
        }
    }

    /// The student whose records the caller may read.
    pub fn require_user_id(&self) -> ClinicResult<&str> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ClinicError::Unauthorized("caller has no user id".to_string()))
    }
}
