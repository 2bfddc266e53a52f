//! Access tiers attached to issued API keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed two-level role model: `User` < `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether a key with this role may call an operation gated on `required`.
    ///
    /// No requirement admits any role; `Admin` satisfies every requirement.
    pub fn satisfies(self, required: Option<Self>) -> bool {
        match required {
            None => true,
            Some(required) => self == required || self == Self::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0} (expected \"user\" or \"admin\")")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unset_requirement_admits_any_role() {
        assert!(Role::User.satisfies(None));
        assert!(Role::Admin.satisfies(None));
    }

    #[test]
    fn admin_satisfies_every_requirement() {
        assert!(Role::Admin.satisfies(Some(Role::User)));
        assert!(Role::Admin.satisfies(Some(Role::Admin)));
    }

    #[test]
    fn user_cannot_act_as_admin() {
        assert!(Role::User.satisfies(Some(Role::User)));
        assert!(!Role::User.satisfies(Some(Role::Admin)));
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("Admin".parse::<Role>().is_err());
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(Role::User.to_string(), "user");
    }
}
