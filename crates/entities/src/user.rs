//! User entity definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user, keyed by its username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique username. Immutable once created.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Date of birth.
    pub birthday: NaiveDate,
}

impl User {
    /// Creates a new user.
    pub fn new(username: impl Into<String>, email: impl Into<String>, birthday: NaiveDate) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            birthday,
        }
    }

    /// Applies a patch in place, leaving omitted fields untouched.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = birthday;
        }
    }
}

/// Partial update for a [`User`].
///
/// The username is the lookup key and cannot be changed; a `username` field
/// in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// New email address.
    #[serde(default)]
    pub email: Option<String>,
    /// New date of birth.
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birthday() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    }

    #[test]
    fn test_user_wire_format() {
        let user = User::new("abc", "a@b.com", birthday());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "abc");
        assert_eq!(json["birthday"], "1990-01-01");
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        let mut user = User::new("abc", "a@b.com", birthday());
        let patch: UserPatch = serde_json::from_str(r#"{"email":"new@b.com"}"#).unwrap();

        user.apply(&patch);

        assert_eq!(user.email, "new@b.com");
        assert_eq!(user.birthday, birthday());
    }

    #[test]
    fn test_patch_distinguishes_empty_from_omitted() {
        let patch: UserPatch = serde_json::from_str(r#"{"email":""}"#).unwrap();
        assert_eq!(patch.email, Some(String::new()));

        let patch: UserPatch = serde_json::from_str(r#"{"username":"ignored"}"#).unwrap();
        assert_eq!(patch, UserPatch::default());
    }
}
