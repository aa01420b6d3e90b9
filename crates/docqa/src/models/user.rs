//! User model and profile updates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated account, as reported by the identity endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Number of ready documents, reported alongside the identity
    #[serde(default)]
    pub documents_count: u32,
}

impl User {
    /// Name to show for this user (full name, falling back to username)
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

/// Partial user update with named optional fields
///
/// Fields left as `None` are untouched by the merge; blank values are
/// normalized away so they can never overwrite existing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ProfileUpdate {
    /// Drop whitespace-only values so they are treated as "not provided"
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            full_name: keep(self.full_name),
            username: keep(self.username),
        }
    }

    /// Whether the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.username.is_none()
    }

    /// Merge the provided fields into an existing user record
    pub fn apply(&self, user: &mut User) {
        if let Some(full_name) = &self.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user() -> User {
        User {
            id: "u1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            created_at: Utc::now(),
            documents_count: 2,
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let mut user = make_user();
        assert_eq!(user.display_name(), "Ada Lovelace");
        user.full_name = None;
        assert_eq!(user.display_name(), "ada");
    }

    #[test]
    fn test_apply_merges_only_named_fields() {
        let mut user = make_user();
        let update = ProfileUpdate {
            full_name: None,
            username: Some("lovelace".to_string()),
        };

        update.apply(&mut user);

        assert_eq!(user.username, "lovelace");
        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_empty_update_is_a_no_op() {
        let mut user = make_user();
        let before = user.clone();

        let update = ProfileUpdate::default();
        assert!(update.is_empty());
        update.apply(&mut user);

        assert_eq!(user, before);
    }

    #[test]
    fn test_normalized_drops_blank_values() {
        let update = ProfileUpdate {
            full_name: Some("   ".to_string()),
            username: Some("grace".to_string()),
        }
        .normalized();

        assert!(update.full_name.is_none());
        assert_eq!(update.username.as_deref(), Some("grace"));
    }
}
