use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Durable credential record.
///
/// The password is stored in plaintext on purpose: this layer is a faithful
/// mock of a demo that never hashed, and introducing a hashing boundary is a
/// change of intent, not a bug fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login_at: Option<OffsetDateTime>,
}

impl UserRecord {
    /// Builds a fresh record; the id is derived from the creation timestamp.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        let millis = now.unix_timestamp_nanos() / 1_000_000;
        Self {
            id: format!("u{millis}"),
            email: email.into(),
            password: password.into(),
            created_at: now,
            last_login_at: None,
        }
    }

    /// Email uniqueness and lookup are case-insensitive.
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_timestamp_id_and_no_login() {
        let user = UserRecord::new("a@b.com", "secret1");
        assert!(user.id.starts_with('u'));
        assert!(user.id.len() > 1);
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn email_match_ignores_case() {
        let user = UserRecord::new("A@B.com", "x");
        assert!(user.matches_email("a@b.COM"));
        assert!(!user.matches_email("a@c.com"));
    }

    #[test]
    fn serializes_timestamps_as_rfc3339_and_omits_absent_login() {
        let user = UserRecord::new("a@b.com", "secret1");
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("created_at"));
        assert!(!json.contains("last_login_at"));

        let back: UserRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.email, "a@b.com");
        assert!(back.last_login_at.is_none());
    }
}
