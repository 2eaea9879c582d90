use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Profile of the logged-in user, as persisted under the `user` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Authenticated session: who is logged in and the bearer token to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

impl Session {
    /// Greeting name for the dashboard header.
    pub fn display_name(&self) -> &str {
        if self.user.first_name.is_empty() {
            &self.user.email
        } else {
            &self.user.first_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut session = Session {
            user: UserProfile {
                user_id: UserId(7),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
            },
            token: "t".into(),
        };
        assert_eq!(session.display_name(), "Ada");
        session.user.first_name.clear();
        assert_eq!(session.display_name(), "ada@example.com");
    }
}
