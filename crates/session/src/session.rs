//! Session snapshot types

use blackhole_core::User;
use serde::{Deserialize, Serialize};

/// The current identity, or its absence
///
/// After initialization `user` and `token` are both set or both unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn new(token: String, user: User) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin)
    }

    /// Admins count as moderators
    pub fn is_moderator(&self) -> bool {
        self.user.as_ref().is_some_and(User::can_moderate)
    }
}

/// What the store publishes to subscribers
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub session: Session,
    /// True until the startup revalidation has finished
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: Session::default(),
            loading: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool, is_moderator: bool) -> User {
        User {
            id: 1,
            username: "reader".into(),
            email: "reader@example.com".into(),
            is_admin,
            is_moderator,
            is_verified: true,
            is_banned: false,
            bio: String::new(),
            avatar: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn anonymous_session_has_no_roles() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert!(!session.is_moderator());
    }

    #[test]
    fn role_flags_follow_user() {
        let reader = Session::new("t".into(), user(false, false));
        assert!(reader.is_authenticated());
        assert!(!reader.is_admin());
        assert!(!reader.is_moderator());

        let moderator = Session::new("t".into(), user(false, true));
        assert!(!moderator.is_admin());
        assert!(moderator.is_moderator());

        let admin = Session::new("t".into(), user(true, false));
        assert!(admin.is_admin());
        assert!(admin.is_moderator());
    }

    #[test]
    fn state_starts_loading() {
        assert!(SessionState::default().loading);
    }
}
