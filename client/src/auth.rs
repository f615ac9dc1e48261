//! Authentication provider contract.
//!
//! The sync core only needs one fact from the auth layer: who, if anyone,
//! is signed in right now. Absence means logged out, which disables every
//! cart- and wishlist-mutating operation with a sign-in prompt instead of a
//! network call.

use rally_engine::UserId;

/// Source of the current user identity.
pub trait AuthProvider: Send + Sync + 'static {
    /// The signed-in user's id, or `None` when logged out.
    fn current_user_id(&self) -> Option<UserId>;
}

/// Fixed identity provider for tests and simple embeddings.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<UserId>,
}

impl StaticAuth {
    /// Provider that reports `user` as signed in.
    pub fn signed_in(user: impl Into<UserId>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    /// Provider that reports no user.
    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user_id(&self) -> Option<UserId> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_auth_states() {
        assert_eq!(
            StaticAuth::signed_in("u-1").current_user_id(),
            Some("u-1".to_string())
        );
        assert_eq!(StaticAuth::signed_out().current_user_id(), None);
    }
}
