//! Signed-in user identity injected into the workflow.

use std::fmt;

/// Who is scanning.
///
/// Passed to the workflow at construction; the workflow never reads
/// identity from ambient storage.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    token: Option<String>,
}

impl UserContext {
    /// An unauthenticated user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A user authenticated with a bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
            ..Self::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserContext")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
