/// Who is looking at the dashboard.
///
/// Sign-in itself happens elsewhere; this only carries the result. A user id
/// being present is what "signed in" means everywhere in the app.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    user_id: Option<String>,
}

impl Identity {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Self::signed_out();
        }
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn signed_out() -> Self {
        Self { user_id: None }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn require_user(&self) -> crate::error::Result<&str> {
        self.user_id().ok_or(crate::error::Error::NotSignedIn)
    }
}
