// Device login identity

/// Username/password pair used on the remote command channel
///
/// The trigger identity and the administrative (log-reading) identity are
/// always passed separately; nothing here has a built-in default.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: Option<String>,
}

impl Credential {
    /// Credential relying on the channel's own key-based authentication
    pub fn key_based(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }

    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let cred = Credential::with_password("admin", "hunter2");
        let printed = format!("{:?}", cred);

        assert!(printed.contains("admin"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_key_based_has_no_password() {
        assert!(Credential::key_based("root").password.is_none());
    }
}
