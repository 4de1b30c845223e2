use crate::core::{ConfigProvider, IdentityProvider};

/// Identity fixed at construction, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<String>,
}

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            user_id: config
                .user_id()
                .filter(|id| !id.trim().is_empty())
                .map(str::to_string),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
