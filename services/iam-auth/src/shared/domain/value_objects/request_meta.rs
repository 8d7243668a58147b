use serde::{Deserialize, Serialize};

use super::UserAgentInfo;

/// What the transport layer knows about the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    pub ip: String,
    pub user_agent: Option<String>,
    /// Value of the `clientid` header, if sent.
    pub client_id: Option<String>,
}

impl RequestMeta {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn user_agent_info(&self) -> UserAgentInfo {
        UserAgentInfo::parse(self.user_agent.as_deref().unwrap_or_default())
    }
}
