use serde::{Deserialize, Serialize};

use crate::TransportSettings;

/// Where the portal lives and how it names its session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Portal root; also the page the courses workflow scrapes.
    pub base_url: String,
    pub login_path: String,
    pub session_cookie: String,
    pub transport: TransportSettings,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ecampus.fhstp.ac.at".to_string(),
            login_path: "/login/index.php".to_string(),
            session_cookie: "MoodleSession".to_string(),
            transport: TransportSettings::default(),
        }
    }
}

impl PortalConfig {
    /// Default settings pointed at another portal root, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.login_path)
    }

    pub fn home_url(&self) -> String {
        self.base_url.clone()
    }
}
