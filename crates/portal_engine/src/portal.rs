use std::sync::Arc;

use portal_core::Operation;

use crate::{
    courses, login, CoursesError, Credentials, LoginError, PortalConfig, ReqwestTransport,
    SemesterCourses, Session, Transport,
};

/// Entry point for the workflows. Holds no per-request state: every call
/// builds a fresh operation owned by the caller.
#[derive(Clone)]
pub struct Portal {
    transport: Arc<dyn Transport>,
    config: PortalConfig,
}

impl Portal {
    pub fn new(transport: Arc<dyn Transport>, config: PortalConfig) -> Self {
        Self { transport, config }
    }

    /// Portal backed by [`ReqwestTransport`] using the config's transport settings.
    pub fn with_reqwest(config: PortalConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(config.transport.clone()));
        Self::new(transport, config)
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn login(&self, credentials: Credentials) -> Operation<'_, Session, LoginError> {
        login::run(self.transport.as_ref(), &self.config, credentials)
    }

    pub fn courses(&self, session: &Session) -> Operation<'_, Vec<SemesterCourses>, CoursesError> {
        courses::run(self.transport.as_ref(), &self.config, session)
    }
}
