use std::iter;

/// Why a DOM extraction step failed.
///
/// Each error owns at most one lower-level cause. The chain is built once,
/// bottom up, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScrapeError {
    message: String,
    #[source]
    cause: Option<Box<ScrapeError>>,
}

impl ScrapeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: ScrapeError) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Wraps `self` as the cause of a new, higher-level error.
    pub fn context(self, message: impl Into<String>) -> Self {
        Self::with_cause(message, self)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&ScrapeError> {
        self.cause.as_deref()
    }

    /// This error followed by every nested cause, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &ScrapeError> {
        iter::successors(Some(self), |err| err.cause())
    }

    /// Innermost cause; `self` for a leaf error.
    pub fn root_cause(&self) -> &ScrapeError {
        self.chain().last().unwrap_or(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn chain_walks_outermost_first() {
        let err = ScrapeError::new("no ul")
            .context("courses failed")
            .context("semester failed");
        let messages: Vec<_> = err.chain().map(ScrapeError::message).collect();
        assert_eq!(messages, vec!["semester failed", "courses failed", "no ul"]);
        assert_eq!(err.root_cause().message(), "no ul");
    }

    #[test]
    fn source_exposes_the_cause() {
        let err = ScrapeError::with_cause("outer", ScrapeError::new("inner"));
        let source = err.source().expect("has source");
        assert_eq!(source.to_string(), "inner");
        assert!(source.source().is_none());
    }
}
