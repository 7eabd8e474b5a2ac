//! Rerouting error types.
//!
//! All of these are recoverable: the session reports them through the
//! snapshot surface and keeps the prior navigation state intact. The next
//! off-route detection retries.

use crate::provider::ProviderError;

/// Errors from off-route correction and stop insertion.
#[derive(Debug, thiserror::Error)]
pub enum RerouteError {
    /// The provider returned no usable route (includes network failures)
    #[error("route generation failed: {0}")]
    RouteGeneration(#[from] ProviderError),

    /// The current position matches no step of the corrected leg
    #[error("no step of the corrected leg matches the current position")]
    NoMatchingStep,

    /// The leg to replace cannot be located, or the provider returned an
    /// unexpected shape for the requested splice
    #[error("splice failed: {0}")]
    Splice(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RerouteError::NoMatchingStep;
        assert_eq!(
            err.to_string(),
            "no step of the corrected leg matches the current position"
        );

        let err = RerouteError::Splice("expected exactly two legs");
        assert_eq!(err.to_string(), "splice failed: expected exactly two legs");

        let err = RerouteError::RouteGeneration(ProviderError::NoRoute);
        assert!(err.to_string().starts_with("route generation failed"));
    }
}
