//! Route model error types.
//!
//! These represent construction-time validation failures. They are
//! distinct from provider/IO errors and from rerouting failures.

/// Validation errors for route model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A leg must contain at least one step
    #[error("leg must contain at least one step")]
    EmptyLeg,

    /// A route must contain at least one leg
    #[error("route must contain at least one leg")]
    EmptyRoute,

    /// A non-empty step shape must begin/end at the step's endpoints
    #[error("step shape endpoint mismatch: {0}")]
    ShapeEndpointMismatch(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ModelError::EmptyLeg.to_string(),
            "leg must contain at least one step"
        );
        assert_eq!(
            ModelError::EmptyRoute.to_string(),
            "route must contain at least one leg"
        );
        assert_eq!(
            ModelError::ShapeEndpointMismatch("first point").to_string(),
            "step shape endpoint mismatch: first point"
        );
    }
}
