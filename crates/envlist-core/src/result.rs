//! Result type alias for envlist operations

use crate::error::EnvlistError;

/// Standard Result type for envlist operations
pub type Result<T> = std::result::Result<T, EnvlistError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Turn a `NotFound` edit into `Ok(None)`, keeping every other error
    fn found(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn found(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_no_op() => {
                tracing::debug!("Edit matched nothing: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_maps_not_found_to_none() {
        let missing: Result<u8> = Err(EnvlistError::not_found("lint"));
        assert_eq!(missing.found(), Ok(None));

        let present: Result<u8> = Ok(7);
        assert_eq!(present.found(), Ok(Some(7)));
    }

    #[test]
    fn test_found_keeps_syntax_errors() {
        let broken: Result<u8> = Err(EnvlistError::syntax(0, "unmatched `}`"));
        assert!(broken.found().is_err());
    }
}
