//! Error types for the clustering engine.

use std::str::Utf8Error;

/// Failure of a [`crate::clusterer::Clusterer`]-initiating operation.
///
/// `Configuration` and `Input` are the only two error kinds that can abort
/// an operation outright; `QualityWarning` is non-fatal and is
/// surfaced as an `eprintln!` from [`crate::lift::aul_score`] instead of
/// through this enum.
#[derive(Debug)]
pub enum ClusterError {
    /// Invalid width/threshold/shingle-span at construction time.
    Configuration(String),
    /// Non-UTF-8 bytes passed where Unicode text is required.
    Input(Utf8Error),
}

impl From<Utf8Error> for ClusterError {
    fn from(err: Utf8Error) -> Self {
        ClusterError::Input(err)
    }
}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            ClusterError::Input(e) => write!(f, "input error: {e}"),
        }
    }
}

impl std::error::Error for ClusterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_configuration() {
        let e = ClusterError::Configuration("width must be nonzero".to_string());
        assert_eq!(e.to_string(), "configuration error: width must be nonzero");
    }

    #[test]
    fn test_display_input() {
        let bad = [0x80u8, 0x81];
        let err = std::str::from_utf8(&bad).unwrap_err();
        let e: ClusterError = err.into();
        assert!(e.to_string().starts_with("input error:"));
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        let e = ClusterError::Configuration("x".to_string());
        assert_error(&e);
    }
}
