// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use patrimoine_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn store() {
        let err = CoreError::Store("quota exceeded".into());
        assert_eq!(err.to_string(), "Store error: quota exceeded");
    }

    #[test]
    fn row_parse() {
        let err = CoreError::RowParse {
            row: 7,
            message: "Quantité: missing number".into(),
        };
        assert_eq!(
            err.to_string(),
            "Row 7 could not be read: Quantité: missing number"
        );
    }

    #[test]
    fn auth() {
        let err = CoreError::Auth("invalid_grant".into());
        assert_eq!(err.to_string(), "Authentication failed: invalid_grant");
    }

    #[test]
    fn credentials() {
        let err = CoreError::Credentials("client_email is empty".into());
        assert_eq!(err.to_string(), "Invalid credentials: client_email is empty");
    }

    #[test]
    fn api() {
        let err = CoreError::Api {
            provider: "Frankfurter".into(),
            message: "No rate found for USD/CAD".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (Frankfurter): No rate found for USD/CAD"
        );
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("quote VFV.TO".into());
        assert_eq!(err.to_string(), "No provider available for quote VFV.TO");
    }

    #[test]
    fn price_not_available() {
        let err = CoreError::PriceNotAvailable {
            symbol: "ABC".into(),
        };
        assert_eq!(err.to_string(), "Price not available for ABC");
    }

    #[test]
    fn validation() {
        let err = CoreError::Validation("Quantity must be positive (got 0)".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: Quantity must be positive (got 0)"
        );
    }
}

// ── Classification ──────────────────────────────────────────────────

mod classification {
    use super::*;

    #[test]
    fn only_validation_is_user_error() {
        assert!(CoreError::Validation("x".into()).is_validation());
        assert!(!CoreError::Store("x".into()).is_validation());
        assert!(!CoreError::Network("x".into()).is_validation());
        assert!(!CoreError::RowParse {
            row: 2,
            message: "x".into()
        }
        .is_validation());
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn io_error_becomes_file_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "key.json missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("key.json missing")));
    }

    #[test]
    fn serde_json_error_becomes_deserialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = bad.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn parse(s: &str) -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str(s)?)
        }
        assert!(parse("[1, 2]").is_ok());
        assert!(matches!(parse("[1,"), Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn errors_are_debug_and_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        let err = CoreError::Store("x".into());
        assert_error(&err);
        assert!(format!("{err:?}").contains("Store"));
    }
}
