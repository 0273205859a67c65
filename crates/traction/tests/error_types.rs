//! Unit tests for traction error types.
//!
//! Tests verify:
//! - Variant creation and matching
//! - Display formatting
//! - std::error::Error integration
//! - Result type alias

use std::error::Error as StdError;

use traction::{Error, Parameters, Result, Series, SimulationEngine};

mod creation_tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_fields() {
        let e = Parameters::new(1.0, 0.2, -3.0, 1.0).unwrap_err();
        match e {
            Error::InvalidParameter {
                name,
                value,
                reason,
            } => {
                assert_eq!(name, "applied_force");
                assert!((value + 3.0).abs() < f64::EPSILON);
                assert_eq!(reason, "must not be negative");
            }
            Error::UnknownSeries(_) => panic!("expected InvalidParameter"),
        }
    }

    #[test]
    fn test_non_finite_reason() {
        let e = Parameters::new(f64::INFINITY, 0.2, 3.0, 1.0).unwrap_err();
        assert!(matches!(
            e,
            Error::InvalidParameter {
                name: "mass",
                reason: "must be finite",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_series_variant() {
        let e = "omega".parse::<Series>().unwrap_err();
        assert_eq!(e, Error::UnknownSeries("omega".to_string()));
    }
}

mod display_tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let e = Parameters::new(0.0, 0.2, 3.0, 1.0).unwrap_err();
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter mass"));
        assert!(msg.contains("greater than zero"));
    }

    #[test]
    fn test_unknown_series_display() {
        let msg = Error::UnknownSeries("omega".into()).to_string();
        assert!(msg.contains("unknown series: omega"));
        assert!(msg.contains("v, a, x, fnet"));
    }

    #[test]
    fn test_debug_impl() {
        let e = Error::UnknownSeries("omega".into());
        let debug = format!("{e:?}");
        assert!(debug.contains("UnknownSeries"));
    }
}

mod std_error_tests {
    use super::*;

    #[test]
    fn test_implements_std_error() {
        let e: Box<dyn StdError> = Box::new(Error::UnknownSeries("q".into()));
        assert!(e.source().is_none());
    }

    #[test]
    fn test_question_mark_propagation() {
        fn build() -> Result<SimulationEngine> {
            let params = Parameters::new(-1.0, 0.0, 0.0, 0.0)?;
            SimulationEngine::new(params)
        }
        assert!(build().is_err());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
