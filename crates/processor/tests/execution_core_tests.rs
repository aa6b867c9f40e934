//! End-to-end tests for the processor execution core
//!
//! Exercises the public surface the runtime sees: templates compiled into
//! processors, events offered on inputs, join buffering, windowed firing.
//!
//! Test coverage:
//! - Window retention and eviction observed through algorithm output
//! - Compile isolation between templates and compiled units
//! - Crossing / cross-under sign conventions
//! - Arithmetic coercion rules (null, division by zero, unsupported types)
//! - Pipe counter statefulness
//! - Join completeness and slot overwrite semantics

use octopus_processor::algorithms::AlgorithmKind;
use octopus_processor::config::ProcessorConfig;
use octopus_processor::error::ProcessorError;
use octopus_processor::CompiledProcessor;
use octopus_types::{AttributeValue, Event};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("octopus_processor=trace")
        .with_test_writer()
        .try_init();
}

fn pair_event(a: f64, b: f64) -> Event {
    Event::new("pair")
        .with_attribute("a", a)
        .with_attribute("b", b)
}

/// Compiles a two-input joined processor reading `a` and `b`.
fn pair_processor(name: &str, kind: AlgorithmKind, window: Option<i64>) -> CompiledProcessor {
    let mut config = ProcessorConfig::new(name, kind)
        .with_input(1, "a")
        .with_input(2, "b")
        .with_join(1, 2)
        .with_output("result", "value");
    if let Some(window) = window {
        config.set_param("window", &window.to_string()).unwrap();
    }
    config.compile().unwrap()
}

/// Offers one (a, b) pair on both inputs and returns the firing result.
fn fire(unit: &mut CompiledProcessor, a: f64, b: f64) -> Option<Event> {
    let buffered = unit.offer(1, pair_event(a, b)).unwrap();
    assert!(buffered.is_none(), "first input alone must not fire");
    unit.offer(2, pair_event(a, b)).unwrap()
}

// ============================================================================
// Compile / snapshot contract
// ============================================================================

mod compile_tests {
    use super::*;

    #[test]
    fn test_template_mutation_after_compile_is_invisible() {
        init_tracing();
        let mut template = ProcessorConfig::new("corr", AlgorithmKind::PearsonsCorrelation)
            .with_input(1, "a")
            .with_input(2, "b")
            .with_join(1, 2)
            .with_output("correlation", "r");
        template.set_param("window", "2").unwrap();
        let mut unit = template.compile().unwrap();

        // Re-point the template at different attributes and a larger window.
        template.inputs[0].source_attribute = "x".to_string();
        template.set_param("window", "50").unwrap();

        // The compiled unit still reads `a`/`b` and fills at 2 samples.
        fire(&mut unit, 1.0, 2.0);
        let out = fire(&mut unit, 2.0, 4.0).unwrap();
        let r = out.get_f64("r").unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sibling_compilations_do_not_share_windows() {
        let template = ProcessorConfig::new("counter", AlgorithmKind::Pipe)
            .with_input(1, "any")
            .with_output("count", "n");
        let mut first = template.compile().unwrap();
        let mut second = template.compile().unwrap();

        first.offer(1, Event::new("tick")).unwrap();
        first.offer(1, Event::new("tick")).unwrap();

        let out = second.offer(1, Event::new("tick")).unwrap().unwrap();
        assert_eq!(out.get("n"), Some(&AttributeValue::Integer(0)));
    }

    #[test]
    fn test_missing_required_parameter_fails_compile() {
        let config = ProcessorConfig::new("trend", AlgorithmKind::ForecastSrm)
            .with_input(1, "y")
            .with_output("forecast", "value");
        let err = config.compile().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("window"));
        assert!(message.contains("required"));
    }
}

// ============================================================================
// Window retention observed through algorithm output
// ============================================================================

mod window_tests {
    use super::*;

    #[test]
    fn test_correlation_silent_until_window_full() {
        let mut unit = pair_processor("corr", AlgorithmKind::PearsonsCorrelation, Some(3));
        assert!(fire(&mut unit, 1.0, 2.0).is_none());
        assert!(fire(&mut unit, 2.0, 4.0).is_none());

        let out = fire(&mut unit, 3.0, 6.0).unwrap();
        let r = out.get_f64("value").unwrap();
        assert!((-1.0..=1.0).contains(&r));
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_uses_only_the_last_window() {
        let mut unit = pair_processor("corr", AlgorithmKind::PearsonsCorrelation, Some(3));
        fire(&mut unit, 1.0, 2.0);
        fire(&mut unit, 2.0, 4.0);
        fire(&mut unit, 3.0, 6.0);

        // Fourth pair evicts (1, 2); the surviving window slopes downward.
        let out = fire(&mut unit, 10.0, -5.0).unwrap();
        let r = out.get_f64("value").unwrap();
        assert!((-1.0..=1.0).contains(&r));
        assert!(r < 0.0);
    }

    #[test]
    fn test_null_operand_skips_append_and_firing() {
        let mut unit = pair_processor("corr", AlgorithmKind::PearsonsCorrelation, Some(2));
        fire(&mut unit, 1.0, 2.0);

        // A pair with a missing operand contributes nothing.
        unit.offer(1, Event::new("pair").with_attribute("a", 5.0))
            .unwrap();
        let skipped = unit
            .offer(2, Event::new("pair").with_attribute("a", 5.0))
            .unwrap();
        assert!(skipped.is_none());

        // The window still holds one sample; the next good pair fills it.
        let out = fire(&mut unit, 2.0, 4.0).unwrap();
        assert!((out.get_f64("value").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_regression_reports_configured_key_names() {
        let mut config = ProcessorConfig::new("fit", AlgorithmKind::LinearRegression)
            .with_input(1, "a")
            .with_input(2, "b")
            .with_join(1, 2)
            .with_output("fit", "coefficients");
        config.set_param("window", "2").unwrap();
        config.set_param("intercept_name", "alpha").unwrap();
        config.set_param("slope_name", "beta").unwrap();
        let mut unit = config.compile().unwrap();

        let out = fire(&mut unit, 1.0, 3.0);
        let map = out.unwrap();
        let coefficients = map.get_map("coefficients").unwrap();
        assert!(coefficients.is_empty(), "partial window reports empty map");

        let out = fire(&mut unit, 2.0, 5.0).unwrap();
        let coefficients = out.get_map("coefficients").unwrap();
        assert_eq!(coefficients.get("alpha"), Some(&AttributeValue::Float(1.0)));
        assert_eq!(coefficients.get("beta"), Some(&AttributeValue::Float(2.0)));
    }

    #[test]
    fn test_forecast_reports_fit_and_next_step() {
        let mut config = ProcessorConfig::new("trend", AlgorithmKind::ForecastSrm)
            .with_input(1, "y")
            .with_output("forecast", "value");
        config.set_param("window", "3").unwrap();
        let mut unit = config.compile().unwrap();

        for y in [2.0, 4.0] {
            let out = unit
                .offer(1, Event::new("sample").with_attribute("y", y))
                .unwrap();
            assert!(out.is_none());
        }
        let out = unit
            .offer(1, Event::new("sample").with_attribute("y", 6.0))
            .unwrap()
            .unwrap();

        let report = out.get_map("value").unwrap();
        assert_eq!(report.get("intercept"), Some(&AttributeValue::Float(2.0)));
        assert_eq!(report.get("slope"), Some(&AttributeValue::Float(2.0)));
        assert_eq!(report.get("r"), Some(&AttributeValue::Float(1.0)));
        assert_eq!(report.get("mse"), Some(&AttributeValue::Float(0.0)));
        assert_eq!(report.get("forecast"), Some(&AttributeValue::Float(8.0)));
        assert_eq!(
            report.get("formula"),
            Some(&AttributeValue::Text("y = 2 + 2 * x".to_string()))
        );
    }
}

// ============================================================================
// Crossing / cross-under sign conventions
// ============================================================================

mod crossing_tests {
    use super::*;

    #[test]
    fn test_crossing_fires_plus_one_when_a_crosses_above() {
        let mut unit = pair_processor("cross", AlgorithmKind::Crossing, None);
        let out = fire(&mut unit, 1.0, 2.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Integer(0)));

        let out = fire(&mut unit, 3.0, 2.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Integer(1)));
    }

    #[test]
    fn test_crossing_fires_minus_one_when_a_crosses_below() {
        let mut unit = pair_processor("cross", AlgorithmKind::Crossing, None);
        fire(&mut unit, 3.0, 1.0);
        let out = fire(&mut unit, 1.0, 3.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Integer(-1)));
    }

    #[test]
    fn test_crossing_ties_never_cross() {
        let mut unit = pair_processor("cross", AlgorithmKind::Crossing, None);
        fire(&mut unit, 1.0, 1.0);
        let out = fire(&mut unit, 1.0, 1.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Integer(0)));
    }

    #[test]
    fn test_cross_under_skips_the_middle_sample() {
        let mut unit = pair_processor("under", AlgorithmKind::CrossUnder, None);
        let out = fire(&mut unit, 1.0, 2.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Boolean(false)));
        fire(&mut unit, 100.0, -100.0);

        // Oldest pair had a <= b, newest has a > b; the middle is ignored.
        let out = fire(&mut unit, 3.0, 2.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Boolean(true)));
    }
}

// ============================================================================
// Arithmetic coercion rules
// ============================================================================

mod arithmetic_tests {
    use super::*;

    #[test]
    fn test_division_by_zero_fires_zero() {
        let mut unit = pair_processor("div", AlgorithmKind::Division, None);
        let out = fire(&mut unit, 10.0, 0.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Float(0.0)));
    }

    #[test]
    fn test_division_null_numerator_coerces_to_zero() {
        let mut unit = pair_processor("div", AlgorithmKind::Division, None);
        unit.offer(1, Event::new("pair")).unwrap();
        let out = unit
            .offer(2, Event::new("pair").with_attribute("b", 4.0))
            .unwrap()
            .unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Float(0.0)));
    }

    #[test]
    fn test_production_unit_takes_the_smaller_operand() {
        let mut unit = pair_processor("capacity", AlgorithmKind::ProductionUnit, None);
        let out = fire(&mut unit, 12.0, 7.0).unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Float(7.0)));
    }

    #[test]
    fn test_vector_subtraction_zero_pads_the_shorter_side() {
        let mut unit = pair_processor("vec_sub", AlgorithmKind::VectorSubtraction, None);
        let lhs = AttributeValue::Array(vec![
            AttributeValue::Float(5.0),
            AttributeValue::Float(3.0),
            AttributeValue::Float(1.0),
        ]);
        let rhs = AttributeValue::Array(vec![
            AttributeValue::Float(1.0),
            AttributeValue::Float(1.0),
        ]);
        unit.offer(1, Event::new("pair").with_attribute("a", lhs))
            .unwrap();
        let out = unit
            .offer(2, Event::new("pair").with_attribute("b", rhs))
            .unwrap()
            .unwrap();

        assert_eq!(
            out.get("value"),
            Some(&AttributeValue::Array(vec![
                AttributeValue::Float(4.0),
                AttributeValue::Float(2.0),
                AttributeValue::Float(1.0),
            ]))
        );
    }

    #[test]
    fn test_and_rejects_non_boolean_operand() {
        let mut unit = pair_processor("gate", AlgorithmKind::And, None);
        unit.offer(1, Event::new("pair").with_attribute("a", true))
            .unwrap();
        let err = unit
            .offer(2, Event::new("pair").with_attribute("b", "yes"))
            .unwrap_err();
        assert!(matches!(err, ProcessorError::UnsupportedType { .. }));
    }

    #[test]
    fn test_and_null_coerces_to_false() {
        let mut unit = pair_processor("gate", AlgorithmKind::And, None);
        unit.offer(1, Event::new("pair").with_attribute("a", true))
            .unwrap();
        let out = unit.offer(2, Event::new("pair")).unwrap().unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Boolean(false)));
    }
}

// ============================================================================
// Pipe counter statefulness
// ============================================================================

mod pipe_tests {
    use super::*;

    #[test]
    fn test_pipe_counts_firings_regardless_of_payload() {
        let mut unit = ProcessorConfig::new("counter", AlgorithmKind::Pipe)
            .with_input(1, "ignored")
            .with_output("count", "n")
            .compile()
            .unwrap();

        let payloads = [
            Event::new("tick"),
            Event::new("other").with_attribute("x", 99.0),
            Event::new("tick").with_attribute("ignored", "text"),
        ];
        for (expected, event) in payloads.into_iter().enumerate() {
            let out = unit.offer(1, event).unwrap().unwrap();
            assert_eq!(
                out.get("n"),
                Some(&AttributeValue::Integer(expected as i64))
            );
        }
    }
}

// ============================================================================
// Join completeness and slot semantics
// ============================================================================

mod join_tests {
    use super::*;

    #[test]
    fn test_joined_processor_fires_once_per_complete_bundle() {
        let mut unit = pair_processor("sub", AlgorithmKind::Subtraction, None);

        assert!(unit
            .offer(1, Event::new("pair").with_attribute("a", 9.0))
            .unwrap()
            .is_none());
        let out = unit
            .offer(2, Event::new("pair").with_attribute("b", 4.0))
            .unwrap()
            .unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Float(5.0)));

        // The bundle was consumed; the next event buffers again.
        assert!(unit
            .offer(1, Event::new("pair").with_attribute("a", 1.0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_newer_event_overwrites_a_pending_slot() {
        let mut unit = pair_processor("sub", AlgorithmKind::Subtraction, None);
        unit.offer(1, Event::new("pair").with_attribute("a", 5.0))
            .unwrap();
        unit.offer(1, Event::new("pair").with_attribute("a", 7.0))
            .unwrap();

        let out = unit
            .offer(2, Event::new("pair").with_attribute("b", 1.0))
            .unwrap()
            .unwrap();
        assert_eq!(out.get("value"), Some(&AttributeValue::Float(6.0)));
    }

    #[test]
    fn test_undeclared_input_is_rejected() {
        let mut unit = pair_processor("sub", AlgorithmKind::Subtraction, None);
        let err = unit.offer(3, Event::new("pair")).unwrap_err();
        assert!(matches!(err, ProcessorError::UnknownInput { .. }));
    }
}
