use proptest::prelude::*;

use crate::models::CustomStep;
use crate::parser::ManifestParser;

fn directive_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("before"), Just("after"), Just("replace")]
}

proptest! {
    #[test]
    fn prop_lowercase_targets_accepted(
        directive in directive_strategy(),
        target in "[a-z0-9][a-z0-9-]{0,15}",
    ) {
        let position = format!("{}:{}", directive, target);
        prop_assert!(ManifestParser::validate_position(&position).is_ok());
    }

    #[test]
    fn prop_unknown_directives_rejected(
        directive in "[a-z]{3,8}",
        target in "[a-z]{1,10}",
    ) {
        prop_assume!(!["before", "after", "replace"].contains(&directive.as_str()));
        let position = format!("{}:{}", directive, target);
        let err = ManifestParser::validate_position(&position).unwrap_err();
        prop_assert!(err.starts_with("invalid position format"));
    }

    #[test]
    fn prop_timeout_range(minutes in -10i64..400) {
        let mut step = CustomStep::run("Slow", "sleep 1");
        step.timeout_minutes = Some(minutes);
        let manifest_ok = ManifestParser::validate_custom_step(&step).is_ok();
        prop_assert_eq!(manifest_ok, (1..=360).contains(&minutes));
    }
}
