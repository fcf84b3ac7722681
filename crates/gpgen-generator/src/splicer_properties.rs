//! Property-based tests for custom step splicing

#[cfg(test)]
mod tests {
    use gpgen_manifest::CustomStep;
    use proptest::prelude::*;

    use crate::splicer::{matches_step, StepSplicer};
    use crate::workflow::WorkflowStep;

    const TEMPLATE_NAMES: &[&str] = &[
        "Checkout code",
        "Setup Node.js",
        "Install dependencies",
        "Run tests",
        "Build application",
    ];

    fn steps_with_filler(filler: &[String]) -> Vec<WorkflowStep> {
        TEMPLATE_NAMES
            .iter()
            .map(|name| name.to_string())
            .chain(filler.iter().cloned())
            .map(WorkflowStep::named)
            .collect()
    }

    fn directive_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("before"), Just("after"), Just("replace")]
    }

    fn target_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("checkout"),
            Just("setup-node"),
            Just("install"),
            Just("test"),
            Just("build"),
        ]
    }

    /// Inserting grows the list by one; replacing keeps its length.
    #[test]
    fn prop_splice_count() {
        proptest!(|(
            directive in directive_strategy(),
            target in target_strategy(),
            filler in prop::collection::vec("[A-Z][a-z]{2} [a-z]{3}", 0..5),
        )| {
            let steps = steps_with_filler(&filler);
            let before = steps.len();
            let custom = CustomStep::run("Custom Step", "echo custom")
                .at(format!("{}:{}", directive, target));

            let result = StepSplicer::apply(steps, &custom).unwrap();

            let expected = if directive == "replace" { before } else { before + 1 };
            prop_assert_eq!(result.len(), expected);
            prop_assert_eq!(result.iter().filter(|s| s.name == "Custom Step").count(), 1);
        });
    }

    /// The spliced step sits next to its target and the rest keeps its order.
    #[test]
    fn prop_splice_preserves_relative_order() {
        proptest!(|(directive in directive_strategy(), target in target_strategy())| {
            let custom = CustomStep::run("Custom Step", "echo custom")
                .at(format!("{}:{}", directive, target));
            let result = StepSplicer::apply(steps_with_filler(&[]), &custom).unwrap();

            let index = result.iter().position(|s| s.name == "Custom Step").unwrap();
            let target_index = TEMPLATE_NAMES
                .iter()
                .position(|name| matches_step(name, target))
                .unwrap();
            let expected = match directive {
                "after" => target_index + 1,
                _ => target_index,
            };
            prop_assert_eq!(index, expected);

            let remaining: Vec<&str> = result
                .iter()
                .map(|s| s.name.as_str())
                .filter(|name| *name != "Custom Step")
                .collect();
            let original: Vec<&str> = TEMPLATE_NAMES
                .iter()
                .copied()
                .filter(|name| directive != "replace" || !matches_step(name, target))
                .collect();
            prop_assert_eq!(remaining, original);
        });
    }

    /// A step without a position always ends up last.
    #[test]
    fn prop_append_is_last() {
        proptest!(|(
            filler in prop::collection::vec("[A-Za-z ]{1,20}", 0..20),
            name in "[A-Z][a-z]{1,10}",
        )| {
            let steps: Vec<WorkflowStep> = filler.into_iter().map(WorkflowStep::named).collect();
            let count = steps.len();

            let result = StepSplicer::apply(steps, &CustomStep::run(name.clone(), "echo")).unwrap();

            prop_assert_eq!(result.len(), count + 1);
            prop_assert_eq!(&result[count].name, &name);
        });
    }

    /// Tokens shorter than four characters only ever match whole words.
    #[test]
    fn prop_short_tokens_match_whole_words() {
        proptest!(|(word in "[a-z]{5,10}", token in "[a-z]{1,3}")| {
            let name = format!("Step {}", word);
            let singular = word.strip_suffix('s').unwrap_or(&word);
            let expected = token == "step" || token == singular;
            prop_assert_eq!(matches_step(&name, &token), expected);
        });
    }
}
