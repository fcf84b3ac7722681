//! Property-based tests for input resolution

#[cfg(test)]
mod tests {
    use gpgen_manifest::{EnvironmentConfig, Manifest, ManifestParser};
    use gpgen_templates::{InputValue, TemplateCatalog};
    use proptest::prelude::*;

    use crate::resolver::{event_context_flags, InputResolver};

    fn base_manifest() -> Manifest {
        ManifestParser::parse_yaml(
            "apiVersion: gpgen.dev/v1\nkind: Pipeline\nmetadata:\n  name: app\nspec:\n  template: go-service\n",
        )
        .unwrap()
    }

    fn environment_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("default".to_string()),
            Just("staging".to_string()),
            Just("production".to_string()),
            "[a-z]{2,8}",
        ]
    }

    /// Manifest inputs always win over template defaults.
    #[test]
    fn prop_manifest_value_beats_default() {
        proptest!(|(command in "[a-z][a-z ./-]{0,30}", env in environment_strategy())| {
            let mut manifest = base_manifest();
            manifest
                .spec
                .inputs
                .insert("testCommand".to_string(), InputValue::from(command.as_str()));

            let catalog = TemplateCatalog::builtin();
            let inputs = InputResolver::new(&catalog).resolve(&manifest, &env);

            prop_assert_eq!(inputs.get("testCommand"), Some(&InputValue::from(command.as_str())));
        });
    }

    /// The selected environment's inputs win over the base inputs.
    #[test]
    fn prop_environment_value_beats_base() {
        proptest!(|(
            env in "[a-z]{2,8}",
            base in "[A-Z]{3,8}",
            overridden in "[A-Z]{3,8}",
        )| {
            prop_assume!(env != "default");

            let mut manifest = base_manifest();
            manifest
                .spec
                .inputs
                .insert("trivySeverity".to_string(), InputValue::from(base.as_str()));
            let mut config = EnvironmentConfig::default();
            config
                .inputs
                .insert("trivySeverity".to_string(), InputValue::from(overridden.as_str()));
            manifest.spec.environments.insert(env.clone(), config);

            let catalog = TemplateCatalog::builtin();
            let inputs = InputResolver::new(&catalog).resolve(&manifest, &env);

            prop_assert_eq!(inputs.get("trivySeverity"), Some(&InputValue::from(overridden.as_str())));
        });
    }

    /// Explicit event-context inputs are never replaced by computed flags.
    #[test]
    fn prop_event_flags_never_override() {
        proptest!(|(env in environment_strategy(), explicit in any::<bool>(), flag in 0usize..3)| {
            let names = [
                "containerBuildOnPR",
                "containerBuildOnProduction",
                "containerPushOnProduction",
            ];
            let mut manifest = base_manifest();
            manifest
                .spec
                .inputs
                .insert(names[flag].to_string(), InputValue::Bool(explicit));

            let catalog = TemplateCatalog::builtin();
            let inputs = InputResolver::new(&catalog).resolve(&manifest, &env);

            prop_assert_eq!(inputs.get_bool(names[flag]), Some(explicit));
            for &(name, value) in event_context_flags(&env) {
                if name != names[flag] {
                    prop_assert_eq!(inputs.get_bool(name), Some(value));
                }
            }
        });
    }
}
