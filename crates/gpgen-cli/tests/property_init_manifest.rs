// Starter manifests generate a workflow for every environment they declare

use std::sync::Arc;

use gpgen_cli::commands::init::starter_manifest;
use gpgen_generator::WorkflowGenerator;
use gpgen_manifest::{ManifestParser, ValidationMode};
use gpgen_templates::TemplateCatalog;
use proptest::prelude::*;

fn template_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("node-app"), Just("go-service"), Just("python-app")]
}

proptest! {
    #[test]
    fn prop_starter_manifest_generates(
        template in template_strategy(),
        name in "[a-z][a-z0-9-]{0,20}",
    ) {
        let catalog = Arc::new(TemplateCatalog::builtin());
        let manifest = starter_manifest(template, &name);
        prop_assert!(ManifestParser::validate(&manifest, &catalog).is_ok());

        let generator = WorkflowGenerator::new(catalog);
        for environment in manifest.environment_names() {
            let workflow = generator.generate_workflow(&manifest, &environment);
            prop_assert!(workflow.is_ok(), "{} {}: {:?}", template, environment, workflow.err());
            prop_assert!(workflow.unwrap().name.starts_with(name.as_str()));
        }
    }

    #[test]
    fn prop_starter_manifest_survives_yaml(
        template in template_strategy(),
        name in "[a-z][a-z0-9-]{0,20}",
    ) {
        let manifest = starter_manifest(template, &name);
        let yaml = ManifestParser::to_yaml(&manifest).unwrap();
        let parsed = ManifestParser::parse_yaml(&yaml).unwrap();
        prop_assert_eq!(parsed.validation_mode(), ValidationMode::Relaxed);
        prop_assert_eq!(parsed, manifest);
    }
}
