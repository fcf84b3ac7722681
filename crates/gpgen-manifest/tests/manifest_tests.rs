//! Manifest loading and validation tests

use std::fs;

use gpgen_manifest::{ManifestError, ManifestParser, ValidationMode};
use gpgen_templates::{InputValue, TemplateCatalog};
use tempfile::TempDir;

const FULL_MANIFEST: &str = r#"
apiVersion: gpgen.dev/v1
kind: Pipeline
metadata:
  name: storefront
  annotations:
    gpgen.dev/validation-mode: relaxed
spec:
  template: node-app
  inputs:
    nodeVersion: "20"
    packageManager: yarn
    container:
      enabled: true
  customSteps:
    - name: Security Scan
      position: after:test
      uses: securecodewarrior/github-action-add-sarif@v1
      with:
        sarif-file: results.sarif
    - name: Notify
      run: ./notify.sh
      timeout-minutes: 5
      continue-on-error: true
  overrides:
    test:
      env:
        CI: "true"
  environments:
    staging:
      inputs:
        nodeVersion: "18"
    production:
      annotations:
        gpgen.dev/approval: required
      inputs:
        nodeVersion: "22"
      customSteps:
        - name: Deploy
          position: after:build
          run: ./deploy.sh production
"#;

#[test]
fn test_parse_full_manifest() {
    let manifest = ManifestParser::parse_yaml(FULL_MANIFEST).unwrap();
    ManifestParser::validate(&manifest, &TemplateCatalog::builtin()).unwrap();

    assert_eq!(manifest.pipeline_name(), "storefront");
    assert_eq!(manifest.validation_mode(), ValidationMode::Relaxed);
    assert_eq!(manifest.spec.custom_steps.len(), 2);
    assert_eq!(manifest.spec.custom_steps[1].timeout_minutes, Some(5));
    assert_eq!(manifest.spec.custom_steps[1].continue_on_error, Some(true));
    assert_eq!(manifest.spec.overrides["test"].env["CI"], "true");
    assert_eq!(
        manifest.spec.inputs["container"].get_path("enabled"),
        Some(&InputValue::Bool(true))
    );

    let production = manifest.environment("production").unwrap();
    assert_eq!(production.inputs["nodeVersion"], InputValue::from("22"));
    assert_eq!(production.custom_steps[0].position, "after:build");
    assert_eq!(
        manifest.environment_names(),
        vec!["default", "production", "staging"]
    );
}

#[test]
fn test_serialized_manifest_parses_back() {
    let manifest = ManifestParser::parse_yaml(FULL_MANIFEST).unwrap();
    let yaml = ManifestParser::to_yaml(&manifest).unwrap();
    assert_eq!(ManifestParser::parse_yaml(&yaml).unwrap(), manifest);
}

#[test]
fn test_invalid_api_version_and_kind() {
    let catalog = TemplateCatalog::builtin();

    let manifest = ManifestParser::parse_yaml(
        "apiVersion: gpgen.dev/v2\nkind: Pipeline\nspec:\n  template: node-app\n",
    )
    .unwrap();
    let err = ManifestParser::validate(&manifest, &catalog).unwrap_err();
    assert!(err.to_string().starts_with("invalid apiVersion: gpgen.dev/v2"));

    let manifest = ManifestParser::parse_yaml(
        "apiVersion: gpgen.dev/v1\nkind: Workflow\nspec:\n  template: node-app\n",
    )
    .unwrap();
    let err = ManifestParser::validate(&manifest, &catalog).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidKind(_)));
}

#[test]
fn test_unknown_template_lists_available() {
    let manifest = ManifestParser::parse_yaml(
        "apiVersion: gpgen.dev/v1\nkind: Pipeline\nspec:\n  template: rust-app\n",
    )
    .unwrap();
    let err = ManifestParser::validate(&manifest, &TemplateCatalog::builtin()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid template: rust-app (available: node-app, go-service, python-app)"
    );
}

#[test]
fn test_environment_custom_step_error_names_environment() {
    let manifest = ManifestParser::parse_yaml(
        r#"
apiVersion: gpgen.dev/v1
kind: Pipeline
metadata:
  name: app
spec:
  template: go-service
  environments:
    production:
      customSteps:
        - name: Deploy
          position: after:build
          run: ./deploy.sh
        - name: Broken
          position: sideways:build
          run: echo
"#,
    )
    .unwrap();

    let err = ManifestParser::validate(&manifest, &TemplateCatalog::builtin()).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("invalid custom step at index 1 in environment production:"));
    assert!(message.contains("invalid position format: sideways:build"));
}

#[test]
fn test_override_timeout_is_checked() {
    let manifest = ManifestParser::parse_yaml(
        "apiVersion: gpgen.dev/v1\nkind: Pipeline\nspec:\n  template: go-service\n  overrides:\n    test:\n      timeout-minutes: 0\n",
    )
    .unwrap();
    let err = ManifestParser::validate(&manifest, &TemplateCatalog::builtin()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid override for step 'test': timeout-minutes must be between 1 and 360"
    );
}

#[test]
fn test_empty_metadata_name_rejected() {
    let manifest = ManifestParser::parse_yaml(
        "apiVersion: gpgen.dev/v1\nkind: Pipeline\nmetadata:\n  name: \"\"\nspec:\n  template: go-service\n",
    )
    .unwrap();
    let err = ManifestParser::validate(&manifest, &TemplateCatalog::builtin()).unwrap_err();
    assert_eq!(err.to_string(), "metadata.name is required");
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifest.yaml");
    fs::write(&path, FULL_MANIFEST).unwrap();

    let manifest = ManifestParser::load_from_file(&path, &TemplateCatalog::builtin()).unwrap();
    assert_eq!(manifest.spec.template, "node-app");

    let missing = ManifestParser::load_from_file(&dir.path().join("nope.yaml"), &TemplateCatalog::builtin());
    assert!(matches!(missing, Err(ManifestError::Io { .. })));
}
