//! Built-in golden-path templates
//!
//! Every template starts with a checkout, runs its language-specific setup,
//! install, lint, test and build steps, and ends with the shared security
//! and container steps.

use std::collections::BTreeMap;

use gpgen_config::languages::DEFAULT_SEVERITY;
use gpgen_config::{Language, LanguageConfig};

use crate::actions;
use crate::conditions;
use crate::models::{InputDefinition, Template, TemplateMetadata, TemplateStep};
use crate::value::InputValue;

/// Name of the Node.js template
pub const NODE_APP: &str = "node-app";
/// Name of the Go template
pub const GO_SERVICE: &str = "go-service";
/// Name of the Python template
pub const PYTHON_APP: &str = "python-app";

const TEMPLATE_VERSION: &str = "1.0.0";
const TEMPLATE_AUTHOR: &str = "GPGen Team";

/// All built-in templates, in catalog order
pub fn all() -> Vec<Template> {
    vec![node_app(), go_service(), python_app()]
}

/// Node.js application template
pub fn node_app() -> Template {
    let config = Language::Node.config();
    let mut steps = vec![
        checkout(),
        TemplateStep::new("setup-node", "Setup Node.js")
            .uses(actions::SETUP_NODE)
            .with_param("node-version", input_ref(config.version_input))
            .with_param("cache", input_ref("packageManager")),
        TemplateStep::new("install", "Install dependencies").run(
            r#"{{ .Inputs.packageManager }} {{ if eq .Inputs.packageManager "npm" }}ci{{ else }}install --frozen-lockfile{{ end }}"#,
        ),
        TemplateStep::new("test", "Run tests").run(input_ref("testCommand")),
        TemplateStep::new("build", "Build application")
            .run(input_ref("buildCommand"))
            .when(present("buildCommand")),
    ];
    steps.extend(security_steps());
    steps.extend(container_steps());

    let mut inputs = language_inputs(config);
    inputs.insert(
        "buildCommand".to_string(),
        InputDefinition::string("Command to build the application")
            .with_default(config.build_command.unwrap_or_default()),
    );

    Template {
        name: NODE_APP.to_string(),
        language: Some(Language::Node),
        metadata: metadata(
            "Node.js application with testing, building, and security scanning",
            &["nodejs", "javascript", "typescript", "npm", "yarn", "pnpm"],
        ),
        steps,
        inputs,
    }
}

/// Go service template
pub fn go_service() -> Template {
    let config = Language::Go.config();
    let mut steps = vec![
        checkout(),
        TemplateStep::new("setup-go", "Setup Go")
            .uses(actions::SETUP_GO)
            .with_param("go-version", input_ref(config.version_input))
            .with_param("cache", "true"),
        TemplateStep::new("test", "Run tests").run(input_ref("testCommand")),
        TemplateStep::new("build", "Build service").run(input_ref("buildCommand")),
    ];
    steps.extend(security_steps());
    steps.extend(container_steps());

    let mut inputs = language_inputs(config);
    inputs.insert(
        "buildCommand".to_string(),
        InputDefinition::string("Command to build the service")
            .with_default(config.build_command.unwrap_or_default())
            .required(),
    );
    inputs.insert(
        "platforms".to_string(),
        InputDefinition::string("Target platforms for cross-compilation")
            .with_default("linux/amd64,darwin/amd64"),
    );

    Template {
        name: GO_SERVICE.to_string(),
        language: Some(Language::Go),
        metadata: metadata(
            "Go service with testing, building, and security scanning",
            &["go", "golang", "service", "api"],
        ),
        steps,
        inputs,
    }
}

/// Python application template
pub fn python_app() -> Template {
    let config = Language::Python.config();
    let mut steps = vec![
        checkout(),
        TemplateStep::new("setup-python", "Setup Python")
            .uses(actions::SETUP_PYTHON)
            .with_param("python-version", input_ref(config.version_input))
            .with_param("cache", input_ref("packageManager")),
        TemplateStep::new("install", "Install dependencies").run(
            r#"{{ if eq .Inputs.packageManager "pip" }}pip install -r {{ .Inputs.requirements }}{{ else if eq .Inputs.packageManager "poetry" }}poetry install{{ else }}pipenv install{{ end }}"#,
        ),
        TemplateStep::new("lint", "Run linting")
            .run(input_ref("lintCommand"))
            .when(present("lintCommand")),
        TemplateStep::new("test", "Run tests").run(input_ref("testCommand")),
    ];
    steps.extend(security_steps());
    steps.extend(container_steps());

    let mut inputs = language_inputs(config);
    inputs.insert(
        "requirements".to_string(),
        InputDefinition::string("Path to the requirements file")
            .with_default(config.requirements_file.unwrap_or_default())
            .required(),
    );
    inputs.insert(
        "lintCommand".to_string(),
        InputDefinition::string("Command to run linting")
            .with_default(config.lint_command.unwrap_or_default()),
    );

    Template {
        name: PYTHON_APP.to_string(),
        language: Some(Language::Python),
        metadata: metadata(
            "Python application with testing, linting, and security scanning",
            &["python", "pip", "poetry", "pipenv", "pytest"],
        ),
        steps,
        inputs,
    }
}

/// Default `security` input tree
pub fn default_security_config() -> InputValue {
    InputValue::object([(
        "trivy",
        InputValue::object([
            ("enabled", InputValue::from(true)),
            ("severity", InputValue::from(DEFAULT_SEVERITY)),
            ("exitCode", InputValue::from("1")),
        ]),
    )])
}

/// Default `container` input tree
pub fn default_container_config() -> InputValue {
    InputValue::object([
        ("enabled", InputValue::from(false)),
        ("registry", InputValue::from("ghcr.io")),
        ("imageName", InputValue::from("${{ github.repository }}")),
        ("imageTag", InputValue::from("${{ github.sha }}")),
        ("dockerfile", InputValue::from("Dockerfile")),
        ("buildContext", InputValue::from(".")),
        ("buildArgs", InputValue::from("{}")),
        (
            "push",
            InputValue::object([
                ("enabled", InputValue::from(true)),
                ("onProduction", InputValue::from(true)),
                ("alwaysPush", InputValue::from(false)),
            ]),
        ),
        (
            "build",
            InputValue::object([
                ("alwaysBuild", InputValue::from(false)),
                ("alwaysPush", InputValue::from(false)),
                ("onPR", InputValue::from(true)),
                ("onProduction", InputValue::from(true)),
            ]),
        ),
    ])
}

fn checkout() -> TemplateStep {
    TemplateStep::new("checkout", "Checkout code").uses(actions::CHECKOUT)
}

fn security_steps() -> Vec<TemplateStep> {
    vec![
        TemplateStep::new("security-scan", "Run Trivy vulnerability scanner")
            .uses(actions::TRIVY)
            .with_param("scan-type", "fs")
            .with_param("scan-ref", ".")
            .with_param("format", "sarif")
            .with_param("output", "trivy-results.sarif")
            .with_param("severity", input_ref("security.trivy.severity"))
            .with_param("exit-code", input_ref("security.trivy.exitCode"))
            .when(conditions::security_scan()),
        TemplateStep::new(
            "upload-sarif",
            "Upload Trivy scan results to GitHub Security tab",
        )
        .uses(actions::UPLOAD_SARIF)
        .with_param("sarif_file", "trivy-results.sarif")
        .when(conditions::security_upload()),
    ]
}

fn container_steps() -> Vec<TemplateStep> {
    vec![
        TemplateStep::new("setup-docker-buildx", "Set up Docker Buildx")
            .uses(actions::SETUP_BUILDX)
            .when(conditions::container_build()),
        TemplateStep::new("login-registry", "Log in to Container Registry")
            .uses(actions::DOCKER_LOGIN)
            .with_param("registry", input_ref("container.registry"))
            .with_param("username", actions::ACTOR_PLACEHOLDER)
            .with_param("password", actions::TOKEN_PLACEHOLDER)
            .when(conditions::container_push()),
        TemplateStep::new("build-and-push", "Build and push container image")
            .uses(actions::BUILD_PUSH)
            .with_param("context", input_ref("container.buildContext"))
            .with_param("file", input_ref("container.dockerfile"))
            .with_param("push", input_ref("container.push.enabled"))
            .with_param(
                "tags",
                "{{ .Inputs.container.registry }}/{{ .Inputs.container.imageName }}:{{ .Inputs.container.imageTag }}",
            )
            .with_param("build-args", input_ref("container.buildArgs"))
            .with_param("cache-from", "type=gha")
            .with_param("cache-to", "type=gha,mode=max")
            .when(conditions::container_build()),
    ]
}

/// Inputs every language template shares: version, package manager, test
/// command, security and container settings
fn language_inputs(config: &LanguageConfig) -> BTreeMap<String, InputDefinition> {
    let mut inputs = BTreeMap::new();

    inputs.insert(
        config.version_input.to_string(),
        InputDefinition::string(format!("{} version to use", display_name(config.language)))
            .with_default(config.default_version)
            .required()
            .with_options(config.versions),
    );

    if let Some(manager) = config.default_package_manager {
        inputs.insert(
            "packageManager".to_string(),
            InputDefinition::string("Package manager to use")
                .with_default(manager.as_str())
                .required()
                .with_options(&config.package_manager_names()),
        );
    }

    inputs.insert(
        "testCommand".to_string(),
        InputDefinition::string("Command to run tests")
            .with_default(config.test_command)
            .required(),
    );
    inputs.insert(
        "security".to_string(),
        InputDefinition::object("Security scanning configuration")
            .with_default(default_security_config()),
    );
    inputs.insert(
        "container".to_string(),
        InputDefinition::object("Container build and push configuration")
            .with_default(default_container_config()),
    );

    inputs
}

fn display_name(language: Language) -> &'static str {
    match language {
        Language::Go => "Go",
        Language::Node => "Node.js",
        Language::Python => "Python",
    }
}

fn metadata(description: &str, tags: &[&str]) -> TemplateMetadata {
    TemplateMetadata {
        description: description.to_string(),
        version: TEMPLATE_VERSION.to_string(),
        author: TEMPLATE_AUTHOR.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn input_ref(path: &str) -> String {
    format!("{{{{ .Inputs.{} }}}}", path)
}

/// Condition that holds when an input is non-empty
fn present(path: &str) -> String {
    format!("{{{{ if .Inputs.{} }}}}true{{{{ else }}}}false{{{{ end }}}}", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::TemplateParser;
    use crate::models::InputType;

    #[test]
    fn test_every_template_starts_with_checkout() {
        for template in all() {
            assert_eq!(template.steps[0].id, "checkout", "{}", template.name);
            assert_eq!(template.steps[0].name, "Checkout code");
            assert_eq!(template.steps[0].uses, actions::CHECKOUT);
        }
    }

    #[test]
    fn test_every_step_field_parses() {
        for template in all() {
            for step in &template.steps {
                let fields = std::iter::once(&step.run)
                    .chain(step.with.values())
                    .chain(step.env.values())
                    .chain(std::iter::once(&step.if_condition));
                for field in fields {
                    assert!(
                        TemplateParser::parse(field).is_ok(),
                        "{} / {}: {}",
                        template.name,
                        step.id,
                        field
                    );
                }
            }
        }
    }

    #[test]
    fn test_node_step_order() {
        let ids: Vec<_> = node_app().steps.iter().map(|s| s.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                "checkout",
                "setup-node",
                "install",
                "test",
                "build",
                "security-scan",
                "upload-sarif",
                "setup-docker-buildx",
                "login-registry",
                "build-and-push",
            ]
        );
    }

    #[test]
    fn test_node_inputs() {
        let template = node_app();
        let version = &template.inputs["nodeVersion"];
        assert!(version.required);
        assert_eq!(version.default, Some(InputValue::from("18")));
        assert_eq!(version.options, vec!["16", "18", "20", "22"]);

        let build = &template.inputs["buildCommand"];
        assert!(!build.required);
        assert_eq!(build.default, Some(InputValue::from("npm run build")));

        assert_eq!(template.inputs["container"].input_type, InputType::Object);
    }

    #[test]
    fn test_go_inputs() {
        let template = go_service();
        assert!(template.inputs["buildCommand"].required);
        assert!(!template.inputs.contains_key("packageManager"));
        assert_eq!(
            template.inputs["platforms"].default,
            Some(InputValue::from("linux/amd64,darwin/amd64"))
        );
        assert_eq!(template.step("build").map(|s| s.name.as_str()), Some("Build service"));
    }

    #[test]
    fn test_python_inputs() {
        let template = python_app();
        assert_eq!(
            template.inputs["packageManager"].options,
            vec!["pip", "poetry", "pipenv"]
        );
        assert!(template.inputs["requirements"].required);
        assert_eq!(template.step("lint").map(|s| s.name.as_str()), Some("Run linting"));
    }

    #[test]
    fn test_default_trees() {
        let container = default_container_config();
        assert_eq!(container.get_path("enabled"), Some(&InputValue::Bool(false)));
        assert_eq!(container.get_path("push.enabled"), Some(&InputValue::Bool(true)));
        assert_eq!(container.get_path("build.onPR"), Some(&InputValue::Bool(true)));

        let security = default_security_config();
        assert_eq!(
            security.get_path("trivy.severity"),
            Some(&InputValue::from("CRITICAL,HIGH"))
        );
    }

    #[test]
    fn test_login_uses_placeholders() {
        let template = go_service();
        let login = template.step("login-registry").unwrap();
        assert_eq!(login.with["username"], actions::ACTOR_PLACEHOLDER);
        assert_eq!(login.with["password"], actions::TOKEN_PLACEHOLDER);
    }
}
