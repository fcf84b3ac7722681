//! GitHub Actions references and expression constants used by the templates

/// `actions/checkout`
pub const CHECKOUT: &str = "actions/checkout@v4";
/// `actions/setup-node`
pub const SETUP_NODE: &str = "actions/setup-node@v4";
/// `actions/setup-go`
pub const SETUP_GO: &str = "actions/setup-go@v4";
/// `actions/setup-python`
pub const SETUP_PYTHON: &str = "actions/setup-python@v4";
/// Trivy vulnerability scanner
pub const TRIVY: &str = "aquasecurity/trivy-action@master";
/// SARIF upload to the Security tab
pub const UPLOAD_SARIF: &str = "github/codeql-action/upload-sarif@v3";
/// Docker Buildx setup
pub const SETUP_BUILDX: &str = "docker/setup-buildx-action@v3";
/// Container registry login
pub const DOCKER_LOGIN: &str = "docker/login-action@v3";
/// Image build and push
pub const BUILD_PUSH: &str = "docker/build-push-action@v5";

/// Push event name
pub const EVENT_PUSH: &str = "push";
/// Pull request event name
pub const EVENT_PULL_REQUEST: &str = "pull_request";
/// Release event name
pub const EVENT_RELEASE: &str = "release";
/// Ref prefix of tag pushes
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Stand-in for the workflow actor inside template text
pub const ACTOR_PLACEHOLDER: &str = "GITHUB_ACTOR_PLACEHOLDER";
/// GitHub expression the actor placeholder becomes
pub const ACTOR_EXPRESSION: &str = "${{ github.actor }}";
/// Stand-in for the workflow token inside template text
pub const TOKEN_PLACEHOLDER: &str = "GITHUB_TOKEN_PLACEHOLDER";
/// GitHub expression the token placeholder becomes
pub const TOKEN_EXPRESSION: &str = "${{ secrets.GITHUB_TOKEN }}";

/// Replace actor and token placeholders with their GitHub expressions
///
/// Runs after template evaluation, so the `${{ }}` output is never parsed as
/// template syntax.
pub fn replace_placeholders(text: &str) -> String {
    if !text.contains("_PLACEHOLDER") {
        return text.to_string();
    }
    text.replace(ACTOR_PLACEHOLDER, ACTOR_EXPRESSION)
        .replace(TOKEN_PLACEHOLDER, TOKEN_EXPRESSION)
}
