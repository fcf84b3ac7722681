// List templates or show one in detail

use gpgen_templates::{Template, TemplateCatalog};

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputStyle};

/// Show available templates
pub struct TemplatesCommand {
    pub name: Option<String>,
}

impl TemplatesCommand {
    pub fn new(name: Option<String>) -> Self {
        Self { name }
    }

    /// Lines describing the requested templates
    pub fn render(&self, style: &OutputStyle) -> CliResult<Vec<String>> {
        let catalog = TemplateCatalog::builtin();
        match &self.name {
            None => Ok(list_lines(&catalog, style)),
            Some(name) => {
                let template = catalog.load(name).map_err(|_| CliError::UnknownTemplate {
                    name: name.clone(),
                    available: catalog.list().into_iter().map(str::to_string).collect(),
                })?;
                Ok(detail_lines(template, style))
            }
        }
    }
}

impl Command for TemplatesCommand {
    fn execute(&self) -> CliResult<()> {
        for line in self.render(&OutputStyle::default())? {
            output::print_line(&line);
        }
        Ok(())
    }
}

fn list_lines(catalog: &TemplateCatalog, style: &OutputStyle) -> Vec<String> {
    let mut lines = vec![style.header("Available templates")];
    for template in catalog.templates() {
        let language = template
            .language
            .map(|l| format!(" [{}]", l))
            .unwrap_or_default();
        lines.push(style.list_item(&format!(
            "{}{}: {}",
            template.name, language, template.metadata.description
        )));
    }
    lines.push(style.tip("Run 'gpgen templates <name>' for steps and inputs"));
    lines
}

fn detail_lines(template: &Template, style: &OutputStyle) -> Vec<String> {
    let mut lines = vec![style.header(&template.name), template.metadata.description.clone()];
    if let Some(language) = template.language {
        let config = language.config();
        lines.push(style.key_value(
            "versions",
            &format!(
                "{} (default {}, latest {})",
                config.versions.join(", "),
                config.default_version,
                config.latest_version()
            ),
        ));
    }

    lines.push(style.section("Steps"));
    for (index, step) in template.steps.iter().enumerate() {
        lines.push(style.numbered_item(index + 1, &format!("{} ({})", step.name, step.id)));
    }

    lines.push(style.section("Inputs"));
    for (name, definition) in &template.inputs {
        let mut detail = definition.input_type.as_str().to_string();
        if definition.required {
            detail.push_str(", required");
        }
        if let Some(default) = definition.default.as_ref().and_then(|d| d.as_str()) {
            detail.push_str(&format!(", default {}", default));
        }
        lines.push(style.key_value(name, &detail));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> OutputStyle {
        OutputStyle { use_colors: false }
    }

    #[test]
    fn test_list_all() {
        let lines = TemplatesCommand::new(None).render(&plain()).unwrap();
        let text = lines.join("\n");
        assert!(text.contains("node-app"));
        assert!(text.contains("go-service"));
        assert!(text.contains("python-app"));
    }

    #[test]
    fn test_show_one() {
        let lines = TemplatesCommand::new(Some("go-service".to_string()))
            .render(&plain())
            .unwrap();
        let text = lines.join("\n");
        assert!(text.contains("(checkout)"));
        assert!(text.contains("goVersion"));
        assert!(text.contains("default 1.21"));
        assert!(text.contains("versions: 1.21, 1.22, 1.23, 1.24 (default 1.21, latest 1.24)"));
    }

    #[test]
    fn test_unknown_template() {
        let err = TemplatesCommand::new(Some("rust-app".to_string()))
            .render(&plain())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown template: rust-app. Available templates: node-app, go-service, python-app"
        );
    }
}
