use crate::config::SiteConfig;
use crate::render::TemplateSet;
use crate::renderers::RendererRegistry;

/// Result of validating a site configuration.
pub struct CheckResult {
    pub handler_count: usize,
    pub template_names: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a site without building it: handler patterns, the template
/// directory, and every template and renderer a handler names by default.
pub fn check_site(config: &SiteConfig, renderers: &RendererRegistry) -> CheckResult {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    if let Err(e) = config.validate() {
        errors.push(format!("Config validation: {e}"));
    }

    if !config.build.input.is_dir() {
        errors.push(format!(
            "Input directory not found: {}",
            config.build.input.display()
        ));
    }

    if !config.build.templates.is_dir() {
        warnings.push(format!(
            "Template directory not found: {} (documents will render without templates)",
            config.build.templates.display()
        ));
    }

    let templates = match TemplateSet::load(&config.build.templates, &config.build.template_suffix)
    {
        Ok(set) => Some(set),
        Err(e) => {
            errors.push(format!("Templates: {}", describe(&e)));
            None
        }
    };

    let registry = match config.handler_registry() {
        Ok(registry) => registry,
        Err(e) => {
            errors.push(format!("Handlers: {}", describe(&e)));
            return CheckResult {
                handler_count: 0,
                template_names: templates.map(|t| t.names()).unwrap_or_default(),
                warnings,
                errors,
            };
        }
    };

    for handler in registry.iter() {
        if let (Some(template), Some(set)) = (&handler.template, &templates) {
            if !set.contains(template) {
                errors.push(format!(
                    "Handler '{}' uses template '{template}', which does not exist",
                    handler.name
                ));
            }
        }
        if let Some(renderer) = &handler.renderer {
            if !renderers.contains(renderer) {
                errors.push(format!(
                    "Handler '{}' uses unknown renderer '{renderer}'",
                    handler.name
                ));
            }
        }
    }

    CheckResult {
        handler_count: registry.len(),
        template_names: templates.map(|t| t.names()).unwrap_or_default(),
        warnings,
        errors,
    }
}

/// Error text including the underlying cause, e.g. the Tera parse message.
fn describe(error: &dyn std::error::Error) -> String {
    match error.source() {
        Some(source) => format!("{error}: {source}"),
        None => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site(config_toml: &str) -> (tempfile::TempDir, SiteConfig) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/page.tera"), "{{ body }}").unwrap();
        let mut config: SiteConfig = toml::from_str(config_toml).unwrap();
        config.resolve_paths(dir.path());
        (dir, config)
    }

    #[test]
    fn valid_site_passes() {
        let (_dir, config) = site(
            "[[handlers]]\npatterns = [\"*.md\"]\ntemplate = \"page\"\nrenderer = \"markdown\"\n",
        );
        let result = check_site(&config, &RendererRegistry::with_defaults());
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(result.handler_count, 1);
        assert_eq!(result.template_names, vec!["page"]);
    }

    #[test]
    fn missing_template_and_renderer_are_errors() {
        let (_dir, config) = site(
            "[[handlers]]\nname = \"posts\"\npatterns = [\"*.md\"]\ntemplate = \"post\"\nrenderer = \"rst\"\n",
        );
        let result = check_site(&config, &RendererRegistry::with_defaults());
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("'post'"));
        assert!(result.errors[1].contains("'rst'"));
    }

    #[test]
    fn bad_glob_is_reported() {
        let (_dir, config) = site("[[handlers]]\npatterns = [\"[oops\"]\n");
        let result = check_site(&config, &RendererRegistry::with_defaults());
        assert!(!result.is_ok());
        assert!(result.errors[0].starts_with("Handlers:"));
    }

    #[test]
    fn missing_template_dir_is_a_warning() {
        let (dir, config) = site("");
        fs::remove_dir_all(dir.path().join("templates")).unwrap();
        let result = check_site(&config, &RendererRegistry::with_defaults());
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
    }
}
