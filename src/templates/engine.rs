// Page rendering engine using Tera

use crate::render::PageView;
use anyhow::{anyhow, Result};
use std::sync::Mutex;
use tera::{Context, Tera};

/// Tera wrapper holding the compiled page templates.
///
/// Templates whose names end in `.html` are auto-escaped, so values coming
/// from the research agent are never interpreted as markup.
pub struct TemplateEngine {
    tera: Mutex<Tera>,
}

impl TemplateEngine {
    /// Create an engine without any templates
    pub fn empty() -> Self {
        Self {
            tera: Mutex::new(Tera::default()),
        }
    }

    /// Create an engine with the built-in templates compiled
    pub fn new() -> Result<Self> {
        let engine = Self::empty();
        for (name, source) in super::builtin::get_builtin_templates() {
            engine.add_template(&name, &source)?;
        }
        log::debug!("[templates] Loaded {:?}", engine.template_names());
        Ok(engine)
    }

    /// Add a template from string
    pub fn add_template(&self, name: &str, template: &str) -> Result<()> {
        let mut tera = self.tera.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        tera.add_raw_template(name, template)
            .map_err(|e| anyhow!("Failed to add template '{}': {}", name, e))?;
        Ok(())
    }

    /// Render a template with a page model bound to `page`
    pub fn render(&self, template_name: &str, page: &PageView) -> Result<String> {
        let tera = self.tera.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        let mut ctx = Context::new();
        ctx.insert("page", page);

        tera.render(template_name, &ctx)
            .map_err(|e| anyhow!("Failed to render template '{}': {}", template_name, e))
    }

    /// Render the full HTML page
    pub fn render_page(&self, page: &PageView) -> Result<String> {
        self.render(super::builtin::PAGE, page)
    }

    /// Check if a template exists
    pub fn has_template(&self, name: &str) -> bool {
        let tera = self.tera.lock().ok();
        tera.map(|t| t.get_template_names().any(|n| n == name))
            .unwrap_or(false)
    }

    /// Get list of template names
    pub fn template_names(&self) -> Vec<String> {
        let tera = self.tera.lock().ok();
        tera.map(|t| t.get_template_names().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupError;
    use crate::models::CompanyProfile;
    use crate::render::{FormValues, PageBody, PLACEHOLDER};
    use crate::research::InputError;
    use uuid::Uuid;

    fn form(company: &str) -> FormValues {
        FormValues {
            company: company.to_string(),
            country: String::new(),
        }
    }

    #[test]
    fn test_new_loads_builtin_page() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.has_template("page.html"));
    }

    #[test]
    fn test_render_unknown_template_fails() {
        let engine = TemplateEngine::empty();
        let err = engine.render("missing.html", &PageView::blank()).unwrap_err();
        assert!(err.to_string().contains("missing.html"));
    }

    #[test]
    fn test_blank_page_has_form_only() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine.render_page(&PageView::blank()).unwrap();
        assert!(html.contains("<form"));
        assert!(html.contains("name=\"company\""));
        assert!(!html.contains("class=\"section"));
        assert!(!html.contains("class=\"error-panel\""));
    }

    #[test]
    fn test_profile_values_are_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let profile = CompanyProfile {
            legal_name: Some("<script>alert(1)</script> Ltd".to_string()),
            ..Default::default()
        };
        let page = PageView::for_lookup(form("Evil"), &Ok(profile), Uuid::nil());
        let html = engine.render_page(&page).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(PLACEHOLDER));
    }

    #[test]
    fn test_error_page_renders_one_panel() {
        let engine = TemplateEngine::new().unwrap();
        let page = PageView::for_lookup(
            form(""),
            &Err(LookupError::from(InputError::Empty)),
            Uuid::nil(),
        );
        assert!(matches!(page.body, PageBody::Error(_)));
        let html = engine.render_page(&page).unwrap();
        assert_eq!(html.matches("class=\"error-panel\"").count(), 1);
        assert!(html.contains("InputError"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_form_values_are_echoed() {
        let engine = TemplateEngine::new().unwrap();
        let page = PageView::new(
            FormValues {
                company: "Acme \"Corp\"".to_string(),
                country: "France".to_string(),
            },
            PageBody::Blank,
        );
        let html = engine.render_page(&page).unwrap();
        assert!(html.contains("value=\"Acme &quot;Corp&quot;\""));
        assert!(html.contains("value=\"France\""));
    }
}
