//! Prompt template loading and rendering via `minijinja`.
//!
//! Three prompts are built in: entity extraction, world specification and
//! translation, each a system and a user template. A templates directory
//! may override any of them by file name (`extract_system.j2`,
//! `world_user.j2`, ...) so operators can tune prompting without
//! recompiling.

use std::path::Path;

use minijinja::{Environment, context};

use crate::error::EngineError;

/// Built-in templates as `(name, source)` pairs.
const BUILTIN_TEMPLATES: [(&str, &str); 6] = [
    ("extract_system", include_str!("../templates/extract_system.j2")),
    ("extract_user", include_str!("../templates/extract_user.j2")),
    ("world_system", include_str!("../templates/world_system.j2")),
    ("world_user", include_str!("../templates/world_user.j2")),
    ("translate_system", include_str!("../templates/translate_system.j2")),
    ("translate_user", include_str!("../templates/translate_user.j2")),
];

/// Manages prompt template loading and rendering.
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the model's role.
    pub system: String,
    /// User message carrying the input text.
    pub user: String,
    /// Whether the backend should be asked for a JSON-only response.
    pub json_response: bool,
}

impl PromptEngine {
    /// Create a prompt engine with only the built-in templates.
    pub fn builtin() -> Result<Self, EngineError> {
        let mut env = Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| EngineError::Template(format!("failed to add {name} template: {e}")))?;
        }
        Ok(Self { env })
    }

    /// Create a prompt engine, letting `<name>.j2` files in `templates_dir`
    /// replace the matching built-in templates.
    pub fn with_overrides(templates_dir: &Path) -> Result<Self, EngineError> {
        let mut engine = Self::builtin()?;
        for (name, _) in BUILTIN_TEMPLATES {
            let path = templates_dir.join(format!("{name}.j2"));
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path).map_err(|e| {
                EngineError::Template(format!("failed to read {}: {e}", path.display()))
            })?;
            engine
                .env
                .add_template_owned(name, source)
                .map_err(|e| EngineError::Template(format!("failed to add {name} template: {e}")))?;
            tracing::debug!(template = name, path = %path.display(), "prompt template overridden");
        }
        Ok(engine)
    }

    /// Prompt asking for the key concepts mentioned in `text`.
    pub fn render_extraction(&self, text: &str) -> Result<RenderedPrompt, EngineError> {
        self.render_pair("extract", &context! { text => text }, true)
    }

    /// Prompt asking for a `{nodes, edges}` world specification of `text`.
    pub fn render_world_spec(&self, text: &str) -> Result<RenderedPrompt, EngineError> {
        self.render_pair("world", &context! { text => text }, true)
    }

    /// Prompt asking for `text` rewritten under the given world laws.
    pub fn render_translation(&self, text: &str, laws: &str) -> Result<RenderedPrompt, EngineError> {
        self.render_pair("translate", &context! { text => text, laws => laws }, false)
    }

    fn render_pair(
        &self,
        prefix: &str,
        ctx: &minijinja::Value,
        json_response: bool,
    ) -> Result<RenderedPrompt, EngineError> {
        let system = self.render_one(&format!("{prefix}_system"), ctx)?;
        let user = self.render_one(&format!("{prefix}_user"), ctx)?;
        Ok(RenderedPrompt {
            system,
            user,
            json_response,
        })
    }

    fn render_one(&self, name: &str, ctx: &minijinja::Value) -> Result<String, EngineError> {
        self.env
            .get_template(name)
            .map_err(|e| EngineError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| EngineError::Template(format!("{name} render failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_extraction_prompt_carries_text() {
        let engine = PromptEngine::builtin().ok();
        let prompt = engine.and_then(|e| e.render_extraction("The knight crossed the bridge.").ok());
        let prompt = prompt.unwrap_or_else(|| panic!("extraction prompt should render"));
        assert!(prompt.user.contains("The knight crossed the bridge."));
        assert!(prompt.json_response);
    }

    #[test]
    fn extraction_prompts_ask_for_the_same_shape() {
        let prompt = PromptEngine::builtin()
            .and_then(|e| e.render_extraction("The knight crossed the bridge."))
            .ok()
            .unwrap_or_else(|| panic!("extraction prompt should render"));
        assert!(prompt.system.contains(r#"{"entities": ["#));
        assert!(prompt.user.contains(r#"{"entities": ["#));
        assert!(!prompt.user.contains("list of strings"));
    }

    #[test]
    fn translation_prompt_carries_laws_and_is_plain_text() {
        let engine = PromptEngine::builtin().ok();
        let prompt = engine.and_then(|e| {
            e.render_translation("A cop arrests a thief.", "Concept 'cop' maps to 'knight'")
                .ok()
        });
        let prompt = prompt.unwrap_or_else(|| panic!("translation prompt should render"));
        assert!(prompt.system.contains("Functor Engine"));
        assert!(prompt.user.contains("A cop arrests a thief."));
        assert!(prompt.user.contains("Concept 'cop' maps to 'knight'"));
        assert!(!prompt.json_response);
    }

    #[test]
    fn world_prompt_names_required_fields() {
        let prompt = PromptEngine::builtin()
            .and_then(|e| e.render_world_spec("A kingdom of ash."))
            .ok()
            .unwrap_or_else(|| panic!("world prompt should render"));
        assert!(prompt.user.contains("\"nodes\""));
        assert!(prompt.user.contains("\"edges\""));
        assert!(prompt.user.contains("A kingdom of ash."));
    }

    #[test]
    fn directory_overrides_single_template() {
        let dir = std::env::temp_dir().join(format!(
            "functor_prompt_overrides_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("translate_user.j2"), "LAWS={{ laws }} TEXT={{ text }}").ok();

        let prompt = PromptEngine::with_overrides(&dir)
            .and_then(|e| e.render_translation("hello", "none"))
            .ok()
            .unwrap_or_else(|| panic!("overridden prompt should render"));
        assert_eq!(prompt.user, "LAWS=none TEXT=hello");
        assert!(prompt.system.contains("Functor Engine"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn broken_override_is_template_error() {
        let dir = std::env::temp_dir().join(format!(
            "functor_prompt_broken_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("extract_user.j2"), "{% if %}").ok();

        let result = PromptEngine::with_overrides(&dir);
        assert!(matches!(result, Err(EngineError::Template(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
