use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::source::{PreprocessMode, Source, SourceOptions, UNKNOWN_MODULE};
use crate::traversal::AstPluginBuilder;

/// Renames component tags resolved from the environment in loose mode.
pub type CustomizeComponentName = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    pub module_name: Option<String>,
}

/// Options accepted by [`preprocess`](super::preprocess) and everything built
/// on top of it.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreprocessOptions {
    pub strict_mode: bool,
    /// Names the embedder provides from the surrounding JavaScript scope.
    pub locals: Vec<String>,
    pub meta: TemplateMeta,
    pub mode: PreprocessMode,
    #[serde(skip)]
    pub plugins: Vec<AstPluginBuilder>,
    #[serde(skip)]
    pub customize_component_name: Option<CustomizeComponentName>,
}

impl PreprocessOptions {
    pub fn strict() -> Self {
        PreprocessOptions {
            strict_mode: true,
            ..Default::default()
        }
    }

    pub fn with_locals<I, S>(mut self, locals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locals = locals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.meta.module_name = Some(module_name.into());
        self
    }

    pub fn with_mode(mut self, mode: PreprocessMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_plugin(mut self, plugin: AstPluginBuilder) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn module_name(&self) -> &str {
        self.meta.module_name.as_deref().unwrap_or(UNKNOWN_MODULE)
    }

    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            strict_mode: self.strict_mode,
            locals: self.locals.clone(),
            mode: self.mode,
        }
    }

    /// The [`Source`] a template compiled with these options is read from.
    pub fn source_for(&self, text: &str) -> Source {
        Source::with_options(
            Some(text.to_string()),
            self.module_name().to_string(),
            self.source_options(),
        )
    }

    pub fn customize_component_name(&self, name: &str) -> String {
        match &self.customize_component_name {
            Some(customize) => customize(name),
            None => name.to_string(),
        }
    }
}

impl fmt::Debug for PreprocessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessOptions")
            .field("strict_mode", &self.strict_mode)
            .field("locals", &self.locals)
            .field("meta", &self.meta)
            .field("mode", &self.mode)
            .field("plugins", &self.plugins.len())
            .field("customize_component_name", &self.customize_component_name.is_some())
            .finish()
    }
}
