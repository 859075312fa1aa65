use headstyle_core::{HeadstyleError, HeadstyleResult};
use headstyle_css::descriptor::{StyleDescriptor, StyleId};
use headstyle_css::inject;
use headstyle_dom::StyleTree;
use serde_json::{Map, Value};

use crate::options::LoaderOptions;
use crate::registry::StrategyRegistry;

/// CSS-modules class-name map exported by a style module.
pub type Locals = Map<String, Value>;

/// What the upstream CSS compiler produced for one module.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleContent {
    /// Bare stylesheet text.
    Css(String),
    Descriptors(Vec<StyleDescriptor>),
}

impl ModuleContent {
    /// Decodes a JSON string (bare CSS) or array (descriptor list).
    pub fn from_value(value: Value) -> HeadstyleResult<Self> {
        match value {
            Value::String(css) => Ok(ModuleContent::Css(css)),
            Value::Array(items) => items
                .into_iter()
                .map(StyleDescriptor::from_value)
                .collect::<HeadstyleResult<Vec<_>>>()
                .map(ModuleContent::Descriptors),
            other => Err(HeadstyleError::Descriptor(format!(
                "module content must be a string or a descriptor list, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Descriptor list for this content; bare CSS becomes the single
    /// descriptor `[module_id, css, ""]`.
    pub fn into_descriptors(self, module_id: &StyleId) -> Vec<StyleDescriptor> {
        match self {
            ModuleContent::Css(css) => {
                vec![StyleDescriptor::new(module_id.clone(), css).media("")]
            }
            ModuleContent::Descriptors(list) => list,
        }
    }
}

/// A loaded style module: its content plus optional `locals`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleModule {
    pub content: ModuleContent,
    pub locals: Option<Locals>,
}

impl StyleModule {
    pub fn new(content: ModuleContent) -> Self {
        Self {
            content,
            locals: None,
        }
    }

    pub fn css(css: impl Into<String>) -> Self {
        Self::new(ModuleContent::Css(css.into()))
    }

    pub fn descriptors(list: Vec<StyleDescriptor>) -> Self {
        Self::new(ModuleContent::Descriptors(list))
    }

    pub fn with_locals(mut self, locals: Locals) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Accepts either bare content (string or descriptor array) or an
    /// object `{ "content": ..., "locals": { ... } }`.
    pub fn from_value(value: Value) -> HeadstyleResult<Self> {
        match value {
            Value::Object(mut obj) if obj.contains_key("content") => {
                let content = ModuleContent::from_value(obj.remove("content").unwrap_or_default())?;
                let locals = match obj.remove("locals") {
                    None | Some(Value::Null) => None,
                    Some(Value::Object(map)) => Some(map),
                    Some(other) => {
                        return Err(HeadstyleError::Descriptor(format!(
                            "module locals must be an object, got {}",
                            json_kind(&other)
                        )));
                    }
                };
                Ok(Self { content, locals })
            }
            other => ModuleContent::from_value(other).map(Self::new),
        }
    }

    pub fn from_json(json: &str) -> HeadstyleResult<Self> {
        let value = serde_json::from_str(json).map_err(|e| HeadstyleError::Descriptor(e.to_string()))?;
        Self::from_value(value)
    }
}

/// The export value of a loaded style module.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleExports {
    /// The module had no locals; nothing meaningful is exported.
    Default,
    Locals(Locals),
}

/// Runs a style module: resolves `options` against `registry`, injects the
/// module's styles into `tree`, and hands back its exports.
pub fn load_module<T: StyleTree>(
    tree: &T,
    module_id: impl Into<StyleId>,
    module: StyleModule,
    options: &LoaderOptions,
    registry: &StrategyRegistry<T>,
) -> HeadstyleResult<ModuleExports> {
    let module_id = module_id.into();
    let inject_options = options.resolve(registry)?;
    let StyleModule { content, locals } = module;

    inject(tree, content.into_descriptors(&module_id), &inject_options)?;

    Ok(match locals {
        Some(locals) => ModuleExports::Locals(locals),
        None => ModuleExports::Default,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
