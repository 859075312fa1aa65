//! JavaScript entry point used by bundled style modules.
//!
//! ```js
//! import { addStyles } from "headstyle";
//! const exported = addStyles(content, { sourceMap: true }, module.id);
//! ```

use headstyle_core::{HeadstyleError, HeadstyleResult};
use headstyle_css::descriptor::{StyleDescriptor, StyleId, StyleItem};
use headstyle_css::strategy::InsertionStrategy;
use headstyle_css::{InjectOptions, inject};
use headstyle_dom::WebDocument;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::options::LoaderOptions;
use crate::registry::StrategyRegistry;

/// Injects `content` into the current document.
///
/// * `content` - a CSS string or an array of `[id, css, media, sourceMap]`
///   tuples, optionally carrying a `locals` property.
/// * `options` - `{ sourceMap?: boolean, insertionFn?: Function | string }`.
///   A function is called as `insertionFn(styleElement, item)`; a string
///   names a built-in strategy.
/// * `module_id` - used as the id when `content` is a bare string.
///
/// Returns `content.locals` when it is truthy, `undefined` otherwise. Any
/// failure is logged and rethrown as an `Error`.
#[wasm_bindgen(js_name = addStyles)]
pub fn add_styles(content: JsValue, options: JsValue, module_id: JsValue) -> Result<JsValue, JsValue> {
    run(&content, &options, &module_id).map_err(|err| {
        headstyle_core::error!("addStyles failed: {}", err);
        JsValue::from(err)
    })
}

fn run(content: &JsValue, options: &JsValue, module_id: &JsValue) -> HeadstyleResult<JsValue> {
    let tree = WebDocument::current()?;
    let registry = StrategyRegistry::<WebDocument>::with_builtins();
    let inject_options = js_options(options, &registry)?;

    let descriptors = match content.as_string() {
        Some(css) => vec![StyleDescriptor::new(js_module_id(module_id), css).media("")],
        None => StyleDescriptor::list_from_json(&stringify(content)?)?,
    };
    inject(&tree, descriptors, &inject_options)?;

    if !content.is_object() {
        return Ok(JsValue::UNDEFINED);
    }
    let locals = js_sys::Reflect::get(content, &JsValue::from_str("locals"))?;
    Ok(if locals.is_truthy() {
        locals
    } else {
        JsValue::UNDEFINED
    })
}

/// Reads the options object. Function-valued `insertionFn`s are not JSON and
/// vanish from the stringified form, so they are picked up separately.
fn js_options(
    options: &JsValue,
    registry: &StrategyRegistry<WebDocument>,
) -> HeadstyleResult<InjectOptions<WebDocument>> {
    if options.is_undefined() || options.is_null() {
        return Ok(InjectOptions::new());
    }

    let resolved = LoaderOptions::from_json(&stringify(options)?)?.resolve(registry)?;
    let insertion_fn = js_sys::Reflect::get(options, &JsValue::from_str("insertionFn"))?;
    Ok(match insertion_fn.dyn_into::<js_sys::Function>() {
        Ok(function) => resolved.insertion(JsInsertion(function)),
        Err(_) => resolved,
    })
}

/// Same number rule as descriptor decoding. A missing or non-primitive id
/// becomes the empty name.
fn js_module_id(module_id: &JsValue) -> StyleId {
    if let Some(name) = module_id.as_string() {
        StyleId::Name(name)
    } else if let Some(n) = module_id.as_f64() {
        StyleId::from_f64(n)
    } else {
        StyleId::Name(String::new())
    }
}

fn stringify(value: &JsValue) -> HeadstyleResult<String> {
    js_sys::JSON::stringify(value)?
        .as_string()
        .ok_or_else(|| HeadstyleError::Descriptor("value is not JSON-serializable".into()))
}

/// A JavaScript function used as insertion strategy.
struct JsInsertion(js_sys::Function);

impl InsertionStrategy<WebDocument> for JsInsertion {
    fn insert(&self, _tree: &WebDocument, element: Element, item: &StyleItem) -> HeadstyleResult<()> {
        let item = item
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| HeadstyleError::Javascript(e.to_string()))?;
        self.0.call2(&JsValue::NULL, &JsValue::from(element), &item)?;
        Ok(())
    }
}
