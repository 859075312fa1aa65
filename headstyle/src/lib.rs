//! # headstyle
//!
//! Runtime half of a style loader. The bundler compiles stylesheets into
//! descriptor lists; headstyle turns each descriptor into a
//! `<style type="text/css">` element and hands it to an insertion strategy,
//! which by default appends it to the document head.
//!
//! ```rust
//! use headstyle::prelude::*;
//!
//! let doc = MemoryDocument::new();
//! let exports = load_module(
//!     &doc,
//!     "./app.css",
//!     StyleModule::css("body { margin: 0 }"),
//!     &LoaderOptions::default(),
//!     &StrategyRegistry::with_builtins(),
//! )
//! .unwrap();
//!
//! assert_eq!(exports, ModuleExports::Default);
//! assert_eq!(doc.query_all(doc.head_id(), "style").len(), 1);
//! ```

pub mod bootstrap;
pub mod options;
pub mod registry;
pub mod wasm;

pub use bootstrap::{Locals, ModuleContent, ModuleExports, StyleModule, load_module};
pub use headstyle_core::{HeadstyleError, HeadstyleResult};
pub use options::LoaderOptions;
pub use registry::StrategyRegistry;

pub mod prelude {
    pub use crate::bootstrap::{Locals, ModuleContent, ModuleExports, StyleModule, load_module};
    pub use crate::options::LoaderOptions;
    pub use crate::registry::StrategyRegistry;
    pub use headstyle_core::prelude::*;
    pub use headstyle_css::prelude::*;
    pub use headstyle_dom::{MemoryDocument, NodeId, StyleTree, WebDocument};
}
