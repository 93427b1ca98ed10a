//! Renderers and bundlers for token builds.
//!
//! A renderer consumes a [`RenderContext`] — the filtered, transformed
//! permutation list plus resolver metadata — and returns an
//! [`OutputTree`] of virtual files. Built-in renderers cover CSS,
//! Tailwind `@theme`, JSON, JS modules, SwiftUI, Jetpack Compose and
//! Figma Variables.

pub mod bundle;
pub mod context;
pub mod css_value;
pub mod error;
pub mod generators;

pub use bundle::{
    cascade_blocks, default_selector, meta_json, permutation_key, CascadeBlock, SelectorArgs,
    SelectorFn,
};
pub use context::{render_file_name, BuildMeta, OutputDescriptor, OutputTree, RenderContext};
pub use css_value::css_string;
pub use error::{RenderError, Result};
pub use generators::{
    ComposeRenderer, CssRenderer, FigmaRenderer, JsRenderer, JsonRenderer, Preset, Renderer,
    SwiftUiRenderer, TailwindRenderer,
};
