//! Built-in renderers.

mod compose;
mod css;
mod figma;
mod js;
mod json;
mod swiftui;
mod tailwind;

pub use compose::ComposeRenderer;
pub use css::CssRenderer;
pub use figma::FigmaRenderer;
pub use js::JsRenderer;
pub use json::JsonRenderer;
pub use swiftui::SwiftUiRenderer;
pub use tailwind::TailwindRenderer;

use crate::context::{OutputTree, RenderContext};
use crate::error::Result;

/// How an output spreads across files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// One file per permutation, named by the filename template.
    Standalone,
    /// A single file covering all permutations.
    #[default]
    Bundle,
}

/// A renderer: consumes the resolved permutations and emits virtual files.
pub trait Renderer: Send + Sync {
    /// Target format name.
    fn name(&self) -> &'static str;

    /// Produce the output tree for this output.
    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree>;
}
