pub mod dom_extractor;
pub mod extractor;
pub mod renderer;

pub use dom_extractor::DomExtractor;
pub use extractor::PatternExtractor;
pub use renderer::{RendererClient, RendererConfig};
