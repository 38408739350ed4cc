// Adapters layer: concrete catalog sources and output rendering.

pub mod catalog;
pub mod output;
