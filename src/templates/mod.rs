// HTML page templates

pub mod builtin;
pub mod engine;

pub use engine::TemplateEngine;
