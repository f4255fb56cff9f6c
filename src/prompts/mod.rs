//! Command routing and prompt templating.
mod builtin;
mod catalog;
mod engine;
mod errors;
mod router;

pub use builtin::{CONVERSATION, CONVERSATION_FAILURE};
pub use catalog::{Catalog, TemplateDefinition};
pub use engine::{Bindings, RenderedPrompt, TemplateEngine};
pub use errors::PromptError;
#[cfg(test)]
pub use errors::ValidationError;
pub use router::Router;
