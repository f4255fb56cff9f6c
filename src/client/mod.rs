mod errors;
mod gemini;
pub mod provider;
pub mod stream;

pub use errors::GenerationError;
pub use gemini::{DEFAULT_MODEL, GeminiClient, GenerationConfig};
pub use provider::Generator;
