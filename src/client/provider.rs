use std::future::Future;

use super::errors::GenerationError;

/// A text generation service: one prompt in, one answer out
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
