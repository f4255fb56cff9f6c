mod dispatcher;
mod errors;
mod messages;
pub mod runner;

pub use dispatcher::Dispatcher;
pub use runner::PollOptions;
