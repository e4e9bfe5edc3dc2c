mod execution;
mod producer;
mod template;

pub use execution::send;
pub use producer::produce;
pub use template::RequestTemplate;

/// Capacity of the hand-off channel between two pipeline stages.
pub(crate) const STAGE_BUFFER: usize = 1;
