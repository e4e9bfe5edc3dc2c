//! Request production, pacing, dispatch and the client that wires them.
mod rate;
mod sender;
pub(crate) mod workload;


pub use rate::{throttle, throttle_delay};
pub use sender::{Client, ClientConfig, Dispatch, HttpSender, SendAttempt, dispatch};
pub use workload::{RequestTemplate, produce, send};
