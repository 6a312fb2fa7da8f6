pub mod error;
pub mod global;
pub mod storage;

pub mod cli;

pub use error::BlinkError;
pub use global::{blink, reset};
pub use storage::{blink::Blink, Cache};
