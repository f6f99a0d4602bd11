pub mod codec;
pub mod loader;
pub mod runner;
pub mod timer;

pub use crate::domain::model::{PassReport, PayloadBuffer};
pub use crate::domain::ports::Clock;
pub use crate::utils::error::Result;
