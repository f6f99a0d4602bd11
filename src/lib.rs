pub mod config;
pub mod core;
pub mod domain;
pub mod stats;
pub mod utils;

pub use crate::config::{CliConfig, WorkloadConfig};
pub use crate::core::{
    codec::Codec,
    loader::SourceLoader,
    runner::{DutyCycle, DutyCycleRunner},
    timer::{DutyCycleTimer, SystemClock},
};
pub use crate::domain::model::{PassReport, PayloadBuffer};
pub use crate::domain::ports::Clock;
pub use crate::utils::error::{FakeProcessError, Result};
