// Domain layer: payload buffer, pass reports and the clock port the runner depends on.

pub mod model;
pub mod ports;
