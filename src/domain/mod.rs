// Domain layer: request/command models and the runner/executor ports.

pub mod model;
pub mod ports;
