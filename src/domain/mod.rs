// Domain layer: request/outcome models and the ports the driver talks through.

pub mod model;
pub mod ports;
