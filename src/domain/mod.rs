// Domain layer: request/report models and the ports the adapters implement.

pub mod model;
pub mod ports;
pub mod report;
