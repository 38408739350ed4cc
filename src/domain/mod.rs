// Domain layer: catalog models and ports. Depends only on serde/chrono and the error type.

pub mod model;
pub mod ports;
