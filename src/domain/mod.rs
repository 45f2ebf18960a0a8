// Domain layer: value types and ports (interfaces). No filesystem or CLI dependencies.

pub mod model;
pub mod ports;
