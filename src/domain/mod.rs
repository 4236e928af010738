// Domain layer: contact/experience models and ports (interfaces).

pub mod model;
pub mod ports;
