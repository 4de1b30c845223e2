// Domain layer: listing models and the ports the store talks through.

pub mod model;
pub mod ports;
