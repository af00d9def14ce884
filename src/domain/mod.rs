// Domain layer: the record model and the ports the rest of the crate implements.

pub mod model;
pub mod ports;
