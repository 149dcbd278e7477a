// Domain layer: request/response models, the settings form and the ports pages talk through.

pub mod form;
pub mod model;
pub mod ports;
