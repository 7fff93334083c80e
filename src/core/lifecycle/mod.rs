// Core lifecycle module - bot instance, phase state machine and the ports
// the Discord layer implements.

pub mod bot_instance;
pub mod lifecycle_models;
pub mod lifecycle_service;

pub use bot_instance::*;
pub use lifecycle_models::*;
pub use lifecycle_service::*;
