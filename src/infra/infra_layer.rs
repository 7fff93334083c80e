// The infra module contains implementations that touch the outside world.

#[path = "config/json_config_source.rs"]
pub mod config;
