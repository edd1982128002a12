// src/lib.rs

pub mod cache;
pub mod config;
pub mod db;
pub mod platforms;
pub mod repositories;
pub mod services;
pub mod tasks;
pub mod templates;
pub mod utils;

pub use cache::{ChannelRegistry, ChannelSession};
pub use chanbot_common::error::Error;
pub use config::EngineConfig;
pub use db::Database;
pub use services::ChatService;
