// File: chanbot-core/src/repositories/postgres/mod.rs

pub mod channel_config;

pub use channel_config::PostgresChannelConfigRepository;
