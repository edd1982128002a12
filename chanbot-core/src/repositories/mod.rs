// File: chanbot-core/src/repositories/mod.rs

pub mod postgres;

pub use postgres::PostgresChannelConfigRepository;
