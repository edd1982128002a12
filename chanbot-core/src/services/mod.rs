// File: chanbot-core/src/services/mod.rs

pub mod chat_service;
pub mod command_service;
pub mod event_service;

pub use chat_service::ChatService;
pub use command_service::{CommandOutcome, CommandService, parse_invocation};
pub use event_service::EventService;
