// File: chanbot-core/src/platforms/twitch/mod.rs
//
// Helix-backed implementations of the identity and channel data collaborators.

pub mod client;
pub mod requests;

pub use client::TwitchHelixClient;
