// File: chanbot-core/src/tasks/mod.rs

pub mod cooldown;
pub mod eviction;
pub mod timer_runtime;

pub use cooldown::CommandCooldown;
pub use eviction::spawn_eviction_task;
pub use timer_runtime::TimerRuntime;
