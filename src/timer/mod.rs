//! Frame counters and the engine that advances them.

pub mod engine;
pub mod entity;
pub mod pacer;

pub use engine::{Engine, EngineOptions, EntityId, Readout};
pub use entity::TimerEntity;
pub use pacer::{compute_delay, FramePacer, FRAME_RATE, SCHEDULER_TOLERANCE};
