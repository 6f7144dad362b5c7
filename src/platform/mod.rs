//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard/mouse → per-frame input snapshot)
//! - Camera (screen ↔ world)
//! - Storage (LocalStorage on web)
//! - Wall clock

pub mod camera;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;
pub mod time;

pub use camera::Camera;
pub use input::InputState;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
pub use time::now_ms;
