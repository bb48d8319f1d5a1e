/*!
 * Process Module
 * The simulated process entity and its state machine
 */

mod entity;
pub mod types;

pub use entity::Process;
pub use types::{InterruptReason, ProcessState, Vec2};
