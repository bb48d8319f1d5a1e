/*!
 * Error Types
 * Engine lifecycle errors
 *
 * Invalid operator commands (moving into a full queue, acting on an unknown
 * process) are defined as no-ops, never errors. Game over is a normal state
 * transition reported through the session state, not an error. What remains
 * is lifecycle misuse and configuration parsing.
 */

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("background workers already running")]
    AlreadyRunning,

    #[error("unknown difficulty level: {0}")]
    UnknownDifficulty(String),
}
