//! Error types for the cluster engine.
//!
//! None of these are fatal to the render loop: callers log them and keep
//! drawing the last valid state.

use thiserror::Error;

/// A whole frame could not be decoded. The previous state is kept.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("frame is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("frame is not a key/value object (got {0})")]
    NotAnObject(&'static str),
}

/// Operator requests the simulation override cannot honour.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SimulationError {
    #[error("simulation override is latched for this session")]
    Latched,

    #[error("{0} cannot be simulated")]
    UnsupportedChannel(&'static str),

    #[error("simulated value must be finite")]
    NotFinite,
}
