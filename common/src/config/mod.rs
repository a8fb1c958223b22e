//! Cluster configuration.
//!
//! - `layout`: Logical canvas size and gauge geometry constants
//! - `engine`: Runtime options (theme, scale, frame cadence, needle style)

pub mod engine;
pub mod layout;

pub use engine::{EngineConfig, NeedleStyle, SimulationPolicy};
pub use layout::{
    CANVAS_HEIGHT,
    CANVAS_WIDTH,
    FRAME_INTERVAL_MS,
    GAUGE_CENTER_X,
    GAUGE_CENTER_Y,
    MAX_RPM,
    MAX_SPEED,
    RADIUS_INNER,
    RADIUS_OUTER,
    SWEEP_END,
    SWEEP_START,
};
