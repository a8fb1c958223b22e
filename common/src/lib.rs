//! Core of the vehicle telemetry cluster.
//!
//! Everything here is platform-agnostic: widgets draw to any
//! `DrawTarget<Color = Rgb888>`, time is passed in, and transport events arrive
//! as plain values. The desktop simulator wires it to a window and a
//! websocket.
//!
//! - [`channel`]: Channel identifiers and change sets
//! - [`telemetry`]: Frame decoding and lenient value parsing
//! - [`vehicle`]: Last-value-wins vehicle state
//! - [`simulation`]: Operator override for SPEED, RPM and COOLANT
//! - [`scheduler`]: Dirty-flag redraw throttle
//! - [`geometry`]: Gauge math and the scaled pixel layout
//! - [`theme`]: Named palettes
//! - [`widgets`]: Arc, needle, scale and ring drawing
//! - [`layer`]: Cached static layer
//! - [`render`]: Full-frame renderer
//! - [`presenter`]: Shift arrows, bar fills and readouts for the chrome
//! - [`engine`]: Glue owning all of the above
//!
//! # Lifecycle
//!
//! | Phase | Call |
//! |-------|------|
//! | Setup | [`Engine::new`] with an [`EngineConfig`] |
//! | Telemetry | [`Engine::handle`] per transport event |
//! | Operator | [`Engine::simulate`], [`Engine::set_theme`] |
//! | Refresh | [`Engine::tick`] once per display frame |
//! | Teardown | [`Engine::shutdown`] |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod channel;
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod presenter;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod styles;
pub mod telemetry;
pub mod theme;
pub mod vehicle;
pub mod widgets;

// Re-export commonly used items
pub use channel::{Channel, ChannelSet};
pub use config::{EngineConfig, NeedleStyle, SimulationPolicy};
pub use engine::{Engine, EngineEvent, EngineStats};
pub use error::{DecodeError, SimulationError};
pub use presenter::{IndicatorSink, Readout, ShiftIndicators};
pub use render::FrameReport;
pub use theme::ThemeId;
pub use vehicle::VehicleState;
