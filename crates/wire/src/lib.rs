//! # Joint Wire
//!
//! Wiggle wire simulation for graph connections.
//!
//! A `WireSimulator` owns the spring state for one drawn connection. Each
//! frame it receives the connection's endpoints and returns an offset for the
//! curve's midpoint: the wire hangs under gravity, stiffens as it is stretched,
//! swings when an endpoint is dragged and goes idle once it has settled.
//!
//! ```rust,ignore
//! use joint_core::Vec2;
//! use joint_wire::{WiggleWireConfig, WireSimulator};
//!
//! let config = WiggleWireConfig::default();
//! let mut sim = WireSimulator::new();
//! let offset = sim.update(Vec2::ZERO, Vec2::new(300.0, 0.0), &config, 1.0 / 60.0);
//! ```

pub mod config;
pub mod simulator;
pub mod spring;

pub use config::WiggleWireConfig;
pub use simulator::{MAX_DELTA_TIME, WireSimulator};
pub use spring::spring_interp;
