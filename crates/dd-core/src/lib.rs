//! `dd-core`: foundational types for the dooders artificial-life simulator.
//!
//! Every other `dd-*` crate depends on this one.  It has no `dd-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `AgentId`, `ResourceId`                                   |
//! | [`coord`] | `Coordinate` on the integer grid                          |
//! | [`time`]  | `Cycle`, `SimClock`, `ClockState`                         |
//! | [`rng`]   | `SimRng`, the single seeded source of randomness          |
//! | [`log`]   | `sim_log!` and the scope names used in structured records |
//! | [`config`]| `SimConfig`, world/stop settings, strategy specs          |
//! | [`error`] | `DdError`, `DdResult`                                     |

pub mod config;
pub mod coord;
pub mod error;
pub mod ids;
pub mod log;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    SimConfig, StopSettings, StrategyArgs, StrategyKind, StrategySpec, StrategySpecMap,
    WorldSettings,
};
pub use coord::Coordinate;
pub use error::{DdError, DdResult};
pub use ids::{AgentId, ResourceId};
pub use rng::{SimRng, mix_seed};
pub use time::{ClockState, Cycle, SimClock};

#[doc(hidden)]
pub use tracing as __tracing;
