//! `dd-agent`: dooders and their lifecycle.
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`agent`]     | `Agent`, `AgentStatus`, `TerminationReason`, `AgentState` |
//! | [`arena`]     | `Arena` (active set + graveyard + counters), `ArenaState` |
//! | [`relations`] | `RelationGraph`, `Relation`, `Link`                      |
//! | [`error`]     | `ArenaError`, `ArenaResult<T>`                           |
//!
//! The arena owns every agent object for the whole run.  The spatial world
//! only holds ids; the arena keeps an agent's recorded position and the
//! world's index in step by routing every placement, move and removal
//! through [`dd_space::SpatialWorld`] itself.

pub mod agent;
pub mod arena;
pub mod error;
pub mod relations;


pub use agent::{Agent, AgentState, AgentStatus, TerminationReason};
pub use arena::{Arena, ArenaCounters, ArenaSettings, ArenaState};
pub use error::{ArenaError, ArenaResult};
pub use relations::{Link, Relation, RelationGraph};
