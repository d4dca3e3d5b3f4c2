//! `dd-behavior`: how dooders decide what to do.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`intent`]      | `Intent` enum (`Move`, `Consume`, `Reproduce`, `Die`)          |
//! | [`context`]     | `CycleContext<'a>`: read-only view of the world for one turn   |
//! | [`model`]       | `BehaviorModel` trait                                          |
//! | [`noop`]        | `NoopBehavior`: agents sit still                               |
//! | [`random_walk`] | `RandomWalk`: one random neighboring step per cycle            |
//! | [`forager`]     | `Forager`: eat, seek energy, reproduce, starve, age out        |
//! | [`error`]       | `BehaviorError`, `BehaviorResult<T>`                           |
//!
//! # Design notes
//!
//! Each agent's turn in dd-sim alternates two halves:
//!
//! 1. **Intent half**: call `BehaviorModel::act`.  Everything is read through
//!    `&CycleContext`; nothing is mutated.
//!
//! 2. **Apply half**: the returned intents are applied one by one against the
//!    world, the arena and the resource pool.
//!
//! If the agent survives and shares its new cell with other dooders, the
//! same two halves run again for `on_encounter`.  All of it happens before
//! the next agent's turn.
//!
//! Agents act in creation order and each one sees the effects of every turn
//! before it, so a cycle is fully sequential and reproducible from the seed.

pub mod context;
pub mod error;
pub mod forager;
pub mod intent;
pub mod model;
pub mod noop;
pub mod random_walk;


pub use context::CycleContext;
pub use error::{BehaviorError, BehaviorResult};
pub use forager::{Forager, ForagerSettings};
pub use intent::Intent;
pub use model::BehaviorModel;
pub use noop::NoopBehavior;
pub use random_walk::RandomWalk;
