//! `dd-space`: the grid the dooders live on.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`cell`]        | `Cell`, `Occupant`, `OccupantKind`, `Locatable`       |
//! | [`world`]       | `SpatialWorld` (cells + CSR adjacency + occupant index) |
//! | [`pathfinding`] | `Pathfinder` trait, `Path`, `AStarPathfinder`         |
//! | [`error`]       | `SpaceError`, `SpaceResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | Occupant index uses `rustc_hash::FxHashMap`.            |

pub mod cell;
pub mod error;
pub mod pathfinding;
pub mod world;


pub use cell::{Cell, Locatable, Occupant, OccupantKind};
pub use error::{SpaceError, SpaceResult};
pub use pathfinding::{AStarPathfinder, Path, Pathfinder};
pub use world::{Neighborhood, SpatialWorld, WorldState};
