//! `dd-resource`: energy on the grid.
//!
//! | Module       | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | [`resource`] | `Resource`, `ResourceStatus`                         |
//! | [`pool`]     | `ResourcePool`, `PoolCounters`, `PoolSettings`, `PoolState` |
//! | [`error`]    | `PoolError`, `PoolResult<T>`                         |

pub mod error;
pub mod pool;
pub mod resource;


pub use error::{PoolError, PoolResult};
pub use pool::{PoolCounters, PoolSettings, PoolState, ResourcePool};
pub use resource::{Resource, ResourceStatus};
