//! `dd-strategy`: pluggable attribute generation.
//!
//! Models (the arena, the resource pool) do not hard-code how many agents
//! to seed or where energy appears.  Each such attribute is described by a
//! [`StrategySpec`] naming a registered function, its arguments, and
//! optionally another attribute whose value it consumes.  The registry turns
//! a whole [`StrategySpecMap`] into a [`CompiledStrategySet`]: functions
//! resolved, dependencies ordered, cycles rejected, ready to be evaluated
//! against the simulation RNG and bound onto a [`StrategyTarget`].
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`value`]    | `StrategyValue`                                         |
//! | [`registry`] | `StrategyRegistry`, `StrategyFn`, `StrategyContext`     |
//! | [`compile`]  | `CompiledStrategySet`, `StrategyTarget`                 |
//! | [`builtin`]  | the default strategy functions                          |
//! | [`error`]    | `StrategyError`, `StrategyResult<T>`                    |

pub mod builtin;
pub mod compile;
pub mod error;
pub mod registry;
pub mod value;


pub use compile::{CompiledStrategySet, StrategyTarget};
pub use error::{StrategyError, StrategyResult};
pub use registry::{StrategyContext, StrategyFn, StrategyRegistry};
pub use value::StrategyValue;

pub use dd_core::config::attr;
pub use dd_core::{StrategyArgs, StrategyKind, StrategySpec, StrategySpecMap};
