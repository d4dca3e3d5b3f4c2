//! Strongly typed identifier wrappers.
//!
//! Ids are handed out sequentially by the component that owns the entity
//! (the arena for agents, the resource pool for resources), so ordering by id
//! is the same as ordering by creation.  That property is what keeps
//! iteration over `BTreeMap<Id, _>` deterministic across runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// The id handed out after this one.
            #[inline(always)]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identifier of a dooder.  Unique for the whole run, never reused after
    /// the agent is terminated.
    pub struct AgentId(u64);
}

typed_id! {
    /// Identifier of an energy unit in the resource pool.
    pub struct ResourceId(u64);
}
