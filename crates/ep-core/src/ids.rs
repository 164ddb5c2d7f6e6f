//! Typed indices into the population arena.
//!
//! An `AgentId` is the agent's row in every `Population` column, so ids are
//! dense `0..N` and never reused.  Both types order by their integer, which
//! keeps `BTreeSet` neighbour iteration (and therefore contact sampling)
//! stable across runs.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Row index into the population columns.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// An agent, i.e. one node of the contact graph.
    pub struct AgentId(u32) => "agent";
}

typed_id! {
    /// The community an agent was assigned to at build time.  Immutable.
    pub struct ClusterId(u32) => "cluster";
}
