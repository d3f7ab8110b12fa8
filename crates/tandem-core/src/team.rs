//! Team enum.

use std::fmt;

/// The two competing teams.  Each has one deposit (base) tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Red  = 0,
    Blue = 1,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// Dense index for per-team arrays.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case label, as used in CSV output.
    pub fn label(self) -> &'static str {
        match self {
            Team::Red  => "red",
            Team::Blue => "blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
