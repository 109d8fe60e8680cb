//! Segment permissions

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Read/write/execute permission mask of a segment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Attribute: u32 {
        const R = 1 << 0;
        const W = 1 << 1;
        const X = 1 << 2;

        const RW = Self::R.bits() | Self::W.bits();
        const RX = Self::R.bits() | Self::X.bits();
        const RWX = Self::R.bits() | Self::W.bits() | Self::X.bits();
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit = |flag: Attribute, c: char| if self.contains(flag) { c } else { '-' };
        write!(f, "{}{}{}", bit(Self::R, 'r'), bit(Self::W, 'w'), bit(Self::X, 'x'))
    }
}
