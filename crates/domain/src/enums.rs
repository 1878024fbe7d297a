use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two reserves of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolSide {
    A,
    B,
}

impl PoolSide {
    pub fn opposite(self) -> Self {
        match self {
            PoolSide::A => PoolSide::B,
            PoolSide::B => PoolSide::A,
        }
    }
}

/// Direction of a swap through the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell token A, receive token B.
    AToB,
    /// Sell token B, receive token A.
    BToA,
}

impl SwapDirection {
    /// The side the trader pays into.
    pub fn input_side(self) -> PoolSide {
        match self {
            SwapDirection::AToB => PoolSide::A,
            SwapDirection::BToA => PoolSide::B,
        }
    }

    /// The side the trader receives from.
    pub fn output_side(self) -> PoolSide {
        self.input_side().opposite()
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::AToB => write!(f, "A->B"),
            SwapDirection::BToA => write!(f, "B->A"),
        }
    }
}
