use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Index of a tile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileIndex {
    /// Level of detail (zoom level). Style rules are selected by it.
    pub z: u32,
    /// X index.
    pub x: i64,
    /// Y index.
    pub y: i64,
}

impl TileIndex {
    /// Creates a new index instance.
    pub fn new(x: i64, y: i64, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl Display for TileIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(TileIndex::new(3, 7, 12).to_string(), "12/3/7");
    }
}
