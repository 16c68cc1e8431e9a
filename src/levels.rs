//! Level layouts and the block glyph table
//!
//! A level is a grid of single-character glyphs. Rows may differ in length;
//! each row's blocks share the full play-area width.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Glyph for an empty cell (block destroyed from the first tick)
pub const GAP_GLYPH: char = '*';
/// Glyph for blocks that drop a power-up when destroyed
pub const POWER_UP_GLYPH: char = '+';

/// What a glyph turns into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockType {
    pub glyph: char,
    /// Hits to destroy; 0 = gap, negative = indestructible
    pub durability: i32,
    pub score: u32,
    /// CSS color for the drawing layer
    pub color: String,
}

impl BlockType {
    fn new(glyph: char, durability: i32, score: u32, color: &str) -> Self {
        Self {
            glyph,
            durability,
            score,
            color: color.to_string(),
        }
    }
}

/// A complete set of levels plus the glyph table they use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub block_types: Vec<BlockType>,
    /// Each level is a list of rows, each row a string of glyphs
    pub levels: Vec<Vec<String>>,
}

impl Default for LevelSet {
    fn default() -> Self {
        let rows = |rows: &[&str]| rows.iter().map(|r| r.to_string()).collect::<Vec<_>>();
        Self {
            block_types: vec![
                BlockType::new(GAP_GLYPH, 0, 0, "#000"),
                BlockType::new('_', 1, 100, "#FF5531"),
                BlockType::new('-', 2, 80, "#6B31FF"),
                BlockType::new('#', -1, 0, "#928E9B"),
                BlockType::new(POWER_UP_GLYPH, 1, 150, "#F4CE14"),
            ],
            levels: vec![
                rows(&["_____", "__+__"]),
                rows(&["*___*", "_-*-_", "_*+*_", "__*__", "*_+_*", "-*-*-"]),
                rows(&["-*_*-", "_-+-_", "#___#", "-_-_-", "_*#*_"]),
            ],
        }
    }
}

impl LevelSet {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let set: Self = serde_json::from_str(json)?;
        set.validate()?;
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn block_type(&self, glyph: char) -> Option<&BlockType> {
        self.block_types.iter().find(|t| t.glyph == glyph)
    }

    /// Grid of a level as glyph rows
    pub fn grid(&self, level: usize) -> Option<Vec<Vec<char>>> {
        self.levels
            .get(level)
            .map(|rows| rows.iter().map(|r| r.chars().collect()).collect())
    }

    /// Check every level up front so later loads cannot fail
    pub fn validate(&self) -> Result<(), GameError> {
        if self.levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        for (level, rows) in self.levels.iter().enumerate() {
            for (row, glyphs) in rows.iter().enumerate() {
                if glyphs.is_empty() {
                    return Err(GameError::EmptyRow { level, row });
                }
                for (column, glyph) in glyphs.chars().enumerate() {
                    if self.block_type(glyph).is_none() {
                        return Err(GameError::UnknownGlyph {
                            level,
                            row,
                            column,
                            glyph,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_is_valid() {
        let set = LevelSet::default();
        assert!(set.validate().is_ok());
        assert_eq!(set.len(), 3);
        assert!(set.block_type('#').unwrap().durability < 0);
    }

    #[test]
    fn test_unknown_glyph_rejected() {
        let mut set = LevelSet::default();
        set.levels[1][2] = "_?_".to_string();
        match set.validate() {
            Err(GameError::UnknownGlyph {
                level,
                row,
                column,
                glyph,
            }) => {
                assert_eq!((level, row, column, glyph), (1, 2, 1, '?'));
            }
            other => panic!("expected UnknownGlyph, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_row_rejected() {
        let mut set = LevelSet::default();
        set.levels[0].push(String::new());
        assert!(matches!(
            set.validate(),
            Err(GameError::EmptyRow { level: 0, row: 2 })
        ));
    }

    #[test]
    fn test_empty_set_rejected() {
        let set = LevelSet {
            block_types: Vec::new(),
            levels: Vec::new(),
        };
        assert!(matches!(set.validate(), Err(GameError::NoLevels)));
    }

    #[test]
    fn test_from_json() {
        let json = r##"{
            "block_types": [{ "glyph": "_", "durability": 1, "score": 10, "color": "#fff" }],
            "levels": [["___"]]
        }"##;
        let set = LevelSet::from_json(json).unwrap();
        assert_eq!(set.grid(0).unwrap(), vec![vec!['_', '_', '_']]);
    }
}
