//! Resource categories tracked by the history.
//!
//! RULE: The category order below is the on-disk field order.
//! Imports first, then exports. Never reorder, only append
//! (and bump the codec version when you do).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tracked categories (6 imports + 7 exports).
pub const CATEGORY_COUNT: usize = 13;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Import,
    Export,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Import => "Imports",
            Self::Export => "Exports",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Import => Self::Export,
            Self::Export => Self::Import,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Goods,
    Forestry,
    Farming,
    Ore,
    Oil,
    Mail,
    Fish,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Goods    => "Goods",
            Self::Forestry => "Forestry",
            Self::Farming  => "Farming",
            Self::Ore      => "Ore",
            Self::Oil      => "Oil",
            Self::Mail     => "Mail",
            Self::Fish     => "Fish",
        }
    }
}

/// One direction/kind pair. Each maps to a fixed slot in a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Category {
    pub direction: Direction,
    pub kind:      ResourceKind,
}

impl Category {
    pub const fn new(direction: Direction, kind: ResourceKind) -> Self {
        Self { direction, kind }
    }

    /// Slot of this category in `Snapshot::values`.
    /// Returns None for combinations that are not tracked (imported fish).
    pub fn index(&self) -> Option<usize> {
        CATEGORIES.iter().position(|c| c == self)
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Import => "import",
            Direction::Export => "export",
        };
        write!(f, "{direction}:{}", self.kind.label().to_lowercase())
    }
}

/// All tracked categories in snapshot slot order.
pub const CATEGORIES: [Category; CATEGORY_COUNT] = [
    Category::new(Direction::Import, ResourceKind::Goods),
    Category::new(Direction::Import, ResourceKind::Forestry),
    Category::new(Direction::Import, ResourceKind::Farming),
    Category::new(Direction::Import, ResourceKind::Ore),
    Category::new(Direction::Import, ResourceKind::Oil),
    Category::new(Direction::Import, ResourceKind::Mail),
    Category::new(Direction::Export, ResourceKind::Goods),
    Category::new(Direction::Export, ResourceKind::Forestry),
    Category::new(Direction::Export, ResourceKind::Farming),
    Category::new(Direction::Export, ResourceKind::Ore),
    Category::new(Direction::Export, ResourceKind::Oil),
    Category::new(Direction::Export, ResourceKind::Mail),
    Category::new(Direction::Export, ResourceKind::Fish),
];

/// Slot indices belonging to one direction, in slot order.
pub fn categories(direction: Direction) -> impl Iterator<Item = (usize, Category)> {
    CATEGORIES
        .iter()
        .copied()
        .enumerate()
        .filter(move |(_, c)| c.direction == direction)
}

/// Per-category enable flags, indexed like `Snapshot::values`.
/// Only chart construction looks at these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnabledCategories(pub [bool; CATEGORY_COUNT]);

impl EnabledCategories {
    pub fn all() -> Self {
        Self([true; CATEGORY_COUNT])
    }

    pub fn none() -> Self {
        Self([false; CATEGORY_COUNT])
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        if let Some(i) = category.index() {
            self.0[i] = enabled;
        }
    }

    pub fn toggle(&mut self, category: Category) {
        if let Some(i) = category.index() {
            self.0[i] = !self.0[i];
        }
    }
}

impl Default for EnabledCategories {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_precede_exports_in_slot_order() {
        let imports: Vec<usize> = categories(Direction::Import).map(|(i, _)| i).collect();
        let exports: Vec<usize> = categories(Direction::Export).map(|(i, _)| i).collect();
        assert_eq!(imports, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(exports, vec![6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn imported_fish_is_not_tracked() {
        let fish = Category::new(Direction::Import, ResourceKind::Fish);
        assert_eq!(fish.index(), None);
        let exported = Category::new(Direction::Export, ResourceKind::Fish);
        assert_eq!(exported.index(), Some(12));
    }
}
