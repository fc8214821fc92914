use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a child group presents the blocks it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ListType {
    /// Plain grouping, no markers.
    #[default]
    Group,
    /// Bulleted list.
    Unordered,
    /// Numbered list.
    Ordered,
    /// Quoted section.
    Blockquote,
}

impl ListType {
    /// Any type other than plain `Group`. Blocks in such a group are list items.
    #[must_use]
    pub fn is_list(self) -> bool {
        !matches!(self, ListType::Group)
    }

    /// Unordered or Ordered, the two types whose level selects a marker style.
    #[must_use]
    pub fn has_markers(self) -> bool {
        matches!(self, ListType::Unordered | ListType::Ordered)
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListType::Group => "Group",
            ListType::Unordered => "Unordered",
            ListType::Ordered => "Ordered",
            ListType::Blockquote => "Blockquote",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("list level {0} is outside 1..=3")]
pub struct InvalidListLevel(pub u8);

/// Marker depth of a list group.
///
/// Independent of structural nesting: a bulleted list three groups deep may
/// still render level-1 markers. Always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ListLevel(u8);

impl ListLevel {
    pub const MIN: ListLevel = ListLevel(1);
    pub const MAX: ListLevel = ListLevel(3);

    pub const fn new(level: u8) -> Option<Self> {
        match level {
            1..=3 => Some(ListLevel(level)),
            _ => None,
        }
    }

    /// Saturates into range. Used where a level is computed from depth arithmetic.
    pub fn clamped(level: usize) -> Self {
        let bounded = level.clamp(Self::MIN.0 as usize, Self::MAX.0 as usize);
        ListLevel(bounded as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn deeper(self) -> Self {
        Self::clamped(self.0 as usize + 1)
    }

    #[must_use]
    pub fn shallower(self) -> Self {
        Self::clamped((self.0 as usize).saturating_sub(1))
    }
}

impl Default for ListLevel {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for ListLevel {
    type Error = InvalidListLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        ListLevel::new(level).ok_or(InvalidListLevel(level))
    }
}

impl From<ListLevel> for u8 {
    fn from(level: ListLevel) -> Self {
        level.0
    }
}

/// Attributes every child group carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ListAttrs {
    pub list_type: ListType,
    #[serde(default)]
    pub level: ListLevel,
}

impl ListAttrs {
    pub fn new(list_type: ListType, level: ListLevel) -> Self {
        Self { list_type, level }
    }

    pub fn group() -> Self {
        Self::default()
    }

    pub fn unordered(level: u8) -> Self {
        Self::new(ListType::Unordered, ListLevel::clamped(level as usize))
    }

    pub fn ordered(level: u8) -> Self {
        Self::new(ListType::Ordered, ListLevel::clamped(level as usize))
    }

    pub fn blockquote() -> Self {
        Self::new(ListType::Blockquote, ListLevel::MIN)
    }
}

impl fmt::Display for ListAttrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.list_type.has_markers() {
            write!(f, "{}({})", self.list_type, self.level.get())
        } else {
            write!(f, "{}", self.list_type)
        }
    }
}
