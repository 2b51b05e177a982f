//! Space classification: bookable room kinds and the public catalog
//! categories that group them.

use serde::{Deserialize, Serialize};

/// Kind of bookable space. Stored as the `space_kind` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "space_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SpaceKind {
    SmallRoom,
    MediumRoom,
    LargeRoom,
    Meeting,
    Brainstorming,
    Studio,
    Lounge,
    Training,
}

impl SpaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceKind::SmallRoom => "small_room",
            SpaceKind::MediumRoom => "medium_room",
            SpaceKind::LargeRoom => "large_room",
            SpaceKind::Meeting => "meeting",
            SpaceKind::Brainstorming => "brainstorming",
            SpaceKind::Studio => "studio",
            SpaceKind::Lounge => "lounge",
            SpaceKind::Training => "training",
        }
    }
}

/// Catalog categories shown on the public site, each grouping several kinds.
///
/// Returns `None` for an unknown category name.
pub fn category_kinds(category: &str) -> Option<&'static [SpaceKind]> {
    match category {
        "meeting" => Some(&[SpaceKind::Meeting]),
        "coworking" => Some(&[
            SpaceKind::SmallRoom,
            SpaceKind::MediumRoom,
            SpaceKind::Brainstorming,
            SpaceKind::Lounge,
        ]),
        "events" => Some(&[SpaceKind::LargeRoom, SpaceKind::Training, SpaceKind::Studio]),
        _ => None,
    }
}

/// Human-readable label for a catalog category.
pub fn category_label(category: &str) -> Option<&'static str> {
    match category {
        "meeting" => Some("Meeting rooms"),
        "coworking" => Some("Coworking spaces"),
        "events" => Some("Event venues"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coworking_category_groups_four_kinds() {
        let kinds = category_kinds("coworking").unwrap();
        assert_eq!(kinds.len(), 4);
        assert!(kinds.contains(&SpaceKind::Lounge));
    }

    #[test]
    fn unknown_category_is_none() {
        assert!(category_kinds("garage").is_none());
        assert!(category_label("garage").is_none());
    }
}
