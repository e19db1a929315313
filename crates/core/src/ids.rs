use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::CategoryState;
use crate::error::CoreError;

/// Date id that stands for "every date" in preference records.
pub const ALL_DATES: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    People,
    ShiftTypes,
    Dates,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::People, Category::ShiftTypes, Category::Dates];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::ShiftTypes => "shiftTypes",
            Self::Dates => "dates",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks that `id` can be used for a new item or group in `state`.
///
/// Ids are compared after trimming surrounding whitespace; the trimmed id is returned.
pub fn validate_new_id(
    category: Category,
    state: &CategoryState,
    id: &str,
) -> Result<String, CoreError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CoreError::EmptyId);
    }
    if state.contains_id(id) || (category == Category::Dates && id == ALL_DATES) {
        return Err(CoreError::DuplicateId {
            category,
            id: id.to_string(),
        });
    }
    Ok(id.to_string())
}

/// Like [`validate_new_id`], but keeping the same id is allowed.
pub fn validate_renamed_id(
    category: Category,
    state: &CategoryState,
    old_id: &str,
    new_id: &str,
) -> Result<String, CoreError> {
    if new_id.trim() == old_id {
        return Ok(old_id.to_string());
    }
    validate_new_id(category, state, new_id)
}

/// Parses a non-negative count typed by the user (targets, required head counts).
pub fn parse_count(text: &str) -> Result<u32, CoreError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| CoreError::InvalidNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Item;

    fn state() -> CategoryState {
        CategoryState {
            items: vec![Item::new("A", ""), Item::new("B", "")],
            groups: Vec::new(),
        }
    }

    #[test]
    fn new_id_is_trimmed() {
        assert_eq!(validate_new_id(Category::People, &state(), "  C ").unwrap(), "C");
    }

    #[test]
    fn blank_id_rejected() {
        assert_eq!(
            validate_new_id(Category::People, &state(), "   "),
            Err(CoreError::EmptyId)
        );
    }

    #[test]
    fn taken_id_rejected() {
        let err = validate_new_id(Category::People, &state(), "B").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { .. }));
    }

    #[test]
    fn all_sentinel_reserved_for_dates() {
        assert!(validate_new_id(Category::Dates, &state(), ALL_DATES).is_err());
        assert!(validate_new_id(Category::People, &state(), ALL_DATES).is_ok());
    }

    #[test]
    fn rename_to_self_allowed() {
        assert_eq!(
            validate_renamed_id(Category::People, &state(), "A", "A").unwrap(),
            "A"
        );
        assert!(validate_renamed_id(Category::People, &state(), "A", "B").is_err());
    }

    #[test]
    fn counts_parse() {
        assert_eq!(parse_count(" 3 ").unwrap(), 3);
        assert!(parse_count("-1").is_err());
        assert!(parse_count("x").is_err());
    }
}
