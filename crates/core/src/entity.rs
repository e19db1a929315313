use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

impl Item {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    /// Item ids, always kept in the order of the owning category's `items`.
    pub members: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Group {
    pub fn new(id: impl Into<String>, members: Vec<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members,
            description: description.into(),
        }
    }

    pub fn has_member(&self, item_id: &str) -> bool {
        self.members.iter().any(|m| m == item_id)
    }
}

/// Items and groups of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryState {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl CategoryState {
    pub fn find_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn find_group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_item(id).is_some() || self.find_group(id).is_some()
    }

    pub fn item_position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn groups_containing(&self, item_id: &str) -> Vec<&Group> {
        self.groups.iter().filter(|g| g.has_member(item_id)).collect()
    }

    /// Resolves a group's members to items. Dangling ids are skipped.
    pub fn members_of(&self, group_id: &str) -> Vec<&Item> {
        let Some(group) = self.find_group(group_id) else {
            return Vec::new();
        };
        group
            .members
            .iter()
            .filter_map(|id| self.find_item(id))
            .collect()
    }

    /// Expands an id that may name either an item or a group into item ids.
    pub fn resolve(&self, id: &str) -> Vec<&str> {
        if let Some(item) = self.find_item(id) {
            return vec![item.id.as_str()];
        }
        self.members_of(id).into_iter().map(|i| i.id.as_str()).collect()
    }

    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.id.as_str()).collect()
    }

    /// Keeps only ids that name existing items, in item order, without repeats.
    pub fn order_members<S: AsRef<str>>(&self, ids: &[S]) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| ids.iter().any(|id| id.as_ref() == item.id))
            .map(|item| item.id.clone())
            .collect()
    }

    /// Returns the first violated invariant, if any.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen: HashMap<&str, &'static str> = HashMap::new();
        for item in &self.items {
            if item.id.is_empty() {
                return Err("empty item id".to_string());
            }
            if seen.insert(item.id.as_str(), "item").is_some() {
                return Err(format!("duplicate id {}", item.id));
            }
        }
        for group in &self.groups {
            if group.id.is_empty() {
                return Err("empty group id".to_string());
            }
            if seen.insert(group.id.as_str(), "group").is_some() {
                return Err(format!("duplicate id {}", group.id));
            }
        }
        for group in &self.groups {
            let ordered = self.order_members(&group.members);
            if ordered != group.members {
                return Err(format!(
                    "group {} members {:?} are not an ordered subset of items",
                    group.id, group.members
                ));
            }
        }
        Ok(())
    }
}
