use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::compaction::{self, CellEntry};
use crate::dates::DateRange;
use crate::entity::{CategoryState, Group, Item};
use crate::ids::{ALL_DATES, Category};
use crate::preferences::PreferenceRecord;
use crate::weight::Weight;

/// The whole configuration as one value: every undo step is a copy of this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigState {
    pub date_range: DateRange,
    pub people: CategoryState,
    pub shift_types: CategoryState,
    /// Items are derived from `date_range`; only the groups are stored.
    pub dates: CategoryState,
    pub preferences: Vec<PreferenceRecord>,
    /// Shifts each person worked just before the range, most recent day first.
    pub person_history: BTreeMap<String, Vec<Option<String>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDates {
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// [`ConfigState`] as persisted: date items are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub people: CategoryState,
    #[serde(default)]
    pub shift_types: CategoryState,
    #[serde(default)]
    pub dates: StoredDates,
    #[serde(default)]
    pub preferences: Vec<PreferenceRecord>,
    #[serde(default)]
    pub person_history: BTreeMap<String, Vec<Option<String>>>,
}

impl StoredConfig {
    pub fn into_state(self) -> ConfigState {
        ConfigState {
            date_range: self.date_range,
            people: self.people,
            shift_types: self.shift_types,
            dates: CategoryState {
                items: Vec::new(),
                groups: self.dates.groups,
            },
            preferences: self.preferences,
            person_history: self.person_history,
        }
        .derive()
    }
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

impl ConfigState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starting configuration offered on first load.
    pub fn seeded() -> Self {
        let date_range = match (
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 7),
        ) {
            (Some(start), Some(end)) => DateRange {
                start_date: Some(start),
                end_date: Some(end),
            },
            _ => DateRange::default(),
        };
        Self {
            date_range,
            people: CategoryState {
                items: vec![
                    Item::new("P1", "Alice"),
                    Item::new("P2", "Bob"),
                    Item::new("P3", "Carol"),
                    Item::new("P4", "Dave"),
                ],
                groups: vec![Group::new("Seniors", ids(&["P1", "P2"]), "senior staff")],
            },
            shift_types: CategoryState {
                items: vec![
                    Item::new("D", "Day"),
                    Item::new("E", "Evening"),
                    Item::new("N", "Night"),
                    Item::new("OFF", "Day off"),
                ],
                groups: vec![Group::new("Working", ids(&["D", "E", "N"]), "any working shift")],
            },
            dates: CategoryState {
                items: Vec::new(),
                groups: vec![Group::new("Weekend", ids(&["06", "07"]), "")],
            },
            preferences: vec![PreferenceRecord::ShiftTypeRequirement {
                shift_type: ids(&["Working"]),
                required_num_people: 1,
                qualified_people: Vec::new(),
                date: ids(&[ALL_DATES]),
                weight: Weight::Infinity,
                description: "every working shift is staffed".to_string(),
            }],
            person_history: BTreeMap::new(),
        }
        .derive()
    }

    /// Recomputes fields that are never trusted from storage: date items,
    /// and date group members against them.
    pub fn derive(mut self) -> Self {
        self.dates.items = self.date_range.derive_items();
        let groups = std::mem::take(&mut self.dates.groups);
        self.dates.groups = groups
            .into_iter()
            .map(|mut g| {
                let kept = self.dates.order_members(&g.members);
                if kept.len() < g.members.len() {
                    let dropped: Vec<&String> =
                        g.members.iter().filter(|m| !kept.contains(m)).collect();
                    warn!(
                        group = %g.id,
                        ?dropped,
                        "date group members fall outside the date range"
                    );
                }
                g.members = kept;
                g
            })
            .collect();
        self
    }

    pub fn to_stored(&self) -> StoredConfig {
        StoredConfig {
            date_range: self.date_range,
            people: self.people.clone(),
            shift_types: self.shift_types.clone(),
            dates: StoredDates {
                groups: self.dates.groups.clone(),
            },
            preferences: self.preferences.clone(),
            person_history: self.person_history.clone(),
        }
    }

    pub fn category(&self, category: Category) -> &CategoryState {
        match category {
            Category::People => &self.people,
            Category::ShiftTypes => &self.shift_types,
            Category::Dates => &self.dates,
        }
    }

    /// Applies a category mutation. Date items stay derived from the range.
    pub fn update_category(
        &self,
        category: Category,
        f: impl FnOnce(&CategoryState) -> CategoryState,
    ) -> Self {
        let mut next = self.clone();
        let updated = f(self.category(category));
        match category {
            Category::People => next.people = updated,
            Category::ShiftTypes => next.shift_types = updated,
            Category::Dates => {
                next.dates.groups = updated.groups;
                next = next.derive();
            }
        }
        next
    }

    pub fn set_date_range(&self, range: DateRange) -> Self {
        Self {
            date_range: range,
            ..self.clone()
        }
        .derive()
    }

    /// Follows an id change into preference records and person history.
    pub fn rename_references(&self, category: Category, old_id: &str, new_id: &str) -> Self {
        let mut next = self.clone();
        if old_id == new_id {
            return next;
        }
        for record in next.preferences.iter_mut() {
            record.rename_reference(category, old_id, new_id);
        }
        match category {
            Category::People => {
                if let Some(history) = next.person_history.remove(old_id) {
                    next.person_history.insert(new_id.to_string(), history);
                }
            }
            Category::ShiftTypes => {
                for slot in next.person_history.values_mut().flatten().flatten() {
                    if slot.as_str() == old_id {
                        *slot = new_id.to_string();
                    }
                }
            }
            Category::Dates => {}
        }
        next
    }

    /// Drops a deleted id from preference records, and records left without
    /// a required reference.
    pub fn remove_references(&self, category: Category, id: &str) -> Self {
        let mut next = self.clone();
        next.preferences
            .retain_mut(|record| record.remove_reference(category, id));
        match category {
            Category::People => {
                next.person_history.remove(id);
            }
            Category::ShiftTypes => {
                next.person_history = std::mem::take(&mut next.person_history)
                    .into_iter()
                    .map(|(person, history)| {
                        (person, compaction::forget_history_shift_type(&history, id))
                    })
                    .filter(|(_, history)| !history.is_empty())
                    .collect();
            }
            Category::Dates => {}
        }
        next
    }

    /// Column ids of the preference matrix: the `ALL` column, then each date.
    pub fn matrix_dates(&self) -> Vec<String> {
        std::iter::once(ALL_DATES.to_string())
            .chain(self.dates.items.iter().map(|i| i.id.clone()))
            .collect()
    }

    pub fn preference_cell(&self, person: &str, date: &str) -> Vec<CellEntry> {
        compaction::cell_entries(&self.preferences, person, date, &self.shift_types.item_ids())
    }

    pub fn set_preference_cell(&self, person: &str, date: &str, wanted: &[CellEntry]) -> Self {
        Self {
            preferences: compaction::set_cell(&self.preferences, person, date, wanted),
            ..self.clone()
        }
    }

    pub fn history_of(&self, person: &str) -> &[Option<String>] {
        self.person_history
            .get(person)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Shift `person` worked in history slot `position` (0 = the day before the range).
    pub fn history_cell(&self, person: &str, position: usize) -> Option<&str> {
        compaction::history_cell(self.history_of(person), position)
    }

    pub fn set_history_cell(&self, person: &str, position: usize, shift_type: &str) -> Self {
        let mut next = self.clone();
        let history = compaction::set_history_cell(self.history_of(person), position, shift_type);
        if !history.is_empty() {
            next.person_history.insert(person.to_string(), history);
        }
        next
    }

    pub fn clear_history_cell(&self, person: &str, position: usize) -> Self {
        let mut next = self.clone();
        let history = compaction::clear_history_cell(self.history_of(person), position);
        if history.is_empty() {
            next.person_history.remove(person);
        } else {
            next.person_history.insert(person.to_string(), history);
        }
        next
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        for category in Category::ALL {
            self.category(category)
                .check_invariants()
                .map_err(|e| format!("{category}: {e}"))?;
        }
        if self.dates.items != self.date_range.derive_items() {
            return Err("date items are stale".to_string());
        }
        Ok(())
    }
}
