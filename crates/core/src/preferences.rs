use serde::{Deserialize, Serialize};

use crate::ids::Category;
use crate::weight::Weight;

/// A stored preference or constraint. Every list holds item or group ids of
/// one category; dates may also hold [`crate::ids::ALL_DATES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreferenceRecord {
    /// Ask for (or against) `person` working `shift_type` on `date`.
    #[serde(rename_all = "camelCase")]
    ShiftRequest {
        person: Vec<String>,
        date: Vec<String>,
        shift_type: Vec<String>,
        weight: Weight,
        #[serde(default)]
        description: String,
    },
    /// Steer how many of `count_shift_types` each person works over `count_dates`.
    #[serde(rename_all = "camelCase")]
    ShiftCount {
        person: Vec<String>,
        count_dates: Vec<String>,
        count_shift_types: Vec<String>,
        #[serde(default = "default_expression")]
        expression: String,
        target: i64,
        weight: Weight,
        #[serde(default)]
        description: String,
    },
    /// Pair (or separate) two sets of people on the same shifts.
    #[serde(rename_all = "camelCase")]
    ShiftAffinity {
        date: Vec<String>,
        people1: Vec<String>,
        people2: Vec<String>,
        shift_type: Vec<String>,
        weight: Weight,
        #[serde(default)]
        description: String,
    },
    /// Staffing level for `shift_type` on `date`, filled from `qualified_people`.
    /// An empty `qualified_people` means anyone may fill it.
    #[serde(rename_all = "camelCase")]
    ShiftTypeRequirement {
        shift_type: Vec<String>,
        required_num_people: u32,
        #[serde(default)]
        qualified_people: Vec<String>,
        date: Vec<String>,
        weight: Weight,
        #[serde(default)]
        description: String,
    },
    /// Encourage or forbid `pattern` worked on consecutive days.
    #[serde(rename_all = "camelCase")]
    ShiftTypeSuccession {
        person: Vec<String>,
        pattern: Vec<String>,
        weight: Weight,
        #[serde(default)]
        description: String,
    },
}

fn default_expression() -> String {
    "|x - T|".to_string()
}

impl PreferenceRecord {
    pub fn shift_request(
        person: impl Into<String>,
        date: impl Into<String>,
        shift_type: impl Into<String>,
        weight: Weight,
    ) -> Self {
        Self::ShiftRequest {
            person: vec![person.into()],
            date: vec![date.into()],
            shift_type: vec![shift_type.into()],
            weight,
            description: String::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ShiftRequest { .. } => "ShiftRequest",
            Self::ShiftCount { .. } => "ShiftCount",
            Self::ShiftAffinity { .. } => "ShiftAffinity",
            Self::ShiftTypeRequirement { .. } => "ShiftTypeRequirement",
            Self::ShiftTypeSuccession { .. } => "ShiftTypeSuccession",
        }
    }

    pub fn weight(&self) -> Weight {
        match self {
            Self::ShiftRequest { weight, .. }
            | Self::ShiftCount { weight, .. }
            | Self::ShiftAffinity { weight, .. }
            | Self::ShiftTypeRequirement { weight, .. }
            | Self::ShiftTypeSuccession { weight, .. } => *weight,
        }
    }

    /// Reference lists of `category`, paired with whether an empty list leaves
    /// the record meaningless.
    fn references_mut(&mut self, category: Category) -> Vec<(&mut Vec<String>, bool)> {
        match (self, category) {
            (Self::ShiftRequest { person, .. }, Category::People) => vec![(person, true)],
            (Self::ShiftRequest { date, .. }, Category::Dates) => vec![(date, true)],
            (Self::ShiftRequest { shift_type, .. }, Category::ShiftTypes) => {
                vec![(shift_type, true)]
            }

            (Self::ShiftCount { person, .. }, Category::People) => vec![(person, true)],
            (Self::ShiftCount { count_dates, .. }, Category::Dates) => vec![(count_dates, true)],
            (
                Self::ShiftCount {
                    count_shift_types, ..
                },
                Category::ShiftTypes,
            ) => vec![(count_shift_types, true)],

            (
                Self::ShiftAffinity {
                    people1, people2, ..
                },
                Category::People,
            ) => vec![(people1, true), (people2, true)],
            (Self::ShiftAffinity { date, .. }, Category::Dates) => vec![(date, true)],
            (Self::ShiftAffinity { shift_type, .. }, Category::ShiftTypes) => {
                vec![(shift_type, true)]
            }

            (
                Self::ShiftTypeRequirement {
                    qualified_people, ..
                },
                Category::People,
            ) => vec![(qualified_people, false)],
            (Self::ShiftTypeRequirement { date, .. }, Category::Dates) => vec![(date, true)],
            (Self::ShiftTypeRequirement { shift_type, .. }, Category::ShiftTypes) => {
                vec![(shift_type, true)]
            }

            (Self::ShiftTypeSuccession { person, .. }, Category::People) => vec![(person, true)],
            (Self::ShiftTypeSuccession { pattern, .. }, Category::ShiftTypes) => {
                vec![(pattern, true)]
            }
            (Self::ShiftTypeSuccession { .. }, Category::Dates) => Vec::new(),
        }
    }

    pub fn references(&self, category: Category) -> Vec<String> {
        let mut copy = self.clone();
        copy.references_mut(category)
            .into_iter()
            .flat_map(|(list, _)| list.iter().cloned())
            .collect()
    }

    pub fn rename_reference(&mut self, category: Category, old_id: &str, new_id: &str) {
        for (list, _) in self.references_mut(category) {
            for id in list.iter_mut().filter(|id| id.as_str() == old_id) {
                *id = new_id.to_string();
            }
        }
    }

    /// Removes `id` from every list of `category`. Returns false when the
    /// record no longer references anything it needs.
    pub fn remove_reference(&mut self, category: Category, id: &str) -> bool {
        let mut keep = true;
        for (list, required) in self.references_mut(category) {
            let before = list.len();
            list.retain(|r| r != id);
            if required && before > 0 && list.is_empty() {
                keep = false;
            }
        }
        keep
    }
}
