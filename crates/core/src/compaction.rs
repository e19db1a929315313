//! Person × date preference matrix over a compact list of shift requests.
//!
//! A matrix cell (person, date) holds any number of (shift type, weight)
//! pairs. Storage keeps one `ShiftRequest` per (person, shift type, weight)
//! with the set of dates sharing it, so writing the same pair on several
//! dates coalesces into one record.

use tracing::warn;

use crate::preferences::PreferenceRecord;
use crate::weight::{Magnitude, Weight};

/// Days of shift history kept per person before the range starts.
pub const HISTORY_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellEntry {
    pub shift_type: String,
    pub weight: Weight,
}

impl CellEntry {
    pub fn new(shift_type: impl Into<String>, weight: Weight) -> Self {
        Self {
            shift_type: shift_type.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Empty,
    Encourage,
    Discourage,
    Mixed,
}

/// A record the matrix owns: a single-person shift request.
fn cell_record_person(record: &PreferenceRecord) -> Option<&str> {
    match record {
        PreferenceRecord::ShiftRequest { person, .. } if person.len() == 1 => {
            Some(person[0].as_str())
        }
        _ => None,
    }
}

/// Replaces the contents of cell (`person`, `date`) with `wanted`.
pub fn set_cell(
    records: &[PreferenceRecord],
    person: &str,
    date: &str,
    wanted: &[CellEntry],
) -> Vec<PreferenceRecord> {
    let mut next: Vec<PreferenceRecord> = records.to_vec();

    for record in next.iter_mut() {
        if cell_record_person(record) != Some(person) {
            continue;
        }
        if let PreferenceRecord::ShiftRequest { date: dates, .. } = record {
            dates.retain(|d| d != date);
        }
    }

    for entry in wanted {
        let existing = next.iter_mut().find(|record| {
            cell_record_person(record) == Some(person)
                && matches!(
                    record,
                    PreferenceRecord::ShiftRequest { shift_type, weight, .. }
                        if shift_type.len() == 1
                            && shift_type[0] == entry.shift_type
                            && *weight == entry.weight
                )
        });
        match existing {
            Some(PreferenceRecord::ShiftRequest { date: dates, .. }) => {
                if !dates.iter().any(|d| d == date) {
                    dates.push(date.to_string());
                }
            }
            _ => next.push(PreferenceRecord::shift_request(
                person,
                date,
                entry.shift_type.clone(),
                entry.weight,
            )),
        }
    }

    next.retain(|record| match record {
        PreferenceRecord::ShiftRequest { date, .. } => !date.is_empty(),
        _ => true,
    });
    next
}

/// The pairs shown in cell (`person`, `date`): strongest first, encouraging
/// before discouraging at equal strength, then by shift type order.
pub fn cell_entries(
    records: &[PreferenceRecord],
    person: &str,
    date: &str,
    shift_type_order: &[&str],
) -> Vec<CellEntry> {
    let mut entries: Vec<CellEntry> = Vec::new();
    for record in records {
        if cell_record_person(record) != Some(person) {
            continue;
        }
        if let PreferenceRecord::ShiftRequest {
            date: dates,
            shift_type,
            weight,
            ..
        } = record
            && dates.iter().any(|d| d == date)
        {
            for st in shift_type {
                let entry = CellEntry::new(st.clone(), *weight);
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
            }
        }
    }

    let position = |st: &str| {
        shift_type_order
            .iter()
            .position(|s| *s == st)
            .unwrap_or(usize::MAX)
    };
    entries.sort_by(|a, b| {
        let strength = |w: Weight| match w.magnitude() {
            Magnitude::Infinite => (1, 0),
            Magnitude::Finite(n) => (0, n),
        };
        strength(b.weight)
            .cmp(&strength(a.weight))
            .then(b.weight.cmp(&a.weight))
            .then(position(&a.shift_type).cmp(&position(&b.shift_type)))
    });
    entries
}

pub fn cell_tone(entries: &[CellEntry]) -> CellTone {
    if entries.is_empty() {
        CellTone::Empty
    } else if entries.iter().all(|e| e.weight.is_positive()) {
        CellTone::Encourage
    } else if entries.iter().all(|e| e.weight.is_negative()) {
        CellTone::Discourage
    } else {
        CellTone::Mixed
    }
}

// Person history is a list of slots counted back from the first scheduled
// day: slot 0 is the day before the range, slot k is k + 1 days before it.
// Unknown days are `None`; the list never ends in `None`.

pub fn history_cell(history: &[Option<String>], position: usize) -> Option<&str> {
    history.get(position)?.as_deref()
}

/// Sets one slot. Slots past the stored days extend the list into the past,
/// leaving the days in between unset.
pub fn set_history_cell(
    history: &[Option<String>],
    position: usize,
    shift_type: &str,
) -> Vec<Option<String>> {
    let mut next = history.to_vec();
    if position >= HISTORY_WINDOW {
        warn!(position, window = HISTORY_WINDOW, "history slot outside the window");
        return next;
    }
    if next.len() <= position {
        next.resize(position + 1, None);
    }
    next[position] = Some(shift_type.to_string());
    next
}

/// Unsets one slot without moving the others. Slots past the stored days
/// are left alone.
pub fn clear_history_cell(history: &[Option<String>], position: usize) -> Vec<Option<String>> {
    let mut next = history.to_vec();
    if let Some(slot) = next.get_mut(position) {
        *slot = None;
    }
    trim_unset(&mut next);
    next
}

/// Unsets every slot naming `shift_type`.
pub fn forget_history_shift_type(history: &[Option<String>], shift_type: &str) -> Vec<Option<String>> {
    let mut next: Vec<Option<String>> = history
        .iter()
        .map(|slot| slot.clone().filter(|id| id != shift_type))
        .collect();
    trim_unset(&mut next);
    next
}

fn trim_unset(history: &mut Vec<Option<String>>) {
    while matches!(history.last(), Some(None)) {
        history.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(st: &str, w: i64) -> CellEntry {
        CellEntry::new(st, Weight::Finite(w))
    }

    #[test]
    fn same_pair_on_two_dates_coalesces() {
        let recs = set_cell(&[], "P1", "D1", &[e("X", 5)]);
        let recs = set_cell(&recs, "P1", "D2", &[e("X", 5)]);
        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0],
            PreferenceRecord::ShiftRequest {
                person: vec!["P1".into()],
                date: vec!["D1".into(), "D2".into()],
                shift_type: vec!["X".into()],
                weight: Weight::Finite(5),
                description: String::new(),
            }
        );
    }

    #[test]
    fn different_weight_creates_new_record() {
        let recs = set_cell(&[], "P1", "D1", &[e("X", 5)]);
        let recs = set_cell(&recs, "P1", "D2", &[e("X", 3)]);
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn rewriting_cell_detaches_old_date() {
        let recs = set_cell(&[], "P1", "D1", &[e("X", 5)]);
        let recs = set_cell(&recs, "P1", "D2", &[e("X", 5)]);
        let recs = set_cell(&recs, "P1", "D1", &[e("Y", -2)]);
        assert_eq!(cell_entries(&recs, "P1", "D1", &[]), vec![e("Y", -2)]);
        assert_eq!(cell_entries(&recs, "P1", "D2", &[]), vec![e("X", 5)]);
    }

    #[test]
    fn clearing_cell_drops_empty_records() {
        let recs = set_cell(&[], "P1", "D1", &[e("X", 5)]);
        let recs = set_cell(&recs, "P1", "D1", &[]);
        assert!(recs.is_empty());
    }

    #[test]
    fn other_people_and_records_untouched() {
        let count = PreferenceRecord::ShiftTypeSuccession {
            person: vec!["P1".into()],
            pattern: vec!["N".into(), "D".into()],
            weight: Weight::NegInfinity,
            description: String::new(),
        };
        let shared = PreferenceRecord::ShiftRequest {
            person: vec!["P1".into(), "P2".into()],
            date: vec!["D1".into()],
            shift_type: vec!["X".into()],
            weight: Weight::Finite(1),
            description: String::new(),
        };
        let recs = set_cell(&[count.clone(), shared.clone()], "P2", "D1", &[e("X", 1)]);
        let recs = set_cell(&recs, "P1", "D1", &[]);
        assert!(recs.contains(&count));
        assert!(recs.contains(&shared));
        assert_eq!(cell_entries(&recs, "P2", "D1", &[]), vec![e("X", 1)]);
    }

    #[test]
    fn display_order() {
        let wanted = vec![
            e("N", 2),
            e("D", -5),
            e("E", 5),
            CellEntry::new("D", Weight::NegInfinity),
            e("D", 2),
        ];
        let recs = set_cell(&[], "P1", "ALL", &wanted);
        let got = cell_entries(&recs, "P1", "ALL", &["D", "E", "N"]);
        assert_eq!(
            got,
            vec![
                CellEntry::new("D", Weight::NegInfinity),
                e("E", 5),
                e("D", -5),
                e("D", 2),
                e("N", 2),
            ]
        );
    }

    #[test]
    fn tones() {
        assert_eq!(cell_tone(&[]), CellTone::Empty);
        assert_eq!(cell_tone(&[e("D", 1), e("N", 3)]), CellTone::Encourage);
        assert_eq!(
            cell_tone(&[e("D", -1), CellEntry::new("N", Weight::NegInfinity)]),
            CellTone::Discourage
        );
        assert_eq!(cell_tone(&[e("D", -1), e("N", 1)]), CellTone::Mixed);
    }

    fn slots(v: &[Option<&str>]) -> Vec<Option<String>> {
        v.iter().map(|s| s.map(str::to_string)).collect()
    }

    #[test]
    fn history_slots_keep_their_position() {
        let h = set_history_cell(&[], 3, "N");
        assert_eq!(h, slots(&[None, None, None, Some("N")]));
        assert_eq!(history_cell(&h, 3), Some("N"));
        assert_eq!(history_cell(&h, 0), None);

        let h = set_history_cell(&h, 1, "D");
        let h = set_history_cell(&h, 0, "E");
        assert_eq!(h, slots(&[Some("E"), Some("D"), None, Some("N")]));

        let h = clear_history_cell(&h, 1);
        assert_eq!(h, slots(&[Some("E"), None, None, Some("N")]));
        assert_eq!(history_cell(&h, 3), Some("N"));
    }

    #[test]
    fn clearing_oldest_slot_trims_unset_days() {
        let h = slots(&[Some("E"), None, Some("N")]);
        assert_eq!(clear_history_cell(&h, 5), h);
        assert_eq!(clear_history_cell(&h, 2), slots(&[Some("E")]));
        assert!(clear_history_cell(&slots(&[Some("E")]), 0).is_empty());
    }

    #[test]
    fn slots_outside_window_are_ignored() {
        let h = set_history_cell(&[], HISTORY_WINDOW - 1, "D");
        assert_eq!(h.len(), HISTORY_WINDOW);
        assert_eq!(set_history_cell(&h, HISTORY_WINDOW, "N"), h);
    }

    #[test]
    fn forgetting_a_shift_type_unsets_its_days() {
        let h = slots(&[Some("D"), Some("N"), Some("D")]);
        assert_eq!(forget_history_shift_type(&h, "D"), slots(&[None, Some("N")]));
        assert!(forget_history_shift_type(&slots(&[Some("N")]), "N").is_empty());
    }
}
