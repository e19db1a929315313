pub mod config;
pub mod error;
pub mod history;
pub mod persist;

pub use config::EngineConfig;
pub use error::EngineError;
pub use history::HistoryManager;

use shiftplan_core::{
    ALL_DATES, CellEntry, Category, ConfigState, CoreError, DateRange, Group, MembershipUpdate,
    PreferenceRecord, ids, mutation,
};
use shiftplan_storage::KeyValueStore;
use tracing::{debug, error, warn};

/// Owns the configuration history and its persisted copy.
///
/// Commands validate their input, apply a pure mutation, record the result
/// as a new snapshot and write the whole history to storage. Validation
/// failures leave everything untouched; storage failures are logged and
/// the in-memory history stays authoritative.
pub struct Engine<S: KeyValueStore> {
    config: EngineConfig,
    storage: S,
    history: HistoryManager,
}

impl<S: KeyValueStore> Engine<S> {
    /// Loads the stored history, or starts fresh if there is none or it is unreadable.
    pub fn open(config: EngineConfig, storage: S) -> Self {
        let limit = config.history_limit();
        let history = match storage.get(&config.storage_key) {
            Ok(Some(bytes)) => match persist::decode(&bytes, limit) {
                Ok(history) => {
                    debug!(
                        snapshots = history.len(),
                        current_index = history.current_index(),
                        "restored configuration history"
                    );
                    Some(history)
                }
                Err(e) => {
                    warn!(error = %e, "stored configuration unreadable, starting fresh");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read stored configuration, starting fresh");
                None
            }
        };
        let history =
            history.unwrap_or_else(|| HistoryManager::new(Self::fresh_state(&config), limit));
        Self {
            config,
            storage,
            history,
        }
    }

    fn fresh_state(config: &EngineConfig) -> ConfigState {
        if config.seed_defaults {
            ConfigState::seeded()
        } else {
            ConfigState::empty()
        }
    }

    pub fn state(&self) -> &ConfigState {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let bytes = match persist::encode(&self.history) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to encode configuration history");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.config.storage_key, &bytes) {
            warn!(error = %e, bytes = bytes.len(), "failed to persist configuration history");
        }
    }

    /// Records `next` unless it equals the current state. Returns whether a snapshot was taken.
    fn commit(&mut self, next: ConfigState) -> bool {
        if &next == self.history.current() {
            debug!("mutation left the configuration unchanged; nothing recorded");
            return false;
        }
        self.history.record(next);
        self.persist();
        true
    }

    fn require_editable_items(category: Category) -> Result<(), CoreError> {
        if category == Category::Dates {
            return Err(CoreError::ReadOnlyItems(category));
        }
        Ok(())
    }

    fn require_item(&self, category: Category, id: &str) -> Result<(), CoreError> {
        match self.state().category(category).find_item(id) {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                category,
                id: id.to_string(),
            }),
        }
    }

    fn require_group(&self, category: Category, id: &str) -> Result<(), CoreError> {
        match self.state().category(category).find_group(id) {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                category,
                id: id.to_string(),
            }),
        }
    }

    // ========================================================================
    // Items and groups
    // ========================================================================

    /// Adds an item and returns its (trimmed) id.
    pub fn add_item(
        &mut self,
        category: Category,
        id: &str,
        group_ids: &[String],
        description: &str,
    ) -> Result<String, EngineError> {
        Self::require_editable_items(category)?;
        let id = ids::validate_new_id(category, self.state().category(category), id)?;
        let next = self
            .state()
            .update_category(category, |c| mutation::add_item(c, &id, group_ids, description));
        self.commit(next);
        Ok(id)
    }

    pub fn add_group(
        &mut self,
        category: Category,
        id: &str,
        member_ids: &[String],
        description: &str,
    ) -> Result<String, EngineError> {
        let id = ids::validate_new_id(category, self.state().category(category), id)?;
        let next = self
            .state()
            .update_category(category, |c| mutation::add_group(c, &id, member_ids, description));
        self.commit(next);
        Ok(id)
    }

    pub fn update_item(
        &mut self,
        category: Category,
        old_id: &str,
        new_id: &str,
        groups: MembershipUpdate,
        description: Option<&str>,
    ) -> Result<String, EngineError> {
        Self::require_editable_items(category)?;
        self.require_item(category, old_id)?;
        let new_id =
            ids::validate_renamed_id(category, self.state().category(category), old_id, new_id)?;
        let next = self
            .state()
            .update_category(category, |c| {
                mutation::update_item(c, old_id, &new_id, groups, description)
            })
            .rename_references(category, old_id, &new_id);
        self.commit(next);
        Ok(new_id)
    }

    pub fn update_group(
        &mut self,
        category: Category,
        old_id: &str,
        new_id: &str,
        members: MembershipUpdate,
        description: Option<&str>,
    ) -> Result<String, EngineError> {
        self.require_group(category, old_id)?;
        let new_id =
            ids::validate_renamed_id(category, self.state().category(category), old_id, new_id)?;
        let next = self
            .state()
            .update_category(category, |c| {
                mutation::update_group(c, old_id, &new_id, members, description)
            })
            .rename_references(category, old_id, &new_id);
        self.commit(next);
        Ok(new_id)
    }

    pub fn delete_item(&mut self, category: Category, id: &str) -> Result<(), EngineError> {
        Self::require_editable_items(category)?;
        self.require_item(category, id)?;
        let next = self
            .state()
            .update_category(category, |c| mutation::delete_item(c, id))
            .remove_references(category, id);
        self.commit(next);
        Ok(())
    }

    pub fn delete_group(&mut self, category: Category, id: &str) -> Result<(), EngineError> {
        self.require_group(category, id)?;
        let next = self
            .state()
            .update_category(category, |c| mutation::delete_group(c, id))
            .remove_references(category, id);
        self.commit(next);
        Ok(())
    }

    pub fn remove_item_from_group(
        &mut self,
        category: Category,
        item_id: &str,
        group_id: &str,
    ) -> Result<(), EngineError> {
        self.require_group(category, group_id)?;
        let next = self.state().update_category(category, |c| {
            mutation::remove_item_from_group(c, item_id, group_id)
        });
        self.commit(next);
        Ok(())
    }

    pub fn reorder_items(&mut self, category: Category, order: &[String]) -> Result<(), EngineError> {
        Self::require_editable_items(category)?;
        let next = self
            .state()
            .update_category(category, |c| mutation::reorder_items(c, order));
        self.commit(next);
        Ok(())
    }

    /// Replaces the group list of `category`. Groups missing from the new
    /// list count as deleted and are purged from preference records.
    pub fn update_groups(&mut self, category: Category, groups: Vec<Group>) -> Result<(), EngineError> {
        let updated = self
            .state()
            .update_category(category, |c| mutation::update_groups(c, groups));
        let dropped: Vec<String> = self
            .state()
            .category(category)
            .groups
            .iter()
            .filter(|g| updated.category(category).find_group(&g.id).is_none())
            .map(|g| g.id.clone())
            .collect();
        if !dropped.is_empty() {
            debug!(%category, ?dropped, "groups removed by wholesale update");
        }
        let next = dropped
            .iter()
            .fold(updated, |state, id| state.remove_references(category, id));
        self.commit(next);
        Ok(())
    }

    pub fn set_date_range(&mut self, range: DateRange) -> Result<(), EngineError> {
        if let (Some(start), Some(end)) = (range.start_date, range.end_date)
            && end < start
        {
            return Err(CoreError::InvalidRange.into());
        }
        let next = self.state().set_date_range(range);
        self.commit(next);
        Ok(())
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    /// Replaces what cell (`person`, `date`) of the preference matrix asks for.
    pub fn set_preference_cell(
        &mut self,
        person: &str,
        date: &str,
        wanted: &[CellEntry],
    ) -> Result<(), EngineError> {
        self.require_item(Category::People, person)?;
        if date != ALL_DATES {
            self.require_item(Category::Dates, date)?;
        }
        for entry in wanted {
            self.require_item(Category::ShiftTypes, &entry.shift_type)?;
        }
        let next = self.state().set_preference_cell(person, date, wanted);
        self.commit(next);
        Ok(())
    }

    /// Every id a record names must be an item or group of its category;
    /// date lists may also name the `ALL` column.
    fn require_references(&self, record: &PreferenceRecord) -> Result<(), CoreError> {
        for category in [Category::People, Category::ShiftTypes, Category::Dates] {
            let known = self.state().category(category);
            for id in record.references(category) {
                let all_dates = category == Category::Dates && id == ALL_DATES;
                if !all_dates && !known.contains_id(&id) {
                    return Err(CoreError::NotFound { category, id });
                }
            }
        }
        Ok(())
    }

    pub fn add_preference(&mut self, record: PreferenceRecord) -> Result<(), EngineError> {
        self.require_references(&record)?;
        let mut next = self.state().clone();
        next.preferences.push(record);
        self.commit(next);
        Ok(())
    }

    pub fn update_preference(
        &mut self,
        index: usize,
        record: PreferenceRecord,
    ) -> Result<(), EngineError> {
        if index >= self.state().preferences.len() {
            return Err(EngineError::PreferenceNotFound(index));
        }
        self.require_references(&record)?;
        let mut next = self.state().clone();
        next.preferences[index] = record;
        self.commit(next);
        Ok(())
    }

    pub fn delete_preference(&mut self, index: usize) -> Result<PreferenceRecord, EngineError> {
        let mut next = self.state().clone();
        if index >= next.preferences.len() {
            return Err(EngineError::PreferenceNotFound(index));
        }
        let removed = next.preferences.remove(index);
        self.commit(next);
        Ok(removed)
    }

    pub fn set_history_cell(
        &mut self,
        person: &str,
        position: usize,
        shift_type: &str,
    ) -> Result<(), EngineError> {
        self.require_item(Category::People, person)?;
        self.require_item(Category::ShiftTypes, shift_type)?;
        let next = self.state().set_history_cell(person, position, shift_type);
        self.commit(next);
        Ok(())
    }

    pub fn clear_history_cell(&mut self, person: &str, position: usize) -> Result<(), EngineError> {
        self.require_item(Category::People, person)?;
        let next = self.state().clear_history_cell(person, position);
        self.commit(next);
        Ok(())
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.persist();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.persist();
        }
        moved
    }

    /// Replaces the configuration with a fresh one, as an undoable step.
    pub fn reset(&mut self) -> bool {
        let fresh = Self::fresh_state(&self.config);
        self.commit(fresh)
    }
}
