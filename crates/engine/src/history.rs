use shiftplan_core::ConfigState;
use tracing::debug;

/// Linear undo/redo over whole-state snapshots.
///
/// `entries[current_index]` is the live state. Recording after an undo
/// discards the redo branch; the oldest snapshots fall off past `limit`.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<ConfigState>,
    current_index: usize,
    limit: usize,
}

impl HistoryManager {
    pub fn new(initial: ConfigState, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            current_index: 0,
            limit: limit.max(1),
        }
    }

    /// Rebuilds a history from stored parts. `current` wins over the
    /// snapshot at `current_index` if they disagree.
    pub fn from_parts(
        current: ConfigState,
        entries: Vec<ConfigState>,
        current_index: usize,
        limit: usize,
    ) -> Self {
        if entries.is_empty() || current_index >= entries.len() {
            debug!(
                len = entries.len(),
                current_index, "stored history unusable, keeping only the current state"
            );
            return Self::new(current, limit);
        }
        let mut history = Self {
            entries,
            current_index,
            limit: limit.max(1),
        };
        history.entries[current_index] = current;
        history.enforce_limit();
        history
    }

    pub fn current(&self) -> &ConfigState {
        &self.entries[self.current_index]
    }

    pub fn entries(&self) -> &[ConfigState] {
        &self.entries
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.entries.len()
    }

    pub fn record(&mut self, state: ConfigState) {
        self.entries.truncate(self.current_index + 1);
        self.entries.push(state);
        self.current_index = self.entries.len() - 1;
        self.enforce_limit();
    }

    /// Trims to `limit` snapshots while keeping the live one: the oldest
    /// undo steps go first, then the far end of the redo branch.
    fn enforce_limit(&mut self) {
        if self.entries.len() <= self.limit {
            return;
        }
        let front = (self.entries.len() - self.limit).min(self.current_index);
        self.entries.drain(..front);
        self.current_index -= front;
        self.entries.truncate(self.limit);
    }

    pub fn undo(&mut self) -> bool {
        self.move_to(self.current_index.saturating_sub(1))
    }

    pub fn redo(&mut self) -> bool {
        self.move_to((self.current_index + 1).min(self.entries.len() - 1))
    }

    fn move_to(&mut self, index: usize) -> bool {
        if index == self.current_index {
            return false;
        }
        self.current_index = index;
        let restored = std::mem::take(&mut self.entries[index]);
        self.entries[index] = restored.derive();
        true
    }
}
