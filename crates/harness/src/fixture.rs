use chrono::NaiveDate;
use std::path::PathBuf;

use shiftplan_core::{Category, ConfigState, DateRange};
use shiftplan_engine::{Engine, EngineConfig, EngineError};
use shiftplan_storage::{MemoryStore, SqliteStore, StorageError};

pub fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// An engine over an in-memory store, with helpers to populate it.
pub struct Fixture {
    pub engine: Engine<MemoryStore>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Empty configuration, default history limit.
    pub fn new() -> Self {
        Self::with_config(EngineConfig {
            seed_defaults: false,
            ..EngineConfig::default()
        })
    }

    pub fn seeded() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        crate::init_tracing();
        Self {
            engine: Engine::open(config, MemoryStore::new()),
        }
    }

    pub fn state(&self) -> &ConfigState {
        self.engine.state()
    }

    /// Simulates a restart: a new engine over the same stored bytes.
    pub fn reopen(self) -> Self {
        let config = self.engine.config().clone();
        let storage = self.engine.into_storage();
        Self {
            engine: Engine::open(config, storage),
        }
    }

    pub fn add_items(&mut self, category: Category, ids: &[&str]) -> Result<(), EngineError> {
        for id in ids {
            self.engine.add_item(category, id, &[], "")?;
        }
        Ok(())
    }

    pub fn add_group(
        &mut self,
        category: Category,
        id: &str,
        members: &[&str],
    ) -> Result<(), EngineError> {
        self.engine.add_group(category, id, &strings(members), "")?;
        Ok(())
    }

    pub fn date_range(&mut self, start: (i32, u32, u32), end: (i32, u32, u32)) -> Result<(), EngineError> {
        let date = |(y, m, d): (i32, u32, u32)| {
            NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
                EngineError::Core(shiftplan_core::CoreError::InvalidDate(format!("{y}-{m}-{d}")))
            })
        };
        let range = DateRange::new(date(start)?, date(end)?)?;
        self.engine.set_date_range(range)
    }

    /// People P1..Pn, shift types D/E/N and a single-month week of dates.
    pub fn small_roster(people: usize) -> Result<Self, EngineError> {
        let mut fixture = Self::new();
        let ids: Vec<String> = (1..=people).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        fixture.add_items(Category::People, &refs)?;
        fixture.add_items(Category::ShiftTypes, &["D", "E", "N"])?;
        fixture.date_range((2024, 3, 4), (2024, 3, 10))?;
        Ok(fixture)
    }
}

/// A SQLite store file in a temporary directory, reopenable across engines.
pub struct DiskStore {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl DiskStore {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shiftplan.db");
        Ok(Self { _dir: dir, path })
    }

    pub fn open(&self) -> Result<SqliteStore, StorageError> {
        SqliteStore::open(&self.path.to_string_lossy())
    }
}
