//! Typed table access on top of the JSONL files.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError, Table};
use crate::models::{
    DraftGame, DraftMatch, DraftPick, EntityId, Hero, HeroCombo, Matchup, Player, Team,
    Tournament, Version, WinCondition,
};

/// A row type stored in one table.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const TABLE: Table;

    fn id(&self) -> &EntityId;
}

macro_rules! impl_record {
    ($($ty:ty => $table:expr),* $(,)?) => {
        $(
            impl Record for $ty {
                const TABLE: Table = $table;

                fn id(&self) -> &EntityId {
                    &self.id
                }
            }
        )*
    };
}

impl_record! {
    Hero => Table::Heroes,
    Version => Table::Versions,
    Tournament => Table::Tournaments,
    Team => Table::Teams,
    Player => Table::Players,
    DraftMatch => Table::DraftMatches,
    DraftGame => Table::DraftGames,
    DraftPick => Table::DraftPicks,
    Matchup => Table::Matchups,
    HeroCombo => Table::HeroCombos,
    WinCondition => Table::WinConditions,
}

/// The draft database.
///
/// Reads take a snapshot of the table file. Every write holds `write_lock`
/// for the whole read-modify-write so concurrent requests cannot lose rows.
#[derive(Debug)]
pub struct Store {
    config: StorageConfig,
    write_lock: Mutex<()>,
}

impl Store {
    /// Open (and create, if needed) the store under `config.data_dir`.
    pub fn open(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(config.tables_dir())?;
        info!("Opened draft store at {:?}", config.tables_dir());
        Ok(Self {
            config,
            write_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn path<T: Record>(&self) -> PathBuf {
        self.config.table_path(T::TABLE)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read<T: Record>(&self) -> Result<Vec<T>, StorageError> {
        JsonlReader::<T>::new(self.path::<T>()).read_all()
    }

    fn write<T: Record>(&self, rows: &[T]) -> Result<usize, StorageError> {
        JsonlWriter::<T>::new(self.path::<T>()).write_all(rows)
    }

    fn not_found<T: Record>(id: &EntityId) -> StorageError {
        StorageError::NotFound {
            table: T::TABLE.name(),
            id: id.to_string(),
        }
    }

    pub fn list<T: Record>(&self) -> Result<Vec<T>, StorageError> {
        self.read::<T>()
    }

    pub fn list_where<T, F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        Ok(self.read::<T>()?.into_iter().filter(predicate).collect())
    }

    pub fn get<T: Record>(&self, id: &EntityId) -> Result<Option<T>, StorageError> {
        Ok(self.read::<T>()?.into_iter().find(|r| r.id() == id))
    }

    /// Like [`Store::get`], but a missing row is an error.
    pub fn require<T: Record>(&self, id: &EntityId) -> Result<T, StorageError> {
        self.get::<T>(id)?.ok_or_else(|| Self::not_found::<T>(id))
    }

    pub fn exists<T: Record>(&self, id: &EntityId) -> Result<bool, StorageError> {
        Ok(self.get::<T>(id)?.is_some())
    }

    pub fn count<T: Record>(&self) -> Result<usize, StorageError> {
        Ok(self.read::<T>()?.len())
    }

    /// Insert a new row. Fails if a row with the same id exists.
    pub fn insert<T: Record>(&self, record: &T) -> Result<(), StorageError> {
        let _guard = self.lock();
        if self.read::<T>()?.iter().any(|r| r.id() == record.id()) {
            return Err(StorageError::Duplicate {
                table: T::TABLE.name(),
                id: record.id().to_string(),
            });
        }
        JsonlWriter::<T>::new(self.path::<T>()).append(record)?;
        debug!("Inserted {} into {}", record.id(), T::TABLE.name());
        Ok(())
    }

    /// Insert or replace by id. Returns true when an existing row was replaced.
    pub fn upsert<T: Record>(&self, record: T) -> Result<bool, StorageError> {
        self.modify(|rows: &mut Vec<T>| {
            match rows.iter_mut().find(|r| r.id() == record.id()) {
                Some(existing) => {
                    *existing = record;
                    Ok(true)
                }
                None => {
                    rows.push(record);
                    Ok(false)
                }
            }
        })
    }

    /// Replace an existing row.
    pub fn update<T: Record>(&self, record: T) -> Result<(), StorageError> {
        self.modify(|rows: &mut Vec<T>| {
            match rows.iter_mut().find(|r| r.id() == record.id()) {
                Some(existing) => {
                    *existing = record;
                    Ok(())
                }
                None => Err(Self::not_found::<T>(record.id())),
            }
        })
    }

    /// Delete by id. Returns whether a row was removed.
    pub fn delete<T: Record>(&self, id: &EntityId) -> Result<bool, StorageError> {
        Ok(self.delete_where::<T, _>(|r| r.id() == id)? > 0)
    }

    pub fn delete_where<T, F>(&self, predicate: F) -> Result<usize, StorageError>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        self.modify(|rows: &mut Vec<T>| {
            let before = rows.len();
            rows.retain(|r| !predicate(r));
            Ok(before - rows.len())
        })
    }

    /// Read-modify-write a whole table under the write lock. The table is
    /// written back only when `f` succeeds.
    pub fn modify<T, F, R>(&self, f: F) -> Result<R, StorageError>
    where
        T: Record,
        F: FnOnce(&mut Vec<T>) -> Result<R, StorageError>,
    {
        let _guard = self.lock();
        let mut rows = self.read::<T>()?;
        let result = f(&mut rows)?;
        self.write(&rows)?;
        Ok(result)
    }

    /// Row count of every table, keyed by table name.
    pub fn table_counts(&self) -> Result<Vec<(&'static str, usize)>, StorageError> {
        Table::ALL
            .iter()
            .map(|table| {
                let reader =
                    JsonlReader::<serde_json::Value>::new(self.config.table_path(*table));
                Ok((table.name(), reader.read_all()?.len()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn open(tmp: &TempDir) -> Store {
        Store::open(StorageConfig::new(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_open_creates_tables_dir() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        assert!(store.config().tables_dir().is_dir());
    }

    #[test]
    fn test_insert_get_list() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);

        let hero = Hero::new("Valhein".to_string(), vec![Role::AbyssalDragon]);
        store.insert(&hero).unwrap();

        let fetched: Hero = store.require(&hero.id).unwrap();
        assert_eq!(fetched.name, "Valhein");
        assert_eq!(store.list::<Hero>().unwrap().len(), 1);
        assert_eq!(store.count::<Hero>().unwrap(), 1);
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);

        let hero = Hero::new("Valhein".to_string(), vec![]);
        store.insert(&hero).unwrap();
        let err = store.insert(&hero).unwrap_err();
        assert!(matches!(err, StorageError::Duplicate { table: "heroes", .. }));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);

        let hero = Hero::new("Ghost".to_string(), vec![]);
        let err = store.update(hero).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert_eq!(store.count::<Hero>().unwrap(), 0);
    }

    #[test]
    fn test_update_replaces_row() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);

        let mut hero = Hero::new("Krixi".to_string(), vec![Role::Mid]);
        store.insert(&hero).unwrap();
        hero.roles.push(Role::Roam);
        store.update(hero.clone()).unwrap();

        let fetched: Hero = store.require(&hero.id).unwrap();
        assert_eq!(fetched.roles, vec![Role::Mid, Role::Roam]);
    }

    #[test]
    fn test_upsert_reports_replacement() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);

        let team = Team::new("Buriram United".to_string());
        assert!(!store.upsert(team.clone()).unwrap());
        assert!(store.upsert(team).unwrap());
        assert_eq!(store.count::<Team>().unwrap(), 1);
    }

    #[test]
    fn test_delete_and_delete_where() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);

        let a = Team::new("A".to_string());
        let b = Team::new("B".to_string());
        let c = Team::new("C".to_string());
        for t in [&a, &b, &c] {
            store.insert(t).unwrap();
        }

        assert!(store.delete::<Team>(&a.id).unwrap());
        assert!(!store.delete::<Team>(&a.id).unwrap());
        let removed = store.delete_where::<Team, _>(|t| t.name == "B").unwrap();
        assert_eq!(removed, 1);

        let remaining: Vec<Team> = store.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "C");
    }

    #[test]
    fn test_modify_error_leaves_table_untouched() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        store.insert(&Team::new("A".to_string())).unwrap();

        let result: Result<(), _> = store.modify(|rows: &mut Vec<Team>| {
            rows.clear();
            Err(StorageError::NotFound {
                table: "teams",
                id: "x".to_string(),
            })
        });
        assert!(result.is_err());
        assert_eq!(store.count::<Team>().unwrap(), 1);
    }

    #[test]
    fn test_table_counts_covers_all_tables() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        store.insert(&Team::new("A".to_string())).unwrap();

        let counts = store.table_counts().unwrap();
        assert_eq!(counts.len(), Table::ALL.len());
        assert!(counts.contains(&("teams", 1)));
        assert!(counts.contains(&("heroes", 0)));
    }
}
