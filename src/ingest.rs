//! Bulk hero import for seeding a fresh data directory.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{Hero, Role};
use crate::storage::{StorageError, Store};

/// One entry of a hero seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct HeroSeed {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub image_url: Option<String>,
}

/// Result of an import run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read seed file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Read a JSON array of [`HeroSeed`] from `path` and import it.
pub fn import_heroes_file(store: &Store, path: &Path) -> Result<ImportResult, ImportError> {
    info!("Importing heroes from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let seeds: Vec<HeroSeed> = serde_json::from_str(&contents)?;
    Ok(import_heroes(store, seeds)?)
}

/// Add heroes whose name (case-insensitive) is not stored yet.
pub fn import_heroes(store: &Store, seeds: Vec<HeroSeed>) -> Result<ImportResult, StorageError> {
    store.modify(|heroes: &mut Vec<Hero>| {
        let mut known: HashSet<String> = heroes.iter().map(|h| h.name.to_lowercase()).collect();
        let mut result = ImportResult::default();

        for seed in seeds {
            let name = seed.name.trim();
            if name.is_empty() {
                warn!("Skipping hero seed with empty name");
                result.skipped += 1;
                continue;
            }
            if !known.insert(name.to_lowercase()) {
                result.skipped += 1;
                continue;
            }

            let mut roles = seed.roles;
            roles.sort();
            roles.dedup();
            let mut hero = Hero::new(name.to_string(), roles);
            hero.image_url = seed.image_url;
            heroes.push(hero);
            result.imported += 1;
        }

        info!(
            "Imported {} hero(es), skipped {}",
            result.imported, result.skipped
        );
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageConfig;
    use tempfile::TempDir;

    fn seed(name: &str, roles: &[Role]) -> HeroSeed {
        HeroSeed {
            name: name.to_string(),
            roles: roles.to_vec(),
            image_url: None,
        }
    }

    #[test]
    fn test_import_skips_existing_names() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(StorageConfig::new(tmp.path().to_path_buf())).unwrap();
        store
            .insert(&Hero::new("Tulen".to_string(), vec![Role::Mid]))
            .unwrap();

        let result = import_heroes(
            &store,
            vec![
                seed("tulen", &[Role::Mid]),
                seed("Raz", &[Role::Mid, Role::Jungle]),
                seed("Raz", &[]),
                seed(" ", &[]),
            ],
        )
        .unwrap();

        assert_eq!(
            result,
            ImportResult {
                imported: 1,
                skipped: 3
            }
        );
        assert_eq!(store.count::<Hero>().unwrap(), 2);
    }

    #[test]
    fn test_import_from_file() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(StorageConfig::new(tmp.path().join("data"))).unwrap();
        let path = tmp.path().join("heroes.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "Elsu", "roles": ["abyssal_dragon"]},
                {"name": "Grakk", "roles": ["roam"]}
            ]"#,
        )
        .unwrap();

        let result = import_heroes_file(&store, &path).unwrap();
        assert_eq!(result.imported, 2);

        let roam: Vec<Hero> = store.list_where(|h: &Hero| h.plays(Role::Roam)).unwrap();
        assert_eq!(roam[0].name, "Grakk");
    }

    #[test]
    fn test_import_rejects_bad_json() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(StorageConfig::new(tmp.path().to_path_buf())).unwrap();
        let path = tmp.path().join("heroes.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            import_heroes_file(&store, &path),
            Err(ImportError::Parse(_))
        ));
    }
}
