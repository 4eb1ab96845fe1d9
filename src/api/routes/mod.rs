//! Route handlers, one module per resource.

pub mod analytics;
pub mod combos;
pub mod debug;
pub mod drafts;
pub mod heroes;
pub mod matches;
pub mod matchups;
pub mod players;
pub mod teams;
pub mod tournaments;
pub mod versions;
pub mod win_conditions;

use crate::api::ApiError;
use crate::models::{EntityId, Hero, Team, Version};
use crate::storage::{Record, StorageError, Store};

/// Records whose name must be unique (case-insensitive) within their table.
pub(crate) trait Named: Record {
    fn name(&self) -> &str;
}

impl Named for Hero {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Version {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Team {
    fn name(&self) -> &str {
        &self.name
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Trimmed, non-empty text field.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

/// Insert `record` unless another row already uses its name.
pub(crate) fn insert_unique<T: Named>(store: &Store, record: T) -> Result<T, ApiError> {
    store.modify(|rows: &mut Vec<T>| {
        if rows.iter().any(|r| same_name(r.name(), record.name())) {
            return Err(StorageError::Duplicate {
                table: T::TABLE.name(),
                id: record.name().to_string(),
            });
        }
        rows.push(record.clone());
        Ok(())
    })?;
    Ok(record)
}

/// Replace an existing row, keeping names unique.
pub(crate) fn update_unique<T: Named>(store: &Store, record: T) -> Result<T, ApiError> {
    store.modify(|rows: &mut Vec<T>| {
        if rows
            .iter()
            .any(|r| r.id() != record.id() && same_name(r.name(), record.name()))
        {
            return Err(StorageError::Duplicate {
                table: T::TABLE.name(),
                id: record.name().to_string(),
            });
        }
        match rows.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound {
                table: T::TABLE.name(),
                id: record.id().to_string(),
            }),
        }
    })?;
    Ok(record)
}

/// A referenced record must exist; a dangling reference is the caller's
/// mistake, so it is a 400 rather than a 404.
pub(crate) fn ensure_ref<T: Record>(store: &Store, id: &EntityId) -> Result<(), ApiError> {
    if store.exists::<T>(id)? {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "unknown {} reference: {}",
            T::TABLE.name(),
            id
        )))
    }
}

pub(crate) fn ensure_opt_ref<T: Record>(
    store: &Store,
    id: Option<&EntityId>,
) -> Result<(), ApiError> {
    match id {
        Some(id) => ensure_ref::<T>(store, id),
        None => Ok(()),
    }
}

/// Delete by id, turning a missing row into a 404.
pub(crate) fn delete_existing<T: Record>(store: &Store, id: &EntityId) -> Result<(), ApiError> {
    if store.delete::<T>(id)? {
        tracing::info!("Deleted {} from {}", id, T::TABLE.name());
        Ok(())
    } else {
        Err(ApiError::NotFound(format!(
            "{} record not found: {}",
            T::TABLE.name(),
            id
        )))
    }
}

/// Parse an optional role query parameter (aliases such as "adl" allowed).
pub(crate) fn parse_role(value: Option<&str>) -> Result<Option<crate::models::Role>, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.parse().map_err(ApiError::BadRequest))
        .transpose()
}
