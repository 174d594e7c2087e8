//! Storage layer for flows and specialties.
//!
//! Collections are registered into a [`Store`] by a backend and looked up by
//! record type. The in-memory [`MemStore`] is the only backend.

pub mod data;
mod db;
pub mod query;
mod store;

use std::error::Error;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::{MedflowError, Result};

use query::*;

pub use db::MemStore;
pub use store::Store;

/// Maps backend errors to MedflowError.
fn map_db_err(err: impl Error) -> MedflowError {
    MedflowError::Store(err.to_string())
}

/// Identifiers for different storage collections.
#[derive(Debug, Clone, AsRefStr, PartialEq, Hash, Eq, EnumIter)]
pub enum StoreIden {
    /// Flow definitions.
    #[strum(serialize = "flows")]
    Flows,
    /// Medical specialties.
    #[strum(serialize = "specialties")]
    Specialties,
}

/// Paginated query result.
#[derive(Debug, Deserialize, Serialize)]
pub struct PageData<T> {
    /// Total number of matching records.
    pub count: usize,
    /// Current page number (1-based).
    pub page_num: usize,
    /// Total number of pages.
    pub page_count: usize,
    /// Number of records per page.
    pub page_size: usize,
    /// Records in the current page.
    pub rows: Vec<T>,
}

impl<T> PageData<T> {
    /// Converts the rows, keeping the paging information.
    pub fn try_map<U>(
        self,
        f: impl FnMut(T) -> Result<U>,
    ) -> Result<PageData<U>> {
        Ok(PageData {
            count: self.count,
            page_num: self.page_num,
            page_count: self.page_count,
            page_size: self.page_size,
            rows: self.rows.into_iter().map(f).collect::<Result<Vec<_>>>()?,
        })
    }
}

/// Trait for types that can identify their storage collection.
pub trait DbCollectionIden {
    /// Filter accepted by queries on this collection.
    type Filter: Filter<Self> + Default;

    /// Returns the collection identifier for this type.
    fn iden() -> StoreIden;
}

/// Trait for database collection operations.
pub trait DbCollection: Send + Sync {
    /// The type of items stored in this collection.
    type Item: DbCollectionIden;

    /// Checks if a record with the given ID exists.
    fn exists(
        &self,
        id: &str,
    ) -> Result<bool>;

    /// Finds a record by ID.
    fn find(
        &self,
        id: &str,
    ) -> Result<Self::Item>;

    /// Queries records with pagination and filtering.
    fn query(
        &self,
        query: &Query<<Self::Item as DbCollectionIden>::Filter>,
    ) -> Result<PageData<Self::Item>>;

    /// Creates a new record.
    fn create(
        &self,
        data: &Self::Item,
    ) -> Result<bool>;

    /// Updates an existing record.
    fn update(
        &self,
        data: &Self::Item,
    ) -> Result<bool>;

    /// Deletes a record by ID.
    fn delete(
        &self,
        id: &str,
    ) -> Result<bool>;
}

/// Trait for database store initialization.
pub trait DbStore {
    /// Registers the backend's collections with the store.
    fn init(
        &self,
        s: &Store,
    ) -> Result<()>;
}
