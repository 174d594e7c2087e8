use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::trace;

use crate::{
    MedflowError, Result, ShareLock,
    store::{
        DbCollection, DbCollectionIden, PageData, map_db_err,
        query::{Filter, Query},
    },
};

use super::DbDocument;

/// In-memory collection of records keyed by id.
///
/// Query results are ordered by [`DbDocument::sort_key`], then by id.
#[derive(Debug)]
pub struct Collect<T> {
    name: String,
    rows: ShareLock<HashMap<String, T>>,
}

impl<T> Collect<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> DbCollection for Collect<T>
where
    T: DbDocument + DbCollectionIden + Clone + Send + Sync,
{
    type Item = T;

    fn exists(
        &self,
        id: &str,
    ) -> Result<bool> {
        let rows = self.rows.read().map_err(map_db_err)?;
        Ok(rows.contains_key(id))
    }

    fn find(
        &self,
        id: &str,
    ) -> Result<Self::Item> {
        let rows = self.rows.read().map_err(map_db_err)?;
        rows.get(id).cloned().ok_or_else(|| MedflowError::not_found(T::iden().as_ref(), id))
    }

    fn query(
        &self,
        query: &Query<<Self::Item as DbCollectionIden>::Filter>,
    ) -> Result<PageData<Self::Item>> {
        let rows = self.rows.read().map_err(map_db_err)?;
        let mut items: Vec<&T> = rows.values().filter(|item| query.filter.matches(item)).collect();
        items.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.id().cmp(b.id())));

        let count = items.len();
        let page_size = if query.page_size == 0 { count } else { query.page_size };
        let page_count = if page_size == 0 { 0 } else { count.div_ceil(page_size) };
        let rows: Vec<T> = items.into_iter().skip(query.offset()).take(page_size).cloned().collect();
        trace!("{}::query: {} of {} rows", self.name, rows.len(), count);

        Ok(PageData {
            count,
            page_num: query.page_num.max(1),
            page_count,
            page_size,
            rows,
        })
    }

    fn create(
        &self,
        data: &Self::Item,
    ) -> Result<bool> {
        let mut rows = self.rows.write().map_err(map_db_err)?;
        if rows.contains_key(data.id()) {
            return Err(MedflowError::Store(format!("{} '{}' already exists", T::iden().as_ref(), data.id())));
        }
        rows.insert(data.id().to_string(), data.clone());
        Ok(true)
    }

    fn update(
        &self,
        data: &Self::Item,
    ) -> Result<bool> {
        let mut rows = self.rows.write().map_err(map_db_err)?;
        match rows.get_mut(data.id()) {
            Some(row) => {
                *row = data.clone();
                Ok(true)
            }
            None => Err(MedflowError::not_found(T::iden().as_ref(), data.id())),
        }
    }

    fn delete(
        &self,
        id: &str,
    ) -> Result<bool> {
        let mut rows = self.rows.write().map_err(map_db_err)?;
        match rows.remove(id) {
            Some(_) => Ok(true),
            None => Err(MedflowError::not_found(T::iden().as_ref(), id)),
        }
    }
}
