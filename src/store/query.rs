//! Query parameters for collection lookups.

use serde::{Deserialize, Serialize};

use crate::store::data::{Flow, Specialty};

/// Predicate applied to stored records of type `T`.
pub trait Filter<T: ?Sized> {
    fn matches(
        &self,
        item: &T,
    ) -> bool;
}

/// Paged query over a collection.
///
/// `page_num` is 1-based; a `page_size` of 0 returns every matching record in
/// a single page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Query<F> {
    pub filter: F,
    pub page_num: usize,
    pub page_size: usize,
}

impl<F: Default> Query<F> {
    pub fn new() -> Self {
        Self {
            filter: F::default(),
            page_num: 1,
            page_size: 0,
        }
    }
}

impl<F> Query<F> {
    pub fn with_filter(
        mut self,
        filter: F,
    ) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_page(
        mut self,
        page_num: usize,
        page_size: usize,
    ) -> Self {
        self.page_num = page_num;
        self.page_size = page_size;
        self
    }

    /// Zero-based offset of the first record of the requested page.
    pub fn offset(&self) -> usize {
        self.page_num.max(1).saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Filter over stored flows. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FlowFilter {
    pub specialty_id: Option<String>,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    /// case-insensitive substring of name or description
    pub search: Option<String>,
    pub active_only: bool,
}

impl FlowFilter {
    pub fn specialty(
        mut self,
        specialty_id: &str,
    ) -> Self {
        self.specialty_id = Some(specialty_id.to_string());
        self
    }

    pub fn duration_between(
        mut self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    pub fn cost_between(
        mut self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        self.min_cost = min;
        self.max_cost = max;
        self
    }

    pub fn search(
        mut self,
        text: &str,
    ) -> Self {
        self.search = Some(text.to_string());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }
}

fn contains_ignore_case(
    haystack: &str,
    needle: &str,
) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn in_range(
    value: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> bool {
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}

impl Filter<Flow> for FlowFilter {
    fn matches(
        &self,
        item: &Flow,
    ) -> bool {
        if self.active_only && !item.is_active {
            return false;
        }
        if let Some(sid) = &self.specialty_id {
            if item.specialty_id.as_deref() != Some(sid.as_str()) {
                return false;
            }
        }
        if !in_range(item.average_duration, self.min_duration, self.max_duration) || !in_range(item.estimated_cost, self.min_cost, self.max_cost) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => contains_ignore_case(&item.name, text) || contains_ignore_case(&item.description, text),
            None => true,
        }
    }
}

/// Filter over stored specialties.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SpecialtyFilter {
    pub active_only: bool,
    /// case-insensitive substring of name or code
    pub search: Option<String>,
}

impl Filter<Specialty> for SpecialtyFilter {
    fn matches(
        &self,
        item: &Specialty,
    ) -> bool {
        if self.active_only && !item.is_active {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => contains_ignore_case(&item.name, text) || contains_ignore_case(&item.code, text),
            None => true,
        }
    }
}
