use super::QueryOption;
use serde::{Deserialize, Serialize};

/// Cap the number of returned records, optionally skipping the first ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub count: usize,
    pub offset: usize,
}

impl Limit {
    pub fn new(count: usize) -> Self {
        Self { count, offset: 0 }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Apply to an already fetched sequence, for engines without native paging
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.count).collect()
    }
}

impl QueryOption for Limit {
    fn name(&self) -> &'static str {
        "limit"
    }
}
