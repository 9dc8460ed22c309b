//! Query modifiers
//!
//! Options form an open set: any type implementing [`QueryOption`] can be
//! passed to a search, and each engine downcasts to the modifiers it knows
//! and ignores the rest. [`Sort`] and [`Limit`] are the built-in ones.

mod limit;
mod sort;

pub use limit::Limit;
pub use sort::{PropertyPath, Sort};

use downcast_rs::{impl_downcast, Downcast};
use std::fmt::Debug;

/// A named query modifier an engine may interpret
pub trait QueryOption: Debug + Send + Sync + Downcast {
    /// Short name used in logs and engine diagnostics
    fn name(&self) -> &'static str;
}

impl_downcast!(QueryOption);

/// Ordered list of query modifiers
#[derive(Debug, Default)]
pub struct Options {
    items: Vec<Box<dyn QueryOption>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, option: impl QueryOption + 'static) -> Self {
        self.push(option);
        self
    }

    pub fn push(&mut self, option: impl QueryOption + 'static) {
        self.items.push(Box::new(option));
    }

    /// First option of type `O`
    pub fn get<O: QueryOption>(&self) -> Option<&O> {
        self.items.iter().find_map(|option| option.as_ref().downcast_ref::<O>())
    }

    pub fn has<O: QueryOption>(&self) -> bool {
        self.get::<O>().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn QueryOption> {
        self.items.iter().map(|option| option.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|option| option.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
