//! Single point of access to the taxonomy, hiding the build behind a cache.

use crate::category::CategoryInfo;
use crate::loader::{RdfsTaxonomyLoader, TaxonomyLoadError};
use crate::tree::TaxonomyTree;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// A source of taxonomy trees for [`TaxonomyService`].
///
/// The default source is [`RdfsTaxonomyLoader`] over the bundled schema;
/// tests substitute counting or failing sources through
/// [`TaxonomyService::with_source`].
pub trait TaxonomySource: Send + Sync {
    /// Builds a fresh taxonomy tree.
    fn load(&self) -> Result<TaxonomyTree, TaxonomyLoadError>;
}

impl TaxonomySource for RdfsTaxonomyLoader {
    fn load(&self) -> Result<TaxonomyTree, TaxonomyLoadError> {
        self.load_base_taxonomy()
    }
}

/// Aggregate statistics over the loaded taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyStats {
    /// Recursive count over the whole tree, roots and all descendants.
    pub total_categories: usize,
    /// Number of top-level categories.
    pub root_categories: usize,
}

/// Cached access to the furniture taxonomy.
///
/// The tree is built at most once and shared by all callers until
/// [`reload_base_taxonomy`](Self::reload_base_taxonomy) discards it. All
/// methods are safe to call from caller-managed concurrent threads; the
/// build runs inside the cache lock, so loads are infrequent by design.
pub struct TaxonomyService {
    source: Box<dyn TaxonomySource>,
    cache: Mutex<Option<Arc<TaxonomyTree>>>,
}

impl TaxonomyService {
    /// Creates a service over the bundled base schema.
    pub fn new() -> Self {
        Self::with_source(RdfsTaxonomyLoader::new())
    }

    /// Creates a service over a custom taxonomy source.
    pub fn with_source(source: impl TaxonomySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: Mutex::new(None),
        }
    }

    /// Returns the cached taxonomy tree, building it on first access.
    ///
    /// The build executes at most once even under concurrent first access;
    /// every caller observes the same tree instance. A failed build is not
    /// cached, so the next call attempts again.
    pub fn load_base_taxonomy(&self) -> Result<Arc<TaxonomyTree>, TaxonomyLoadError> {
        let mut cache = self.lock_cache();
        if let Some(tree) = cache.as_ref() {
            return Ok(Arc::clone(tree));
        }
        info!("loading base taxonomy for the first time");
        let tree = Arc::new(self.source.load()?);
        *cache = Some(Arc::clone(&tree));
        Ok(tree)
    }

    /// Discards the cache and rebuilds, returning the new tree.
    ///
    /// Loads racing a reload observe either the pre-reload or the post-reload
    /// tree in full, never a partially built one. If the rebuild fails the
    /// cache stays empty.
    pub fn reload_base_taxonomy(&self) -> Result<Arc<TaxonomyTree>, TaxonomyLoadError> {
        let mut cache = self.lock_cache();
        info!("forcing reload of base taxonomy");
        cache.take();
        let tree = Arc::new(self.source.load()?);
        *cache = Some(Arc::clone(&tree));
        Ok(tree)
    }

    /// Finds a category by local class name, pre-order, first match.
    ///
    /// An unknown name is not an error: it yields `Ok(None)`.
    pub fn category_by_class_name(
        &self,
        class_name: &str,
    ) -> Result<Option<CategoryInfo>, TaxonomyLoadError> {
        let tree = self.load_base_taxonomy()?;
        Ok(tree.category(class_name).cloned())
    }

    /// Checks whether a class name exists in the base taxonomy.
    pub fn is_base_taxonomy_class(&self, class_name: &str) -> Result<bool, TaxonomyLoadError> {
        Ok(self.category_by_class_name(class_name)?.is_some())
    }

    /// Returns category counts over the cached tree.
    pub fn stats(&self) -> Result<TaxonomyStats, TaxonomyLoadError> {
        let tree = self.load_base_taxonomy()?;
        Ok(TaxonomyStats {
            total_categories: tree.len(),
            root_categories: tree.root_categories().len(),
        })
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<Arc<TaxonomyTree>>> {
        // The cache is never left half-written, so a panic while the lock was
        // held cannot make the value inconsistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TaxonomyService {
    fn default() -> Self {
        Self::new()
    }
}
