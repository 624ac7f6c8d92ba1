use crate::category::CategoryInfo;

/// The aggregate root of a loaded taxonomy.
///
/// Owns its entire subtree: no category is shared between two parents and the
/// builder guarantees the parent links form a tree, so every category appears
/// exactly once in a walk from [`root_categories`](Self::root_categories).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyTree {
    root_categories: Vec<CategoryInfo>,
}

impl TaxonomyTree {
    pub(crate) fn new(root_categories: Vec<CategoryInfo>) -> Self {
        Self { root_categories }
    }

    /// The top-level categories, sorted by English name.
    #[inline]
    pub fn root_categories(&self) -> &[CategoryInfo] {
        &self.root_categories
    }

    /// Finds a category by local class name.
    ///
    /// Pre-order search, first match wins. At most one match is expected
    /// because class names are unique within the tree.
    pub fn category(&self, class_name: &str) -> Option<&CategoryInfo> {
        self.iter().find(|c| c.class_name() == class_name)
    }

    /// Iterates over all categories of the tree in pre-order.
    pub fn iter(&self) -> Iter<'_> {
        let mut stack: Vec<&CategoryInfo> = self.root_categories.iter().collect();
        stack.reverse();
        Iter { stack }
    }

    /// The total number of categories, roots and all descendants.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Checks whether the tree holds no category at all.
    pub fn is_empty(&self) -> bool {
        self.root_categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a TaxonomyTree {
    type Item = &'a CategoryInfo;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// A pre-order iterator over the categories of a [`TaxonomyTree`].
pub struct Iter<'a> {
    stack: Vec<&'a CategoryInfo>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CategoryInfo;

    fn next(&mut self) -> Option<&'a CategoryInfo> {
        let category = self.stack.pop()?;
        self.stack.extend(category.children().iter().rev());
        Some(category)
    }
}
