use crate::property::PropertyDefinition;

/// One node of the taxonomy tree.
///
/// Constructed once per load and read-only afterwards; a reload produces an
/// entirely new object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub(crate) class_name: String,
    pub(crate) english_name: String,
    pub(crate) norwegian_name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) parent_class_name: Option<String>,
    pub(crate) uri: String,
    pub(crate) properties: Vec<PropertyDefinition>,
    pub(crate) children: Vec<CategoryInfo>,
}

impl CategoryInfo {
    /// The local class name, the stable identity key within the tree.
    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The English display name. Falls back to [`class_name`](Self::class_name)
    /// when the schema declares no English label.
    #[inline]
    pub fn english_name(&self) -> &str {
        &self.english_name
    }

    /// The Norwegian display name, if the schema declares one.
    #[inline]
    pub fn norwegian_name(&self) -> Option<&str> {
        self.norwegian_name.as_deref()
    }

    /// Free text taken from the class's `rdfs:comment`, if any.
    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Local name of the single parent class, or `None` for a root.
    ///
    /// May name a class that does not exist in the tree (a dangling parent);
    /// such categories are attached as extra root branches but keep the
    /// declared name here.
    #[inline]
    pub fn parent_class_name(&self) -> Option<&str> {
        self.parent_class_name.as_deref()
    }

    /// The full class URI, the canonical key into the source schema.
    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The properties whose `rdfs:domain` is this class.
    #[inline]
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    /// The child categories, sorted by English name.
    #[inline]
    pub fn children(&self) -> &[CategoryInfo] {
        &self.children
    }

    /// Whether this category declares no parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_class_name.is_none()
    }
}
