use oxrdf::vocab::xsd;

/// One schema property attached to a taxonomy category.
///
/// Built by the loader from an `rdf:Property` resource; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub(crate) name: String,
    pub(crate) english_label: Option<String>,
    pub(crate) norwegian_label: Option<String>,
    pub(crate) uri: String,
    pub(crate) range_type: Option<String>,
    pub(crate) domain_class: Option<String>,
    pub(crate) description: Option<String>,
}

impl PropertyDefinition {
    /// The property's local name (last path or fragment segment of its URI).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The English label, if the schema declares one.
    #[inline]
    pub fn english_label(&self) -> Option<&str> {
        self.english_label.as_deref()
    }

    /// The Norwegian label, if the schema declares one.
    #[inline]
    pub fn norwegian_label(&self) -> Option<&str> {
        self.norwegian_label.as_deref()
    }

    /// The full property URI, the canonical key into the source schema.
    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The declared `rdfs:range` URI, if any.
    #[inline]
    pub fn range_type(&self) -> Option<&str> {
        self.range_type.as_deref()
    }

    /// Local name of the class this property is declared for.
    #[inline]
    pub fn domain_class(&self) -> Option<&str> {
        self.domain_class.as_deref()
    }

    /// Free-text description. Reserved for comment extraction, currently
    /// never populated by the loader.
    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The classified value type of this property.
    #[inline]
    pub fn property_type(&self) -> PropertyType {
        PropertyType::classify(self.range_type.as_deref(), &self.name)
    }
}

/// Closed classification of property value types.
///
/// Some variants are never produced by [`PropertyType::classify`]; they are
/// kept so the full set of types consumers rely on stays in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    String,
    Decimal,
    Integer,
    Date,
    Boolean,
    IntegerScale1To5,
    DecimalCm,
    Unit,
    DecimalKg,
    DecimalM2,
    DecimalM3,
    Category,
    Url,
    MultiCategory,
    EmailForm,
    ResourceType,
    Emission,
}

impl PropertyType {
    /// Classifies a property from its declared range URI and local name.
    ///
    /// Total and deterministic. The schema carries no explicit type field, so
    /// classification piggybacks on naming conventions: a decimal property
    /// whose name contains `weight` is a weight in kilograms, and so on.
    /// Rules are evaluated in order, first match wins.
    pub fn classify(range_type: Option<&str>, name: &str) -> Self {
        let Some(range_type) = range_type else {
            return Self::String;
        };
        if range_type == xsd::STRING.as_str() {
            return match name {
                "unit" => Self::Unit,
                "resourceType" => Self::ResourceType,
                _ => Self::String,
            };
        }
        if range_type == xsd::DECIMAL.as_str() {
            return if name.contains("weight") {
                Self::DecimalKg
            } else if name.contains("volume") {
                Self::DecimalM3
            } else if name.contains("length") || name.contains("width") || name.contains("height") {
                Self::DecimalCm
            } else if name.contains("emission") {
                Self::Emission
            } else {
                Self::Decimal
            };
        }
        if range_type == xsd::DATE.as_str() {
            return Self::Date;
        }
        if range_type == xsd::BOOLEAN.as_str() {
            return Self::Boolean;
        }
        if range_type == xsd::ANY_URI.as_str() {
            return Self::Url;
        }
        if range_type == xsd::INTEGER.as_str() {
            return Self::Integer;
        }
        // Custom or object-valued range
        if range_type.contains("Manufacturer") || range_type.contains("Furniture") {
            Self::Category
        } else if name.contains("emission") {
            Self::Emission
        } else if name == "unit" {
            Self::Unit
        } else if name == "resourceType" {
            Self::ResourceType
        } else {
            Self::String
        }
    }
}
