//! Rdftax reconstructs a hierarchical furniture product taxonomy from an
//! [RDF-S](https://www.w3.org/TR/rdf-schema/) schema written in
//! [Turtle](https://www.w3.org/TR/turtle/) syntax.
//!
//! The schema is a flat, unordered set of typed statements (classes, labels,
//! subclass relations, property definitions with domains and ranges). The
//! crate turns it into a deterministically ordered tree of [`CategoryInfo`]
//! nodes, each annotated with its applicable [`PropertyDefinition`]s and a
//! classified [`PropertyType`], and exposes lookup and statistics over that
//! tree through [`TaxonomyService`].
//!
//! Usage example:
//! ```
//! use rdftax::TaxonomyService;
//!
//! let service = TaxonomyService::new();
//!
//! let furniture = service
//!     .category_by_class_name("Furniture")?
//!     .ok_or("Furniture missing from the base schema")?;
//! assert!(furniture.is_root());
//!
//! let stats = service.stats()?;
//! assert!(stats.total_categories >= stats.root_categories);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod category;
mod loader;
mod property;
mod service;
mod tree;

pub use crate::category::CategoryInfo;
pub use crate::loader::{RdfsTaxonomyLoader, TaxonomyLoadError, FURNITURE_NAMESPACE};
pub use crate::property::{PropertyDefinition, PropertyType};
pub use crate::service::{TaxonomyService, TaxonomySource, TaxonomyStats};
pub use crate::tree::TaxonomyTree;
