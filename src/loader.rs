//! Reconstruction of the taxonomy tree from an RDF-S schema.
//!
//! The schema is consumed as an [`oxrdf::Graph`] of already-resolved
//! statements, parsed from Turtle by [`oxttl::TurtleParser`]. Building the
//! tree is a three-step pipeline: extract one flat [`CategoryInfo`] per
//! `rdfs:Class` under the taxonomy namespace, associate properties by
//! `rdfs:domain`, then assemble the parent/child hierarchy.

use crate::category::CategoryInfo;
use crate::property::PropertyDefinition;
use crate::tree::TaxonomyTree;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNodeRef, SubjectRef, TermRef};
use oxttl::{TurtleParseError, TurtleParser, TurtleSyntaxError};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// URI namespace shared by every class and property of the base taxonomy.
///
/// Statements whose subject lies outside this prefix are ignored entirely,
/// even if otherwise well-formed.
pub const FURNITURE_NAMESPACE: &str = "http://taxonomy.sirktek.no/furniture#";

const BASE_SCHEMA: &str = include_str!("../taxonomy/furniture-base.ttl");
const BASE_SCHEMA_NAME: &str = "taxonomy/furniture-base.ttl";

/// An error raised when a taxonomy schema cannot be loaded.
///
/// Fatal to the load attempt and never retried internally; the caller
/// decides. A failed load is not cached, so a later attempt starts fresh.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyLoadError {
    /// The schema resource could not be read.
    #[error("failed to read taxonomy schema {resource}")]
    Io {
        resource: String,
        #[source]
        source: io::Error,
    },
    /// The schema resource is not valid Turtle.
    #[error("invalid Turtle in taxonomy schema {resource}")]
    Syntax {
        resource: String,
        #[source]
        source: TurtleSyntaxError,
    },
    /// The `rdfs:subClassOf` statements form a cycle.
    #[error("cyclic subClassOf hierarchy through class {class_name}")]
    HierarchyCycle { class_name: String },
}

/// Loads the furniture taxonomy from RDF-S Turtle schemas.
#[derive(Debug, Default, Clone, Copy)]
pub struct RdfsTaxonomyLoader;

impl RdfsTaxonomyLoader {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Loads the taxonomy from the bundled base schema.
    pub fn load_base_taxonomy(&self) -> Result<TaxonomyTree, TaxonomyLoadError> {
        self.load_from_reader(BASE_SCHEMA.as_bytes(), BASE_SCHEMA_NAME)
    }

    /// Loads the taxonomy from an alternate schema document on disk.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<TaxonomyTree, TaxonomyLoadError> {
        let path = path.as_ref();
        let resource = path.display().to_string();
        let file = File::open(path).map_err(|source| TaxonomyLoadError::Io {
            resource: resource.clone(),
            source,
        })?;
        self.load_from_reader(file, &resource)
    }

    /// Parses `reader` as Turtle and builds the taxonomy tree.
    ///
    /// `resource` identifies the schema source in errors and logs.
    pub fn load_from_reader(
        &self,
        reader: impl Read,
        resource: &str,
    ) -> Result<TaxonomyTree, TaxonomyLoadError> {
        debug!("loading taxonomy from {resource}");
        let mut graph = Graph::new();
        for triple in TurtleParser::new().for_reader(reader) {
            let triple = triple.map_err(|e| match e {
                TurtleParseError::Io(source) => TaxonomyLoadError::Io {
                    resource: resource.to_owned(),
                    source,
                },
                TurtleParseError::Syntax(source) => TaxonomyLoadError::Syntax {
                    resource: resource.to_owned(),
                    source,
                },
            })?;
            graph.insert(&triple);
        }
        build_taxonomy_tree(&graph)
    }
}

/// Builds the tree from the parsed statement graph.
fn build_taxonomy_tree(graph: &Graph) -> Result<TaxonomyTree, TaxonomyLoadError> {
    // First pass: one flat category per in-namespace rdfs:Class.
    let mut categories = BTreeMap::new();
    for subject in graph.subjects_for_predicate_object(rdf::TYPE, rdfs::CLASS) {
        let SubjectRef::NamedNode(class) = subject else {
            continue;
        };
        if !class.as_str().starts_with(FURNITURE_NAMESPACE) {
            continue;
        }
        let category = extract_category(graph, class);
        if let Some(previous) = categories.insert(category.class_name.clone(), category) {
            warn!(
                "duplicate local class name {}, keeping the later definition",
                previous.class_name
            );
        }
    }

    // Parent local name -> child local names, from the retained categories
    // only, so a duplicate class cannot attach the same child twice.
    let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for category in categories.values() {
        if let Some(parent) = category.parent_class_name.as_deref() {
            children_of
                .entry(parent)
                .or_default()
                .push(&category.class_name);
        }
    }

    // Second pass: resolve children recursively for every category. Only the
    // root resolutions are kept; resolving the rest as well means a cycle is
    // detected even when no root reaches it.
    let mut roots = Vec::new();
    for category in categories.values() {
        let resolved = resolve_children(category, &categories, &children_of, &mut Vec::new())?;
        let is_root_branch = match category.parent_class_name.as_deref() {
            None => true,
            Some(parent) => {
                if categories.contains_key(parent) {
                    false
                } else {
                    warn!(
                        "class {} references unknown parent {parent}, attaching it as a root branch",
                        category.class_name
                    );
                    true
                }
            }
        };
        if is_root_branch {
            roots.push(resolved);
        }
    }
    sort_categories(&mut roots);

    info!(
        "loaded taxonomy with {} total categories, {} root categories",
        categories.len(),
        roots.len()
    );
    Ok(TaxonomyTree::new(roots))
}

/// Rebuilds `category` with its recursively resolved children attached.
///
/// `path` holds the local names on the current recursion branch and guards
/// against cyclic `subClassOf` statements.
fn resolve_children<'a>(
    category: &'a CategoryInfo,
    categories: &'a BTreeMap<String, CategoryInfo>,
    children_of: &HashMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
) -> Result<CategoryInfo, TaxonomyLoadError> {
    if path.contains(&category.class_name.as_str()) {
        return Err(TaxonomyLoadError::HierarchyCycle {
            class_name: category.class_name.clone(),
        });
    }
    path.push(&category.class_name);
    let mut children = Vec::new();
    if let Some(child_names) = children_of.get(category.class_name.as_str()) {
        for child_name in child_names {
            if let Some(child) = categories.get(*child_name) {
                children.push(resolve_children(child, categories, children_of, path)?);
            }
        }
    }
    path.pop();
    sort_categories(&mut children);

    Ok(CategoryInfo {
        class_name: category.class_name.clone(),
        english_name: category.english_name.clone(),
        norwegian_name: category.norwegian_name.clone(),
        description: category.description.clone(),
        parent_class_name: category.parent_class_name.clone(),
        uri: category.uri.clone(),
        properties: category.properties.clone(),
        children,
    })
}

/// Sorts siblings by English name, ties broken by class name so the order is
/// reproducible whatever the statement iteration order was.
fn sort_categories(categories: &mut [CategoryInfo]) {
    categories.sort_by(|a, b| {
        a.english_name
            .cmp(&b.english_name)
            .then_with(|| a.class_name.cmp(&b.class_name))
    });
}

/// Materializes one flat category (children still empty) from a class resource.
fn extract_category(graph: &Graph, class: NamedNodeRef<'_>) -> CategoryInfo {
    let uri = class.as_str();
    let class_name = local_name(uri).to_owned();
    let english_name = label(graph, class, "en").unwrap_or_else(|| class_name.clone());
    let norwegian_name = label(graph, class, "no");

    let description = graph
        .objects_for_subject_predicate(class, rdfs::COMMENT)
        .find_map(|term| match term {
            TermRef::Literal(literal) => Some(literal.value().to_owned()),
            _ => None,
        });

    // First subClassOf target under the taxonomy namespace wins; others are
    // ignored, no multiple inheritance.
    let parent_class_name = graph
        .objects_for_subject_predicate(class, rdfs::SUB_CLASS_OF)
        .find_map(|term| match term {
            TermRef::NamedNode(parent) if parent.as_str().starts_with(FURNITURE_NAMESPACE) => {
                Some(local_name(parent.as_str()).to_owned())
            }
            _ => None,
        });

    let properties = extract_properties(graph, class);

    CategoryInfo {
        class_name,
        english_name,
        norwegian_name,
        description,
        parent_class_name,
        uri: uri.to_owned(),
        properties,
        children: Vec::new(),
    }
}

/// Collects the in-namespace properties whose `rdfs:domain` is `class`.
fn extract_properties(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<PropertyDefinition> {
    let class_term = TermRef::from(class);
    let mut properties = Vec::new();
    for subject in graph.subjects_for_predicate_object(rdf::TYPE, rdf::PROPERTY) {
        let SubjectRef::NamedNode(property) = subject else {
            continue;
        };
        if !property.as_str().starts_with(FURNITURE_NAMESPACE) {
            continue;
        }
        if graph
            .objects_for_subject_predicate(property, rdfs::DOMAIN)
            .any(|term| term == class_term)
        {
            properties.push(extract_property(graph, property));
        }
    }
    // Name order keeps rebuilds reproducible; the schema implies no order.
    properties.sort_by(|a, b| a.name.cmp(&b.name));
    properties
}

fn extract_property(graph: &Graph, property: NamedNodeRef<'_>) -> PropertyDefinition {
    let uri = property.as_str().to_owned();
    let name = local_name(&uri).to_owned();
    let english_label = label(graph, property, "en");
    let norwegian_label = label(graph, property, "no");

    let range_type = graph
        .object_for_subject_predicate(property, rdfs::RANGE)
        .and_then(|term| match term {
            TermRef::NamedNode(range) => Some(range.as_str().to_owned()),
            _ => None,
        });
    let domain_class = graph
        .object_for_subject_predicate(property, rdfs::DOMAIN)
        .and_then(|term| match term {
            TermRef::NamedNode(domain) => Some(local_name(domain.as_str()).to_owned()),
            _ => None,
        });

    PropertyDefinition {
        name,
        english_label,
        norwegian_label,
        uri,
        range_type,
        domain_class,
        description: None, // reserved for rdfs:comment extraction
    }
}

/// Returns the first language-tagged `rdfs:label` matching `language`.
fn label(graph: &Graph, subject: NamedNodeRef<'_>, language: &str) -> Option<String> {
    graph
        .objects_for_subject_predicate(subject, rdfs::LABEL)
        .find_map(|term| match term {
            TermRef::Literal(literal) if literal.language() == Some(language) => {
                Some(literal.value().to_owned())
            }
            _ => None,
        })
}

/// Extracts the local name, the last fragment or path segment of a URI.
fn local_name(uri: &str) -> &str {
    if let Some(i) = uri.rfind('#') {
        &uri[i + 1..]
    } else if let Some(i) = uri.rfind('/') {
        &uri[i + 1..]
    } else {
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyType;

    fn load(turtle: &str) -> Result<TaxonomyTree, TaxonomyLoadError> {
        RdfsTaxonomyLoader::new().load_from_reader(turtle.as_bytes(), "test.ttl")
    }

    const PREFIXES: &str = "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix fur: <http://taxonomy.sirktek.no/furniture#> .
";

    #[test]
    fn children_are_sorted_by_english_name() {
        let tree = load(&format!(
            "{PREFIXES}
fur:Furniture a rdfs:Class ; rdfs:label \"Furniture\"@en .
fur:ZSofa a rdfs:Class ; rdfs:subClassOf fur:Furniture ; rdfs:label \"Sofa\"@en .
fur:AArmchair a rdfs:Class ; rdfs:subClassOf fur:Furniture ; rdfs:label \"Armchair\"@en .
fur:MDesk a rdfs:Class ; rdfs:subClassOf fur:Furniture ; rdfs:label \"Desk\"@en .
"
        ))
        .unwrap();
        let furniture = tree.category("Furniture").unwrap();
        let names: Vec<_> = furniture.children().iter().map(CategoryInfo::english_name).collect();
        assert_eq!(names, ["Armchair", "Desk", "Sofa"]);
    }

    #[test]
    fn english_name_falls_back_to_class_name() {
        let tree = load(&format!(
            "{PREFIXES}
fur:Bokhylle a rdfs:Class ; rdfs:label \"Bokhylle\"@no .
"
        ))
        .unwrap();
        let category = tree.category("Bokhylle").unwrap();
        assert_eq!(category.english_name(), "Bokhylle");
        assert_eq!(category.norwegian_name(), Some("Bokhylle"));
    }

    #[test]
    fn comment_becomes_description() {
        let tree = load(&format!(
            "{PREFIXES}
fur:Furniture a rdfs:Class ; rdfs:comment \"Base class.\" .
"
        ))
        .unwrap();
        assert_eq!(
            tree.category("Furniture").unwrap().description(),
            Some("Base class.")
        );
    }

    #[test]
    fn only_in_namespace_parents_count() {
        let tree = load(&format!(
            "{PREFIXES}
fur:Desk a rdfs:Class ;
    rdfs:subClassOf <http://example.com/ns#Thing>, fur:Furniture ;
    rdfs:label \"Desk\"@en .
fur:Furniture a rdfs:Class ; rdfs:label \"Furniture\"@en .
"
        ))
        .unwrap();
        let desk = tree.category("Desk").unwrap();
        assert_eq!(desk.parent_class_name(), Some("Furniture"));
        assert!(!desk.is_root());
        assert_eq!(tree.root_categories().len(), 1);
    }

    #[test]
    fn classes_outside_the_namespace_are_ignored() {
        let tree = load(&format!(
            "{PREFIXES}
fur:Furniture a rdfs:Class ; rdfs:label \"Furniture\"@en .
<http://example.com/ns#Other> a rdfs:Class ; rdfs:label \"Other\"@en .
"
        ))
        .unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.category("Other").is_none());
    }

    #[test]
    fn properties_are_attached_by_domain() {
        let tree = load(&format!(
            "{PREFIXES}
fur:Furniture a rdfs:Class ; rdfs:label \"Furniture\"@en .
fur:Table a rdfs:Class ; rdfs:subClassOf fur:Furniture ; rdfs:label \"Table\"@en .
fur:weight a rdf:Property ;
    rdfs:domain fur:Furniture ;
    rdfs:range xsd:decimal ;
    rdfs:label \"Weight (kg)\"@en, \"Vekt (kg)\"@no .
fur:legCount a rdf:Property ;
    rdfs:domain fur:Table ;
    rdfs:range xsd:integer .
"
        ))
        .unwrap();

        let furniture = tree.category("Furniture").unwrap();
        assert_eq!(furniture.properties().len(), 1);
        let weight = &furniture.properties()[0];
        assert_eq!(weight.name(), "weight");
        assert_eq!(weight.english_label(), Some("Weight (kg)"));
        assert_eq!(weight.norwegian_label(), Some("Vekt (kg)"));
        assert_eq!(weight.domain_class(), Some("Furniture"));
        assert_eq!(
            weight.range_type(),
            Some("http://www.w3.org/2001/XMLSchema#decimal")
        );
        assert_eq!(weight.property_type(), PropertyType::DecimalKg);
        assert!(weight.description().is_none());

        let table = tree.category("Table").unwrap();
        assert_eq!(table.properties().len(), 1);
        assert_eq!(table.properties()[0].property_type(), PropertyType::Integer);
    }

    #[test]
    fn dangling_parent_becomes_a_root_branch() {
        let tree = load(&format!(
            "{PREFIXES}
fur:Furniture a rdfs:Class ; rdfs:label \"Furniture\"@en .
fur:Orphan a rdfs:Class ; rdfs:subClassOf fur:Missing ; rdfs:label \"Orphan\"@en .
"
        ))
        .unwrap();
        assert_eq!(tree.root_categories().len(), 2);
        let orphan = tree.category("Orphan").unwrap();
        assert_eq!(orphan.parent_class_name(), Some("Missing"));
        assert!(!orphan.is_root());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn cyclic_hierarchy_fails_the_load() {
        let result = load(&format!(
            "{PREFIXES}
fur:A a rdfs:Class ; rdfs:subClassOf fur:B .
fur:B a rdfs:Class ; rdfs:subClassOf fur:A .
"
        ));
        assert!(matches!(
            result,
            Err(TaxonomyLoadError::HierarchyCycle { .. })
        ));
    }

    #[test]
    fn self_parent_fails_the_load() {
        let result = load(&format!(
            "{PREFIXES}
fur:A a rdfs:Class ; rdfs:subClassOf fur:A .
"
        ));
        assert!(matches!(
            result,
            Err(TaxonomyLoadError::HierarchyCycle { class_name }) if class_name == "A"
        ));
    }

    #[test]
    fn invalid_turtle_is_a_syntax_error() {
        let result = load("this is not turtle at all");
        let Err(err) = result else {
            panic!("expected a load error");
        };
        assert!(matches!(err, TaxonomyLoadError::Syntax { .. }));
        assert!(err.to_string().contains("test.ttl"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = RdfsTaxonomyLoader::new().load_from_path("does/not/exist.ttl");
        assert!(matches!(result, Err(TaxonomyLoadError::Io { .. })));
    }

    #[test]
    fn same_graph_yields_the_same_tree() {
        let turtle = format!(
            "{PREFIXES}
fur:Furniture a rdfs:Class ; rdfs:label \"Furniture\"@en .
fur:Sofa a rdfs:Class ; rdfs:subClassOf fur:Furniture ; rdfs:label \"Sofa\"@en .
fur:Desk a rdfs:Class ; rdfs:subClassOf fur:Furniture ; rdfs:label \"Desk\"@en .
fur:weight a rdf:Property ; rdfs:domain fur:Furniture ; rdfs:range xsd:decimal .
"
        );
        assert_eq!(load(&turtle).unwrap(), load(&turtle).unwrap());
    }

    #[test]
    fn local_name_splits_on_fragment_then_path() {
        assert_eq!(local_name("http://example.com/ns#Chair"), "Chair");
        assert_eq!(local_name("http://example.com/ns/Chair"), "Chair");
        assert_eq!(local_name("Chair"), "Chair");
    }
}
