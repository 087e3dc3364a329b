//! Registry of marker types and their declared refinements.
//!
//! A refinement is a marker type declared as a narrower form of another,
//! for example `AuditLogged` refining `Logged`. Rules bound to `Logged` also
//! accept `AuditLogged` markers. The catalog resolves this by walking the
//! declared parent chain, so it must stay acyclic: incremental declarations
//! only accept parents that already exist, and documents are checked for
//! cycles as a whole.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::marker::MarkerType;

/// One declaration in a [`CatalogDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerDecl {
    /// The declared marker type.
    pub name: MarkerType,
    /// The broader marker type this one refines, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refines: Option<MarkerType>,
}

/// Serialisable form of a [`MarkerCatalog`].
///
/// Declarations may appear in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    /// Marker declarations.
    #[serde(default)]
    pub markers: Vec<MarkerDecl>,
}

/// Marker types known to the host, with their refinement links.
///
/// # Example
///
/// ```
/// use graft_core::{MarkerCatalog, MarkerType};
///
/// let mut catalog = MarkerCatalog::new();
/// catalog.declare("Logged")?;
/// catalog.declare_refinement("AuditLogged", "Logged")?;
///
/// let audit = MarkerType::new("AuditLogged");
/// let logged = MarkerType::new("Logged");
/// assert!(catalog.is_refinement_of(&audit, &logged));
/// assert!(!catalog.is_refinement_of(&logged, &audit));
/// # Ok::<(), graft_core::CatalogError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkerCatalog {
    parents: HashMap<MarkerType, Option<MarkerType>>,
}

impl MarkerCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a root marker type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BlankName`] for a blank name and
    /// [`CatalogError::Duplicate`] if the type is already declared.
    pub fn declare(&mut self, marker: impl Into<MarkerType>) -> Result<(), CatalogError> {
        let declared = Self::checked_new(&self.parents, marker.into())?;
        self.parents.insert(declared, None);
        Ok(())
    }

    /// Declares `marker` as a refinement of the already declared `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BlankName`], [`CatalogError::Duplicate`] or
    /// [`CatalogError::UnknownParent`].
    pub fn declare_refinement(
        &mut self,
        marker: impl Into<MarkerType>,
        parent: impl Into<MarkerType>,
    ) -> Result<(), CatalogError> {
        let declared = Self::checked_new(&self.parents, marker.into())?;
        let parent_type = parent.into();
        if !self.parents.contains_key(&parent_type) {
            return Err(CatalogError::unknown_parent(declared, parent_type));
        }
        self.parents.insert(declared, Some(parent_type));
        Ok(())
    }

    fn checked_new(
        parents: &HashMap<MarkerType, Option<MarkerType>>,
        marker: MarkerType,
    ) -> Result<MarkerType, CatalogError> {
        if marker.is_blank() {
            return Err(CatalogError::BlankName);
        }
        if parents.contains_key(&marker) {
            return Err(CatalogError::duplicate(marker));
        }
        Ok(marker)
    }

    /// Builds a catalog from a document, accepting declarations in any order.
    ///
    /// # Errors
    ///
    /// Returns an error for blank or duplicate names, parents that are not
    /// declared anywhere in the document, or refinement cycles.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut parents = HashMap::with_capacity(document.markers.len());
        for decl in &document.markers {
            let declared = Self::checked_new(&parents, decl.name.clone())?;
            parents.insert(declared, None);
        }

        for decl in document.markers {
            let Some(parent) = decl.refines else {
                continue;
            };
            if !parents.contains_key(&parent) {
                return Err(CatalogError::unknown_parent(decl.name, parent));
            }
            parents.insert(decl.name, Some(parent));
        }

        let catalog = Self { parents };
        catalog.ensure_acyclic()?;
        Ok(catalog)
    }

    /// Parses a JSON catalog document.
    ///
    /// ```json
    /// { "markers": [ { "name": "Logged" }, { "name": "AuditLogged", "refines": "Logged" } ] }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, or any error
    /// reported by [`MarkerCatalog::from_document`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Self::from_document(document)
    }

    /// Produces a document describing this catalog, sorted by name.
    #[must_use]
    pub fn to_document(&self) -> CatalogDocument {
        let mut markers: Vec<MarkerDecl> = self
            .parents
            .iter()
            .map(|(name, refines)| MarkerDecl {
                name: name.clone(),
                refines: refines.clone(),
            })
            .collect();
        markers.sort_by(|a, b| a.name.cmp(&b.name));
        CatalogDocument { markers }
    }

    fn ensure_acyclic(&self) -> Result<(), CatalogError> {
        let mut verified: HashSet<&MarkerType> = HashSet::with_capacity(self.parents.len());
        for start in self.parents.keys() {
            let mut path: HashSet<&MarkerType> = HashSet::new();
            let mut current = Some(start);
            while let Some(marker) = current {
                if verified.contains(marker) {
                    break;
                }
                if !path.insert(marker) {
                    return Err(CatalogError::cycle(marker.clone()));
                }
                current = self.parent(marker);
            }
            verified.extend(path);
        }
        Ok(())
    }

    /// Returns `true` when `marker` is declared.
    #[must_use]
    pub fn contains(&self, marker: &MarkerType) -> bool {
        self.parents.contains_key(marker)
    }

    /// Returns the declared parent of `marker`, if it is a refinement.
    #[must_use]
    pub fn parent(&self, marker: &MarkerType) -> Option<&MarkerType> {
        self.parents.get(marker).and_then(Option::as_ref)
    }

    /// Iterates over `marker` followed by each of its ancestors.
    ///
    /// An undeclared marker yields only itself.
    #[must_use]
    pub const fn lineage<'c>(&'c self, marker: &'c MarkerType) -> Lineage<'c> {
        Lineage {
            catalog: self,
            next: Some(marker),
        }
    }

    /// Returns `true` when `marker` equals `ancestor` or is a declared
    /// refinement of it, directly or transitively.
    #[must_use]
    pub fn is_refinement_of(&self, marker: &MarkerType, ancestor: &MarkerType) -> bool {
        self.lineage(marker).any(|candidate| candidate == ancestor)
    }

    /// Returns the number of declared marker types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Iterator returned by [`MarkerCatalog::lineage`].
#[derive(Debug, Clone)]
pub struct Lineage<'c> {
    catalog: &'c MarkerCatalog,
    next: Option<&'c MarkerType>,
}

impl<'c> Iterator for Lineage<'c> {
    type Item = &'c MarkerType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.catalog.parent(current);
        Some(current)
    }
}
