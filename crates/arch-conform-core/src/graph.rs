//! The module dependency graph.
//!
//! [`GraphBuilder`] is the single-writer construction phase; [`DependencyGraph`]
//! is the immutable result. All collections are B-tree ordered so iteration,
//! and therefore every report, is deterministic regardless of scan order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use crate::adapter::SymbolKind;

/// Prefix marking synthetic modules for out-of-project imports.
pub const EXTERNAL_PREFIX: &str = "external:";

/// Identity of a module: its namespace path (`internal/user/domain`),
/// or `external:<root>` for out-of-project import targets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId(String);

impl ModuleId {
    /// Creates a module id from a namespace path.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the synthetic id for an out-of-project import root.
    #[must_use]
    pub fn external(root: &str) -> Self {
        Self(format!("{EXTERNAL_PREFIX}{root}"))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a synthetic external module.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.0.starts_with(EXTERNAL_PREFIX)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A top-level symbol owned by a module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Symbol {
    /// Declared identifier.
    pub name: String,
    /// Kind of the declaration.
    pub kind: SymbolKind,
    /// File the symbol was declared in (relative to project root).
    pub file: PathBuf,
    /// Declaration line (1-indexed).
    pub line: usize,
}

/// A module: a named group of files selected by a namespace template.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    id: ModuleId,
    kinds: BTreeSet<SymbolKind>,
    files: BTreeSet<PathBuf>,
    symbols: BTreeSet<Symbol>,
}

impl Module {
    fn new(id: ModuleId) -> Self {
        Self {
            id,
            kinds: BTreeSet::new(),
            files: BTreeSet::new(),
            symbols: BTreeSet::new(),
        }
    }

    /// Returns the module id.
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Kind tags inferred from the module's symbols.
    #[must_use]
    pub fn kinds(&self) -> &BTreeSet<SymbolKind> {
        &self.kinds
    }

    /// Files owned by this module.
    #[must_use]
    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    /// Symbols declared across the module's files, sorted.
    #[must_use]
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Whether this is a synthetic external module.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.id.is_external()
    }
}

/// Where an edge was observed: originating file and import line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Provenance {
    /// File containing the import (relative to project root).
    pub file: PathBuf,
    /// Import line (1-indexed).
    pub line: usize,
}

/// An import resolved to its target module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Target module id (local or `external:*`).
    pub target: ModuleId,
    /// Import line in the originating file (1-indexed).
    pub line: usize,
}

type Adjacency = BTreeMap<ModuleId, BTreeMap<ModuleId, BTreeSet<Provenance>>>;

/// Single-writer builder for [`DependencyGraph`].
///
/// Folds classified files into the adjacency structure. Self-edges are
/// dropped; duplicate imports from one file to one target module are
/// deduplicated to the first occurrence.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    modules: BTreeMap<ModuleId, Module>,
    adjacency: Adjacency,
}

impl GraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one classified file into the graph.
    pub fn add_file(
        &mut self,
        module: &ModuleId,
        file: PathBuf,
        symbols: &[crate::adapter::SymbolDecl],
        imports: &[ResolvedImport],
    ) {
        let entry = self
            .modules
            .entry(module.clone())
            .or_insert_with(|| Module::new(module.clone()));
        entry.files.insert(file.clone());
        for sym in symbols {
            entry.kinds.insert(sym.kind);
            entry.symbols.insert(Symbol {
                name: sym.name.clone(),
                kind: sym.kind,
                file: file.clone(),
                line: sym.line,
            });
        }

        for import in imports {
            if import.target == *module {
                continue;
            }
            self.modules
                .entry(import.target.clone())
                .or_insert_with(|| Module::new(import.target.clone()));

            let provenance = self
                .adjacency
                .entry(module.clone())
                .or_default()
                .entry(import.target.clone())
                .or_default();
            // One provenance entry per originating file
            if provenance.iter().any(|p| p.file == file) {
                continue;
            }
            provenance.insert(Provenance {
                file: file.clone(),
                line: import.line,
            });
        }
    }

    /// Finalizes construction. The result is immutable.
    #[must_use]
    pub fn build(self) -> DependencyGraph {
        DependencyGraph {
            modules: self.modules,
            adjacency: self.adjacency,
        }
    }
}

/// The immutable module dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyGraph {
    modules: BTreeMap<ModuleId, Module>,
    adjacency: Adjacency,
}

impl DependencyGraph {
    /// All modules, sorted by id.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Looks up a module by id.
    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Number of modules in the graph.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Number of distinct (source, target) edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    /// Outgoing edges of a module, sorted by target id.
    pub fn edges_from(
        &self,
        id: &ModuleId,
    ) -> impl Iterator<Item = (&ModuleId, &BTreeSet<Provenance>)> {
        self.adjacency.get(id).into_iter().flatten()
    }

    /// All edges, sorted by (source, target).
    pub fn edges(&self) -> impl Iterator<Item = (&ModuleId, &ModuleId, &BTreeSet<Provenance>)> {
        self.adjacency.iter().flat_map(|(source, targets)| {
            targets
                .iter()
                .map(move |(target, prov)| (source, target, prov))
        })
    }
}
