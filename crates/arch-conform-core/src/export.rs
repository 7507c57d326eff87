//! Read-only graph export for external visualization.
//!
//! Renders the dependency graph (or a focus module's neighborhood) as a
//! DOT digraph. Exporting never mutates state; nodes and edges are emitted
//! in sorted order so the output is reproducible byte-for-byte.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::graph::{DependencyGraph, ModuleId};

/// Renders the whole graph, or `focus`'s direct neighborhood, as DOT.
#[must_use]
pub fn export_dot(graph: &DependencyGraph, focus: Option<&ModuleId>) -> String {
    let mut nodes: BTreeSet<&ModuleId> = BTreeSet::new();
    let mut edges: Vec<(&ModuleId, &ModuleId, String)> = Vec::new();

    for (source, target, provenance) in graph.edges() {
        if let Some(focus) = focus {
            if source != focus && target != focus {
                continue;
            }
        }
        nodes.insert(source);
        nodes.insert(target);
        let label = provenance
            .iter()
            .next()
            .map(|p| format!("{}:{}", p.file.display(), p.line))
            .unwrap_or_default();
        edges.push((source, target, label));
    }

    match focus {
        Some(focus) => {
            if graph.module(focus).is_some() {
                nodes.insert(focus);
            }
        }
        None => {
            // Isolated modules still appear in a full export
            for module in graph.modules() {
                nodes.insert(module.id());
            }
        }
    }

    let mut out = String::from("digraph dependencies {\n");
    for node in &nodes {
        let _ = writeln!(out, "  \"{node}\";");
    }
    for (source, target, label) in &edges {
        if label.is_empty() {
            let _ = writeln!(out, "  \"{source}\" -> \"{target}\";");
        } else {
            let _ = writeln!(out, "  \"{source}\" -> \"{target}\" [label=\"{label}\"];");
        }
    }
    out.push_str("}\n");
    out
}
