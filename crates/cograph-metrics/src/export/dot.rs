//! Graphviz DOT export.
//!
//! Layout is left to the renderer; the output only carries node names and
//! edge weights:
//!
//! ```text
//! graph cooccurrence {
//!   "Alice";
//!   "Bob";
//!   "Alice" -- "Bob" [weight=2];
//! }
//! ```

use std::fmt::Write as _;

use crate::graph::build::CooccurrenceGraph;

/// Render `g` as an undirected DOT graph named `cooccurrence`.
#[must_use]
pub fn to_dot(g: &CooccurrenceGraph) -> String {
    let mut out = String::from("graph cooccurrence {\n");

    for name in g.node_names() {
        let _ = writeln!(out, "  {};", quote(name));
    }
    for edge in g.edge_records() {
        let _ = writeln!(
            out,
            "  {} -- {} [weight={}];",
            quote(&edge.node_a),
            quote(&edge.node_b),
            edge.weight
        );
    }

    out.push_str("}\n");
    out
}

fn quote(id: &str) -> String {
    let mut quoted = String::with_capacity(id.len() + 2);
    quoted.push('"');
    for c in id.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
