//! Human-readable dumps for debugging.

use std::fmt::{self, Write};
use std::hash::Hash;

use super::ShapeIdentity;

impl<S> ShapeIdentity<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// Writes the containment graph as Graphviz DOT, containers pointing at
    /// their contents.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn dump_graph<W: Write>(&self, out: &mut W) -> fmt::Result {
        self.write_dot(out, false)
    }

    /// Writes the containment graph as Graphviz DOT, contents pointing at
    /// their containers.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn dump_reverse_graph<W: Write>(&self, out: &mut W) -> fmt::Result {
        self.write_dot(out, true)
    }

    fn write_dot<W: Write>(&self, out: &mut W, reverse: bool) -> fmt::Result {
        writeln!(out, "digraph shape {{")?;
        for (_, record) in self.records.iter() {
            writeln!(
                out,
                "  n{} [label=\"{}\\n{}\"];",
                record.offset, record.kind, record.id
            )?;
        }
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .edges()
            .filter_map(|(p, c)| Some((self.records.offset(p)?, self.records.offset(c)?)))
            .collect();
        edges.sort_unstable();
        for (parent, child) in edges {
            if reverse {
                writeln!(out, "  n{child} -> n{parent};")?;
            } else {
                writeln!(out, "  n{parent} -> n{child};")?;
            }
        }
        writeln!(out, "}}")
    }
}

impl<S> fmt::Display for ShapeIdentity<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "shape records ({})", self.records.len())?;
        for (_, record) in self.records.iter() {
            writeln!(f, "  {:>4} {:<8} {}", record.offset, record.kind, record.id)?;
        }
        write!(f, "{}{}{}", self.evolve, self.tags, self.derived)
    }
}
