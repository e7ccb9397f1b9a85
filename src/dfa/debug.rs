/*!
A structured, deterministic rendering of automaton states.

A [`Table`] is a small tree: a name, an ordered list of `key: value`
properties and an ordered list of child tables. Tables compare structurally,
which makes them convenient for snapshot-style assertions on the shape of an
automaton (e.g., that a duplicated state has the same transitions as its
source). Their `Display` impl renders an indented outline.
*/

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

/// A named, ordered collection of properties and child tables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    name: String,
    props: Vec<(String, String)>,
    children: Vec<Table>,
}

impl Table {
    /// Create a new empty table with the given name.
    pub fn new(name: &str) -> Table {
        Table {
            name: name.to_string(),
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append a property. Properties keep their insertion order.
    pub fn property<V: core::fmt::Display>(
        mut self,
        key: &str,
        value: V,
    ) -> Table {
        self.props.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a child table.
    pub fn child(mut self, table: Table) -> Table {
        self.children.push(table);
        self
    }

    /// Returns a copy of this table without any property named `key`.
    ///
    /// This is useful for comparing tables modulo some property, e.g., the
    /// identifier of a state.
    pub fn without(mut self, key: &str) -> Table {
        self.props.retain(|&(ref k, _)| k != key);
        self
    }

    /// The name of this table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the value of the first property named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|&&(ref k, _)| k == key)
            .map(|&(_, ref v)| v.as_str())
    }

    /// Returns an iterator over all properties in order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.props.iter().map(|&(ref k, ref v)| (k.as_str(), v.as_str()))
    }

    /// Returns all child tables in order.
    pub fn children(&self) -> &[Table] {
        &self.children
    }

    /// Returns the first child table with the given name.
    pub fn find_child(&self, name: &str) -> Option<&Table> {
        self.children.iter().find(|t| t.name == name)
    }

    fn fmt_indent(
        &self,
        f: &mut core::fmt::Formatter,
        depth: usize,
    ) -> core::fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.name, indent = depth * 2)?;
        for &(ref k, ref v) in self.props.iter() {
            writeln!(f, "{:indent$}{}: {}", "", k, v, indent = depth * 2 + 2)?;
        }
        for child in self.children.iter() {
            child.fmt_indent(f, depth + 1)?;
        }
        Ok(())
    }
}

impl core::fmt::Display for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.fmt_indent(f, 0)
    }
}
