//! Type registry: one merged descriptor per element name.
//!
//! Built once by [`crate::inference`], read-only afterwards. Both emitters
//! borrow it; nothing here is ever copied per occurrence.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::{Error, Result};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Closed set of value types a sample value can hint at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    Integer,
    Float,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Cardinality {
    /// exactly one
    Singular,
    /// zero or more
    Repeated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttrSpec {
    pub ty: Primitive,
    /// One-way latch: starts `true`, only ever lowered to `false`.
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChildSpec {
    pub target: String,
    pub cardinality: Cardinality,
}

/// Merged structural description of one element name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub attributes: IndexMap<String, AttrSpec>,
    pub has_text: bool,
    pub text_type: Option<Primitive>,
    pub children: IndexMap<String, ChildSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registry {
    root: String,
    types: IndexMap<String, TypeDescriptor>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Primitive {
    pub fn xsd_name(self) -> &'static str {
        match self {
            Primitive::Integer => "xs:long",
            Primitive::Float => "xs:double",
            Primitive::Text => "xs:string",
        }
    }
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            has_text: false,
            text_type: None,
            children: IndexMap::new(),
        }
    }

    /// Text type if the element carries text.
    pub fn text(&self) -> Option<Primitive> {
        if self.has_text { Some(self.text_type.unwrap_or(Primitive::Text)) } else { None }
    }
}

impl Registry {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into(), types: IndexMap::new() }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn root_type(&self) -> Result<&TypeDescriptor> {
        self.require(&self.root)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&TypeDescriptor> {
        self.get(name).ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Fetch-or-create the descriptor for `name`.
    pub fn entry(&mut self, name: &str) -> &mut TypeDescriptor {
        self.types
            .entry(name.to_string())
            .or_insert_with(|| TypeDescriptor::new(name))
    }

    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    /// Descriptors in first-sight order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// True if some type has a child edge pointing back at the root.
    pub fn root_is_referenced(&self) -> bool {
        self.types()
            .flat_map(|ty| ty.children.values())
            .any(|child| child.target == self.root)
    }

    /// Dependency order for emission: depth-first from the root, every child
    /// target before its parent, each type exactly once. Types the root cannot
    /// reach follow in registry order.
    pub fn dependency_order(&self) -> Result<Vec<&TypeDescriptor>> {
        let mut visited = IndexSet::<&str>::new();
        let mut out = Vec::with_capacity(self.types.len());
        self.visit_post_order(&self.root, &mut visited, &mut out)?;
        for name in self.types.keys() {
            self.visit_post_order(name, &mut visited, &mut out)?;
        }
        Ok(out)
    }

    fn visit_post_order<'a>(
        &'a self,
        name: &'a str,
        visited: &mut IndexSet<&'a str>,
        out: &mut Vec<&'a TypeDescriptor>,
    ) -> Result<()> {
        // marked on entry so cycles terminate
        if !visited.insert(name) {
            return Ok(());
        }
        let ty = self.require(name)?;
        for child in ty.children.values() {
            self.visit_post_order(&child.target, visited, out)?;
        }
        out.push(ty);
        Ok(())
    }

    /// First cycle reachable only through `Singular` edges, as the list of
    /// type names along it (first name repeated at the end).
    pub fn singular_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark { Open, Done }

        fn walk<'a>(
            reg: &'a Registry,
            name: &'a str,
            marks: &mut IndexMap<&'a str, Mark>,
            stack: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            match marks.get(name) {
                Some(Mark::Done) => return None,
                Some(Mark::Open) => {
                    let start = stack.iter().position(|n| *n == name).unwrap_or(0);
                    let mut path: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
                    path.push(name.to_string());
                    return Some(path);
                }
                None => {}
            }
            marks.insert(name, Mark::Open);
            stack.push(name);
            if let Some(ty) = reg.get(name) {
                for child in ty.children.values() {
                    if child.cardinality != Cardinality::Singular {
                        continue;
                    }
                    if let Some(path) = walk(reg, &child.target, marks, stack) {
                        return Some(path);
                    }
                }
            }
            stack.pop();
            marks.insert(name, Mark::Done);
            None
        }

        let mut marks = IndexMap::new();
        let mut stack = Vec::new();
        self.types
            .keys()
            .find_map(|name| walk(self, name, &mut marks, &mut stack))
    }

    /// Reject registries no owning value-type graph can represent.
    pub fn ensure_constructible(&self) -> Result<()> {
        match self.singular_cycle() {
            Some(path) => Err(Error::SingularCycle { path }),
            None => Ok(()),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
