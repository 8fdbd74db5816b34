//! Registry-driven bindings at runtime.
//!
//! [`Instance`] is the dynamic twin of a struct emitted by
//! [`crate::codegen`]: same fields, same read/write rules, same deep-copy
//! semantics (`Clone` copies every repeated child). It lets the round-trip
//! behavior of the bindings be exercised without compiling generated source.
//!
//! [`Binder::annotate`] goes one step further and writes an instance back as
//! an *annotated sample*: values carry the sigils and multiplicity markers the
//! inference pass reads, so re-inferring from it reproduces the registry.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::dom::{self, Element};
use crate::error::Result;
use crate::inference::InferOptions;
use crate::registry::{Cardinality, Primitive, Registry, TypeDescriptor};

/// Prefix that keeps a text value from being read as a number sigil.
const TEXT_GUARD: &str = "s_";
/// Suffix that keeps a required value from ending in the optional marker.
const REQUIRED_GUARD: char = '_';

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    /// inline, exactly one
    Singular(Instance),
    /// owned, zero or more
    Repeated(Vec<Instance>),
}

/// One bound element; field layout follows its [`TypeDescriptor`].
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub type_name: String,
    pub attributes: IndexMap<String, Scalar>,
    pub text: Option<Scalar>,
    pub children: IndexMap<String, Slot>,
}

/// Reads and writes [`Instance`]s against one registry.
#[derive(Debug)]
pub struct Binder<'r> {
    registry: &'r Registry,
    options: InferOptions,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Scalar {
    pub fn zero(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Integer => Scalar::Integer(0),
            Primitive::Float => Scalar::Float(0.0),
            Primitive::Text => Scalar::Text(String::new()),
        }
    }

    pub fn primitive(&self) -> Primitive {
        match self {
            Scalar::Integer(_) => Primitive::Integer,
            Scalar::Float(_) => Primitive::Float,
            Scalar::Text(_) => Primitive::Text,
        }
    }

    fn read_attr(primitive: Primitive, node: &Element, name: &str) -> Self {
        match primitive {
            Primitive::Integer => Scalar::Integer(node.attr_i64(name)),
            Primitive::Float => Scalar::Float(node.attr_f64(name)),
            Primitive::Text => Scalar::Text(node.attr_str(name)),
        }
    }

    fn read_text(primitive: Primitive, node: &Element) -> Self {
        match primitive {
            Primitive::Integer => Scalar::Integer(node.text_i64()),
            Primitive::Float => Scalar::Float(node.text_f64()),
            Primitive::Text => Scalar::Text(node.text_str()),
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Scalar::Text(text) if text.is_empty())
    }

    pub fn render(&self) -> String {
        match self {
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(x) => x.to_string(),
            Scalar::Text(text) => text.clone(),
        }
    }
}

impl Instance {
    pub fn attr(&self, name: &str) -> Option<&Scalar> {
        self.attributes.get(name)
    }

    pub fn singular(&self, child: &str) -> Option<&Instance> {
        match self.children.get(child) {
            Some(Slot::Singular(instance)) => Some(instance),
            _ => None,
        }
    }

    pub fn repeated(&self, child: &str) -> &[Instance] {
        match self.children.get(child) {
            Some(Slot::Repeated(items)) => items,
            _ => &[],
        }
    }

    pub fn repeated_mut(&mut self, child: &str) -> Option<&mut Vec<Instance>> {
        match self.children.get_mut(child) {
            Some(Slot::Repeated(items)) => Some(items),
            _ => None,
        }
    }
}

impl<'r> Binder<'r> {
    /// Fails if the registry has a singular-only cycle or a dangling child
    /// reference; neither can be bound.
    pub fn new(registry: &'r Registry) -> Result<Self> {
        Self::with_options(registry, InferOptions::default())
    }

    pub fn with_options(registry: &'r Registry, options: InferOptions) -> Result<Self> {
        registry.ensure_constructible()?;
        registry.dependency_order()?;
        Ok(Self { registry, options })
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Zero-valued instance: empty text, no repeated children, and default
    /// singular children all the way down.
    pub fn default_instance(&self, type_name: &str) -> Result<Instance> {
        let ty = self.registry.require(type_name)?;
        let mut children = IndexMap::new();
        for (name, child) in &ty.children {
            let slot = match child.cardinality {
                Cardinality::Singular => Slot::Singular(self.default_instance(&child.target)?),
                Cardinality::Repeated => Slot::Repeated(Vec::new()),
            };
            children.insert(name.clone(), slot);
        }
        Ok(Instance {
            type_name: ty.name.clone(),
            attributes: ty
                .attributes
                .iter()
                .map(|(name, spec)| (name.clone(), Scalar::zero(spec.ty)))
                .collect(),
            text: ty.text().map(Scalar::zero),
            children,
        })
    }

    // read

    pub fn read(&self, type_name: &str, node: &Element) -> Result<Instance> {
        let ty = self.registry.require(type_name)?;
        let attributes = ty
            .attributes
            .iter()
            .map(|(name, spec)| (name.clone(), Scalar::read_attr(spec.ty, node, name)))
            .collect();
        let text = ty.text().map(|prim| Scalar::read_text(prim, node));

        let mut children = IndexMap::new();
        for (name, child) in &ty.children {
            let slot = match child.cardinality {
                Cardinality::Singular => match node.child(name) {
                    Some(found) => Slot::Singular(self.read(&child.target, found)?),
                    None => Slot::Singular(self.default_instance(&child.target)?),
                },
                Cardinality::Repeated => Slot::Repeated(
                    node.children_named(name)
                        .map(|found| self.read(&child.target, found))
                        .collect::<Result<Vec<_>>>()?,
                ),
            };
            children.insert(name.clone(), slot);
        }
        Ok(Instance { type_name: ty.name.clone(), attributes, text, children })
    }

    /// Load `path` and bind its root, which must be the registry's root.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Instance> {
        let node = dom::load_root(path, self.registry.root())?;
        self.read(self.registry.root(), &node)
    }

    // write

    /// Mirror of the generated `write`: empty optional text attributes are
    /// skipped, numeric attributes are always written.
    pub fn write(&self, instance: &Instance, node: &mut Element) -> Result<()> {
        let ty = self.registry.require(&instance.type_name)?;
        for (name, spec) in &ty.attributes {
            let value = instance.attr(name).cloned().unwrap_or_else(|| Scalar::zero(spec.ty));
            if spec.ty == Primitive::Text && !spec.required && value.is_empty_text() {
                continue;
            }
            node.append_attr(name, value.render());
        }
        if let Some(text) = &instance.text {
            node.set_text(text.render());
        }
        self.write_children(ty, instance, node, |binder, child, target| binder.write(child, target))
    }

    pub fn to_element(&self, instance: &Instance) -> Result<Element> {
        let mut node = Element::new(instance.type_name.as_str());
        self.write(instance, &mut node)?;
        Ok(node)
    }

    pub fn save(&self, instance: &Instance, path: impl AsRef<Path>) -> Result<()> {
        dom::save_file(&self.to_element(instance)?, path)
    }

    /// Write `instance` as an annotated sample: every registry attribute
    /// present, sigils re-applied, singular edges marked.
    pub fn annotate(&self, instance: &Instance, node: &mut Element) -> Result<()> {
        let ty = self.registry.require(&instance.type_name)?;
        for (name, spec) in &ty.attributes {
            let value = instance.attr(name).cloned().unwrap_or_else(|| Scalar::zero(spec.ty));
            node.append_attr(name, self.sigil_value(&value, spec.required));
        }
        if let Some(text) = &instance.text {
            node.set_text(self.sigil_value(text, true));
        }
        self.write_children(ty, instance, node, |binder, child, target| binder.annotate(child, target))?;
        for (name, child) in &ty.children {
            if child.cardinality == Cardinality::Singular {
                for target in node.children.iter_mut().filter(|c| c.name == *name) {
                    target.append_attr(&self.options.marker_attribute, "1");
                }
            }
        }
        Ok(())
    }

    pub fn to_sample(&self, instance: &Instance) -> Result<Element> {
        let mut node = Element::new(instance.type_name.as_str());
        self.annotate(instance, &mut node)?;
        Ok(node)
    }

    // ————————————————————————————————————————————————————————————————————————
    // INTERNAL HELPERS
    // ————————————————————————————————————————————————————————————————————————

    fn write_children(
        &self,
        ty: &TypeDescriptor,
        instance: &Instance,
        node: &mut Element,
        write: impl Fn(&Self, &Instance, &mut Element) -> Result<()>,
    ) -> Result<()> {
        for (name, child) in &ty.children {
            match (child.cardinality, instance.children.get(name)) {
                (Cardinality::Singular, Some(Slot::Singular(value))) => {
                    write(self, value, node.append_child(name))?;
                }
                (Cardinality::Singular, _) => {
                    let value = self.default_instance(&child.target)?;
                    write(self, &value, node.append_child(name))?;
                }
                (Cardinality::Repeated, Some(Slot::Repeated(items))) => {
                    for item in items {
                        write(self, item, node.append_child(name))?;
                    }
                }
                (Cardinality::Repeated, _) => {
                    debug!(parent = %ty.name, child = %name, "no repeated slot; writing nothing");
                }
            }
        }
        Ok(())
    }

    fn sigil_value(&self, value: &Scalar, required: bool) -> String {
        let mut out = match value {
            Scalar::Integer(n) => format!("{}{n}", self.options.integer_sigil),
            Scalar::Float(x) => format!("{}{x}", self.options.float_sigil),
            Scalar::Text(text) => {
                let starts_with_sigil = text.starts_with(self.options.integer_sigil)
                    || text.starts_with(self.options.float_sigil);
                if text.is_empty() || starts_with_sigil {
                    format!("{TEXT_GUARD}{text}")
                } else {
                    text.clone()
                }
            }
        };
        let marked = out.ends_with(self.options.optional_marker);
        if required && marked {
            out.push(REQUIRED_GUARD);
        } else if !required && !marked {
            out.push(self.options.optional_marker);
        }
        out
    }
}

// ------------------------------- Tests ------------------------------------ //
