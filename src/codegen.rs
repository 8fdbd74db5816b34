//! Data-binding emitter: registry → Rust source.
//!
//! One owning value type per descriptor plus a `<Root>File` wrapper with
//! `load`/`save`. Singular children are stored inline, repeated children in an
//! owned `Vec`, so a type may only reach itself through a repeated edge.
//! Deep copy is `#[derive(Clone)]`; release is ordinary `Drop`.
//!
//! Generated code depends on the DOM runtime in [`crate::dom`] (path
//! configurable through [`CodegenOptions::runtime_path`]).
pub mod ident;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::registry::{Cardinality, Primitive, Registry, TypeDescriptor};

use ident::Scope;

/// Local alias for the runtime module inside generated code. Type idents are
/// UpperCamelCase, so this cannot clash with them.
const RUNTIME_ALIAS: &str = "xml_dom";
const STRING: &str = "::std::string::String";
const VEC: &str = "::std::vec::Vec";
const PATH: &str = "::std::path::Path";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Module path of the DOM runtime the generated code calls into.
    pub runtime_path: String,
    /// Appended to the root type ident to name the wrapper.
    pub wrapper_suffix: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            runtime_path: "::xml_osi::dom".to_string(),
            wrapper_suffix: "File".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Codegen {
    options: CodegenOptions,
    out: String,
}

/// Rust identifiers chosen for one registry.
struct Names {
    types: IndexMap<String, String>,
    wrapper: String,
}

/// Rust identifiers chosen for one struct's fields.
struct FieldNames {
    attributes: Vec<String>,
    text: Option<String>,
    children: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

/// Emit bindings with the default options.
pub fn emit_bindings(registry: &Registry) -> Result<String> {
    let mut cg = Codegen::new();
    cg.emit(registry)?;
    Ok(cg.into_string())
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodegenOptions) -> Self {
        Self { options, out: String::new() }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    /// Append the bindings for `registry` to the output buffer.
    ///
    /// Fails with [`crate::Error::SingularCycle`] if some type reaches itself
    /// through singular edges only, since such a type would be infinitely sized.
    pub fn emit(&mut self, registry: &Registry) -> Result<()> {
        registry.ensure_constructible()?;
        let root = registry.root_type()?;
        let order = registry.dependency_order()?;
        let names = Names::assign(registry, &self.options.wrapper_suffix);

        self.emit_header(registry, &names);
        for ty in order {
            debug!(ty = %ty.name, "emitting binding");
            self.emit_type(ty, &names);
        }
        self.emit_wrapper(root, &names);
        info!(root = %root.name, types = registry.len(), "emitted bindings");
        Ok(())
    }

    // ————————————————————————————————————————————————————————————————————————
    // INTERNAL EMITTERS
    // ————————————————————————————————————————————————————————————————————————

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn emit_header(&mut self, registry: &Registry, names: &Names) {
        self.line(&format!(
            "// @generated by xml-osi from a sample with root <{}>. Do not edit.",
            registry.root()
        ));
        self.line("//");
        self.line("// Types:");
        for ty in registry.types() {
            self.line(&format!("//   {} <{}>", names.types[&ty.name], ty.name));
        }
        self.line("");
        self.line(&format!("use {} as {RUNTIME_ALIAS};", self.options.runtime_path));
        self.line("");
    }

    fn emit_type(&mut self, ty: &TypeDescriptor, names: &Names) {
        let ident = &names.types[&ty.name];
        let fields = FieldNames::assign(ty);

        // struct
        self.line("#[derive(Clone, Debug, Default, PartialEq)]");
        if fields.is_empty() {
            self.line(&format!("pub struct {ident} {{}}"));
        } else {
            self.line(&format!("pub struct {ident} {{"));
            for ((_, spec), field) in ty.attributes.iter().zip(&fields.attributes) {
                self.line(&format!("    pub {field}: {},", rust_type(spec.ty)));
            }
            if let (Some(prim), Some(field)) = (ty.text(), &fields.text) {
                self.line(&format!("    pub {field}: {},", rust_type(prim)));
            }
            for ((_, child), field) in ty.children.iter().zip(&fields.children) {
                let target = &names.types[&child.target];
                match child.cardinality {
                    Cardinality::Singular => self.line(&format!("    pub {field}: {target},")),
                    Cardinality::Repeated => self.line(&format!("    pub {field}: {VEC}<{target}>,")),
                }
            }
            self.line("}");
        }
        self.line("");

        self.line(&format!("impl {ident} {{"));
        self.emit_read(ty, &fields, names);
        self.line("");
        self.emit_write(ty, &fields);
        self.line("}");
        self.line("");
    }

    fn emit_read(&mut self, ty: &TypeDescriptor, fields: &FieldNames, names: &Names) {
        let node = if fields.is_empty() { "_node" } else { "node" };
        self.line(&format!("    pub fn read({node}: &{RUNTIME_ALIAS}::Element) -> Self {{"));
        if fields.is_empty() {
            self.line("        Self {}");
            self.line("    }");
            return;
        }
        self.line("        Self {");
        for ((name, spec), field) in ty.attributes.iter().zip(&fields.attributes) {
            let accessor = match spec.ty {
                Primitive::Integer => "attr_i64",
                Primitive::Float => "attr_f64",
                Primitive::Text => "attr_str",
            };
            self.line(&format!("            {field}: node.{accessor}({name:?}),"));
        }
        if let (Some(prim), Some(field)) = (ty.text(), &fields.text) {
            let accessor = match prim {
                Primitive::Integer => "text_i64",
                Primitive::Float => "text_f64",
                Primitive::Text => "text_str",
            };
            self.line(&format!("            {field}: node.{accessor}(),"));
        }
        for ((name, child), field) in ty.children.iter().zip(&fields.children) {
            let target = &names.types[&child.target];
            match child.cardinality {
                Cardinality::Singular => self.line(&format!(
                    "            {field}: node.child({name:?}).map({target}::read).unwrap_or_default(),"
                )),
                Cardinality::Repeated => self.line(&format!(
                    "            {field}: node.children_named({name:?}).map({target}::read).collect(),"
                )),
            }
        }
        self.line("        }");
        self.line("    }");
    }

    fn emit_write(&mut self, ty: &TypeDescriptor, fields: &FieldNames) {
        let node = if fields.is_empty() { "_node" } else { "node" };
        self.line(&format!("    pub fn write(&self, {node}: &mut {RUNTIME_ALIAS}::Element) {{"));
        for ((name, spec), field) in ty.attributes.iter().zip(&fields.attributes) {
            match spec.ty {
                Primitive::Text if !spec.required => {
                    self.line(&format!("        if !self.{field}.is_empty() {{"));
                    self.line(&format!("            node.append_attr({name:?}, self.{field}.clone());"));
                    self.line("        }");
                }
                Primitive::Text => {
                    self.line(&format!("        node.append_attr({name:?}, self.{field}.clone());"));
                }
                Primitive::Integer | Primitive::Float => {
                    self.line(&format!("        node.append_attr({name:?}, self.{field}.to_string());"));
                }
            }
        }
        if let (Some(prim), Some(field)) = (ty.text(), &fields.text) {
            match prim {
                Primitive::Text => self.line(&format!("        node.set_text(self.{field}.clone());")),
                _ => self.line(&format!("        node.set_text(self.{field}.to_string());")),
            }
        }
        for ((name, child), field) in ty.children.iter().zip(&fields.children) {
            match child.cardinality {
                Cardinality::Singular => {
                    self.line(&format!("        self.{field}.write(node.append_child({name:?}));"));
                }
                Cardinality::Repeated => {
                    self.line(&format!("        for child in &self.{field} {{"));
                    self.line(&format!("            child.write(node.append_child({name:?}));"));
                    self.line("        }");
                }
            }
        }
        self.line("    }");
    }

    fn emit_wrapper(&mut self, root: &TypeDescriptor, names: &Names) {
        let wrapper = &names.wrapper;
        let root_ident = &names.types[&root.name];
        self.line("/// Owns the document root and moves it to and from disk.");
        self.line("#[derive(Clone, Debug, Default, PartialEq)]");
        self.line(&format!("pub struct {wrapper} {{"));
        self.line(&format!("    pub root: {root_ident},"));
        self.line("}");
        self.line("");
        self.line(&format!("impl {wrapper} {{"));
        self.line(&format!("    pub const ROOT: &'static str = {:?};", root.name));
        self.line("");
        self.line(&format!(
            "    pub fn load(&mut self, path: impl AsRef<{PATH}>) -> {RUNTIME_ALIAS}::Result<()> {{"
        ));
        self.line(&format!("        let node = {RUNTIME_ALIAS}::load_root(path, Self::ROOT)?;"));
        self.line(&format!("        self.root = {root_ident}::read(&node);"));
        self.line("        Ok(())");
        self.line("    }");
        self.line("");
        self.line(&format!(
            "    pub fn save(&self, path: impl AsRef<{PATH}>) -> {RUNTIME_ALIAS}::Result<()> {{"
        ));
        self.line(&format!("        let mut node = {RUNTIME_ALIAS}::Element::new(Self::ROOT);"));
        self.line("        self.root.write(&mut node);");
        self.line(&format!("        {RUNTIME_ALIAS}::save_file(&node, path)"));
        self.line("    }");
        self.line("}");
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn rust_type(prim: Primitive) -> &'static str {
    match prim {
        Primitive::Integer => "i64",
        Primitive::Float => "f64",
        Primitive::Text => STRING,
    }
}

impl Names {
    fn assign(registry: &Registry, wrapper_suffix: &str) -> Self {
        let mut scope = Scope::new();
        scope.reserve(RUNTIME_ALIAS);
        let types: IndexMap<String, String> = registry
            .types()
            .map(|ty| (ty.name.clone(), scope.claim(ident::type_ident(&ty.name))))
            .collect();
        let root_ident = types
            .get(registry.root())
            .cloned()
            .unwrap_or_else(|| ident::type_ident(registry.root()));
        let wrapper = scope.claim(format!("{root_ident}{wrapper_suffix}"));
        Self { types, wrapper }
    }
}

impl FieldNames {
    fn assign(ty: &TypeDescriptor) -> Self {
        let mut scope = Scope::new();
        let attributes = ty
            .attributes
            .keys()
            .map(|name| scope.claim(ident::field_ident(name)))
            .collect();
        let text = ty.has_text.then(|| scope.claim("text".to_string()));
        let children = ty
            .children
            .iter()
            .map(|(name, child)| {
                let base = ident::field_ident(name);
                let base = base.strip_prefix("r#").unwrap_or(&base).to_string();
                match child.cardinality {
                    Cardinality::Singular => scope.claim(ident::field_ident(name)),
                    Cardinality::Repeated => scope.claim(format!("{base}_list")),
                }
            })
            .collect();
        Self { attributes, text, children }
    }

    fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_none() && self.children.is_empty()
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;
    use crate::error::Error;
    use crate::inference::infer;
    use crate::registry::ChildSpec;
    use pretty_assertions::assert_eq;

    fn bindings(src: &str) -> String {
        emit_bindings(&infer(&parse(src).unwrap())).unwrap()
    }

    #[test]
    fn catalog_bindings() {
        let src = bindings(r#"<Catalog><Item sku="i42" name="s_Widget0"/><Item sku="i43" name="s_Gadget"/></Catalog>"#);
        let expected = r#"// @generated by xml-osi from a sample with root <Catalog>. Do not edit.
//
// Types:
//   Catalog <Catalog>
//   Item <Item>

use ::xml_osi::dom as xml_dom;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Item {
    pub sku: i64,
    pub name: ::std::string::String,
}

impl Item {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            sku: node.attr_i64("sku"),
            name: node.attr_str("name"),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        node.append_attr("sku", self.sku.to_string());
        if !self.name.is_empty() {
            node.append_attr("name", self.name.clone());
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub item_list: ::std::vec::Vec<Item>,
}

impl Catalog {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            item_list: node.children_named("Item").map(Item::read).collect(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        for child in &self.item_list {
            child.write(node.append_child("Item"));
        }
    }
}

/// Owns the document root and moves it to and from disk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogFile {
    pub root: Catalog,
}

impl CatalogFile {
    pub const ROOT: &'static str = "Catalog";

    pub fn load(&mut self, path: impl AsRef<::std::path::Path>) -> xml_dom::Result<()> {
        let node = xml_dom::load_root(path, Self::ROOT)?;
        self.root = Catalog::read(&node);
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<::std::path::Path>) -> xml_dom::Result<()> {
        let mut node = xml_dom::Element::new(Self::ROOT);
        self.root.write(&mut node);
        xml_dom::save_file(&node, path)
    }
}
"#;
        assert_eq!(src, expected);
    }

    #[test]
    fn singular_text_and_typed_fields() {
        let src = bindings(r#"<doc><head nodeCount="1" ratio="f1.50">i7</head><body nodeCount="1">s_text</body></doc>"#);
        assert!(src.contains("pub head: Head,"));
        assert!(src.contains("pub ratio: f64,"));
        assert!(src.contains("pub text: i64,"));
        assert!(src.contains("head: node.child(\"head\").map(Head::read).unwrap_or_default(),"));
        assert!(src.contains("text: node.text_i64(),"));
        assert!(src.contains("node.set_text(self.text.to_string());"));
        assert!(src.contains("node.set_text(self.text.clone());"));
        assert!(src.contains("self.head.write(node.append_child(\"head\"));"));
        // optional, but only text fields skip empties on write
        assert!(src.contains("node.append_attr(\"ratio\", self.ratio.to_string());"));
    }

    #[test]
    fn dependency_order_defines_children_first() {
        let src = bindings(r#"<a><b nodeCount="1"><c nodeCount="1"/></b></a>"#);
        let c = src.find("pub struct C ").unwrap();
        let b = src.find("pub struct B ").unwrap();
        let a = src.find("pub struct A ").unwrap();
        assert!(c < b && b < a);
        assert!(src.contains("pub struct C {}"));
        assert!(src.contains("pub fn read(_node: &xml_dom::Element) -> Self {"));
    }

    #[test]
    fn recursive_types_emit_once() {
        let src = bindings(r#"<tree><node name="s_a"><node name="s_b"/></node></tree>"#);
        assert_eq!(src.matches("pub struct Node {").count(), 1);
        assert!(src.contains("pub node_list: ::std::vec::Vec<Node>,"));
    }

    #[test]
    fn singular_cycle_is_rejected() {
        let mut reg = infer(&parse(r#"<a><b nodeCount="1"/></a>"#).unwrap());
        reg.entry("b").children.insert("a".into(), ChildSpec {
            target: "a".into(),
            cardinality: Cardinality::Singular,
        });
        reg.entry("a").children.insert("b".into(), ChildSpec {
            target: "b".into(),
            cardinality: Cardinality::Singular,
        });
        assert!(matches!(emit_bindings(&reg), Err(Error::SingularCycle { .. })));
    }

    #[test]
    fn identifiers_are_sanitized_and_unique() {
        let src = bindings(r#"<my-root type="s" text="s">hello<String nodeCount="1"/></my-root>"#);
        assert!(src.contains("pub struct MyRoot {"));
        assert!(src.contains("pub r#type: ::std::string::String,"));
        assert!(src.contains("pub text: ::std::string::String,"));
        assert!(src.contains("pub text_2: ::std::string::String,"));
        assert!(src.contains("pub string: String,"));
        assert!(src.contains("pub struct MyRootFile {"));
    }

    #[test]
    fn custom_runtime_path() {
        let reg = infer(&parse("<a/>").unwrap());
        let mut cg = Codegen::with_options(CodegenOptions {
            runtime_path: "crate::xml".into(),
            ..CodegenOptions::default()
        });
        cg.emit(&reg).unwrap();
        assert!(cg.into_string().contains("use crate::xml as xml_dom;"));
    }

    #[test]
    fn emission_is_deterministic() {
        let sample = r#"<r a="i1" b="s0"><x nodeCount="1"/><y/><y/><z>f1</z></r>"#;
        assert_eq!(bindings(sample), bindings(sample));
    }
}
