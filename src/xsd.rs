//! Schema emitter: registry → W3C XML Schema text.
//!
//! Every non-root type becomes a named complex type `tn_<name>`; the root
//! becomes a top-level element with an inline anonymous complex type. Both
//! follow the same body rules:
//! - text + attributes → `simpleContent` extension carrying the attributes;
//! - text only → bare `simpleContent` extension;
//! - otherwise → `sequence` of child particles, then attribute declarations.
//!
//! Order is registry (first-sight) order, so output is reproducible.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use tracing::{debug, info};

use crate::error::Result;
use crate::registry::{Cardinality, Registry, TypeDescriptor};

pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
pub const TYPE_PREFIX: &str = "tn_";

const INDENT_WIDTH: usize = 4;

type XmlWriter = Writer<Vec<u8>>;

// ------------------------------- Front API -------------------------------- //

pub fn emit_schema(registry: &Registry) -> Result<String> {
    let root = registry.root_type()?;
    for ty in registry.types() {
        for child in ty.children.values() {
            registry.require(&child.target)?;
        }
    }
    // a recursive root needs a named type for its back-references
    let root_named = registry.root_is_referenced();

    let mut w = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    open(&mut w, "xs:schema", &[("xmlns:xs", XS_NAMESPACE)])?;

    for ty in registry.types() {
        if ty.name == root.name && !root_named {
            continue;
        }
        debug!(ty = %ty.name, "emitting complex type");
        let type_name = format!("{TYPE_PREFIX}{}", ty.name);
        if is_empty(ty) {
            empty(&mut w, "xs:complexType", &[("name", type_name.as_str())])?;
        } else {
            open(&mut w, "xs:complexType", &[("name", type_name.as_str())])?;
            write_body(&mut w, ty)?;
            close(&mut w, "xs:complexType")?;
        }
    }

    open(&mut w, "xs:element", &[("name", root.name.as_str())])?;
    if is_empty(root) {
        empty(&mut w, "xs:complexType", &[])?;
    } else {
        open(&mut w, "xs:complexType", &[])?;
        write_body(&mut w, root)?;
        close(&mut w, "xs:complexType")?;
    }
    close(&mut w, "xs:element")?;
    close(&mut w, "xs:schema")?;

    let mut xsd = String::from_utf8(w.into_inner())?;
    xsd.push('\n');
    info!(root = %root.name, types = registry.len(), "emitted schema");
    Ok(xsd)
}

// ------------------------------- Bodies ----------------------------------- //

fn is_empty(ty: &TypeDescriptor) -> bool {
    !ty.has_text && ty.attributes.is_empty() && ty.children.is_empty()
}

fn write_body(w: &mut XmlWriter, ty: &TypeDescriptor) -> Result<()> {
    if let Some(text) = ty.text() {
        open(w, "xs:simpleContent", &[])?;
        if ty.attributes.is_empty() {
            empty(w, "xs:extension", &[("base", text.xsd_name())])?;
        } else {
            open(w, "xs:extension", &[("base", text.xsd_name())])?;
            write_attributes(w, ty)?;
            close(w, "xs:extension")?;
        }
        close(w, "xs:simpleContent")?;
        return Ok(());
    }

    if !ty.children.is_empty() {
        open(w, "xs:sequence", &[])?;
        for (name, child) in &ty.children {
            let (min, max) = match child.cardinality {
                Cardinality::Singular => ("1", "1"),
                Cardinality::Repeated => ("0", "unbounded"),
            };
            let type_name = format!("{TYPE_PREFIX}{}", child.target);
            empty(w, "xs:element", &[
                ("name", name.as_str()),
                ("type", type_name.as_str()),
                ("minOccurs", min),
                ("maxOccurs", max),
            ])?;
        }
        close(w, "xs:sequence")?;
    }
    write_attributes(w, ty)
}

fn write_attributes(w: &mut XmlWriter, ty: &TypeDescriptor) -> Result<()> {
    for (name, spec) in &ty.attributes {
        let usage = if spec.required { "required" } else { "optional" };
        empty(w, "xs:attribute", &[("name", name.as_str()), ("type", spec.ty.xsd_name()), ("use", usage)])?;
    }
    Ok(())
}

// ---------------------------- Writer helpers ------------------------------ //

fn start<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for attr in attrs {
        start.push_attribute(*attr);
    }
    start
}

fn open(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    w.write_event(Event::Start(start(name, attrs)))?;
    Ok(())
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    w.write_event(Event::Empty(start(name, attrs)))?;
    Ok(())
}

fn close(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
