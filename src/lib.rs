//! xml-osi: infer a structural schema from one annotated sample XML document
//! and emit Rust data bindings or an XSD from it.
//!
//! Pipeline: [`dom`] parses the sample → [`inference`] merges every element
//! name into one descriptor of the [`registry::Registry`] → [`codegen`] or
//! [`xsd`] emits from the registry alone.
//!
//! ```no_run
//! let registry = xml_osi::infer_file("input.xml", &Default::default())?;
//! let rust_src = xml_osi::codegen::emit_bindings(&registry)?;
//! let xsd_src = xml_osi::xsd::emit_schema(&registry)?;
//! # Ok::<(), xml_osi::Error>(())
//! ```
pub mod binding;
pub mod codegen;
pub mod dom;
pub mod error;
pub mod inference;
pub mod registry;
pub mod xsd;

use std::path::Path;

pub use error::{Error, Result};
pub use inference::{infer, infer_with, InferOptions};
pub use registry::{AttrSpec, Cardinality, ChildSpec, Primitive, Registry, TypeDescriptor};

/// Parse the sample at `path` and infer its registry.
pub fn infer_file(path: impl AsRef<Path>, options: &InferOptions) -> Result<Registry> {
    let document = dom::load_file(path)?;
    Ok(infer_with(&document, options))
}
