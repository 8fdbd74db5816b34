//! Single-pass schema inference over one annotated sample document.
//!
//! Walk the sample once in document order and merge every occurrence of an
//! element name into one [`TypeDescriptor`] in the [`Registry`].
//!
//! Merge policies (deliberately different per field):
//! - attribute primitive type: last occurrence wins;
//! - attribute `required`: one-way latch, lowered by any optional occurrence;
//! - text type: first occurrence with text wins;
//! - child cardinality: first occurrence of the parent/child pair wins.
pub mod sigil;

use tracing::{debug, info, warn};

use crate::dom::Element;
use crate::registry::{AttrSpec, ChildSpec, Registry, TypeDescriptor};

pub use sigil::{classify, Hint, InferOptions};

// ------------------------------ Front API --------------------------------- //

/// Infer a registry using the default sample conventions.
pub fn infer(document: &Element) -> Registry {
    infer_with(document, &InferOptions::default())
}

pub fn infer_with(document: &Element, options: &InferOptions) -> Registry {
    let mut registry = Registry::new(document.name.as_str());
    observe_element(&mut registry, options, document);
    info!(root = %document.name, types = registry.len(), "inferred registry");
    registry
}

// ------------------------------ Observe ---------------------------------- //

fn observe_element(registry: &mut Registry, options: &InferOptions, element: &Element) {
    let ty = registry.entry(&element.name);
    observe_attributes(ty, options, element);
    observe_text(ty, options, element);

    for child in &element.children {
        let cardinality = options.cardinality(child.attr(&options.marker_attribute));
        let parent = registry.entry(&element.name);
        match parent.children.get(&child.name) {
            None => {
                debug!(parent = %element.name, child = %child.name, ?cardinality, "new edge");
                parent.children.insert(child.name.clone(), ChildSpec {
                    target: child.name.clone(),
                    cardinality,
                });
            }
            Some(locked) if locked.cardinality != cardinality => {
                warn!(
                    parent = %element.name,
                    child = %child.name,
                    locked = ?locked.cardinality,
                    seen = ?cardinality,
                    "cardinality already fixed by first occurrence; ignoring marker",
                );
            }
            Some(_) => {}
        }
        // still merge attributes, text and grandchildren
        observe_element(registry, options, child);
    }
}

fn observe_attributes(ty: &mut TypeDescriptor, options: &InferOptions, element: &Element) {
    for (name, raw) in &element.attributes {
        if *name == options.marker_attribute {
            continue;
        }
        let hint = options.classify(raw);
        match ty.attributes.get_mut(name) {
            Some(spec) => {
                spec.ty = hint.primitive;
                if hint.optional {
                    spec.required = false;
                }
            }
            None => {
                ty.attributes.insert(name.clone(), AttrSpec {
                    ty: hint.primitive,
                    required: !hint.optional,
                });
            }
        }
    }
}

fn observe_text(ty: &mut TypeDescriptor, options: &InferOptions, element: &Element) {
    let Some(text) = element.text.as_deref().filter(|t| !t.trim().is_empty()) else {
        return;
    };
    if !ty.has_text {
        ty.has_text = true;
        ty.text_type = Some(options.classify(text).primitive);
    }
}

// ------------------------------- Tests ------------------------------------ //
