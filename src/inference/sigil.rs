use crate::registry::{Cardinality, Primitive};

/// What a single sample value hints at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hint {
    pub primitive: Primitive,
    pub optional: bool,
}

/// Value conventions of an annotated sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferOptions {
    /// Attribute carrying the cardinality signal; never a schema attribute.
    pub marker_attribute: String,
    /// Trailing character that marks a value as optional.
    pub optional_marker: char,
    pub integer_sigil: char,
    pub float_sigil: char,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            marker_attribute: "nodeCount".to_string(),
            optional_marker: '0',
            integer_sigil: 'i',
            float_sigil: 'f',
        }
    }
}

impl InferOptions {
    /// Leading character picks the primitive, trailing character the optionality.
    pub fn classify(&self, raw: &str) -> Hint {
        let primitive = match raw.chars().next() {
            Some(c) if c == self.integer_sigil => Primitive::Integer,
            Some(c) if c == self.float_sigil => Primitive::Float,
            _ => Primitive::Text,
        };
        Hint { primitive, optional: raw.ends_with(self.optional_marker) }
    }

    /// A marker whose integer value is 1 (`1`, `01`, `+1`) is singular;
    /// any other value, or no marker at all, is repeated.
    pub fn cardinality(&self, marker: Option<&str>) -> Cardinality {
        match marker.map(|raw| raw.trim().parse::<i64>()) {
            Some(Ok(1)) => Cardinality::Singular,
            _ => Cardinality::Repeated,
        }
    }
}

/// [`InferOptions::classify`] with the default conventions.
pub fn classify(raw: &str) -> Hint {
    InferOptions::default().classify(raw)
}
