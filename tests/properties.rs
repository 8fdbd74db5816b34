//! Property tests for the merge policies of inference.

use proptest::prelude::*;

use xml_osi::dom::Element;
use xml_osi::{infer, Cardinality, Primitive};

fn item(value: &str) -> Element {
    let mut node = Element::new("item");
    node.append_attr("v", value);
    node
}

fn root_with(items: Vec<Element>) -> Element {
    let mut root = Element::new("root");
    root.children = items;
    root
}

fn sigil_value() -> impl Strategy<Value = (Primitive, String)> {
    prop_oneof![
        (0i64..1000).prop_map(|n| (Primitive::Integer, format!("i{n}_"))),
        (0u32..1000).prop_map(|n| (Primitive::Float, format!("f{n}.5"))),
        "[a-z]{1,6}".prop_map(|s| (Primitive::Text, format!("s_{s}"))),
    ]
}

proptest! {
    #[test]
    fn optionality_latch_ignores_order(flags in prop::collection::vec(any::<bool>(), 1..10)) {
        let values: Vec<&str> = flags.iter().map(|&opt| if opt { "s_x0" } else { "s_x" }).collect();
        let forward = infer(&root_with(values.iter().map(|v| item(v)).collect()));
        let backward = infer(&root_with(values.iter().rev().map(|v| item(v)).collect()));

        let expected = !flags.iter().any(|&opt| opt);
        prop_assert_eq!(forward.get("item").unwrap().attributes["v"].required, expected);
        prop_assert_eq!(backward.get("item").unwrap().attributes["v"].required, expected);
    }

    #[test]
    fn last_occurrence_decides_primitive(values in prop::collection::vec(sigil_value(), 1..10)) {
        let reg = infer(&root_with(values.iter().map(|(_, v)| item(v)).collect()));
        let (last, _) = values.last().unwrap();
        prop_assert_eq!(reg.get("item").unwrap().attributes["v"].ty, *last);
    }

    #[test]
    fn first_marker_locks_cardinality(markers in prop::collection::vec(prop::option::of("[0-2]"), 1..8)) {
        let items = markers
            .iter()
            .map(|marker| {
                let mut node = Element::new("item");
                if let Some(marker) = marker {
                    node.append_attr("nodeCount", marker.as_str());
                }
                node
            })
            .collect();
        let reg = infer(&root_with(items));
        let expected = match markers[0].as_deref() {
            Some("1") => Cardinality::Singular,
            _ => Cardinality::Repeated,
        };
        prop_assert_eq!(reg.root_type().unwrap().children["item"].cardinality, expected);
        prop_assert!(!reg.get("item").unwrap().attributes.contains_key("nodeCount"));
    }

    #[test]
    fn emission_is_deterministic(values in prop::collection::vec(sigil_value(), 1..6)) {
        let reg = infer(&root_with(values.iter().map(|(_, v)| item(v)).collect()));
        prop_assert_eq!(
            xml_osi::codegen::emit_bindings(&reg).unwrap(),
            xml_osi::codegen::emit_bindings(&reg).unwrap()
        );
        prop_assert_eq!(xml_osi::xsd::emit_schema(&reg).unwrap(), xml_osi::xsd::emit_schema(&reg).unwrap());
    }
}
