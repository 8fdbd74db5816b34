// @generated by xml-osi from a sample with root <Example>. Do not edit.
//
// Types:
//   Example <Example>
//   Node1 <node1>
//   Node2 <node2>
//   Node3 <node3>
//   Node4 <node4>
//   Node5 <node5>
//   Node6 <node6>
//   Node7 <node7>

use ::xml_osi::dom as xml_dom;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node1 {
    pub att1: i64,
    pub att2: f64,
    pub att3: ::std::string::String,
}

impl Node1 {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            att1: node.attr_i64("att1"),
            att2: node.attr_f64("att2"),
            att3: node.attr_str("att3"),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        node.append_attr("att1", self.att1.to_string());
        node.append_attr("att2", self.att2.to_string());
        node.append_attr("att3", self.att3.clone());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node3 {
    pub att1: ::std::string::String,
    pub att2: ::std::string::String,
    pub text: ::std::string::String,
}

impl Node3 {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            att1: node.attr_str("att1"),
            att2: node.attr_str("att2"),
            text: node.text_str(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        node.append_attr("att1", self.att1.clone());
        if !self.att2.is_empty() {
            node.append_attr("att2", self.att2.clone());
        }
        node.set_text(self.text.clone());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node2 {
    pub att1: ::std::string::String,
    pub node3_list: ::std::vec::Vec<Node3>,
}

impl Node2 {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            att1: node.attr_str("att1"),
            node3_list: node.children_named("node3").map(Node3::read).collect(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        node.append_attr("att1", self.att1.clone());
        for child in &self.node3_list {
            child.write(node.append_child("node3"));
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node5 {
    pub text: i64,
}

impl Node5 {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            text: node.text_i64(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        node.set_text(self.text.to_string());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node4 {
    pub att1: ::std::string::String,
    pub node5_list: ::std::vec::Vec<Node5>,
}

impl Node4 {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            att1: node.attr_str("att1"),
            node5_list: node.children_named("node5").map(Node5::read).collect(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        if !self.att1.is_empty() {
            node.append_attr("att1", self.att1.clone());
        }
        for child in &self.node5_list {
            child.write(node.append_child("node5"));
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node7 {
    pub text: f64,
}

impl Node7 {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            text: node.text_f64(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        node.set_text(self.text.to_string());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node6 {
    pub att1: ::std::string::String,
    pub node7_list: ::std::vec::Vec<Node7>,
}

impl Node6 {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            att1: node.attr_str("att1"),
            node7_list: node.children_named("node7").map(Node7::read).collect(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        node.append_attr("att1", self.att1.clone());
        for child in &self.node7_list {
            child.write(node.append_child("node7"));
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Example {
    pub node1: Node1,
    pub node2_list: ::std::vec::Vec<Node2>,
    pub node4_list: ::std::vec::Vec<Node4>,
    pub node6_list: ::std::vec::Vec<Node6>,
}

impl Example {
    pub fn read(node: &xml_dom::Element) -> Self {
        Self {
            node1: node.child("node1").map(Node1::read).unwrap_or_default(),
            node2_list: node.children_named("node2").map(Node2::read).collect(),
            node4_list: node.children_named("node4").map(Node4::read).collect(),
            node6_list: node.children_named("node6").map(Node6::read).collect(),
        }
    }

    pub fn write(&self, node: &mut xml_dom::Element) {
        self.node1.write(node.append_child("node1"));
        for child in &self.node2_list {
            child.write(node.append_child("node2"));
        }
        for child in &self.node4_list {
            child.write(node.append_child("node4"));
        }
        for child in &self.node6_list {
            child.write(node.append_child("node6"));
        }
    }
}

/// Owns the document root and moves it to and from disk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExampleFile {
    pub root: Example,
}

impl ExampleFile {
    pub const ROOT: &'static str = "Example";

    pub fn load(&mut self, path: impl AsRef<::std::path::Path>) -> xml_dom::Result<()> {
        let node = xml_dom::load_root(path, Self::ROOT)?;
        self.root = Example::read(&node);
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<::std::path::Path>) -> xml_dom::Result<()> {
        let mut node = xml_dom::Element::new(Self::ROOT);
        self.root.write(&mut node);
        xml_dom::save_file(&node, path)
    }
}
