//! Markup serialization for document nodes, through html5ever's
//! `HtmlSerializer`.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::{LocalName, Namespace, QualName};

use super::{HTML_NAMESPACE, NodeData, NodeRef};

/// Elements whose text children are not document text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(super) fn is_raw_text_element(node: NodeRef<'_>) -> bool {
    node.name().is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name))
}

fn element_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(name))
}

fn attribute_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

impl NodeRef<'_> {
    /// Serialize this node, including its own tags.
    #[must_use]
    pub fn outer_html(self) -> String {
        self.to_html(TraversalScope::IncludeNode)
    }

    /// Serialize this node's children.
    #[must_use]
    pub fn inner_html(self) -> String {
        self.to_html(TraversalScope::ChildrenOnly(self.name().map(element_name)))
    }

    fn to_html(self, traversal_scope: TraversalScope) -> String {
        let mut out = Vec::new();
        let opts = SerializeOpts {
            scripting_enabled: false,
            traversal_scope,
            create_missing_parent: false,
        };
        // Writing into a Vec<u8> cannot fail.
        match serialize(&mut out, &self, opts) {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => String::new(),
        }
    }

    fn serialize_children<S: Serializer>(self, serializer: &mut S) -> io::Result<()> {
        for child in self.children() {
            child.serialize(serializer, TraversalScope::IncludeNode)?;
        }
        Ok(())
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        if matches!(traversal_scope, TraversalScope::ChildrenOnly(_)) {
            return self.serialize_children(serializer);
        }
        match &self.node().data {
            NodeData::Document => self.serialize_children(serializer),
            NodeData::Element { name, attrs } => {
                let names: Vec<QualName> = attrs.iter().map(|a| attribute_name(&a.name)).collect();
                let pairs = names.iter().zip(attrs).map(|(n, a)| (n, a.value.as_str()));
                serializer.start_elem(element_name(name), pairs)?;
                self.serialize_children(serializer)?;
                serializer.end_elem(element_name(name))
            }
            NodeData::Text(text) => serializer.write_text(text),
            NodeData::Comment(text) => serializer.write_comment(text),
        }
    }
}
