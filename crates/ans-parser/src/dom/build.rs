//! Materialises an html5ever `RcDom` into a [`Document`].
//!
//! Markup that declares document structure (a doctype or `<html>`, `<head>`,
//! `<body>` tags) is parsed as a full document. Anything else is parsed as a
//! fragment in `<body>` context, so leading `<noscript>` or `<script>`
//! elements stay in the content instead of being hoisted into `<head>`. Both
//! paths produce the same `html > body` spine.

use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{LocalName, Namespace, QualName, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData as DomData, RcDom};

use super::{Attribute, Document, HTML_NAMESPACE, NodeData, NodeId};

const DOCUMENT_MARKERS: &[&str] = &["<!doctype", "<html", "<head", "<body"];

pub(super) fn build(html: &str) -> Document {
    let mut doc = Document::empty();
    // Dropping an `RcDom` node clears its descendants' child lists, so the
    // parsed DOM must outlive `copy_tree`.
    let dom: RcDom;
    let pending: Vec<(Handle, NodeId)> = if is_full_document(html) {
        dom = parse_document(RcDom::default(), parse_options()).one(html);
        vec![(dom.document.clone(), Document::ROOT)]
    } else {
        let context = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from("body"),
        );
        dom =
            parse_fragment(RcDom::default(), parse_options(), context, Vec::new()).one(html);
        let html_id = doc.push(Document::ROOT, element("html"));
        let body_id = doc.push(html_id, element("body"));
        // The fragment's synthetic `<html>` root holds the parsed nodes.
        let roots: Vec<_> = dom
            .document
            .children
            .borrow()
            .iter()
            .map(|root| (root.clone(), body_id))
            .collect();
        roots
    };
    copy_tree(&mut doc, pending);
    doc
}

fn parse_options() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            // `<noscript>` content is parsed as markup, not raw text.
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn is_full_document(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    DOCUMENT_MARKERS.iter().any(|marker| {
        lower.match_indices(marker).any(|(at, _)| {
            lower[at + marker.len()..]
                .chars()
                .next()
                .is_none_or(|c| c.is_ascii_whitespace() || c == '>' || c == '/')
        })
    })
}

fn element(name: &str) -> NodeData {
    NodeData::Element {
        name: name.to_string(),
        attrs: Vec::new(),
    }
}

/// Append the children of every pending handle under its arena parent.
fn copy_tree(doc: &mut Document, mut pending: Vec<(Handle, NodeId)>) {
    while let Some((handle, parent)) = pending.pop() {
        for child in handle.children.borrow().iter() {
            match &child.data {
                DomData::Element { name, attrs, .. } => {
                    let attrs = attrs
                        .borrow()
                        .iter()
                        .map(|attr| Attribute {
                            name: attr.name.local.to_string(),
                            value: attr.value.to_string(),
                        })
                        .collect();
                    let id = doc.push(
                        parent,
                        NodeData::Element {
                            name: name.local.to_string(),
                            attrs,
                        },
                    );
                    pending.push((child.clone(), id));
                }
                DomData::Text { contents } => doc.push_text(parent, &contents.borrow()),
                DomData::Comment { contents } => {
                    doc.push(parent, NodeData::Comment(contents.to_string()));
                }
                DomData::Document
                | DomData::Doctype { .. }
                | DomData::ProcessingInstruction { .. } => {}
            }
        }
    }
}
