//! Small helpers over the kuchiki tree
//!
//! Element lists are always collected before the caller mutates anything:
//! detaching or replacing nodes while a traversal is live would skip nodes.

use kuchiki::traits::*;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

/// Parse markup into a document tree
#[must_use]
pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// Every element under `root` (inclusive) whose local name is in `names`
pub(crate) fn elements_named(root: &NodeRef, names: &[&str]) -> Vec<NodeDataRef<ElementData>> {
    root.inclusive_descendants()
        .elements()
        .filter(|element| names.contains(&&*element.name.local))
        .collect()
}

/// Every element under `root` (inclusive)
pub(crate) fn all_elements(root: &NodeRef) -> Vec<NodeDataRef<ElementData>> {
    root.inclusive_descendants().elements().collect()
}

pub(crate) fn attribute(element: &NodeDataRef<ElementData>, name: &str) -> Option<String> {
    element.attributes.borrow().get(name).map(str::to_string)
}

pub(crate) fn set_attribute(element: &NodeDataRef<ElementData>, name: &str, value: String) {
    element.attributes.borrow_mut().insert(name, value);
}

pub(crate) fn remove_attribute(element: &NodeDataRef<ElementData>, name: &str) {
    element.attributes.borrow_mut().remove(name);
}

/// Build a detached element by parsing `markup` and taking its first `name` element
pub(crate) fn create_element(markup: &str, name: &str) -> Option<NodeRef> {
    let fragment = parse_document(markup);
    let element = elements_named(&fragment, &[name]).into_iter().next()?;
    let node = element.as_node().clone();
    node.detach();
    Some(node)
}

/// Replace all children of `node` with a single text node
pub(crate) fn set_text_content(node: &NodeRef, text: String) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}
