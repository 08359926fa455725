//! Removal of executable content
//!
//! Both sweeps are idempotent and run after every inlining step, right
//! before serialization. Sub-documents are swept before they are attached.

use kuchiki::NodeRef;

use super::dom::{all_elements, elements_named, remove_attribute};

/// Detach every `<script>` element, returning how many were removed
pub fn remove_scripts(root: &NodeRef) -> usize {
    let scripts = elements_named(root, &["script"]);
    let count = scripts.len();
    for script in scripts {
        script.as_node().detach();
    }
    count
}

fn is_event_handler(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

/// Strip every `on*` attribute from every element, returning how many were removed
pub fn remove_event_handlers(root: &NodeRef) -> usize {
    let mut removed = 0;
    for element in all_elements(root) {
        let handlers: Vec<String> = element
            .attributes
            .borrow()
            .map
            .keys()
            .filter(|name| is_event_handler(&name.local))
            .map(|name| name.local.to_string())
            .collect();

        for handler in &handlers {
            remove_attribute(&element, handler);
        }
        removed += handlers.len();
    }
    removed
}
