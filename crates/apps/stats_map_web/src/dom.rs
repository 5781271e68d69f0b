use foundation::WidgetId;
use runtime::{ContainerMutation, MapContainer};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, MutationRecord, Node, NodeList};

/// Property Leaflet stamps on the element it creates a map in.
const WIDGET_ID_PROPERTY: &str = "_leaflet_id";

#[derive(Debug, Clone)]
pub struct DomContainer(Element);

impl DomContainer {
    pub fn new(element: Element) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }
}

impl MapContainer for DomContainer {
    fn widget_id(&self) -> Option<WidgetId> {
        js_sys::Reflect::get(&self.0, &JsValue::from_str(WIDGET_ID_PROPERTY))
            .ok()?
            .as_f64()
            .and_then(WidgetId::from_js_number)
    }

    fn data_attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

/// True when the whitespace-separated `class` attribute lists `marker_class`.
pub fn has_class(class_attr: &str, marker_class: &str) -> bool {
    class_attr.split_whitespace().any(|c| c == marker_class)
}

/// The matching root, when there is one, ahead of its matching descendants.
pub fn root_first<T>(root: Option<T>, descendants: impl IntoIterator<Item = T>) -> Vec<T> {
    root.into_iter().chain(descendants).collect()
}

/// One childList record as container changes: additions, then removals.
pub fn child_list_mutations<C>(added: Vec<C>, removed: Vec<C>) -> Vec<ContainerMutation<C>> {
    added
        .into_iter()
        .map(ContainerMutation::Added)
        .chain(removed.into_iter().map(ContainerMutation::Removed))
        .collect()
}

/// Elements carrying `marker_class` in the subtree rooted at `node`,
/// the root included. Text and comment nodes yield nothing.
pub fn marked_elements(node: &Node, marker_class: &str) -> Vec<Element> {
    let Some(root) = node.dyn_ref::<Element>() else {
        return Vec::new();
    };
    let matching_root = root
        .get_attribute("class")
        .is_some_and(|class_attr| has_class(&class_attr, marker_class))
        .then(|| root.clone());
    let descendants = root.get_elements_by_class_name(marker_class);
    root_first(
        matching_root,
        (0..descendants.length()).filter_map(|i| descendants.item(i)),
    )
}

fn marked_in(nodes: &NodeList, marker_class: &str) -> Vec<DomContainer> {
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .flat_map(|node| marked_elements(&node, marker_class))
        .map(DomContainer::new)
        .collect()
}

/// Narrows one MutationObserver record to container changes: additions
/// first, then removals, then the attribute change.
pub fn translate_record(
    record: &MutationRecord,
    marker_class: &str,
) -> Vec<ContainerMutation<DomContainer>> {
    match record.type_().as_str() {
        "childList" => child_list_mutations(
            marked_in(&record.added_nodes(), marker_class),
            marked_in(&record.removed_nodes(), marker_class),
        ),
        "attributes" => {
            let target = record.target().and_then(|n| n.dyn_into::<Element>().ok());
            match (target, record.attribute_name()) {
                (Some(element), Some(attribute)) => vec![ContainerMutation::AttributeChanged {
                    target: DomContainer::new(element),
                    attribute,
                    old_value: record.old_value(),
                }],
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}
