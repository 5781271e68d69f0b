/// Container lifecycle callbacks driven by whatever watches the document.
///
/// Implementations must tolerate containers they have never seen: removal
/// and attribute changes for unknown containers are no-ops.
pub trait ContainerLifecycle {
    type Container;

    fn on_container_added(&mut self, container: &Self::Container);
    fn on_container_removed(&mut self, container: &Self::Container);
    fn on_container_attribute_changed(
        &mut self,
        container: &Self::Container,
        attribute: &str,
        old_value: Option<&str>,
    );
}

/// One observed change, already narrowed to map containers.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerMutation<C> {
    Added(C),
    Removed(C),
    AttributeChanged {
        target: C,
        attribute: String,
        old_value: Option<String>,
    },
}

/// Dispatches observed container changes to a lifecycle.
///
/// Ordering contract:
/// - Mutations are applied one at a time in delivery order; nothing is
///   coalesced, so a batch holding an add and a remove of the same container
///   creates and then tears down its map.
/// - Attribute changes outside the watched set are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchLoop {
    attributes: Vec<String>,
}

impl WatchLoop {
    pub fn new(attributes: Vec<String>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn watches(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn dispatch<L: ContainerLifecycle>(
        &self,
        lifecycle: &mut L,
        mutations: impl IntoIterator<Item = ContainerMutation<L::Container>>,
    ) {
        for mutation in mutations {
            match mutation {
                ContainerMutation::Added(c) => lifecycle.on_container_added(&c),
                ContainerMutation::Removed(c) => lifecycle.on_container_removed(&c),
                ContainerMutation::AttributeChanged {
                    target,
                    attribute,
                    old_value,
                } => {
                    if self.watches(&attribute) {
                        lifecycle.on_container_attribute_changed(
                            &target,
                            &attribute,
                            old_value.as_deref(),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainerLifecycle, ContainerMutation, WatchLoop};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl ContainerLifecycle for Trace {
        type Container = &'static str;

        fn on_container_added(&mut self, c: &&'static str) {
            self.0.push(format!("add {c}"));
        }

        fn on_container_removed(&mut self, c: &&'static str) {
            self.0.push(format!("remove {c}"));
        }

        fn on_container_attribute_changed(
            &mut self,
            c: &&'static str,
            attribute: &str,
            old_value: Option<&str>,
        ) {
            self.0
                .push(format!("attr {c} {attribute} {}", old_value.unwrap_or("-")));
        }
    }

    fn watch() -> WatchLoop {
        WatchLoop::new(vec!["data-map-sites".to_string(), "data-map-column".to_string()])
    }

    #[test]
    fn applies_each_mutation_in_order() {
        let mut trace = Trace::default();
        watch().dispatch(
            &mut trace,
            vec![
                ContainerMutation::Added("a"),
                ContainerMutation::AttributeChanged {
                    target: "a",
                    attribute: "data-map-sites".to_string(),
                    old_value: Some("1 2".to_string()),
                },
                ContainerMutation::Removed("a"),
                ContainerMutation::Added("b"),
            ],
        );
        assert_eq!(
            trace.0,
            vec!["add a", "attr a data-map-sites 1 2", "remove a", "add b"]
        );
    }

    #[test]
    fn ignores_unwatched_attributes() {
        let mut trace = Trace::default();
        watch().dispatch(
            &mut trace,
            vec![
                ContainerMutation::AttributeChanged {
                    target: "a",
                    attribute: "class".to_string(),
                    old_value: None,
                },
                ContainerMutation::AttributeChanged {
                    target: "a",
                    attribute: "data-map-column".to_string(),
                    old_value: None,
                },
            ],
        );
        assert_eq!(trace.0, vec!["attr a data-map-column -"]);
    }
}
