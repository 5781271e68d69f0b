use std::rc::Rc;

use formats::NodeLookup;
use foundation::{LonLatBounds, WidgetId};
use layers::{OverlaySource, StylePalette, StyleResolver};
use scene::SiteSelection;
use tracing::{debug, info, warn};

use crate::config::{BridgeConfig, DrawToolsConfig, TileLayerConfig};
use crate::error::BridgeError;
use crate::registry::MapRegistry;
use crate::watch::ContainerLifecycle;

/// A DOM element that can host a map.
pub trait MapContainer {
    /// Id the map widget stamped on the element, if a map was created on it.
    fn widget_id(&self) -> Option<WidgetId>;
    fn data_attribute(&self, name: &str) -> Option<String>;
}

/// Fixed parameters for every new map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSetup {
    pub world_copy_jump: bool,
    pub tiles: TileLayerConfig,
    /// Initial view; `None` leaves the widget's default view.
    pub fit_bounds: Option<LonLatBounds>,
    pub draw: DrawToolsConfig,
}

/// The mapping library, narrowed to what the controller needs.
pub trait MapBackend {
    type Container: MapContainer;
    type Map;
    type Layer;

    /// Creates a map with its tile layer, initial view, editable group, and
    /// draw control wired up.
    fn create_map(
        &mut self,
        container: &Self::Container,
        setup: &MapSetup,
    ) -> Result<(WidgetId, Self::Map), BridgeError>;

    /// Draws the overlay polygons on `map`, styled by `resolver`.
    fn render_polygons(
        &mut self,
        map: &mut Self::Map,
        overlay: &Rc<OverlaySource>,
        resolver: StyleResolver,
    ) -> Result<Self::Layer, BridgeError>;

    /// Replaces the style of an existing overlay layer in place.
    fn restyle(&mut self, layer: &mut Self::Layer, resolver: StyleResolver)
    -> Result<(), BridgeError>;

    fn remove_map(&mut self, map: Self::Map, overlay: Option<Self::Layer>);
}

/// Owns every live map and keeps it in step with its container.
pub struct MapController<B: MapBackend> {
    backend: B,
    registry: MapRegistry<B::Map, B::Layer>,
    overlay: Rc<OverlaySource>,
    nodes: NodeLookup,
    setup: MapSetup,
    sites_attribute: String,
    column_attribute: String,
    palette: StylePalette,
}

impl<B: MapBackend> MapController<B> {
    /// `fit_bounds` is usually the bounding box of the full background grid.
    pub fn new(
        backend: B,
        overlay: Rc<OverlaySource>,
        nodes: NodeLookup,
        fit_bounds: Option<LonLatBounds>,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            backend,
            registry: MapRegistry::new(),
            overlay,
            nodes,
            setup: MapSetup {
                world_copy_jump: config.world_copy_jump,
                tiles: config.tiles.clone(),
                fit_bounds,
                draw: config.draw,
            },
            sites_attribute: config.sites_attribute.clone(),
            column_attribute: config.column_attribute.clone(),
            palette: config.palette.clone(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn registry(&self) -> &MapRegistry<B::Map, B::Layer> {
        &self.registry
    }

    pub fn setup(&self) -> &MapSetup {
        &self.setup
    }

    /// Resolver for the container's current attributes.
    pub fn resolver_for(&self, container: &B::Container) -> StyleResolver {
        let sites = container.data_attribute(&self.sites_attribute);
        let column = container
            .data_attribute(&self.column_attribute)
            .and_then(|name| self.nodes.resolve(&name));
        StyleResolver::new(
            SiteSelection::from_attribute(sites.as_deref()),
            column,
            self.palette.clone(),
        )
    }

    /// Creates the overlay for the container's map, or restyles the one it
    /// already has. Containers without a registered map are ignored.
    pub fn configure(&mut self, container: &B::Container) -> Result<(), BridgeError> {
        let Some(id) = container.widget_id() else {
            return Ok(());
        };
        if !self.registry.contains(id) {
            return Ok(());
        }
        let resolver = self.resolver_for(container);
        debug!(
            "updating map {id}: {} selected sites, column {:?}",
            resolver.selection().len(),
            resolver.column()
        );

        let Some(entry) = self.registry.get_mut(id) else {
            return Ok(());
        };
        match entry.overlay.as_mut() {
            Some(layer) => self.backend.restyle(layer, resolver),
            None => {
                debug!("adding overlay layer to map {id}");
                let layer = self
                    .backend
                    .render_polygons(&mut entry.map, &self.overlay, resolver)?;
                entry.overlay = Some(layer);
                Ok(())
            }
        }
    }

    fn add_container(&mut self, container: &B::Container) -> Result<(), BridgeError> {
        if let Some(id) = container.widget_id()
            && self.registry.contains(id)
        {
            debug!("map {id} already initialised");
            return Ok(());
        }

        let (id, map) = self.backend.create_map(container, &self.setup)?;
        if let Some(stale) = self.registry.insert(id, map) {
            self.backend.remove_map(stale.map, stale.overlay);
        }
        info!("added map with widget id {id}");
        self.configure(container)
    }
}

impl<B: MapBackend> ContainerLifecycle for MapController<B> {
    type Container = B::Container;

    fn on_container_added(&mut self, container: &B::Container) {
        if let Err(err) = self.add_container(container) {
            warn!("failed to initialise map container: {err}");
        }
    }

    fn on_container_removed(&mut self, container: &B::Container) {
        let Some(id) = container.widget_id() else {
            return;
        };
        match self.registry.remove(id) {
            Some(entry) => {
                info!("removing map with widget id {id}");
                self.backend.remove_map(entry.map, entry.overlay);
            }
            None => debug!("no map registered for widget id {id}"),
        }
    }

    fn on_container_attribute_changed(
        &mut self,
        container: &B::Container,
        attribute: &str,
        old_value: Option<&str>,
    ) {
        debug!("{attribute} changed (was {old_value:?})");
        if let Err(err) = self.configure(container) {
            warn!("failed to restyle map: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::{MapBackend, MapContainer, MapController, MapSetup};
    use crate::config::BridgeConfig;
    use crate::error::BridgeError;
    use crate::watch::{ContainerLifecycle, ContainerMutation, WatchLoop};
    use formats::{NodeLookup, SiteCollection};
    use foundation::WidgetId;
    use layers::{OverlaySource, PolygonStyle, StyleResolver};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct FakeContainer {
        id: Cell<Option<WidgetId>>,
        attrs: RefCell<HashMap<String, String>>,
    }

    impl FakeContainer {
        fn new(attrs: &[(&str, &str)]) -> Self {
            Self {
                id: Cell::new(None),
                attrs: RefCell::new(
                    attrs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                ),
            }
        }

        fn set(&self, name: &str, value: &str) {
            self.attrs
                .borrow_mut()
                .insert(name.to_string(), value.to_string());
        }
    }

    impl MapContainer for FakeContainer {
        fn widget_id(&self) -> Option<WidgetId> {
            self.id.get()
        }

        fn data_attribute(&self, name: &str) -> Option<String> {
            self.attrs.borrow().get(name).cloned()
        }
    }

    #[derive(Debug)]
    struct FakeMap {
        id: WidgetId,
    }

    #[derive(Debug)]
    struct FakeLayer {
        overlay: Rc<OverlaySource>,
        styles: Vec<PolygonStyle>,
    }

    #[derive(Default)]
    struct FakeBackend {
        next_id: u64,
        setups: Vec<MapSetup>,
        rendered: usize,
        restyled: usize,
        removed: Vec<WidgetId>,
        fail_create: bool,
    }

    impl MapBackend for FakeBackend {
        type Container = FakeContainer;
        type Map = FakeMap;
        type Layer = FakeLayer;

        fn create_map(
            &mut self,
            container: &FakeContainer,
            setup: &MapSetup,
        ) -> Result<(WidgetId, FakeMap), BridgeError> {
            if self.fail_create {
                return Err(BridgeError::Backend("no tiles".to_string()));
            }
            self.next_id += 1;
            let id = WidgetId::new(self.next_id);
            container.id.set(Some(id));
            self.setups.push(setup.clone());
            Ok((id, FakeMap { id }))
        }

        fn render_polygons(
            &mut self,
            _map: &mut FakeMap,
            overlay: &Rc<OverlaySource>,
            resolver: StyleResolver,
        ) -> Result<FakeLayer, BridgeError> {
            self.rendered += 1;
            Ok(FakeLayer {
                overlay: Rc::clone(overlay),
                styles: styles_of(overlay, &resolver),
            })
        }

        fn restyle(
            &mut self,
            layer: &mut FakeLayer,
            resolver: StyleResolver,
        ) -> Result<(), BridgeError> {
            self.restyled += 1;
            layer.styles = styles_of(&layer.overlay, &resolver);
            Ok(())
        }

        fn remove_map(&mut self, map: FakeMap, _overlay: Option<FakeLayer>) {
            self.removed.push(map.id);
        }
    }

    fn styles_of(overlay: &OverlaySource, resolver: &StyleResolver) -> Vec<PolygonStyle> {
        overlay
            .sites()
            .features
            .iter()
            .map(|f| resolver.style_for(f.id.as_ref(), &f.properties))
            .collect()
    }

    fn background() -> SiteCollection {
        let cell = |id: u64, data: serde_json::Value| {
            json!({
                "type": "Feature",
                "id": id,
                "properties": { "data": data },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 0]]] }
            })
        };
        SiteCollection::from_geojson_value(json!({
            "type": "FeatureCollection",
            "features": [
                cell(3, json!({ "1": [0] })),
                cell(5, json!({ "-1": [0], "2": [1] })),
                cell(7, json!({ "2": [0] })),
                cell(9, json!({ "1": [1] }))
            ]
        }))
        .expect("parse background")
    }

    fn controller() -> MapController<FakeBackend> {
        let bg = background();
        let nodes = NodeLookup::from_value(json!([
            { "header": "Node_0", "index": 0 },
            { "header": "Carnivora", "index": 1 }
        ]))
        .expect("parse nodes");
        MapController::new(
            FakeBackend::default(),
            Rc::new(OverlaySource::from_background(&bg)),
            nodes,
            bg.bounds(),
            &BridgeConfig::default(),
        )
    }

    fn fills(ctl: &MapController<FakeBackend>, id: WidgetId) -> Vec<(bool, String)> {
        let entry = ctl.registry().get(id).expect("entry");
        let layer = entry.overlay.as_ref().expect("overlay");
        layer
            .styles
            .iter()
            .map(|s| (s.fill, s.fill_color.clone()))
            .collect()
    }

    fn red(fill: bool) -> (bool, String) {
        (fill, "red".to_string())
    }

    #[test]
    fn added_container_gets_one_map_and_one_overlay() {
        let mut ctl = controller();
        let c = FakeContainer::new(&[("data-map-sites", "3 7 9")]);
        ctl.on_container_added(&c);

        let id = c.widget_id().expect("widget id");
        assert_eq!(ctl.registry().len(), 1);
        assert_eq!(ctl.registry().overlay_count(id), 1);
        assert_eq!(ctl.backend().rendered, 1);
        assert_eq!(
            fills(&ctl, id),
            vec![red(true), red(false), red(true), red(true)]
        );
    }

    #[test]
    fn new_maps_use_background_bounds_and_tile_settings() {
        let mut ctl = controller();
        let c = FakeContainer::new(&[]);
        ctl.on_container_added(&c);
        let setup = &ctl.backend().setups[0];
        assert!(setup.world_copy_jump);
        assert_eq!((setup.tiles.min_zoom, setup.tiles.max_zoom), (2, 12));
        assert_eq!(
            setup.fit_bounds.map(|b| b.south_west_north_east()),
            Some([[0.0, 0.0], [4.0, 4.0]])
        );
    }

    #[test]
    fn containers_are_independent() {
        let mut ctl = controller();
        let a = FakeContainer::new(&[]);
        let b = FakeContainer::new(&[]);
        ctl.on_container_added(&a);
        ctl.on_container_added(&b);
        assert_eq!(ctl.registry().len(), 2);

        ctl.on_container_removed(&a);
        let a_id = a.widget_id().expect("a id");
        let b_id = b.widget_id().expect("b id");
        assert!(!ctl.registry().contains(a_id));
        assert!(ctl.registry().contains(b_id));
        assert_eq!(ctl.registry().overlay_count(b_id), 1);
        assert_eq!(ctl.backend().removed, vec![a_id]);
    }

    #[test]
    fn reconfiguring_never_adds_a_second_overlay() {
        let mut ctl = controller();
        let c = FakeContainer::new(&[("data-map-sites", "3")]);
        ctl.on_container_added(&c);
        let id = c.widget_id().expect("widget id");

        c.set("data-map-sites", "5");
        ctl.on_container_attribute_changed(&c, "data-map-sites", Some("3"));
        c.set("data-map-column", "0");
        ctl.on_container_attribute_changed(&c, "data-map-column", None);

        assert_eq!(ctl.registry().overlay_count(id), 1);
        assert_eq!(ctl.backend().rendered, 1);
        assert_eq!(ctl.backend().restyled, 2);
        assert_eq!(
            fills(&ctl, id),
            vec![
                (true, "blue".to_string()),
                red(true),
                (true, "purple".to_string()),
                red(false)
            ]
        );
    }

    #[test]
    fn column_names_resolve_through_node_lookup() {
        let mut ctl = controller();
        let c = FakeContainer::new(&[("data-map-column", "Carnivora")]);
        ctl.on_container_added(&c);
        let id = c.widget_id().expect("widget id");
        assert_eq!(
            fills(&ctl, id),
            vec![
                red(false),
                (true, "purple".to_string()),
                red(false),
                (true, "blue".to_string())
            ]
        );
    }

    #[test]
    fn unknown_containers_are_ignored() {
        let mut ctl = controller();
        let stranger = FakeContainer::new(&[("data-map-sites", "3")]);
        ctl.on_container_attribute_changed(&stranger, "data-map-sites", None);
        ctl.on_container_removed(&stranger);

        stranger.id.set(Some(WidgetId::new(77)));
        ctl.on_container_removed(&stranger);
        assert!(ctl.configure(&stranger).is_ok());
        assert!(ctl.registry().is_empty());
        assert!(ctl.backend().removed.is_empty());
    }

    #[test]
    fn initialised_container_is_not_created_twice() {
        let mut ctl = controller();
        let c = FakeContainer::new(&[]);
        ctl.on_container_added(&c);
        ctl.on_container_added(&c);
        assert_eq!(ctl.registry().len(), 1);
        assert_eq!(ctl.backend().setups.len(), 1);
    }

    #[test]
    fn failed_creation_leaves_registry_untouched() {
        let mut ctl = controller();
        ctl.backend_mut().fail_create = true;
        let c = FakeContainer::new(&[]);
        ctl.on_container_added(&c);
        assert!(ctl.registry().is_empty());
        assert_eq!(c.widget_id(), None);
    }

    #[test]
    fn watch_loop_drives_the_controller() {
        let mut ctl = controller();
        let watch = WatchLoop::new(BridgeConfig::default().watched_attributes());
        let a = Rc::new(FakeContainer::new(&[]));
        let b = Rc::new(FakeContainer::new(&[("data-map-sites", "9")]));

        struct Shared<'a>(&'a mut MapController<FakeBackend>);
        impl ContainerLifecycle for Shared<'_> {
            type Container = Rc<FakeContainer>;
            fn on_container_added(&mut self, c: &Rc<FakeContainer>) {
                self.0.on_container_added(c);
            }
            fn on_container_removed(&mut self, c: &Rc<FakeContainer>) {
                self.0.on_container_removed(c);
            }
            fn on_container_attribute_changed(
                &mut self,
                c: &Rc<FakeContainer>,
                attribute: &str,
                old_value: Option<&str>,
            ) {
                self.0.on_container_attribute_changed(c, attribute, old_value);
            }
        }

        watch.dispatch(
            &mut Shared(&mut ctl),
            vec![
                ContainerMutation::Added(Rc::clone(&a)),
                ContainerMutation::Added(Rc::clone(&b)),
                ContainerMutation::Removed(Rc::clone(&a)),
            ],
        );
        assert_eq!(ctl.registry().len(), 1);
        let b_id = b.widget_id().expect("b id");
        assert_eq!(
            fills(&ctl, b_id),
            vec![red(false), red(false), red(false), red(true)]
        );

        b.set("data-map-sites", "3");
        watch.dispatch(
            &mut Shared(&mut ctl),
            vec![ContainerMutation::AttributeChanged {
                target: Rc::clone(&b),
                attribute: "data-map-sites".to_string(),
                old_value: Some("9".to_string()),
            }],
        );
        assert_eq!(
            fills(&ctl, b_id),
            vec![red(true), red(false), red(false), red(false)]
        );
        assert_eq!(ctl.registry().overlay_count(b_id), 1);
    }
}
