use std::cell::RefCell;
use std::rc::Rc;

use formats::{FeatureId, SiteCollection};
use foundation::WidgetId;
use layers::{OverlaySource, PolygonStyle, StyleResolver};
use runtime::{BridgeError, EditableGroup, MapBackend, MapSetup, SelectionBridge};
use serde_json::{Map, Value, json};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::describe_js;
use crate::dom::DomContainer;
use crate::elm::ElmPorts;

/// `L.Draw.Event.CREATED`
const DRAW_CREATED: &str = "draw:created";
/// `L.Draw.Event.DRAWSTART`
const DRAW_START: &str = "draw:drawstart";

#[wasm_bindgen(inline_js = "
export function stats_map_create(container, options) {
    const map = L.map(container, { worldCopyJump: options.worldCopyJump });
    L.tileLayer(options.tiles.urlTemplate, {
        attribution: options.tiles.attribution,
        minZoom: options.tiles.minZoom,
        maxZoom: options.tiles.maxZoom
    }).addTo(map);
    if (options.fitBounds) {
        map.fitBounds(options.fitBounds);
    }
    const editable = new L.FeatureGroup();
    map.addLayer(editable);
    map.addControl(new L.Control.Draw({ draw: options.draw }));
    return { map: map, editable: editable, widgetId: container._leaflet_id };
}

export function stats_map_on(map, event, handler) {
    map.on(event, handler);
}

export function stats_map_remove(map) {
    map.remove();
}

export function stats_map_add_geojson(map, data, style) {
    return L.geoJSON(data, { style: style }).addTo(map);
}

export function stats_map_set_style(layer, style) {
    layer.setStyle(style);
}

export function stats_map_event_layer(event) {
    return event.layer;
}

export function stats_map_group_add(group, layer) {
    group.addLayer(layer);
}

export function stats_map_group_geojson(group) {
    return group.toGeoJSON();
}

export function stats_map_group_clear(group) {
    group.clearLayers();
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn stats_map_create(container: &web_sys::Element, options: &JsValue) -> Result<JsValue, JsValue>;

    fn stats_map_on(map: &JsValue, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(catch)]
    fn stats_map_remove(map: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn stats_map_add_geojson(
        map: &JsValue,
        data: &JsValue,
        style: &js_sys::Function,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn stats_map_set_style(layer: &JsValue, style: &js_sys::Function) -> Result<(), JsValue>;

    fn stats_map_event_layer(event: &JsValue) -> JsValue;

    fn stats_map_group_add(group: &JsValue, layer: &JsValue);

    #[wasm_bindgen(catch)]
    fn stats_map_group_geojson(group: &JsValue) -> Result<JsValue, JsValue>;

    fn stats_map_group_clear(group: &JsValue);
}

/// Options object handed to `stats_map_create`.
fn map_options(setup: &MapSetup) -> Value {
    let draw = setup.draw;
    json!({
        "worldCopyJump": setup.world_copy_jump,
        "tiles": {
            "urlTemplate": setup.tiles.url_template,
            "attribution": setup.tiles.attribution,
            "minZoom": setup.tiles.min_zoom,
            "maxZoom": setup.tiles.max_zoom,
        },
        "fitBounds": setup.fit_bounds.map(|b| b.south_west_north_east()),
        "draw": {
            "polygon": draw.polygon,
            "rectangle": draw.rectangle,
            "polyline": draw.polyline,
            "marker": draw.marker,
            "circle": draw.circle,
            "circlemarker": draw.circlemarker,
        },
    })
}

/// Feature id from its `JSON.stringify` form. Going through JSON keeps
/// integral ids integral, so `3` matches the selection token `3`.
fn feature_id_from_json(text: &str) -> Option<FeatureId> {
    let value: Value = serde_json::from_str(text).ok()?;
    FeatureId::from_value(&value)
}

/// Style of one drawn feature from the `JSON.stringify` forms of its `id`
/// and `properties` members. Unreadable members count as absent.
fn feature_style(
    resolver: &StyleResolver,
    id_json: Option<&str>,
    properties_json: Option<&str>,
) -> PolygonStyle {
    let id = id_json.and_then(feature_id_from_json);
    let properties = properties_json
        .and_then(|text| serde_json::from_str::<Map<String, Value>>(text).ok())
        .unwrap_or_default();
    resolver.style_for(id.as_ref(), &properties)
}

/// The id the widget stamped on its container. Without one the half-built
/// map is removed; a failed removal is logged, not returned.
fn stamped_widget_id(
    raw: Option<f64>,
    remove: impl FnOnce() -> Result<(), String>,
) -> Result<WidgetId, BridgeError> {
    if let Some(id) = raw.and_then(WidgetId::from_js_number) {
        return Ok(id);
    }
    if let Err(err) = remove() {
        warn!("map widget without id failed to remove itself: {err}");
    }
    Err(BridgeError::Backend(
        "map widget did not stamp an id on its container".to_string(),
    ))
}

fn member_json(feature: &JsValue, name: &str) -> Option<String> {
    let member = js_sys::Reflect::get(feature, &JsValue::from_str(name)).ok()?;
    js_sys::JSON::stringify(&member).ok()?.as_string()
}

fn style_to_js(style: &PolygonStyle) -> Result<JsValue, BridgeError> {
    let text = serde_json::to_string(style).map_err(|e| BridgeError::Backend(e.to_string()))?;
    js_sys::JSON::parse(&text).map_err(|e| BridgeError::Backend(describe_js(&e)))
}

fn json_to_js(value: &Value) -> Result<JsValue, BridgeError> {
    let text = serde_json::to_string(value).map_err(|e| BridgeError::Backend(e.to_string()))?;
    js_sys::JSON::parse(&text).map_err(|e| BridgeError::Backend(describe_js(&e)))
}

/// The `L.FeatureGroup` that holds the shape being drawn.
#[derive(Clone)]
pub struct LeafletEditableGroup {
    group: JsValue,
}

impl EditableGroup for LeafletEditableGroup {
    type Shape = JsValue;

    fn add_shape(&mut self, shape: JsValue) {
        stats_map_group_add(&self.group, &shape);
    }

    fn to_sites(&self) -> Result<SiteCollection, BridgeError> {
        let geojson =
            stats_map_group_geojson(&self.group).map_err(|e| BridgeError::Backend(describe_js(&e)))?;
        let text: String = js_sys::JSON::stringify(&geojson)
            .map_err(|e| BridgeError::Backend(describe_js(&e)))?
            .into();
        SiteCollection::from_geojson_str(&text).map_err(|source| BridgeError::Dataset {
            name: "drawn shape",
            source,
        })
    }

    fn clear(&mut self) {
        stats_map_group_clear(&self.group);
    }
}

/// A live `L.map` and the draw handlers wired to it.
pub struct LeafletMap {
    map: JsValue,
    _on_created: Closure<dyn FnMut(JsValue)>,
    _on_draw_start: Closure<dyn FnMut(JsValue)>,
}

/// An `L.geoJSON` overlay whose style function reads `resolver`.
pub struct LeafletOverlay {
    layer: JsValue,
    resolver: Rc<RefCell<StyleResolver>>,
    style: Closure<dyn Fn(JsValue) -> JsValue>,
}

pub struct LeafletBackend {
    selection: SelectionBridge,
    ports: ElmPorts,
}

impl LeafletBackend {
    pub fn new(selection: SelectionBridge, ports: ElmPorts) -> Self {
        Self { selection, ports }
    }

    fn draw_handlers(
        &self,
        group: LeafletEditableGroup,
    ) -> (Closure<dyn FnMut(JsValue)>, Closure<dyn FnMut(JsValue)>) {
        let on_created = {
            let selection = self.selection.clone();
            let ports = self.ports.clone();
            let mut group = group.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
                let shape = stats_map_event_layer(&event);
                if let Err(err) = selection.on_shape_created(&mut group, shape, &ports) {
                    warn!("draw selection failed: {err}");
                }
            })
        };
        let on_draw_start = {
            let selection = self.selection.clone();
            let mut group = group;
            Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
                selection.on_draw_start(&mut group);
            })
        };
        (on_created, on_draw_start)
    }
}

impl MapBackend for LeafletBackend {
    type Container = DomContainer;
    type Map = LeafletMap;
    type Layer = LeafletOverlay;

    fn create_map(
        &mut self,
        container: &DomContainer,
        setup: &MapSetup,
    ) -> Result<(WidgetId, LeafletMap), BridgeError> {
        let options = json_to_js(&map_options(setup))?;
        let created = stats_map_create(container.element(), &options)
            .map_err(|e| BridgeError::Backend(describe_js(&e)))?;
        let field = |name: &str| {
            js_sys::Reflect::get(&created, &JsValue::from_str(name))
                .map_err(|e| BridgeError::Backend(describe_js(&e)))
        };
        let map = field("map")?;
        let group = LeafletEditableGroup {
            group: field("editable")?,
        };
        let id = stamped_widget_id(field("widgetId")?.as_f64(), || {
            stats_map_remove(&map).map_err(|e| describe_js(&e))
        })?;

        let (on_created, on_draw_start) = self.draw_handlers(group);
        stats_map_on(&map, DRAW_CREATED, on_created.as_ref().unchecked_ref());
        stats_map_on(&map, DRAW_START, on_draw_start.as_ref().unchecked_ref());

        Ok((
            id,
            LeafletMap {
                map,
                _on_created: on_created,
                _on_draw_start: on_draw_start,
            },
        ))
    }

    fn render_polygons(
        &mut self,
        map: &mut LeafletMap,
        overlay: &Rc<OverlaySource>,
        resolver: StyleResolver,
    ) -> Result<LeafletOverlay, BridgeError> {
        let sites = overlay.sites().to_geojson_value().map_err(|source| BridgeError::Dataset {
            name: "overlay",
            source,
        })?;
        let data = json_to_js(&sites)?;
        let resolver = Rc::new(RefCell::new(resolver));
        let style = {
            let resolver = Rc::clone(&resolver);
            Closure::<dyn Fn(JsValue) -> JsValue>::new(move |feature: JsValue| {
                let style = feature_style(
                    &resolver.borrow(),
                    member_json(&feature, "id").as_deref(),
                    member_json(&feature, "properties").as_deref(),
                );
                style_to_js(&style).unwrap_or_else(|err| {
                    warn!("could not build polygon style: {err}");
                    JsValue::UNDEFINED
                })
            })
        };
        let layer = stats_map_add_geojson(&map.map, &data, style.as_ref().unchecked_ref())
            .map_err(|e| BridgeError::Backend(describe_js(&e)))?;
        Ok(LeafletOverlay {
            layer,
            resolver,
            style,
        })
    }

    fn restyle(
        &mut self,
        layer: &mut LeafletOverlay,
        resolver: StyleResolver,
    ) -> Result<(), BridgeError> {
        layer.resolver.replace(resolver);
        stats_map_set_style(&layer.layer, layer.style.as_ref().unchecked_ref())
            .map_err(|e| BridgeError::Backend(describe_js(&e)))
    }

    fn remove_map(&mut self, map: LeafletMap, overlay: Option<LeafletOverlay>) {
        if let Err(err) = stats_map_remove(&map.map) {
            warn!("map widget failed to remove itself: {}", describe_js(&err));
        }
        drop(overlay);
        drop(map);
    }
}
