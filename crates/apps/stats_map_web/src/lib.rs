use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use layers::OverlaySource;
use runtime::{
    BridgeConfig, BridgeError, Datasets, MapController, POINTER_EVENTS, PlotRect, PointerSample,
    SelectionBridge, WatchLoop, bootstrap, forward_pointer,
};
use serde_json::Value;
use tracing::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, MouseEvent, MutationObserver, MutationObserverInit, MutationRecord, Window};

mod console;
mod dom;
mod elm;
mod leaflet;

use elm::{ElmHost, ElmPorts};
use leaflet::LeafletBackend;

// Guard against double initialisation (hot reload can run the start hook twice).
static INITIALIZED: AtomicBool = AtomicBool::new(false);

type Controller = MapController<LeafletBackend>;

/// Document observer and pointer listener. Dropping this detaches both.
struct PageHooks {
    document: Document,
    observer: MutationObserver,
    _on_mutations: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
    on_pointer: Closure<dyn FnMut(MouseEvent)>,
}

impl Drop for PageHooks {
    fn drop(&mut self) {
        self.observer.disconnect();
        for event in POINTER_EVENTS {
            let _ = self
                .document
                .remove_event_listener_with_callback(event, self.on_pointer.as_ref().unchecked_ref());
        }
    }
}

struct StatsMap {
    _controller: Rc<RefCell<Controller>>,
    _hooks: PageHooks,
    _ports: ElmPorts,
}

thread_local! {
    static STATS_MAP: RefCell<Option<StatsMap>> = const { RefCell::new(None) };
}

pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn to_js(err: BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    console::install(level);
    Ok(())
}

/// Wires maps, pointer forwarding, and the statistics application into the
/// page. `config_json` overrides any subset of the default configuration.
#[wasm_bindgen]
pub fn start_stats_map(config_json: Option<String>) -> Result<(), JsValue> {
    if STATS_MAP.with(|cell| cell.borrow().is_some()) {
        warn!("stats map already started");
        return Ok(());
    }
    let config = match config_json.as_deref() {
        Some(json) => BridgeConfig::from_json_str(json),
        None => Ok(BridgeConfig::default()),
    }
    .map_err(to_js)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let names = &config.datasets;
    let datasets = Datasets::from_values(
        page_global_json(&window, &names.background)?,
        page_global_json(&window, &names.observed_sites)?,
        page_global_json(&window, &names.node_lookup)?,
        page_global_json(&window, &names.stat_names)?,
    )
    .map_err(to_js)?;
    let flags = app_flags(&window, &config)?;

    let overlay = Rc::new(OverlaySource::from_background(&datasets.background));
    info!(
        "{} of {} background polygons carry membership data",
        overlay.len(),
        datasets.background.len()
    );
    let fit_bounds = datasets.background.bounds();
    let observed = Rc::new(datasets.observed);

    let app = Rc::new(RefCell::new(None));
    let ports = ElmPorts::new(Rc::clone(&app));
    let backend = LeafletBackend::new(SelectionBridge::new(Rc::clone(&observed)), ports.clone());
    let controller = Rc::new(RefCell::new(MapController::new(
        backend,
        overlay,
        datasets.nodes,
        fit_bounds,
        &config,
    )));

    let hooks = install_hooks(&document, &config, Rc::clone(&controller), ports)?;

    let mut host = ElmHost::new(
        document,
        config.host_element_id.clone(),
        config.app_module.clone(),
        flags,
        app,
    );
    let ports = bootstrap(&mut host, &observed, &datasets.stat_names).map_err(to_js)?;

    STATS_MAP.with(|cell| {
        *cell.borrow_mut() = Some(StatsMap {
            _controller: controller,
            _hooks: hooks,
            _ports: ports,
        });
    });
    Ok(())
}

fn page_global(window: &Window, name: &str) -> Result<JsValue, JsValue> {
    let value = js_sys::Reflect::get(window, &JsValue::from_str(name))?;
    if value.is_undefined() {
        return Err(to_js(BridgeError::Config(format!(
            "page global {name} is not defined"
        ))));
    }
    Ok(value)
}

fn page_global_json(window: &Window, name: &str) -> Result<Value, JsValue> {
    let text: String = js_sys::JSON::stringify(&page_global(window, name)?)?.into();
    serde_json::from_str(&text).map_err(|e| {
        to_js(BridgeError::Config(format!(
            "page global {name} is not JSON data: {e}"
        )))
    })
}

/// Flags for the application's `embed`, passed through untouched.
fn app_flags(window: &Window, config: &BridgeConfig) -> Result<JsValue, JsValue> {
    let flags = js_sys::Object::new();
    js_sys::Reflect::set(
        &flags,
        &JsValue::from_str("data"),
        &page_global(window, &config.datasets.matrix)?,
    )?;
    js_sys::Reflect::set(
        &flags,
        &JsValue::from_str("taxonTree"),
        &page_global(window, &config.datasets.taxon_tree)?,
    )?;
    Ok(flags.into())
}

fn install_hooks(
    document: &Document,
    config: &BridgeConfig,
    controller: Rc<RefCell<Controller>>,
    ports: ElmPorts,
) -> Result<PageHooks, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| to_js(BridgeError::MissingElement("body".to_string())))?;

    let marker_class = config.marker_class.clone();
    let watch = WatchLoop::new(config.watched_attributes());
    let on_mutations = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            let mutations: Vec<_> = records
                .iter()
                .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                .flat_map(|record| dom::translate_record(&record, &marker_class))
                .collect();
            if mutations.is_empty() {
                return;
            }
            match controller.try_borrow_mut() {
                Ok(mut controller) => watch.dispatch(&mut *controller, mutations),
                Err(_) => warn!("dropping {} container changes: controller busy", mutations.len()),
            }
        },
    );
    let observer = MutationObserver::new(on_mutations.as_ref().unchecked_ref())?;
    let attribute_filter: js_sys::Array = config
        .watched_attributes()
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect();
    let init = MutationObserverInit::new();
    init.set_subtree(true);
    init.set_child_list(true);
    init.set_attributes(true);
    init.set_attribute_filter(&attribute_filter);
    init.set_attribute_old_value(true);
    observer.observe_with_options(&body, &init)?;

    let plot_id = config.plot_element_id.clone();
    let lookup = document.clone();
    let on_pointer = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let plot = lookup.get_element_by_id(&plot_id).map(|plot| {
            let rect = plot.get_bounding_client_rect();
            PlotRect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
        });
        let sample = PointerSample {
            event_type: event.type_(),
            client_x: f64::from(event.client_x()),
            client_y: f64::from(event.client_y()),
            ctrl_key: event.ctrl_key(),
        };
        if let Err(err) = forward_pointer(plot, &sample, &ports, || event.prevent_default()) {
            warn!("pointer event not forwarded: {err}");
        }
    });

    let hooks = PageHooks {
        document: document.clone(),
        observer,
        _on_mutations: on_mutations,
        on_pointer,
    };
    for event in POINTER_EVENTS {
        hooks
            .document
            .add_event_listener_with_callback(event, hooks.on_pointer.as_ref().unchecked_ref())?;
    }
    Ok(hooks)
}
