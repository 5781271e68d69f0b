use std::cell::RefCell;
use std::rc::Rc;

use runtime::{AppHost, AppPorts, BridgeError, OutboundMessage};
use tracing::debug;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::describe_js;

#[wasm_bindgen(inline_js = "
export function stats_map_embed(moduleName, node, flags) {
    const module = typeof Elm === 'undefined' ? undefined : Elm[moduleName];
    if (!module) {
        throw new Error('Elm module ' + moduleName + ' is not loaded');
    }
    return module.embed(node, flags);
}

export function stats_map_send_port(app, port, payload) {
    const target = app.ports && app.ports[port];
    if (!target) {
        throw new Error('application has no port ' + port);
    }
    target.send(payload);
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn stats_map_embed(module_name: &str, node: &Element, flags: &JsValue)
    -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn stats_map_send_port(app: &JsValue, port: &str, payload: &JsValue) -> Result<(), JsValue>;
}

/// Handle to the embedded application, empty until it is embedded.
pub type AppHandle = Rc<RefCell<Option<JsValue>>>;

/// Ports of the embedded Elm application.
#[derive(Clone)]
pub struct ElmPorts {
    app: AppHandle,
}

impl ElmPorts {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl AppPorts for ElmPorts {
    fn send(&self, message: OutboundMessage) -> Result<(), BridgeError> {
        let port = message.port().name();
        // Clone out of the cell so the application can call back into us.
        let app = self.app.borrow().clone().ok_or_else(|| BridgeError::Port {
            port,
            reason: "application is not embedded".to_string(),
        })?;
        let payload = js_sys::JSON::parse(&message.payload_json()?).map_err(|e| {
            BridgeError::Port {
                port,
                reason: describe_js(&e),
            }
        })?;
        stats_map_send_port(&app, port, &payload).map_err(|e| BridgeError::Port {
            port,
            reason: describe_js(&e),
        })
    }
}

/// The page element the application is embedded into.
pub struct ElmHost {
    document: Document,
    element_id: String,
    module: String,
    flags: JsValue,
    app: AppHandle,
}

impl ElmHost {
    pub fn new(
        document: Document,
        element_id: String,
        module: String,
        flags: JsValue,
        app: AppHandle,
    ) -> Self {
        Self {
            document,
            element_id,
            module,
            flags,
            app,
        }
    }

    fn element(&self) -> Result<Element, BridgeError> {
        self.document
            .get_element_by_id(&self.element_id)
            .ok_or_else(|| BridgeError::MissingElement(self.element_id.clone()))
    }
}

impl AppHost for ElmHost {
    type Ports = ElmPorts;

    fn clear_host(&mut self) -> Result<usize, BridgeError> {
        let host = self.element()?;
        let mut removed = 0;
        while let Some(child) = host.first_child() {
            host.remove_child(&child)
                .map_err(|e| BridgeError::Backend(describe_js(&e)))?;
            removed += 1;
        }
        Ok(removed)
    }

    fn embed(&mut self) -> Result<ElmPorts, BridgeError> {
        let host = self.element()?;
        let app = stats_map_embed(&self.module, &host, &self.flags)
            .map_err(|e| BridgeError::Backend(describe_js(&e)))?;
        debug!("embedded Elm module {}", self.module);
        *self.app.borrow_mut() = Some(app);
        Ok(ElmPorts::new(Rc::clone(&self.app)))
    }
}
