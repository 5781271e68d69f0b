use std::cell::RefCell;
use std::rc::Rc;

use formats::{FeatureId, StatsPayload};
use serde::Serialize;
use serde_json::Value;

use crate::error::BridgeError;

/// Named channels of the embedded application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Port {
    MouseEvent,
    SitesSelected,
    StatsForSites,
}

impl Port {
    pub const fn name(self) -> &'static str {
        match self {
            Port::MouseEvent => "mouseEvent",
            Port::SitesSelected => "sitesSelected",
            Port::StatsForSites => "statsForSites",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseEventMessage {
    pub event_type: String,
    pub x: f64,
    pub y: f64,
    pub ctrl_key: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    MouseEvent(MouseEventMessage),
    SitesSelected(Vec<FeatureId>),
    StatsForSites(StatsPayload),
}

impl OutboundMessage {
    pub fn port(&self) -> Port {
        match self {
            OutboundMessage::MouseEvent(_) => Port::MouseEvent,
            OutboundMessage::SitesSelected(_) => Port::SitesSelected,
            OutboundMessage::StatsForSites(_) => Port::StatsForSites,
        }
    }

    pub fn payload(&self) -> Result<Value, BridgeError> {
        let value = match self {
            OutboundMessage::MouseEvent(m) => serde_json::to_value(m),
            OutboundMessage::SitesSelected(ids) => serde_json::to_value(ids),
            OutboundMessage::StatsForSites(p) => serde_json::to_value(p),
        };
        value.map_err(|e| BridgeError::Port {
            port: self.port().name(),
            reason: e.to_string(),
        })
    }

    pub fn payload_json(&self) -> Result<String, BridgeError> {
        let value = self.payload()?;
        serde_json::to_string(&value).map_err(|e| BridgeError::Port {
            port: self.port().name(),
            reason: e.to_string(),
        })
    }
}

/// Inbound side of the embedded application, as seen from the bridge.
pub trait AppPorts {
    fn send(&self, message: OutboundMessage) -> Result<(), BridgeError>;
}

impl<T: AppPorts + ?Sized> AppPorts for Rc<T> {
    fn send(&self, message: OutboundMessage) -> Result<(), BridgeError> {
        (**self).send(message)
    }
}

/// Ports that keep every message in memory instead of delivering it.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: RefCell<Vec<OutboundMessage>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.borrow().clone()
    }

    pub fn on_port(&self, port: Port) -> Vec<OutboundMessage> {
        self.messages
            .borrow()
            .iter()
            .filter(|m| m.port() == port)
            .cloned()
            .collect()
    }
}

impl AppPorts for MessageLog {
    fn send(&self, message: OutboundMessage) -> Result<(), BridgeError> {
        self.messages.borrow_mut().push(message);
        Ok(())
    }
}
