use crate::error::BridgeError;
use crate::ports::{AppPorts, MouseEventMessage, OutboundMessage};

/// Document events the pointer bridge listens to.
pub const POINTER_EVENTS: [&str; 3] = ["mousemove", "mouseup", "mousedown"];

/// Viewport rectangle of the plot element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Half-open on the right and bottom edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && y >= self.top && x < self.right && y < self.bottom
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerSample {
    pub event_type: String,
    pub client_x: f64,
    pub client_y: f64,
    pub ctrl_key: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Leave the event alone.
    PassThrough,
    /// Suppress the default action and forward the message.
    Forward(MouseEventMessage),
}

/// Decides what happens to one pointer event. `plot` is `None` when the plot
/// element is not in the document.
pub fn route_pointer(plot: Option<PlotRect>, sample: &PointerSample) -> PointerOutcome {
    let Some(rect) = plot else {
        return PointerOutcome::PassThrough;
    };
    if !rect.contains(sample.client_x, sample.client_y) {
        return PointerOutcome::PassThrough;
    }
    PointerOutcome::Forward(MouseEventMessage {
        event_type: sample.event_type.clone(),
        x: sample.client_x - rect.left,
        y: sample.client_y - rect.top,
        ctrl_key: sample.ctrl_key,
    })
}

/// Routes `sample` and sends it on when it lands inside the plot.
///
/// `suppress_default` runs before the message is sent, and only for events
/// that are forwarded. Returns whether the event was forwarded.
pub fn forward_pointer<P: AppPorts + ?Sized>(
    plot: Option<PlotRect>,
    sample: &PointerSample,
    ports: &P,
    suppress_default: impl FnOnce(),
) -> Result<bool, BridgeError> {
    match route_pointer(plot, sample) {
        PointerOutcome::PassThrough => Ok(false),
        PointerOutcome::Forward(message) => {
            suppress_default();
            ports.send(OutboundMessage::MouseEvent(message))?;
            Ok(true)
        }
    }
}
