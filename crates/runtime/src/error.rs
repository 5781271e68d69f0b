use std::fmt;

use formats::DatasetError;

#[derive(Debug)]
pub enum BridgeError {
    /// A DOM element the bridge depends on is not in the document.
    MissingElement(String),
    /// The map widget rejected a call.
    Backend(String),
    /// The embedded application did not accept a message.
    Port { port: &'static str, reason: String },
    Dataset {
        name: &'static str,
        source: DatasetError,
    },
    Config(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::MissingElement(id) => write!(f, "missing element: {id}"),
            BridgeError::Backend(msg) => write!(f, "map backend error: {msg}"),
            BridgeError::Port { port, reason } => {
                write!(f, "failed to send on port {port}: {reason}")
            }
            BridgeError::Dataset { name, source } => {
                write!(f, "dataset {name} could not be read: {source}")
            }
            BridgeError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Dataset { source, .. } => Some(source),
            _ => None,
        }
    }
}
