pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod datasets;
pub mod error;
pub mod pointer;
pub mod ports;
pub mod registry;
pub mod selection_bridge;
pub mod watch;

pub use bootstrap::*;
pub use config::*;
pub use controller::*;
pub use datasets::*;
pub use error::*;
pub use pointer::*;
pub use ports::*;
pub use registry::*;
pub use selection_bridge::*;
pub use watch::*;
