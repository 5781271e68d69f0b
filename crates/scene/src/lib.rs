pub mod containment;
pub mod selection;

pub use containment::*;
pub use selection::*;
