pub mod overlay;
pub mod symbology;

pub use overlay::*;
pub use symbology::*;
