pub mod error;
pub mod feature_id;
pub mod lookup;
pub mod membership;
pub mod site_collection;
pub mod stats;

pub use error::*;
pub use feature_id::*;
pub use lookup::*;
pub use membership::*;
pub use site_collection::*;
pub use stats::*;
