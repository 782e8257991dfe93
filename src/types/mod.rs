pub mod errors;
pub mod ids;
pub mod path;
pub mod plan;
pub mod query;
pub mod report;

pub use errors::*;
pub use ids::*;
pub use path::*;
pub use plan::*;
pub use query::*;
pub use report::*;
