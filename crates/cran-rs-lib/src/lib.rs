pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::Config;

pub mod registry;
pub use registry::Registry;
pub use registry::PackageRecord;

pub mod builtin;
pub use builtin::BuiltInSet;

pub mod relationship_resolver;
pub mod plan;
pub use plan::FetchPlan;
pub mod retrieval;
