#[macro_use] extern crate serde_derive;

pub mod types;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod schema;
pub mod model;
pub mod bio;
pub mod store;
pub mod utils;
pub mod load;
pub mod config;

pub use errors::{SchemaError, Result};
pub use schema::{canonical_schema, SchemaRegistry};
pub use store::{GraphStore, StoreTransaction};
