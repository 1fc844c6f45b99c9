mod registry;
mod canonical;

pub use self::registry::*;
pub use self::canonical::canonical_schema;
