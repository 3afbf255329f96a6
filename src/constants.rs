//! Module for shared constants used across the codebase

/// Default names of the query parameters read to build the shaping options
pub mod params {
    /// Sparse fieldset parameter
    pub const FIELDS: &str = "fields";
    /// Extra includes parameter
    pub const INCLUDES: &str = "includes";
    /// Excluded includes parameter
    pub const EXCLUDES: &str = "excludes";
}

pub mod filter {
    /// Key matching every action without an explicit entry
    pub const WILDCARD_ACTION: &str = "*";

    /// Default key wrapping rendered collections
    pub const DEFAULT_COLLECTION_ENVELOPE: &str = "data";

    /// Default resolution scope
    pub const DEFAULT_SCOPE: &str = "global";
}

pub mod descriptor {
    /// Key naming the transformer class inside a configuration descriptor
    pub const CLASS_KEY: &str = "class";
}

pub mod transformers {
    pub const IDENTITY: &str = "identity";
    pub const PROJECTION: &str = "projection";
}
