//! SnugMap core library.
//!
//! Schema-driven marshalling between in-memory entity data and the two Redis storage
//! representations (Hash and RedisJSON), plus compilation of the matching RediSearch
//! index definition. The library builds payloads and [`redis::Cmd`] values; it never
//! talks to a server itself.
//!
//! ```
//! use snugmap::{EntityData, FieldDefinition, Schema, SchemaOptions};
//!
//! let schema = Schema::new(
//!     "Bigfoot",
//!     [FieldDefinition::string("name"), FieldDefinition::boolean("seen")],
//!     SchemaOptions::hash(),
//! )?;
//! let data = EntityData::new().with("name", "Sasquatch").with("seen", true);
//! let encoded = schema.encode(&data)?;
//! assert!(!encoded.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod commands;
pub mod config;
pub mod entity;
pub mod errors;
pub mod hash;
pub mod index;
pub mod json;
pub mod keys;
pub mod path;
pub mod schema;
pub mod types;

pub use codec::{Encoded, Payload};
pub use config::{FieldConfig, SchemaDocument};
pub use entity::{EntityData, EntityValue, FieldState, Point};
pub use errors::*;
pub use hash::{HashPayload, from_hash, to_hash};
pub use index::{IndexCompilation, IndexDefinition, compile_field, compile_schema};
pub use json::{decode_document, from_json, to_json};
pub use keys::{KeyContext, generate_entity_id};
pub use path::{JsonPath, Location};
pub use schema::{Schema, SchemaOptions, StopWords};
pub use types::{
    DEFAULT_SEPARATOR, DataStructure, FieldDefinition, FieldDescriptor, FieldOptions, FieldType, IndexFieldType,
    PhoneticMatcher,
};

// Re-export redis so callers can execute the built commands without pinning a version.
pub use redis;
