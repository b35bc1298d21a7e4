pub mod convert;
pub mod index;

use std::path::Path;

use anyhow::{Context, Result};
use snugmap::Schema;

pub(crate) fn load_schema(path: &Path) -> Result<Schema> {
    Schema::from_path(path).with_context(|| format!("Failed to load schema from {}", path.display()))
}
