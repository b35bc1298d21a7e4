use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use comfy_table::{Cell, Table};
use serde::Serialize;
use serde_json::Value;
use snugmap::{DataStructure, HashPayload, Payload, Schema, from_hash, from_json, to_hash, to_json};

use crate::commands::load_schema;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Payload Conversion",
    commands: &[
        "snugmap convert bigfoot.toml stored.json                 # Decode using the schema's storage",
        "snugmap convert bigfoot.toml stored.json --from hash     # Input is an HGETALL result as JSON",
        "redis-cli JSON.GET Bigfoot:1 | snugmap convert bigfoot.toml - --from json",
    ],
}];

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Representation {
    Hash,
    Json,
}

impl From<Representation> for DataStructure {
    fn from(value: Representation) -> Self {
        match value {
            Representation::Hash => DataStructure::Hash,
            Representation::Json => DataStructure::Json,
        }
    }
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Schema definition file (.toml or .json)
    pub schema: PathBuf,

    /// Stored payload as JSON, or `-` for stdin
    pub payload: String,

    /// Representation the payload was stored in (defaults to the schema's)
    #[arg(long, value_enum)]
    pub from: Option<Representation>,

    /// Entity id, used to show the Redis key
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertReport {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// `None` when every field was absent or null, meaning the key would be deleted.
    pub hash: Option<HashPayload>,
    pub json: Option<Value>,
    #[serde(skip)]
    pub rows: Vec<ConvertRow>,
}

#[derive(Debug)]
pub struct ConvertRow {
    pub field: String,
    pub hash: Option<String>,
    pub json: Option<Value>,
}

impl TableDisplay for ConvertReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["Field", "Hash", "JSON"]);
        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.field),
                Cell::new(row.hash.as_deref().unwrap_or("-")),
                Cell::new(row.json.as_ref().map_or_else(|| "-".to_string(), Value::to_string)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let json = self.json.as_ref().map_or_else(|| "null".to_string(), Value::to_string);
        format!("{} {json}", self.key.as_deref().unwrap_or(&self.entity))
    }
}

pub fn handle_convert(args: ConvertArgs, output: &OutputManager) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let source = read_payload(&args.payload)?;

    let from = args.from.map_or(schema.data_structure(), DataStructure::from);
    let payload = match from {
        DataStructure::Hash => Payload::Hash(
            serde_json::from_str(&source).context("Hash payload must be a JSON object of strings")?,
        ),
        DataStructure::Json => Payload::Json(serde_json::from_str(&source).context("JSON payload is not valid JSON")?),
    };
    output.verbose(&format!("Decoding {from} payload for {}", schema.entity_name()));

    let data = schema.decode(&payload)?;
    let hash = to_hash(&schema, &data)?.into_payload();
    let json = to_json(&schema, &data)?.into_payload();

    // Both encodings must read back cleanly.
    if let Some(fields) = &hash {
        from_hash(&schema, fields)?;
    }
    if let Some(document) = &json {
        from_json(&schema, document)?;
    }

    let report = ConvertReport {
        entity: schema.entity_name().to_string(),
        key: args.id.as_deref().map(|id| schema.entity_key(id)),
        rows: rows(&schema, hash.as_ref(), json.as_ref()),
        hash,
        json,
    };

    output.heading(&format!("{} payload", report.entity));
    if let Some(key) = &report.key {
        output.key_value("Key", key);
    }
    if report.hash.is_none() {
        output.warning("Every field is absent or null; the key would be deleted");
    }
    output.display(&report)
}

fn read_payload(argument: &str) -> Result<String> {
    if argument == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("Failed to read payload from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(argument).with_context(|| format!("Failed to read payload from {argument}"))
}

fn rows(schema: &Schema, hash: Option<&HashPayload>, json: Option<&Value>) -> Vec<ConvertRow> {
    schema
        .fields()
        .iter()
        .map(|field| {
            let path = field.json_path().container().unwrap_or_else(|| field.json_path().clone());
            ConvertRow {
                field: field.name().to_string(),
                hash: hash.and_then(|fields| fields.get(field.hash_field()).cloned()),
                json: json.and_then(|document| {
                    path.resolve(document)
                        .first()
                        .and_then(|location| location.get(document))
                        .cloned()
                }),
            }
        })
        .collect()
}
