use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;
use snugmap::{IndexDefinition, IndexFieldType, Schema, compile_field};

use crate::commands::load_schema;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};
use crate::theme::index_type_color;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Index Definition",
        commands: &[
            "snugmap index bigfoot.toml                     # Show FT.CREATE arguments per field",
            "snugmap --output compact index bigfoot.toml    # Print the full FT.CREATE command",
        ],
    },
    ExampleGroup {
        title: "Rebuild Check",
        commands: &["snugmap index bigfoot.toml --fingerprint \"$(redis-cli GET Bigfoot:index:hash)\""],
    },
];

#[derive(Args)]
pub struct IndexArgs {
    /// Schema definition file (.toml or .json)
    pub schema: PathBuf,

    /// Fingerprint of the deployed index, to check whether it must be rebuilt
    #[arg(long)]
    pub fingerprint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub index: String,
    pub storage: String,
    /// SCAN pattern for the entity keys the index covers.
    pub key_pattern: String,
    pub fingerprint_key: String,
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_rebuild: Option<bool>,
    pub arguments: Vec<String>,
    pub fields: Vec<FieldArguments>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldArguments {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip)]
    pub index_type: IndexFieldType,
    pub arguments: Vec<String>,
}

impl TableDisplay for IndexReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["Field", "Type", "Arguments"]);
        for field in &self.fields {
            let mut field_type = Cell::new(&field.field_type);
            if output.colored() {
                field_type = field_type.fg(index_type_color(field.index_type));
            }
            table.add_row(vec![
                Cell::new(&field.name),
                field_type,
                Cell::new(field.arguments.join(" ")),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!("FT.CREATE {}", self.arguments.join(" "))
    }
}

pub fn handle_index(args: IndexArgs, output: &OutputManager) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    output.verbose(&format!("Loaded {} field(s) for {}", schema.fields().len(), schema.entity_name()));

    let definition = IndexDefinition::from_schema(&schema);
    definition.log_warnings();
    let report = build_report(&schema, &definition, args.fingerprint.as_deref());

    output.heading(&format!("Index {}", report.index));
    output.key_value("Storage", &report.storage);
    output.key_value("Prefix", &definition.prefixes.join(", "));
    output.key_value("Keys", &report.key_pattern);
    output.key_value("Fingerprint", &report.fingerprint);
    output.display(&report)?;

    for warning in &report.warnings {
        output.warning(warning);
    }
    match report.needs_rebuild {
        Some(true) => output.info(&format!("Index {} is out of date and must be rebuilt", report.index)),
        Some(false) => output.success(&format!("Index {} is up to date", report.index)),
        None => {}
    }

    Ok(())
}

fn build_report(schema: &Schema, definition: &IndexDefinition, stored_fingerprint: Option<&str>) -> IndexReport {
    let fields = schema
        .fields()
        .iter()
        .map(|field| FieldArguments {
            name: field.name().to_string(),
            field_type: field.field_type().to_string(),
            index_type: field.field_type().index_type(),
            arguments: compile_field(field, schema.data_structure()).arguments,
        })
        .collect();

    IndexReport {
        index: definition.name.clone(),
        storage: definition.data_structure.as_str().to_string(),
        key_pattern: schema.key_context().pattern(),
        fingerprint_key: definition.hash_name.clone(),
        fingerprint: definition.fingerprint(),
        needs_rebuild: stored_fingerprint.map(|stored| definition.needs_rebuild(Some(stored))),
        arguments: definition.arguments(),
        fields,
        warnings: definition.warnings.clone(),
    }
}
