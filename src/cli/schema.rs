use crate::config::{Config, DEFAULT_CONFIG_FILE};
use schemars::schema::RootSchema;
use schemars::schema_for;

fn config_schema() -> RootSchema {
    let mut schema = schema_for!(Config);
    let metadata = schema.schema.metadata();
    metadata.title = Some(DEFAULT_CONFIG_FILE.to_string());
    metadata.description = Some("Configuration for lintbridge".to_string());
    schema
}

pub fn execute() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&config_schema())?;
    println!("{}", json);
    Ok(())
}
