//! Output formatting

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print a single value. Tables show one row per top-level field.
    pub fn print<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Table => println!("{}", field_table(&serde_json::to_value(data)?)),
        }
        Ok(())
    }

    /// Print a list: `rows` for tables, `data` as-is otherwise
    pub fn print_list<T: Serialize, R: Tabled>(&self, data: &T, rows: Vec<R>) -> anyhow::Result<()> {
        match self {
            OutputFormat::Table => {
                println!("{}", Table::new(rows).with(Style::rounded()));
                Ok(())
            }
            _ => self.print(data),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => {
            items.iter().map(scalar).collect::<Vec<_>>().join(", ")
        }
        other => other.to_string(),
    }
}

fn field_table(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let rows: Vec<FieldRow> = map
                .iter()
                .map(|(field, value)| FieldRow {
                    field: field.clone(),
                    value: scalar(value),
                })
                .collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        other => scalar(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_flattens_simple_arrays() {
        assert_eq!(scalar(&json!(["Defence", "Rail"])), "Defence, Rail");
        assert_eq!(scalar(&json!(null)), "");
        assert_eq!(scalar(&json!(4.5)), "4.5");
        assert_eq!(scalar(&json!([{"a": 1}])), r#"[{"a":1}]"#);
    }

    #[test]
    fn test_field_table_lists_keys() {
        let table = field_table(&json!({"tier": "plus", "exports": 100}));
        assert!(table.contains("tier"));
        assert!(table.contains("plus"));
        assert!(table.contains("exports"));
    }

    #[test]
    fn test_format_from_config_string() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
