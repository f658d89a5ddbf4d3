use std::io::{self, BufRead, Write};

use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Auto,
    Json,
    Yaml,
    Table,
}

/// Renders command results and status messages. Commands never format
/// output themselves.
pub struct Formatter {
    format: Format,
    color: bool,
}

impl Formatter {
    pub fn new(format: Format, color: bool) -> Self {
        Self { format, color }
    }

    /// Writes structured data in the configured format.
    pub fn data<T: Serialize>(&self, data: &T, title: &str) -> Result<(), String> {
        match self.format {
            Format::Json => self.json(data),
            Format::Yaml => self.yaml(data),
            Format::Table => self.table(data, title),
            Format::Auto => self.auto(data, title),
        }
    }

    fn json<T: Serialize>(&self, data: &T) -> Result<(), String> {
        let rendered = serde_json::to_string_pretty(data)
            .map_err(|err| format!("failed to encode JSON: {err}"))?;
        println!("{rendered}");
        Ok(())
    }

    fn yaml<T: Serialize>(&self, data: &T) -> Result<(), String> {
        let rendered =
            serde_yaml::to_string(data).map_err(|err| format!("failed to encode YAML: {err}"))?;
        print!("{rendered}");
        Ok(())
    }

    fn table<T: Serialize>(&self, data: &T, title: &str) -> Result<(), String> {
        let value = serde_json::to_value(data)
            .map_err(|err| format!("failed to encode table data: {err}"))?;
        let serde_json::Value::Array(items) = value else {
            return Err("table format requires a list of records".to_string());
        };

        if items.is_empty() {
            self.info("No items to display");
            return Ok(());
        }

        if !title.is_empty() {
            if self.color {
                println!("{}", title.bold());
            } else {
                println!("{title}");
            }
        }
        for item in items {
            match item {
                serde_json::Value::Object(fields) => {
                    for (key, field) in fields {
                        println!("{key}: {}", render_scalar(&field));
                    }
                }
                other => println!("{}", render_scalar(&other)),
            }
            println!();
        }
        Ok(())
    }

    /// Lists render as tables, everything else as JSON.
    fn auto<T: Serialize>(&self, data: &T, title: &str) -> Result<(), String> {
        let value = serde_json::to_value(data)
            .map_err(|err| format!("failed to encode output: {err}"))?;
        match value {
            serde_json::Value::Array(_) => self.table(&value, title),
            other => self.json(&other),
        }
    }

    pub fn success(&self, msg: &str) {
        if self.color {
            println!("{}", format!("✓ {msg}").green());
        } else {
            println!("✓ {msg}");
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{}", format!("✗ {msg}").red());
        } else {
            eprintln!("✗ {msg}");
        }
    }

    pub fn warning(&self, msg: &str) {
        if self.color {
            println!("{}", format!("⚠ {msg}").yellow());
        } else {
            println!("⚠ {msg}");
        }
    }

    pub fn info(&self, msg: &str) {
        if self.color {
            println!("{}", format!("ℹ {msg}").cyan());
        } else {
            println!("ℹ {msg}");
        }
    }

    pub fn dry_run(&self, msg: &str) {
        if self.color {
            println!("{}", format!("[DRY RUN] {msg}").yellow());
        } else {
            println!("[DRY RUN] {msg}");
        }
    }

    /// Prompts on stdout and reads a y/n answer from stdin; empty input
    /// takes the default.
    pub fn confirm(&self, message: &str, default_value: bool) -> bool {
        let default_str = if default_value { "y" } else { "n" };
        print!("{message} [y/N] (default: {default_str}): ");
        let _ = io::stdout().flush();

        let mut response = String::new();
        if io::stdin().lock().read_line(&mut response).is_err() {
            return default_value;
        }
        let response = response.trim();
        if response.is_empty() {
            return default_value;
        }
        matches!(response, "y" | "Y" | "yes")
    }
}

fn render_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => "—".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_without_quotes() {
        assert_eq!(render_scalar(&serde_json::json!("text")), "text");
        assert_eq!(render_scalar(&serde_json::json!(3)), "3");
        assert_eq!(render_scalar(&serde_json::Value::Null), "—");
    }

    #[test]
    fn table_rejects_non_list_data() {
        let formatter = Formatter::new(Format::Table, false);
        assert!(formatter.data(&serde_json::json!({"k": "v"}), "t").is_err());
    }
}
