use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use lorprims_frame::Command;
use serde::Serialize;

use crate::exit::{io_error, CliResult};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    command: &'a str,
    size: usize,
    hex: String,
    bytes: &'a [u8],
}

pub fn print_encoded(command: &Command, bytes: &[u8], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                command: command.kind(),
                size: bytes.len(),
                hex: hex_string(bytes, ""),
                bytes,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "SIZE", "BYTES"])
                .add_row(vec![
                    command.kind().to_string(),
                    bytes.len().to_string(),
                    hex_string(bytes, " "),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}: {}", command.kind(), hex_string(bytes, " "));
        }
        OutputFormat::Raw => {
            print_raw(bytes)?;
        }
    }
    Ok(())
}

pub fn print_raw(data: &[u8]) -> CliResult<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(data)
        .and_then(|()| out.flush())
        .map_err(|err| io_error("failed writing to stdout", err))
}

pub fn hex_string(bytes: &[u8], separator: &str) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(separator)
}
