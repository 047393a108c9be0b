use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::client::OptimizerClient;
use crate::error::OptimizerError;
use crate::upload::{UploadData, UploadFormat};

use super::emit;

#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// Input file: one SQL statement per line for `queries`, delimited rows
    /// for the stats formats.
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    #[arg(long, value_name = "FORMAT", default_value = "queries", value_parser = parse_format)]
    pub data_type: UploadFormat,

    #[arg(long, value_name = "PLATFORM", default_value = "generic")]
    pub source_platform: String,

    #[arg(long, value_name = "ID")]
    pub workload_id: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct UploadStatusArgs {
    #[arg(long, value_name = "ID")]
    pub workload_id: String,
}

pub fn run(client: &OptimizerClient, args: &UploadArgs) -> Result<()> {
    let data = read_upload_data(&args.input, args.data_type)?;
    emit(client.upload(
        data,
        args.data_type,
        &args.source_platform,
        args.workload_id.as_deref(),
    )?)
}

pub fn status(client: &OptimizerClient, args: &UploadStatusArgs) -> Result<()> {
    emit(client.upload_status(&args.workload_id)?)
}

fn read_upload_data(input: &Path, format: UploadFormat) -> Result<UploadData> {
    match format {
        UploadFormat::Queries => {
            let content = std::fs::read_to_string(input)
                .with_context(|| format!("failed to read query file: {}", input.display()))?;
            let statements = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            Ok(UploadData::Statements(statements))
        }
        UploadFormat::TableStats | UploadFormat::ColsStats => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_path(input)
                .with_context(|| format!("failed to open stats file: {}", input.display()))?;
            let mut rows = Vec::new();
            for record in reader.records() {
                let record = record
                    .with_context(|| format!("failed to read stats row: {}", input.display()))?;
                rows.push(record.iter().map(str::to_string).collect());
            }
            Ok(UploadData::Rows(rows))
        }
    }
}

fn parse_format(input: &str) -> Result<UploadFormat, OptimizerError> {
    input.parse()
}
