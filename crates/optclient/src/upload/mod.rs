use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::error::{OptimizerError, OptimizerResult};

/// Elapsed time recorded for query rows synthesized from bare statements.
const SYNTHETIC_ELAPSED_TIME: &str = "0.0";

#[derive(Debug, Clone, Copy)]
struct HeaderColumn {
    coltype: &'static str,
    name: &'static str,
}

const QUERIES_COLUMNS: &[HeaderColumn] = &[
    HeaderColumn {
        coltype: "SQL_ID",
        name: "SQL_ID",
    },
    HeaderColumn {
        coltype: "NONE",
        name: "ELAPSED_TIME",
    },
    HeaderColumn {
        coltype: "SQL_QUERY",
        name: "SQL_FULLTEXT",
    },
];

const TABLE_STATS_COLUMNS: &[HeaderColumn] = &[
    HeaderColumn {
        coltype: "NONE",
        name: "TABLE_NAME",
    },
    HeaderColumn {
        coltype: "NONE",
        name: "NUM_ROWS",
    },
];

// The column-stats feed is the one schema the service expects in lowercase;
// the casing is part of the wire contract.
const COLS_STATS_COLUMNS: &[HeaderColumn] = &[
    HeaderColumn {
        coltype: "NONE",
        name: "table_name",
    },
    HeaderColumn {
        coltype: "NONE",
        name: "column_name",
    },
    HeaderColumn {
        coltype: "NONE",
        name: "data_type",
    },
    HeaderColumn {
        coltype: "NONE",
        name: "num_distinct",
    },
    HeaderColumn {
        coltype: "NONE",
        name: "num_nulls",
    },
    HeaderColumn {
        coltype: "NONE",
        name: "avg_col_len",
    },
];

/// The three upload feeds the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFormat {
    Queries,
    TableStats,
    ColsStats,
}

impl UploadFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queries => "queries",
            Self::TableStats => "table_stats",
            Self::ColsStats => "cols_stats",
        }
    }

    /// Stats feeds travel as `.log` files, query logs as `.csv`.
    #[must_use]
    pub const fn data_suffix(self) -> &'static str {
        match self {
            Self::Queries => ".csv",
            Self::TableStats | Self::ColsStats => ".log",
        }
    }

    #[must_use]
    pub fn headers(self) -> Vec<&'static str> {
        self.columns().iter().map(|column| column.name).collect()
    }

    const fn columns(self) -> &'static [HeaderColumn] {
        match self {
            Self::Queries => QUERIES_COLUMNS,
            Self::TableStats => TABLE_STATS_COLUMNS,
            Self::ColsStats => COLS_STATS_COLUMNS,
        }
    }
}

impl FromStr for UploadFormat {
    type Err = OptimizerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "queries" => Ok(Self::Queries),
            "table_stats" => Ok(Self::TableStats),
            "cols_stats" => Ok(Self::ColsStats),
            other => Err(OptimizerError::Configuration(format!(
                "unknown upload format `{other}` (expected queries, table_stats or cols_stats)"
            ))),
        }
    }
}

/// Per-column entry of the upload manifest. Field names and values are part
/// of the external tool's input contract and must serialize exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestField {
    pub count: u32,
    pub coltype: String,
    #[serde(rename = "use")]
    pub used: bool,
    pub tag: String,
    pub name: String,
}

/// The JSON manifest describing how the external tool should interpret the
/// accompanying data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadManifest {
    pub file_location: String,
    pub tenant: String,
    pub file_name: String,
    pub source_platform: String,
    pub col_delim: String,
    pub row_delim: String,
    pub header_fields: Vec<ManifestField>,
}

impl UploadManifest {
    #[must_use]
    pub fn render(
        format: UploadFormat,
        data_path: &Path,
        tenant: &str,
        source_platform: &str,
    ) -> Self {
        Self {
            file_location: data_path.to_string_lossy().to_string(),
            tenant: tenant.to_string(),
            file_name: data_path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            source_platform: source_platform.to_string(),
            col_delim: ",".to_string(),
            row_delim: "\n".to_string(),
            header_fields: format
                .columns()
                .iter()
                .map(|column| ManifestField {
                    count: 0,
                    coltype: column.coltype.to_string(),
                    used: true,
                    tag: String::new(),
                    name: column.name.to_string(),
                })
                .collect(),
        }
    }
}

/// A query-log row already in its final three-field shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub id: String,
    /// Elapsed seconds, rendered exactly as supplied by the caller.
    pub elapsed_time: String,
    pub sql_text: String,
}

/// Caller-supplied tabular input for an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadData {
    /// Query rows already shaped as (id, elapsed time, SQL text).
    Queries(Vec<QueryRecord>),
    /// Bare SQL statements; ids and elapsed times are synthesized.
    Statements(Vec<String>),
    /// Pre-shaped rows matching the format's header list.
    Rows(Vec<Vec<String>>),
}

impl UploadData {
    /// Normalizes the input into CSV rows for `format`. Bare statements each
    /// get a fresh v4 UUID and a zero elapsed time.
    pub fn into_rows(self, format: UploadFormat) -> OptimizerResult<Vec<Vec<String>>> {
        match self {
            Self::Queries(records) => {
                if format != UploadFormat::Queries {
                    return Err(OptimizerError::upload(format!(
                        "query records are not valid rows for the `{}` format",
                        format.as_str()
                    )));
                }
                Ok(records
                    .into_iter()
                    .map(|record| vec![record.id, record.elapsed_time, record.sql_text])
                    .collect())
            }
            Self::Statements(statements) => {
                if format != UploadFormat::Queries {
                    return Err(OptimizerError::upload(format!(
                        "bare SQL statements are not valid rows for the `{}` format",
                        format.as_str()
                    )));
                }
                Ok(statements
                    .into_iter()
                    .map(|statement| {
                        vec![
                            Uuid::new_v4().to_string(),
                            SYNTHETIC_ELAPSED_TIME.to_string(),
                            statement,
                        ]
                    })
                    .collect())
            }
            Self::Rows(rows) => Ok(rows),
        }
    }
}

/// The two temp files backing one upload call. Both are removed when this
/// value drops, on every exit path.
#[derive(Debug)]
pub(crate) struct StagedUpload {
    data_file: NamedTempFile,
    manifest_file: NamedTempFile,
}

impl StagedUpload {
    pub(crate) fn manifest_path(&self) -> &Path {
        self.manifest_file.path()
    }
}

/// Writes the rows as CSV into a suffixed data file and renders the manifest
/// next to it. An empty input still produces a header-only data file and a
/// valid manifest.
pub(crate) fn stage(
    format: UploadFormat,
    data: UploadData,
    tenant: &str,
    source_platform: &str,
) -> OptimizerResult<StagedUpload> {
    let rows = data.into_rows(format)?;

    let data_file = tempfile::Builder::new()
        .prefix("optimizer-upload-")
        .suffix(format.data_suffix())
        .tempfile()
        .map_err(|error| OptimizerError::upload_with("failed to create data file", error))?;

    let mut writer = csv::Writer::from_writer(data_file.as_file());
    writer
        .write_record(format.headers())
        .map_err(|error| OptimizerError::upload_with("failed to write data headers", error))?;
    for row in &rows {
        writer
            .write_record(row)
            .map_err(|error| OptimizerError::upload_with("failed to write data row", error))?;
    }
    writer
        .flush()
        .map_err(|error| OptimizerError::upload_with("failed to flush data file", error))?;
    drop(writer);

    let manifest = UploadManifest::render(format, data_file.path(), tenant, source_platform);
    let manifest_file = tempfile::Builder::new()
        .prefix("optimizer-upload-")
        .suffix(".json")
        .tempfile()
        .map_err(|error| OptimizerError::upload_with("failed to create manifest file", error))?;
    serde_json::to_writer_pretty(manifest_file.as_file(), &manifest)
        .map_err(|error| OptimizerError::upload_with("failed to write manifest", error))?;

    Ok(StagedUpload {
        data_file,
        manifest_file,
    })
}

#[cfg(test)]
mod tests {
    use super::{QueryRecord, UploadData, UploadFormat, stage};
    use uuid::Uuid;

    #[test]
    fn statements_get_synthesized_ids_and_zero_elapsed_time() {
        let rows = UploadData::Statements(vec!["SELECT 1".to_string()])
            .into_rows(UploadFormat::Queries)
            .expect("statements are valid query rows");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
        let id = Uuid::parse_str(&rows[0][0]).expect("synthesized id should be a UUID");
        assert_eq!(id.get_version_num(), 4);
        assert_eq!(rows[0][1], "0.0");
        assert_eq!(rows[0][2], "SELECT 1");
    }

    #[test]
    fn shaped_query_records_pass_through_unchanged() {
        let rows = UploadData::Queries(vec![QueryRecord {
            id: "id-1".to_string(),
            elapsed_time: "5.2".to_string(),
            sql_text: "SELECT 2".to_string(),
        }])
        .into_rows(UploadFormat::Queries)
        .expect("shaped records are valid query rows");

        assert_eq!(rows, vec![vec!["id-1", "5.2", "SELECT 2"]]);
    }

    #[test]
    fn statements_are_rejected_for_stats_formats() {
        let error = UploadData::Statements(vec!["SELECT 1".to_string()])
            .into_rows(UploadFormat::TableStats)
            .expect_err("statements only fit the queries format");
        assert!(error.to_string().contains("table_stats"));
    }

    #[test]
    fn data_suffix_is_log_for_stats_and_csv_for_queries() {
        assert_eq!(UploadFormat::Queries.data_suffix(), ".csv");
        assert_eq!(UploadFormat::TableStats.data_suffix(), ".log");
        assert_eq!(UploadFormat::ColsStats.data_suffix(), ".log");
    }

    #[test]
    fn format_names_round_trip() {
        for format in [
            UploadFormat::Queries,
            UploadFormat::TableStats,
            UploadFormat::ColsStats,
        ] {
            assert_eq!(format.as_str().parse::<UploadFormat>().unwrap(), format);
        }
        assert!("parquet".parse::<UploadFormat>().is_err());
    }

    #[test]
    fn empty_input_stages_a_header_only_data_file() {
        let staged = stage(
            UploadFormat::TableStats,
            UploadData::Rows(Vec::new()),
            "tenant-1",
            "generic",
        )
        .expect("empty input is a valid upload");

        let content = std::fs::read_to_string(staged.data_file.path()).unwrap();
        assert_eq!(content, "TABLE_NAME,NUM_ROWS\n");
        assert!(staged.manifest_path().exists());
    }

    #[test]
    fn ragged_stat_rows_are_rejected_by_the_writer() {
        let error = stage(
            UploadFormat::TableStats,
            UploadData::Rows(vec![vec!["customers".to_string()]]),
            "tenant-1",
            "generic",
        )
        .expect_err("row width must match the header list");
        assert!(error.to_string().contains("failed to write data row"));
    }

    #[test]
    fn staged_files_are_removed_on_drop() {
        let staged = stage(
            UploadFormat::Queries,
            UploadData::Statements(vec!["SELECT 1".to_string()]),
            "tenant-1",
            "generic",
        )
        .unwrap();
        let data_path = staged.data_file.path().to_path_buf();
        let manifest_path = staged.manifest_path().to_path_buf();
        assert!(data_path.exists());
        assert!(manifest_path.exists());

        drop(staged);
        assert!(!data_path.exists());
        assert!(!manifest_path.exists());
    }
}
