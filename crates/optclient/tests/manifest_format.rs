use std::path::Path;

use optclient::UploadFormat;
use optclient::upload::UploadManifest;
use serde_json::json;

#[test]
fn table_stats_manifest_names_are_uppercase() {
    let manifest = UploadManifest::render(
        UploadFormat::TableStats,
        Path::new("/tmp/stats.log"),
        "tenant-x",
        "generic",
    );

    let names: Vec<&str> = manifest
        .header_fields
        .iter()
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(names, vec!["TABLE_NAME", "NUM_ROWS"]);
}

#[test]
fn cols_stats_manifest_names_are_lowercase() {
    let manifest = UploadManifest::render(
        UploadFormat::ColsStats,
        Path::new("/tmp/stats.log"),
        "tenant-x",
        "generic",
    );

    let names: Vec<&str> = manifest
        .header_fields
        .iter()
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "table_name",
            "column_name",
            "data_type",
            "num_distinct",
            "num_nulls",
            "avg_col_len"
        ]
    );
}

#[test]
fn queries_manifest_tags_the_id_and_query_columns() {
    let manifest = UploadManifest::render(
        UploadFormat::Queries,
        Path::new("/tmp/queries.csv"),
        "tenant-x",
        "generic",
    );

    let coltypes: Vec<&str> = manifest
        .header_fields
        .iter()
        .map(|field| field.coltype.as_str())
        .collect();
    assert_eq!(coltypes, vec!["SQL_ID", "NONE", "SQL_QUERY"]);
    assert!(manifest.header_fields.iter().all(|field| field.used));
    assert!(
        manifest
            .header_fields
            .iter()
            .all(|field| field.count == 0 && field.tag.is_empty())
    );
}

#[test]
fn manifest_wire_field_names_are_exact() {
    let manifest = UploadManifest::render(
        UploadFormat::TableStats,
        Path::new("/tmp/workload-stats.log"),
        "tenant-x",
        "hive",
    );

    let encoded = serde_json::to_value(&manifest).expect("manifest should serialize");
    assert_eq!(
        encoded,
        json!({
            "fileLocation": "/tmp/workload-stats.log",
            "tenant": "tenant-x",
            "fileName": "workload-stats.log",
            "sourcePlatform": "hive",
            "colDelim": ",",
            "rowDelim": "\n",
            "headerFields": [
                {"count": 0, "coltype": "NONE", "use": true, "tag": "", "name": "TABLE_NAME"},
                {"count": 0, "coltype": "NONE", "use": true, "tag": "", "name": "NUM_ROWS"},
            ]
        })
    );
}

#[test]
fn rendered_queries_manifest_snapshot() {
    let manifest = UploadManifest::render(
        UploadFormat::Queries,
        Path::new("/tmp/workload-queries.csv"),
        "tenant-x",
        "hive",
    );
    let rendered = serde_json::to_string_pretty(&manifest).expect("manifest should serialize");

    insta::assert_snapshot!(rendered, @r#"
    {
      "fileLocation": "/tmp/workload-queries.csv",
      "tenant": "tenant-x",
      "fileName": "workload-queries.csv",
      "sourcePlatform": "hive",
      "colDelim": ",",
      "rowDelim": "\n",
      "headerFields": [
        {
          "count": 0,
          "coltype": "SQL_ID",
          "use": true,
          "tag": "",
          "name": "SQL_ID"
        },
        {
          "count": 0,
          "coltype": "NONE",
          "use": true,
          "tag": "",
          "name": "ELAPSED_TIME"
        },
        {
          "count": 0,
          "coltype": "SQL_QUERY",
          "use": true,
          "tag": "",
          "name": "SQL_FULLTEXT"
        }
      ]
    }
    "#);
}

#[test]
fn manifest_round_trips_through_serde() {
    let manifest = UploadManifest::render(
        UploadFormat::ColsStats,
        Path::new("/tmp/cols.log"),
        "tenant-x",
        "generic",
    );
    let encoded = serde_json::to_string(&manifest).expect("manifest should serialize");
    let decoded: UploadManifest =
        serde_json::from_str(&encoded).expect("manifest should deserialize");
    assert_eq!(decoded, manifest);
}
