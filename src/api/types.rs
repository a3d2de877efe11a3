//! Wire types for the data-preparation service.
//!
//! Everything here mirrors the service's JSON contract exactly: field
//! names, enum string values, and the sparse-map shape of the
//! preprocessing configuration are all external contracts, not free for
//! this client to redefine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Analysis (returned by upload)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub basic_info: BasicInfo,
    pub columns: Vec<ColumnProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicInfo {
    pub row_count: u64,
    pub column_count: u64,
    pub file_size_mb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub column_name: String,
    pub data_type: ColumnKind,
    pub null_count: u64,
    pub null_percentage: f64,
    pub outlier_count: u64,
    pub outlier_percentage: f64,
    pub stats: ColumnStats,
}

impl ColumnProfile {
    pub fn is_numeric(&self) -> bool {
        matches!(self.data_type, ColumnKind::Numeric)
    }
}

/// Column type as inferred by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    #[serde(rename = "string")]
    Text,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "string",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific statistics. The service sends one of two object shapes
/// with no tag; the categorical variant is tried first because its
/// required `unique_count` field rules out numeric payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnStats {
    Categorical(CategoricalStats),
    Numeric(NumericStats),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NumericStats {
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub unique_count: u64,
    /// Usually a string, but the service echoes whatever the most common
    /// cell value was.
    #[serde(default)]
    pub most_common: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Preprocessing configuration (sent with preprocess)

/// Per-column handling of missing values.
///
/// "Leave the column alone" is expressed by omitting the directive
/// entirely, never by an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStrategy {
    Mean,
    Median,
    Zero,
    Remove,
}

impl MissingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Zero => "zero",
            Self::Remove => "remove",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mean => "Replace with mean",
            Self::Median => "Replace with median",
            Self::Zero => "Replace with 0",
            Self::Remove => "Drop rows",
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-column handling of outliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierStrategy {
    Cap,
    Remove,
}

impl OutlierStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cap => "cap",
            Self::Remove => "remove",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cap => "Cap at IQR bounds",
            Self::Remove => "Drop rows",
        }
    }
}

impl fmt::Display for OutlierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column's chosen directives. Both halves are independently optional;
/// a directive that is `None` is omitted from the wire entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDirectives {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<OutlierStrategy>,
}

impl ColumnDirectives {
    pub fn is_empty(&self) -> bool {
        self.missing.is_none() && self.outliers.is_none()
    }
}

/// Sparse map of column name to directives. Columns with nothing chosen
/// are not keys here: the service distinguishes "absent" from "explicit
/// no-op" and this client preserves that by omission. The ordered map
/// keeps re-assembly of an unchanged selection byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreprocessingConfig(pub BTreeMap<String, ColumnDirectives>);

impl PreprocessingConfig {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnDirectives> {
        self.0.get(column)
    }
}

// ---------------------------------------------------------------------------
// Database export (sent with export-to-db)

/// Supported destination engines. The wire values double as the service's
/// `db_type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    Sqlite,
    PostgreSql,
    MySql,
    MongoDb,
}

impl DbEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
            Self::MongoDb => "mongodb",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sqlite => "SQLite",
            Self::PostgreSql => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::MongoDb => "MongoDB",
        }
    }

    /// True for engines addressed by a single local file path.
    pub fn is_file_based(self) -> bool {
        matches!(self, Self::Sqlite)
    }

    /// Suggested port, pre-filled when the user picks this engine.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Sqlite => None,
            Self::PostgreSql => Some(5432),
            Self::MySql => Some(3308),
            Self::MongoDb => Some(27017),
        }
    }

    /// Suggested username, pre-filled when the user picks this engine.
    pub fn default_username(self) -> Option<&'static str> {
        match self {
            Self::MongoDb => Some("admin"),
            _ => None,
        }
    }
}

impl fmt::Display for DbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the service should do when the destination table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    Fail,
    #[default]
    Replace,
    Append,
}

impl ConflictPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fail => "Fail if it exists",
            Self::Replace => "Replace it",
            Self::Append => "Append to it",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection descriptor, serialized flat. File-based engines carry only
/// the path (in `database`); networked engines carry the full 5-tuple.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DbTarget {
    File {
        db_type: DbEngine,
        database: String,
    },
    Server {
        db_type: DbEngine,
        host: String,
        port: u16,
        username: String,
        password: String,
        database: String,
    },
}

impl DbTarget {
    pub fn engine(&self) -> DbEngine {
        match self {
            Self::File { db_type, .. } | Self::Server { db_type, .. } => *db_type,
        }
    }
}

/// Body of the export call.
#[derive(Debug, Clone, Serialize)]
pub struct DbExportRequest {
    pub filepath: String,
    pub db_config: DbTarget,
    pub table_name: String,
    pub if_exists: ConflictPolicy,
}

// ---------------------------------------------------------------------------
// Responses

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub filepath: String,
    #[serde(default)]
    pub filename: Option<String>,
    pub analysis: AnalysisReport,
}

/// One preview row: column name to cell value, as returned by the service.
pub type PreviewRow = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessResponse {
    pub original_rows: u64,
    pub processed_rows: u64,
    pub rows_removed: u64,
    pub processed_file: String,
    #[serde(default)]
    pub preview: Vec<PreviewRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportResponse {
    pub db_type: DbEngine,
    /// The mongodb backend reports `collection_name` where the others
    /// report `table_name`; accept both.
    #[serde(alias = "collection_name")]
    pub table_name: String,
    pub rows_exported: u64,
    #[serde(default)]
    pub db_file: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_wire_values() {
        assert_eq!(
            serde_json::to_string(&MissingStrategy::Median).ok(),
            Some("\"median\"".to_owned())
        );
        assert_eq!(
            serde_json::to_string(&OutlierStrategy::Cap).ok(),
            Some("\"cap\"".to_owned())
        );
        assert_eq!(
            serde_json::to_string(&ConflictPolicy::Replace).ok(),
            Some("\"replace\"".to_owned())
        );
        assert_eq!(DbEngine::PostgreSql.as_str(), "postgresql");
        assert_eq!(DbEngine::MongoDb.as_str(), "mongodb");
    }

    #[test]
    fn test_config_serializes_sparse() -> anyhow::Result<()> {
        let mut config = PreprocessingConfig::default();
        config.0.insert(
            "age".to_owned(),
            ColumnDirectives {
                missing: Some(MissingStrategy::Median),
                outliers: None,
            },
        );

        let json = serde_json::to_string(&config)?;
        assert_eq!(json, r#"{"age":{"missing":"median"}}"#);
        assert!(
            !json.contains("outliers"),
            "unchosen directive must be omitted, not nulled"
        );
        Ok(())
    }

    #[test]
    fn test_config_with_both_directives() -> anyhow::Result<()> {
        let mut config = PreprocessingConfig::default();
        config.0.insert(
            "salary".to_owned(),
            ColumnDirectives {
                missing: Some(MissingStrategy::Mean),
                outliers: Some(OutlierStrategy::Remove),
            },
        );

        let json = serde_json::to_string(&config)?;
        assert_eq!(json, r#"{"salary":{"missing":"mean","outliers":"remove"}}"#);
        Ok(())
    }

    #[test]
    fn test_analysis_deserializes() -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "basic_info": {"row_count": 100, "column_count": 2, "file_size_mb": 0.05},
            "columns": [
                {
                    "column_name": "age",
                    "data_type": "numeric",
                    "null_count": 3,
                    "null_percentage": 3.0,
                    "outlier_count": 0,
                    "outlier_percentage": 0.0,
                    "stats": {"mean": 31.5, "median": 30.0, "min": 18.0, "max": 65.0, "std": 9.2}
                },
                {
                    "column_name": "city",
                    "data_type": "string",
                    "null_count": 0,
                    "null_percentage": 0.0,
                    "outlier_count": 0,
                    "outlier_percentage": 0.0,
                    "stats": {"unique_count": 7, "most_common": "Seoul"}
                }
            ]
        });

        let report: AnalysisReport = serde_json::from_value(payload)?;
        assert_eq!(report.basic_info.row_count, 100);
        assert_eq!(report.columns.len(), 2);

        let age = report.columns.first().expect("age column");
        assert!(age.is_numeric());
        if let ColumnStats::Numeric(stats) = &age.stats {
            assert_eq!(stats.median, Some(30.0));
        } else {
            panic!("expected numeric stats for age");
        }

        let city = report.columns.get(1).expect("city column");
        assert_eq!(city.data_type, ColumnKind::Text);
        if let ColumnStats::Categorical(stats) = &city.stats {
            assert_eq!(stats.unique_count, 7);
        } else {
            panic!("expected categorical stats for city");
        }
        Ok(())
    }

    #[test]
    fn test_export_request_shapes() -> anyhow::Result<()> {
        let file = DbExportRequest {
            filepath: "processed_data.csv".to_owned(),
            db_config: DbTarget::File {
                db_type: DbEngine::Sqlite,
                database: "exported_data.db".to_owned(),
            },
            table_name: "people".to_owned(),
            if_exists: ConflictPolicy::Replace,
        };
        let json = serde_json::to_value(&file)?;
        assert_eq!(json["db_config"]["db_type"], "sqlite");
        assert_eq!(json["db_config"]["database"], "exported_data.db");
        assert!(
            json["db_config"].get("host").is_none(),
            "file target has no server fields"
        );
        assert_eq!(json["if_exists"], "replace");

        let server = DbExportRequest {
            filepath: "processed_data.csv".to_owned(),
            db_config: DbTarget::Server {
                db_type: DbEngine::PostgreSql,
                host: "localhost".to_owned(),
                port: 5432,
                username: "postgres".to_owned(),
                password: "secret".to_owned(),
                database: "warehouse".to_owned(),
            },
            table_name: "people".to_owned(),
            if_exists: ConflictPolicy::Append,
        };
        let json = serde_json::to_value(&server)?;
        assert_eq!(json["db_config"]["db_type"], "postgresql");
        assert_eq!(json["db_config"]["port"], 5432);
        assert_eq!(json["db_config"]["username"], "postgres");
        Ok(())
    }

    #[test]
    fn test_export_response_accepts_collection_name() -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "status": "success",
            "db_type": "mongodb",
            "collection_name": "people",
            "rows_exported": 42
        });
        let resp: ExportResponse = serde_json::from_value(payload)?;
        assert_eq!(resp.table_name, "people");
        assert_eq!(resp.db_file, None);
        Ok(())
    }

    #[test]
    fn test_preview_rows_deserialize() -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "original_rows": 100,
            "processed_rows": 97,
            "rows_removed": 3,
            "processed_file": "processed_data.csv",
            "preview": [{"age": 30, "city": "Seoul"}]
        });
        let resp: PreprocessResponse = serde_json::from_value(payload)?;
        assert_eq!(resp.rows_removed, 3);
        let row = resp.preview.first().expect("one preview row");
        assert_eq!(row.get("age"), Some(&serde_json::json!(30)));
        Ok(())
    }
}
