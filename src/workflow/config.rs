//! Per-column preprocessing choices and their assembly into the wire
//! configuration.
//!
//! Choices live in an ordered map keyed by column name. Only columns the
//! analysis flagged (numeric, with nulls or outliers) get an entry, and
//! entries the user has set back to "leave as is" drop out again at
//! assembly time. Building twice from the same selection yields the same
//! bytes on the wire.

use crate::api::types::{
    ColumnDirectives, ColumnProfile, MissingStrategy, OutlierStrategy, PreprocessingConfig,
};
use std::collections::BTreeMap;

/// What the user currently has selected for one column. `None` means
/// "leave as is" and never reaches the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnChoice {
    pub missing: Option<MissingStrategy>,
    pub outliers: Option<OutlierStrategy>,
}

impl ColumnChoice {
    pub fn is_noop(self) -> bool {
        self.missing.is_none() && self.outliers.is_none()
    }
}

/// Seed the choice map from a fresh analysis.
///
/// A column gets a missing-value selector only when it is numeric and
/// actually has nulls (pre-selected to median replacement), and an
/// outlier selector only when it is numeric and has outliers
/// (pre-selected to capping). Text columns and clean numeric columns get
/// no entry at all.
pub fn seed_choices(columns: &[ColumnProfile]) -> BTreeMap<String, ColumnChoice> {
    let mut choices = BTreeMap::new();
    for column in columns {
        if !column.is_numeric() {
            continue;
        }
        let mut choice = ColumnChoice::default();
        if column.null_count > 0 {
            choice.missing = Some(MissingStrategy::Median);
        }
        if column.outlier_count > 0 {
            choice.outliers = Some(OutlierStrategy::Cap);
        }
        if !choice.is_noop() {
            choices.insert(column.column_name.clone(), choice);
        }
    }
    choices
}

/// Assemble the wire configuration from the current selection. Columns
/// whose every selector reads "leave as is" are omitted, not sent empty.
pub fn build_config(choices: &BTreeMap<String, ColumnChoice>) -> PreprocessingConfig {
    let mut config = PreprocessingConfig::default();
    for (name, choice) in choices {
        if choice.is_noop() {
            continue;
        }
        config.0.insert(
            name.clone(),
            ColumnDirectives {
                missing: choice.missing,
                outliers: choice.outliers,
            },
        );
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{CategoricalStats, ColumnKind, ColumnStats, NumericStats};

    fn numeric_column(name: &str, null_count: u64, outlier_count: u64) -> ColumnProfile {
        ColumnProfile {
            column_name: name.to_owned(),
            data_type: ColumnKind::Numeric,
            null_count,
            null_percentage: 0.0,
            outlier_count,
            outlier_percentage: 0.0,
            stats: ColumnStats::Numeric(NumericStats::default()),
        }
    }

    fn text_column(name: &str, null_count: u64) -> ColumnProfile {
        ColumnProfile {
            column_name: name.to_owned(),
            data_type: ColumnKind::Text,
            null_count,
            null_percentage: 0.0,
            outlier_count: 0,
            outlier_percentage: 0.0,
            stats: ColumnStats::Categorical(CategoricalStats {
                unique_count: 3,
                most_common: None,
            }),
        }
    }

    #[test]
    fn test_seed_flags_only_dirty_numeric_columns() {
        let columns = vec![
            numeric_column("age", 3, 0),
            numeric_column("salary", 0, 2),
            numeric_column("score", 0, 0),
            text_column("city", 5),
        ];

        let choices = seed_choices(&columns);
        assert_eq!(choices.len(), 2, "clean and text columns get no entry");

        let age = choices.get("age").copied().unwrap();
        assert_eq!(age.missing, Some(MissingStrategy::Median));
        assert_eq!(age.outliers, None);

        let salary = choices.get("salary").copied().unwrap();
        assert_eq!(salary.missing, None);
        assert_eq!(salary.outliers, Some(OutlierStrategy::Cap));
    }

    #[test]
    fn test_build_config_drops_noop_entries() {
        let mut choices = BTreeMap::new();
        choices.insert(
            "age".to_owned(),
            ColumnChoice {
                missing: Some(MissingStrategy::Median),
                outliers: None,
            },
        );
        choices.insert("salary".to_owned(), ColumnChoice::default());

        let config = build_config(&choices);
        assert_eq!(config.len(), 1);
        assert!(config.get("age").is_some());
        assert!(config.get("salary").is_none(), "no-op choice must not be sent");
    }

    #[test]
    fn test_single_median_choice_wire_shape() -> anyhow::Result<()> {
        let columns = vec![numeric_column("age", 4, 0), text_column("city", 0)];
        let config = build_config(&seed_choices(&columns));

        let json = serde_json::to_string(&config)?;
        assert_eq!(json, r#"{"age":{"missing":"median"}}"#);
        Ok(())
    }

    #[test]
    fn test_rebuild_is_byte_identical() -> anyhow::Result<()> {
        let columns = vec![
            numeric_column("height", 2, 1),
            numeric_column("weight", 0, 3),
        ];
        let choices = seed_choices(&columns);

        let first = serde_json::to_vec(&build_config(&choices))?;
        let second = serde_json::to_vec(&build_config(&choices))?;
        assert_eq!(first, second);
        Ok(())
    }
}
