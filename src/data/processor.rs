//! Data Processor Module
//! Projects the raw export onto the canonical columns and coerces scores.

use super::model::{
    ExamRecord, ScoreTable, COLUMN_MAPPING, COL_CLASS, COL_FIRST_NAME, COL_LAST_NAME, COL_ORAL,
    COL_WRITTEN,
};
use super::loader::DataLoader;
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use std::collections::HashSet;

/// Handles column projection, renaming and score coercion.
pub struct DataProcessor;

impl DataProcessor {
    /// Ensure every required source column is present.
    pub fn check_schema(df: &DataFrame) -> Result<()> {
        let present: HashSet<String> = DataLoader::get_columns(df).into_iter().collect();

        let missing: Vec<String> = COLUMN_MAPPING
            .iter()
            .filter(|(source, _)| !present.contains(*source))
            .map(|(source, _)| source.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::Schema { missing })
        }
    }

    /// Select the five source columns and rename them to canonical names.
    ///
    /// Output columns: ["Classe", "Nom", "Prenom", "note_ecrit", "note_oral"], all text.
    pub fn project(df: &DataFrame) -> Result<DataFrame> {
        Self::check_schema(df)?;

        let exprs: Vec<Expr> = COLUMN_MAPPING
            .iter()
            .map(|(source, target)| col(*source).cast(DataType::String).alias(*target))
            .collect();

        Ok(df.clone().lazy().select(exprs).collect()?)
    }

    /// Coerce one raw score. Unparseable or non-finite input becomes `None`.
    pub fn parse_score(raw: Option<&str>, decimal_comma: bool) -> Option<f64> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }

        let value = if decimal_comma {
            trimmed.replace(',', ".").parse::<f64>().ok()?
        } else {
            trimmed.parse::<f64>().ok()?
        };

        value.is_finite().then_some(value)
    }

    /// Build the cleaned score table.
    ///
    /// A row survives only if both scores parse. Dropped rows are counted.
    pub fn clean(df: &DataFrame, decimal_comma: bool) -> Result<ScoreTable> {
        let projected = Self::project(df)?;

        let class_ca = projected.column(COL_CLASS)?.str()?;
        let last_ca = projected.column(COL_LAST_NAME)?.str()?;
        let first_ca = projected.column(COL_FIRST_NAME)?.str()?;
        let written_ca = projected.column(COL_WRITTEN)?.str()?;
        let oral_ca = projected.column(COL_ORAL)?.str()?;

        let mut records = Vec::with_capacity(projected.height());
        let mut dropped = 0usize;

        for i in 0..projected.height() {
            let written = Self::parse_score(written_ca.get(i), decimal_comma);
            let oral = Self::parse_score(oral_ca.get(i), decimal_comma);

            match (written, oral) {
                (Some(written), Some(oral)) => records.push(ExamRecord {
                    source_row: i,
                    class_label: class_ca.get(i).unwrap_or_default().to_string(),
                    last_name: last_ca.get(i).unwrap_or_default().to_string(),
                    first_name: first_ca.get(i).unwrap_or_default().to_string(),
                    written,
                    oral,
                }),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            log::warn!(
                "Dropped {} of {} rows with a missing or non-numeric score",
                dropped,
                projected.height()
            );
        }

        let table = ScoreTable::new(records, dropped);
        log::info!(
            "Cleaned dataset: {} records in {} classes",
            table.len(),
            table.class_labels().len()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ScoreKind;

    fn raw_frame(classes: &[&str], written: &[&str], oral: &[&str]) -> DataFrame {
        let n = classes.len();
        let last: Vec<String> = (0..n).map(|i| format!("Nom{i}")).collect();
        let first: Vec<String> = (0..n).map(|i| format!("Prenom{i}")).collect();
        DataFrame::new(vec![
            Column::new("Division de classe".into(), classes),
            Column::new("Nom candidat".into(), last),
            Column::new("Prénom candidat".into(), first),
            Column::new("Autre colonne".into(), vec!["x"; n]),
            Column::new("T001 - 1 - Français écrit - Ponctuel".into(), written),
            Column::new("T002 - 1 - Français oral - Ponctuel".into(), oral),
        ])
        .unwrap()
    }

    #[test]
    fn projection_renames_to_canonical_columns() {
        let df = raw_frame(&["A"], &["10"], &["12"]);
        let projected = DataProcessor::project(&df).unwrap();
        let names: Vec<String> = projected
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Classe", "Nom", "Prenom", "note_ecrit", "note_oral"]);
    }

    #[test]
    fn drops_rows_with_unparseable_written_score() {
        let df = raw_frame(&["A", "A", "B"], &["10", "NA", "15"], &["12", "14", "16"]);
        let table = DataProcessor::clean(&df, false).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped(), 1);
        assert_eq!(table.len() + table.dropped(), df.height());
        assert_eq!(table.records()[0].last_name, "Nom0");
        assert_eq!(table.records()[1].last_name, "Nom2");
        let rows: Vec<usize> = table.records().iter().map(|r| r.source_row).collect();
        assert_eq!(rows, vec![0, 2]);
        assert_eq!(table.scores(ScoreKind::Written), vec![10.0, 15.0]);
        assert_eq!(table.scores(ScoreKind::Oral), vec![12.0, 16.0]);
    }

    #[test]
    fn either_missing_score_drops_the_row() {
        let df = raw_frame(
            &["A", "A", "B", "B"],
            &["10", "11", "abs", "9.5"],
            &["", "13", "14", "NaN"],
        );
        let table = DataProcessor::clean(&df, false).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.dropped(), 3);
        assert!(table
            .records()
            .iter()
            .all(|r| r.written.is_finite() && r.oral.is_finite()));
    }

    #[test]
    fn decimal_comma_is_opt_in() {
        let df = raw_frame(&["A", "B"], &["12,5", "8"], &["10", " 9.25 "]);

        let strict = DataProcessor::clean(&df, false).unwrap();
        assert_eq!(strict.len(), 1);
        assert_eq!(strict.records()[0].oral, 9.25);

        let lenient = DataProcessor::clean(&df, true).unwrap();
        assert_eq!(lenient.len(), 2);
        assert_eq!(lenient.records()[0].written, 12.5);
    }

    #[test]
    fn missing_columns_are_reported() {
        let df = DataFrame::new(vec![
            Column::new("Division de classe".into(), ["A"]),
            Column::new("Nom candidat".into(), ["X"]),
        ])
        .unwrap();

        match DataProcessor::clean(&df, false) {
            Err(DashboardError::Schema { missing }) => {
                assert_eq!(missing.len(), 3);
                assert!(missing.contains(&"Prénom candidat".to_string()));
                assert!(missing.contains(&"T001 - 1 - Français écrit - Ponctuel".to_string()));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn parse_score_rules() {
        assert_eq!(DataProcessor::parse_score(Some("14"), false), Some(14.0));
        assert_eq!(DataProcessor::parse_score(Some(" 7.5"), false), Some(7.5));
        assert_eq!(DataProcessor::parse_score(Some("inf"), false), None);
        assert_eq!(DataProcessor::parse_score(Some("ABS"), false), None);
        assert_eq!(DataProcessor::parse_score(Some(""), false), None);
        assert_eq!(DataProcessor::parse_score(None, false), None);
        assert_eq!(DataProcessor::parse_score(Some("3,5"), true), Some(3.5));
    }
}
