//! Core data types: exam records, the cleaned score table and score kinds.

use std::collections::HashSet;

pub const COL_CLASS: &str = "Classe";
pub const COL_LAST_NAME: &str = "Nom";
pub const COL_FIRST_NAME: &str = "Prenom";
pub const COL_WRITTEN: &str = "note_ecrit";
pub const COL_ORAL: &str = "note_oral";

/// Source header → canonical column name, in output column order.
pub const COLUMN_MAPPING: [(&str, &str); 5] = [
    ("Division de classe", COL_CLASS),
    ("Nom candidat", COL_LAST_NAME),
    ("Prénom candidat", COL_FIRST_NAME),
    ("T001 - 1 - Français écrit - Ponctuel", COL_WRITTEN),
    ("T002 - 1 - Français oral - Ponctuel", COL_ORAL),
];

/// The two numeric score fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoreKind {
    Written,
    Oral,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 2] = [ScoreKind::Written, ScoreKind::Oral];

    /// Canonical column name.
    pub const fn column(self) -> &'static str {
        match self {
            ScoreKind::Written => COL_WRITTEN,
            ScoreKind::Oral => COL_ORAL,
        }
    }

    /// Display label used in tables, legends and long-form rows.
    pub const fn label(self) -> &'static str {
        match self {
            ScoreKind::Written => "Écrit",
            ScoreKind::Oral => "Oral",
        }
    }
}

/// One exam candidate with both scores present.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamRecord {
    /// 0-based data row in the source export
    pub source_row: usize,
    pub class_label: String,
    pub last_name: String,
    pub first_name: String,
    pub written: f64,
    pub oral: f64,
}

impl ExamRecord {
    pub fn score(&self, kind: ScoreKind) -> f64 {
        match kind {
            ScoreKind::Written => self.written,
            ScoreKind::Oral => self.oral,
        }
    }
}

/// Cleaned dataset: every record has two finite scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    records: Vec<ExamRecord>,
    dropped: usize,
}

impl ScoreTable {
    /// Build a table, discarding records whose scores are not finite.
    ///
    /// `dropped` counts rows already removed upstream; rejected records are added to it.
    pub fn new(records: Vec<ExamRecord>, dropped: usize) -> Self {
        let before = records.len();
        let records: Vec<ExamRecord> = records
            .into_iter()
            .filter(|r| r.written.is_finite() && r.oral.is_finite())
            .collect();
        let dropped = dropped + (before - records.len());
        Self { records, dropped }
    }

    pub fn records(&self) -> &[ExamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of source rows excluded for an unusable score.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Distinct class labels in order of first appearance.
    pub fn class_labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.class_label.as_str()))
            .map(|r| r.class_label.clone())
            .collect()
    }

    /// All values of one score field, in record order.
    pub fn scores(&self, kind: ScoreKind) -> Vec<f64> {
        self.records.iter().map(|r| r.score(kind)).collect()
    }
}
