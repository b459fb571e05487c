use std::collections::BTreeSet;

use super::model::{ExamRecord, ScoreTable};

// ---------------------------------------------------------------------------
// Class selection: which class labels feed the per-class view
// ---------------------------------------------------------------------------

/// Set of class labels currently chosen by the user.
///
/// An empty selection shows nothing; it is not a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    classes: BTreeSet<String>,
}

impl Selection {
    /// Every class present in the table (the initial state).
    pub fn all(table: &ScoreTable) -> Self {
        Self {
            classes: table.class_labels().into_iter().collect(),
        }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, class_label: &str) -> bool {
        self.classes.contains(class_label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Add or remove a single class.
    pub fn set(&mut self, class_label: &str, selected: bool) {
        if selected {
            self.classes.insert(class_label.to_string());
        } else {
            self.classes.remove(class_label);
        }
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }
}

/// Records whose class is selected, in table order.
pub fn filtered_records<'a>(table: &'a ScoreTable, selection: &Selection) -> Vec<&'a ExamRecord> {
    table
        .records()
        .iter()
        .filter(|r| selection.contains(&r.class_label))
        .collect()
}
