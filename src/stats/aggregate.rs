//! Whole-dataset and per-class aggregates over the cleaned score table.

use super::calculator::{BoxStats, StatsCalculator, SummaryStats};
use crate::config::GroupOrder;
use crate::data::{filtered_records, ExamRecord, ScoreKind, ScoreTable, Selection};
use std::collections::HashMap;

/// Descriptive statistics of both score fields over the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSummary {
    pub written: SummaryStats,
    pub oral: SummaryStats,
}

impl GlobalSummary {
    pub fn field(&self, kind: ScoreKind) -> &SummaryStats {
        match kind {
            ScoreKind::Written => &self.written,
            ScoreKind::Oral => &self.oral,
        }
    }
}

/// Per-field indicators of one class, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIndicators {
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// One row of the per-class table.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassIndicators {
    pub class_label: String,
    pub count: usize,
    pub written: FieldIndicators,
    pub oral: FieldIndicators,
}

impl ClassIndicators {
    pub fn field(&self, kind: ScoreKind) -> &FieldIndicators {
        match kind {
            ScoreKind::Written => &self.written,
            ScoreKind::Oral => &self.oral,
        }
    }
}

/// One (record, score field) pair of the long-form table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongScore {
    pub class_label: String,
    pub kind: ScoreKind,
    pub value: f64,
}

/// Boxplot summary of one score kind within one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBox {
    pub class_label: String,
    pub kind: ScoreKind,
    pub stats: BoxStats,
}

/// Descriptive statistics over the entire cleaned table.
pub fn global_summary(table: &ScoreTable) -> GlobalSummary {
    GlobalSummary {
        written: StatsCalculator::compute_descriptive_stats(&table.scores(ScoreKind::Written)),
        oral: StatsCalculator::compute_descriptive_stats(&table.scores(ScoreKind::Oral)),
    }
}

/// Partition records by class label, groups ordered as requested.
fn partition<'a>(
    records: &[&'a ExamRecord],
    order: GroupOrder,
) -> Vec<(&'a str, Vec<&'a ExamRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Vec<&'a ExamRecord>)> = Vec::new();

    for &record in records {
        let label = record.class_label.as_str();
        match index.get(label) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(label, groups.len());
                groups.push((label, vec![record]));
            }
        }
    }

    if order == GroupOrder::Alphabetical {
        groups.sort_by(|a, b| a.0.cmp(b.0));
    }
    groups
}

fn field_indicators(records: &[&ExamRecord], kind: ScoreKind) -> FieldIndicators {
    let values: Vec<f64> = records.iter().map(|r| r.score(kind)).collect();
    let stats = StatsCalculator::compute_descriptive_stats(&values);
    FieldIndicators {
        mean: StatsCalculator::round2(stats.mean),
        std: stats.std.map(StatsCalculator::round2),
        min: StatsCalculator::round2(stats.min),
        max: StatsCalculator::round2(stats.max),
    }
}

/// Per-class mean/std/min/max of both fields for the selected classes.
///
/// Classes without selected records do not appear.
pub fn group_summary(
    table: &ScoreTable,
    selection: &Selection,
    order: GroupOrder,
) -> Vec<ClassIndicators> {
    let records = filtered_records(table, selection);

    partition(&records, order)
        .into_iter()
        .map(|(label, members)| ClassIndicators {
            class_label: label.to_string(),
            count: members.len(),
            written: field_indicators(&members, ScoreKind::Written),
            oral: field_indicators(&members, ScoreKind::Oral),
        })
        .collect()
}

/// Melt both score fields into one row per (record, field).
///
/// All written rows come first, then all oral rows, each in record order.
pub fn long_form(table: &ScoreTable, selection: &Selection) -> Vec<LongScore> {
    let records = filtered_records(table, selection);

    let mut long = Vec::with_capacity(records.len() * ScoreKind::ALL.len());
    for kind in ScoreKind::ALL {
        long.extend(records.iter().map(|r| LongScore {
            class_label: r.class_label.clone(),
            kind,
            value: r.score(kind),
        }));
    }
    long
}

/// Boxplot summaries per class and score kind, classes in the given order.
pub fn class_boxes(long: &[LongScore], class_order: &[String]) -> Vec<ClassBox> {
    let mut boxes = Vec::with_capacity(class_order.len() * ScoreKind::ALL.len());

    for class_label in class_order {
        for kind in ScoreKind::ALL {
            let values: Vec<f64> = long
                .iter()
                .filter(|s| s.kind == kind && &s.class_label == class_label)
                .map(|s| s.value)
                .collect();

            if let Some(stats) = StatsCalculator::compute_box_stats(&values) {
                boxes.push(ClassBox {
                    class_label: class_label.clone(),
                    kind,
                    stats,
                });
            }
        }
    }
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(class: &str, written: f64, oral: f64) -> ExamRecord {
        ExamRecord {
            source_row: 0,
            class_label: class.to_string(),
            last_name: String::new(),
            first_name: String::new(),
            written,
            oral,
        }
    }

    /// Rows 0 and 2 of the three-row fixture (row 1 had written score "NA").
    fn fixture() -> ScoreTable {
        ScoreTable::new(vec![rec("A", 10.0, 12.0), rec("B", 15.0, 16.0)], 1)
    }

    fn larger() -> ScoreTable {
        ScoreTable::new(
            vec![
                rec("1G3", 10.0, 12.0),
                rec("1G1", 8.5, 14.0),
                rec("1G3", 13.25, 9.0),
                rec("1G2", 11.0, 17.5),
                rec("1G1", 16.0, 3.0),
                rec("1G3", 7.0, 20.0),
            ],
            0,
        )
    }

    fn has_at_most_two_decimals(v: f64) -> bool {
        ((v * 100.0).round() - v * 100.0).abs() < 1e-6
    }

    #[test]
    fn fixture_global_and_group_summary() {
        let table = fixture();
        assert_eq!(global_summary(&table).written.count, 2);
        assert_eq!(global_summary(&table).oral.count, 2);

        let groups = group_summary(&table, &Selection::all(&table), GroupOrder::FirstSeen);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].class_label, "A");
        assert_eq!(groups[0].count, 1);
        assert_eq!(groups[0].written.mean, 10.0);
        assert_eq!(groups[0].oral.mean, 12.0);
        assert_eq!(groups[0].written.std, None);
        assert_eq!(groups[1].class_label, "B");
        assert_eq!(groups[1].count, 1);
        assert_eq!(groups[1].written.mean, 15.0);
        assert_eq!(groups[1].oral.mean, 16.0);
    }

    #[test]
    fn fixture_single_class_selection() {
        let table = fixture();
        let selection = Selection::from_labels(["B"]);

        let groups = group_summary(&table, &selection, GroupOrder::FirstSeen);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].class_label, "B");

        let long = long_form(&table, &selection);
        assert_eq!(
            long,
            vec![
                LongScore {
                    class_label: "B".to_string(),
                    kind: ScoreKind::Written,
                    value: 15.0
                },
                LongScore {
                    class_label: "B".to_string(),
                    kind: ScoreKind::Oral,
                    value: 16.0
                },
            ]
        );
        assert_eq!(long[0].kind.label(), "Écrit");
        assert_eq!(long[1].kind.label(), "Oral");
    }

    #[test]
    fn group_order_is_configurable() {
        let table = larger();
        let selection = Selection::all(&table);

        let first_seen: Vec<String> = group_summary(&table, &selection, GroupOrder::FirstSeen)
            .into_iter()
            .map(|g| g.class_label)
            .collect();
        assert_eq!(first_seen, vec!["1G3", "1G1", "1G2"]);

        let alphabetical: Vec<String> =
            group_summary(&table, &selection, GroupOrder::Alphabetical)
                .into_iter()
                .map(|g| g.class_label)
                .collect();
        assert_eq!(alphabetical, vec!["1G1", "1G2", "1G3"]);
    }

    #[test]
    fn group_counts_partition_the_selection() {
        let table = larger();
        for labels in [vec!["1G1", "1G3"], vec!["1G2"], vec![], vec!["1G1", "1G2", "1G3"]] {
            let selection = Selection::from_labels(labels);
            let expected = filtered_records(&table, &selection).len();

            let groups = group_summary(&table, &selection, GroupOrder::FirstSeen);
            assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), expected);

            let long = long_form(&table, &selection);
            assert_eq!(long.len(), 2 * expected);
            assert_eq!(
                long.iter().filter(|s| s.kind == ScoreKind::Written).count(),
                expected
            );
        }
    }

    #[test]
    fn group_values_are_rounded() {
        let table = larger();
        let groups = group_summary(&table, &Selection::all(&table), GroupOrder::FirstSeen);

        let g3 = &groups[0];
        assert_eq!(g3.count, 3);
        // (10 + 13.25 + 7) / 3 = 10.0833..
        assert_eq!(g3.written.mean, 10.08);
        assert_eq!(g3.written.min, 7.0);
        assert_eq!(g3.written.max, 13.25);

        for g in &groups {
            for kind in ScoreKind::ALL {
                let f = g.field(kind);
                assert!(has_at_most_two_decimals(f.mean));
                assert!(has_at_most_two_decimals(f.min));
                assert!(has_at_most_two_decimals(f.max));
                if let Some(std) = f.std {
                    assert!(has_at_most_two_decimals(std));
                }
            }
        }
    }

    #[test]
    fn long_form_is_melt_ordered() {
        let table = larger();
        let long = long_form(&table, &Selection::all(&table));
        assert_eq!(long.len(), 12);
        assert!(long[..6].iter().all(|s| s.kind == ScoreKind::Written));
        assert!(long[6..].iter().all(|s| s.kind == ScoreKind::Oral));
        assert_eq!(long[1].class_label, "1G1");
        assert_eq!(long[7].value, 14.0);
    }

    #[test]
    fn class_boxes_follow_class_order() {
        let table = larger();
        let long = long_form(&table, &Selection::all(&table));
        let order = vec!["1G2".to_string(), "1G1".to_string()];

        let boxes = class_boxes(&long, &order);
        assert_eq!(boxes.len(), 4);
        assert_eq!(boxes[0].class_label, "1G2");
        assert_eq!(boxes[0].kind, ScoreKind::Written);
        assert_eq!(boxes[1].kind, ScoreKind::Oral);
        assert_eq!(boxes[2].class_label, "1G1");
        assert_eq!(boxes[3].stats.median, 8.5);
    }
}
