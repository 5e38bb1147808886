use std::collections::HashMap;

use crate::data::{Dataset, Record};

/// Group key used for records that lack the grouping attribute.
pub const UNKNOWN_GROUP: &str = "unknown";

/// How a leaf record contributes to the aggregate of its ancestors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeightMode {
    /// Every record weighs 1; aggregates become record counts.
    Count,
    /// Weigh by a numeric column; missing or non-numeric values fall back to 1.
    Column(String),
}

impl WeightMode {
    fn weight_of(&self, record: &Record) -> f64 {
        match self {
            Self::Count => 1.0,
            Self::Column(name) => record.numeric(name).filter(|w| w.is_finite()).unwrap_or(1.0),
        }
    }
}

/// One node of the 3-level grouping tree: root (depth 0), group (depth 1),
/// leaf (depth 2). Leaves carry the source record's index; every non-root
/// node's aggregate equals the sum of its descendants' weights.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyNode {
    pub name: String,
    pub group_key: Option<String>,
    pub aggregate: f64,
    pub children: Vec<HierarchyNode>,
    pub record_index: Option<usize>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.record_index.is_some()
    }

    /// Record indices of every leaf under this node, in tree order.
    pub fn leaf_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.collect_leaf_indices(&mut indices);
        indices
    }

    fn collect_leaf_indices(&self, into: &mut Vec<usize>) {
        if let Some(index) = self.record_index {
            into.push(index);
        }
        for child in &self.children {
            child.collect_leaf_indices(into);
        }
    }
}

/// Groups flat records into a root → group → leaf tree. Group order is the
/// first-occurrence order of each distinct key; the same input always yields
/// the same tree.
pub fn build_hierarchy(
    dataset: &Dataset,
    group_by: &str,
    weight: &WeightMode,
    label_by: Option<&str>,
) -> HierarchyNode {
    let mut group_order = Vec::new();
    let mut members: HashMap<String, Vec<&Record>> = HashMap::new();

    for record in dataset.records() {
        let key = record
            .field(group_by)
            .map(|value| value.display())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_owned());

        let bucket = members.entry(key.clone()).or_default();
        if bucket.is_empty() {
            group_order.push(key);
        }
        bucket.push(record);
    }

    let mut groups = Vec::with_capacity(group_order.len());
    let mut total = 0.0;

    for key in group_order {
        let records = members.remove(&key).unwrap_or_default();
        let leaves = records
            .iter()
            .map(|record| {
                let name = label_by
                    .and_then(|attr| record.field(attr))
                    .map(|value| value.display())
                    .unwrap_or_else(|| format!("#{}", record.index));
                HierarchyNode {
                    name,
                    group_key: Some(key.clone()),
                    aggregate: weight.weight_of(record),
                    children: Vec::new(),
                    record_index: Some(record.index),
                }
            })
            .collect::<Vec<_>>();

        let aggregate = leaves.iter().map(|leaf| leaf.aggregate).sum::<f64>();
        total += aggregate;

        groups.push(HierarchyNode {
            name: key.clone(),
            group_key: Some(key),
            aggregate,
            children: leaves,
            record_index: None,
        });
    }

    HierarchyNode {
        name: "root".to_owned(),
        group_key: None,
        aggregate: total,
        children: groups,
        record_index: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Record, Value};

    fn record(index: usize, pairs: &[(&str, Value)]) -> Record {
        let fields = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect();
        Record::new(index, fields)
    }

    fn communities() -> Dataset {
        let populations = [10.0, 20.0, 0.0, 5.0, 100.0];
        let states = ["A", "A", "B", "B", "A"];
        let records = populations
            .iter()
            .zip(states.iter())
            .enumerate()
            .map(|(index, (population, state))| {
                record(
                    index,
                    &[
                        ("population", Value::Number(*population)),
                        ("state", Value::Text((*state).to_owned())),
                    ],
                )
            })
            .collect();
        Dataset::new(vec!["population".to_owned(), "state".to_owned()], records)
    }

    #[test]
    fn groups_by_state_with_summed_aggregates() {
        let weight = WeightMode::Column("population".to_owned());
        let root = build_hierarchy(&communities(), "state", &weight, None);

        assert_eq!(root.children.len(), 2);
        let a = &root.children[0];
        let b = &root.children[1];
        assert_eq!(a.name, "A");
        assert_eq!(a.aggregate, 130.0);
        assert_eq!(b.name, "B");
        assert_eq!(b.aggregate, 5.0);
        assert_eq!(root.aggregate, 135.0);
    }

    #[test]
    fn root_aggregate_equals_sum_of_leaves() {
        let weight = WeightMode::Column("population".to_owned());
        let root = build_hierarchy(&communities(), "state", &weight, None);

        let leaf_sum: f64 = root
            .children
            .iter()
            .flat_map(|group| group.children.iter())
            .map(|leaf| leaf.aggregate)
            .sum();
        assert_eq!(leaf_sum, root.aggregate);
    }

    #[test]
    fn group_order_follows_first_occurrence() {
        let weight = WeightMode::Count;
        let root = build_hierarchy(&communities(), "state", &weight, None);
        let names = root
            .children
            .iter()
            .map(|group| group.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn missing_group_attribute_uses_sentinel() {
        let records = vec![
            record(0, &[("state", Value::Text("A".to_owned()))]),
            record(1, &[]),
        ];
        let dataset = Dataset::new(vec!["state".to_owned()], records);
        let root = build_hierarchy(&dataset, "state", &WeightMode::Count, None);

        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].name, UNKNOWN_GROUP);
        assert_eq!(root.children[1].children[0].record_index, Some(1));
        assert!(root.children[1].children[0].is_leaf());
        assert!(!root.is_leaf());
    }

    #[test]
    fn non_numeric_weight_falls_back_to_one() {
        let records = vec![record(
            0,
            &[
                ("state", Value::Text("A".to_owned())),
                ("population", Value::Text("n/a".to_owned())),
            ],
        )];
        let dataset = Dataset::new(vec!["state".to_owned(), "population".to_owned()], records);
        let weight = WeightMode::Column("population".to_owned());
        let root = build_hierarchy(&dataset, "state", &weight, None);
        assert_eq!(root.aggregate, 1.0);
    }

    #[test]
    fn empty_dataset_yields_childless_root() {
        let dataset = Dataset::default();
        let root = build_hierarchy(&dataset, "state", &WeightMode::Count, None);
        assert!(root.children.is_empty());
        assert_eq!(root.aggregate, 0.0);
    }

    #[test]
    fn identical_input_builds_identical_tree() {
        let weight = WeightMode::Column("population".to_owned());
        let first = build_hierarchy(&communities(), "state", &weight, None);
        let second = build_hierarchy(&communities(), "state", &weight, None);
        assert_eq!(first, second);
    }
}
