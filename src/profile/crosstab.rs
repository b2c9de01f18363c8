use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::data::model::{CellValue, Dataset};
use crate::error::{ProfileError, Result};

/// Contingency table of two columns. Rows are the values of the first
/// column, columns the values of the second, both sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crosstab {
    pub row_column: String,
    pub col_column: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `grid[r][c]` counts rows where the first column is `row_labels[r]`
    /// and the second is `col_labels[c]`.
    pub grid: Vec<Vec<usize>>,
}

impl Crosstab {
    /// Joint count of a value pair; zero for pairs that never occur.
    pub fn get(&self, row_value: &str, col_value: &str) -> usize {
        let r = self.row_labels.iter().position(|l| l == row_value);
        let c = self.col_labels.iter().position(|l| l == col_value);
        match (r, c) {
            (Some(r), Some(c)) => self.grid[r][c],
            _ => 0,
        }
    }

    /// Pairs that occur at least once, keyed by (row value, column value).
    pub fn counts(&self) -> BTreeMap<(String, String), usize> {
        let mut out = BTreeMap::new();
        for (r, row_label) in self.row_labels.iter().enumerate() {
            for (c, col_label) in self.col_labels.iter().enumerate() {
                let n = self.grid[r][c];
                if n > 0 {
                    out.insert((row_label.clone(), col_label.clone()), n);
                }
            }
        }
        out
    }

    pub fn total(&self) -> usize {
        self.grid.iter().flatten().sum()
    }
}

/// Count joint occurrences of the values of `column_a` and `column_b`.
/// Rows missing either value are not counted.
///
/// # Errors
///
/// [`ProfileError::ColumnNotFound`] when either column is absent.
pub fn cross_tabulate(dataset: &Dataset, column_a: &str, column_b: &str) -> Result<Crosstab> {
    let lookup = |name: &str| {
        dataset.column(name).ok_or_else(|| ProfileError::ColumnNotFound {
            column: name.to_string(),
        })
    };
    let a = lookup(column_a)?;
    let b = lookup(column_b)?;

    let mut joint: BTreeMap<(&CellValue, &CellValue), usize> = BTreeMap::new();
    for (va, vb) in a.values.iter().zip(&b.values) {
        if va.is_null() || vb.is_null() {
            continue;
        }
        *joint.entry((va, vb)).or_default() += 1;
    }

    let row_values: Vec<&CellValue> = joint
        .keys()
        .map(|(va, _)| *va)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let col_values: Vec<&CellValue> = joint
        .keys()
        .map(|(_, vb)| *vb)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let grid = row_values
        .iter()
        .map(|va| {
            col_values
                .iter()
                .map(|vb| joint.get(&(*va, *vb)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(Crosstab {
        row_column: a.name.clone(),
        col_column: b.name.clone(),
        row_labels: row_values.iter().map(|v| v.to_string()).collect(),
        col_labels: col_values.iter().map(|v| v.to_string()).collect(),
        grid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    #[test]
    fn counts_joint_occurrences() {
        let ds = Dataset::new(vec![
            Column::new("X", vec!["A".into(), "A".into(), "B".into()]),
            Column::new("Y", vec!["x".into(), "y".into(), "x".into()]),
        ])
        .unwrap();
        let table = cross_tabulate(&ds, "X", "Y").unwrap();

        let expected: BTreeMap<(String, String), usize> = [
            (("A".to_string(), "x".to_string()), 1),
            (("A".to_string(), "y".to_string()), 1),
            (("B".to_string(), "x".to_string()), 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.counts(), expected);
        assert_eq!(table.get("B", "y"), 0);
        assert_eq!(table.grid, vec![vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn missing_values_are_not_a_category() {
        let ds = Dataset::new(vec![
            Column::new("X", vec!["A".into(), CellValue::Null, "B".into(), "B".into()]),
            Column::new("Y", vec!["x".into(), "x".into(), CellValue::Null, "y".into()]),
        ])
        .unwrap();
        let table = cross_tabulate(&ds, "X", "Y").unwrap();
        assert_eq!(table.total(), 2);
        assert!(!table.row_labels.contains(&"<null>".to_string()));
        assert!(!table.col_labels.contains(&"<null>".to_string()));
    }

    #[test]
    fn equal_numbers_share_one_label() {
        let ds = Dataset::new(vec![
            Column::new(
                "Jam",
                vec![CellValue::Integer(1), CellValue::Float(1.0), CellValue::Integer(2)],
            ),
            Column::new("Prodi", vec!["TI".into(), "TI".into(), "SI".into()]),
        ])
        .unwrap();
        let table = cross_tabulate(&ds, "Jam", "Prodi").unwrap();
        assert_eq!(table.row_labels, vec!["1", "2"]);
        assert_eq!(table.get("1", "TI"), 2);
        assert_eq!(table.get("2", "SI"), 1);
    }

    #[test]
    fn absent_column_is_an_error() {
        let ds = Dataset::new(vec![Column::new("X", vec!["A".into()])]).unwrap();
        assert_eq!(
            cross_tabulate(&ds, "X", "Z"),
            Err(ProfileError::ColumnNotFound { column: "Z".into() })
        );
    }
}
