//! Column-oriented batches of training examples

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

/// One example: field name to value
pub type BatchItem = HashMap<String, Value>;

/// A fixed-key collection of examples stored column by column
///
/// Every item added must carry exactly the batch's keys. Rows keep their
/// insertion order and are never removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    /// Field names, sorted
    keys: Vec<String>,

    /// One column of values per key
    columns: HashMap<String, Vec<Value>>,

    /// Number of rows
    count: usize,
}

impl Batch {
    /// Create an empty batch with the given keys
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = keys.iter().map(|key| (key.clone(), Vec::new())).collect();

        Self {
            keys,
            columns,
            count: 0,
        }
    }

    /// Create a batch holding a single item, taking its keys
    pub fn from_item(item: BatchItem) -> Self {
        let mut batch = Self::new(item.keys().cloned());
        batch.push_unchecked(item);
        batch
    }

    /// Create a batch from items, taking keys from the first one
    ///
    /// Fails if any later item carries a different key set.
    pub fn from_items(items: Vec<BatchItem>) -> Result<Self> {
        let mut items = items.into_iter();
        let Some(first) = items.next() else {
            return Ok(Self::default());
        };

        let mut batch = Self::from_item(first);
        for item in items {
            batch.add(item)?;
        }

        Ok(batch)
    }

    /// Append an item
    ///
    /// The item's keys must equal the batch's keys exactly. On failure
    /// nothing is appended.
    pub fn add(&mut self, item: BatchItem) -> Result<()> {
        if !self.matches_keys(&item) {
            let mut given: Vec<String> = item.keys().cloned().collect();
            given.sort();
            return Err(Error::InvalidKeys {
                expected: self.keys.clone(),
                given,
            });
        }

        self.push_unchecked(item);
        Ok(())
    }

    /// Reconstruct the item at a row
    pub fn get(&self, index: usize) -> Result<BatchItem> {
        if index >= self.count {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.count,
            });
        }

        Ok(self
            .columns
            .iter()
            .map(|(key, values)| (key.clone(), values[index].clone()))
            .collect())
    }

    /// Every value of one field, in row order
    pub fn values_for_key(&self, key: &str) -> Result<&[Value]> {
        self.columns
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    /// Field names, sorted
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if this batch has no rows
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate reconstructed rows in insertion order
    pub fn iter(&self) -> impl Iterator<Item = BatchItem> + '_ {
        (0..self.count).map(move |index| {
            self.columns
                .iter()
                .map(|(key, values)| (key.clone(), values[index].clone()))
                .collect()
        })
    }

    fn matches_keys(&self, item: &BatchItem) -> bool {
        item.len() == self.keys.len() && self.keys.iter().all(|key| item.contains_key(key))
    }

    fn push_unchecked(&mut self, item: BatchItem) {
        for (key, value) in item {
            if let Some(column) = self.columns.get_mut(&key) {
                column.push(value);
            }
        }
        self.count += 1;
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Batch: {} rows, {} keys", self.count, self.keys.len())?;

        const MAX_ROWS: usize = 10;

        for key in &self.keys {
            write!(f, "{key:15}")?;
            if let Some(values) = self.columns.get(key) {
                for value in values.iter().take(MAX_ROWS) {
                    write!(f, " | {}", value.type_name())?;
                }
            }
            if self.count > MAX_ROWS {
                write!(f, " | ... ({} more rows)", self.count - MAX_ROWS)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pairs: &[(&str, Value)]) -> BatchItem {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_from_items_round_trips_rows() {
        let first = item(&[("x", Value::Float32(vec![1.0, 2.0])), ("y", Value::Scalar(0.0))]);
        let second = item(&[("x", Value::Float32(vec![3.0, 4.0])), ("y", Value::Scalar(1.0))]);

        let batch = Batch::from_items(vec![first.clone(), second.clone()]).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.keys(), &["x".to_string(), "y".to_string()]);
        assert_eq!(batch.get(0).unwrap(), first);
        assert_eq!(batch.get(1).unwrap(), second);
        assert_eq!(
            batch.values_for_key("y").unwrap(),
            &[Value::Scalar(0.0), Value::Scalar(1.0)]
        );
    }

    #[test]
    fn test_from_items_rejects_mismatched_keys() {
        let first = item(&[("x", Value::Scalar(0.0))]);
        let second = item(&[("z", Value::Scalar(1.0))]);

        let result = Batch::from_items(vec![first, second]);
        assert!(matches!(result, Err(Error::InvalidKeys { .. })));
    }

    #[test]
    fn test_add_is_all_or_nothing() {
        let mut batch = Batch::new(["x", "y"]);

        let subset = item(&[("x", Value::Scalar(0.0))]);
        assert!(matches!(batch.add(subset), Err(Error::InvalidKeys { .. })));

        let superset = item(&[
            ("x", Value::Scalar(0.0)),
            ("y", Value::Scalar(0.0)),
            ("z", Value::Scalar(0.0)),
        ]);
        assert!(matches!(batch.add(superset), Err(Error::InvalidKeys { .. })));

        assert!(batch.is_empty());
        assert!(batch.values_for_key("x").unwrap().is_empty());

        batch
            .add(item(&[("x", Value::Scalar(1.0)), ("y", Value::Scalar(2.0))]))
            .unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let batch = Batch::from_item(item(&[("x", Value::Scalar(0.0))]));
        assert!(matches!(batch.get(1), Err(Error::IndexOutOfBounds { index: 1, len: 1 })));
    }

    #[test]
    fn test_unknown_column() {
        let batch = Batch::new(["x"]);
        assert!(matches!(batch.values_for_key("y"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut batch = Batch::new(["i"]);
        for i in 0..5 {
            batch.add(item(&[("i", Value::Scalar(f64::from(i)))])).unwrap();
        }

        let order: Vec<Value> = batch.iter().map(|row| row["i"].clone()).collect();
        assert_eq!(
            order,
            (0..5).map(|i| Value::Scalar(f64::from(i))).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_from_empty_items() {
        let batch = Batch::from_items(Vec::new()).unwrap();
        assert!(batch.is_empty());
        assert!(batch.keys().is_empty());
    }

    static_assertions::assert_impl_all!(Batch: Send, Sync);
}
