//! `field = value` pairs for UPDATE and the multi-row VALUES table for INSERT.

use crate::error::{QbError, QbResult};
use crate::operand::Operand;
use crate::param::ParamList;

/// One `field = value` assignment of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    field: String,
    value: Operand,
}

impl Set {
    pub fn new(field: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn build(&self, params: &mut ParamList) -> QbResult<String> {
        if self.value.is_list() {
            return Err(QbError::shape(format!(
                "Set clause value for '{}' cannot be an array.",
                self.field
            )));
        }
        let value = self.value.build_leaf(params)?;
        Ok(format!("{} = {value}", self.field))
    }
}

/// An ordered `column => value` mapping, one INSERT row.
///
/// Setting the same column twice keeps its first position and the last value.
///
/// # Example
/// ```
/// use oraqb::{Param, Record};
///
/// let row = Record::new()
///     .value("name", Param::string("Alice"))
///     .value("age", 30);
/// assert_eq!(row.columns().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Operand)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.insert(column.into(), value.into());
        self
    }

    fn insert(&mut self, column: String, value: Operand) {
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take(&mut self, column: &str) -> Option<Operand> {
        let idx = self.entries.iter().position(|(c, _)| c == column)?;
        Some(self.entries.swap_remove(idx).1)
    }
}

impl<K: Into<String>, V: Into<Operand>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k.into(), v.into());
        }
        record
    }
}

/// Column list fixed by the first record, plus rows aligned to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    fields: Vec<String>,
    rows: Vec<Vec<Operand>>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    ///
    /// The first record fixes the column order. Later records must carry the
    /// same column set in any order; their values are reordered to match.
    pub fn add(&mut self, mut record: Record) -> QbResult<()> {
        if record.is_empty() {
            return Err(QbError::structural("Record has no fields."));
        }

        let fields: Vec<String> = if self.fields.is_empty() {
            record.columns().map(str::to_string).collect()
        } else {
            let mut expected: Vec<&str> = self.fields.iter().map(String::as_str).collect();
            let mut given: Vec<&str> = record.columns().collect();
            expected.sort_unstable();
            given.sort_unstable();
            if expected != given {
                return Err(QbError::structural(
                    "Provided keys do not match the defined fields.",
                ));
            }
            self.fields.clone()
        };

        let mut row = Vec::with_capacity(fields.len());
        for field in &fields {
            let value = record.take(field).ok_or_else(|| {
                QbError::structural(format!("Missing field '{field}' in provided data."))
            })?;
            if value.is_list() || matches!(value, Operand::Subquery(_)) {
                return Err(QbError::shape(format!(
                    "Value for field '{field}' cannot be an array."
                )));
            }
            row.push(value);
        }
        self.fields = fields;
        self.rows.push(row);
        Ok(())
    }

    /// At least one column and one row.
    pub fn is_initialized(&self) -> bool {
        !self.fields.is_empty() && !self.rows.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(c1, c2) VALUES (v1, v2), (v1, v2)`.
    pub fn build(&self, params: &mut ParamList) -> QbResult<String> {
        if self.fields.is_empty() {
            return Err(QbError::precondition("No fields defined for batch query."));
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let values = row
                .iter()
                .map(|v| v.build_leaf(params))
                .collect::<QbResult<Vec<_>>>()?;
            rows.push(format!("({})", values.join(", ")));
        }
        Ok(format!("({}) VALUES {}", self.fields.join(", "), rows.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{Param, ParamType};

    #[test]
    fn set_fragments() {
        let mut params = ParamList::new();
        assert_eq!(Set::new("name", None::<&str>).build(&mut params).unwrap(), "name = NULL");
        assert_eq!(Set::new("bonus", 5000).build(&mut params).unwrap(), "bonus = 5000");
        assert_eq!(
            Set::new("title", "Senior Developer").build(&mut params).unwrap(),
            "title = 'Senior Developer'"
        );
        assert_eq!(
            Set::new("salary", Param::new(75000, ParamType::Integer))
                .build(&mut params)
                .unwrap(),
            "salary = ?"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn set_rejects_arrays() {
        let err = Set::new("tags", vec!["a", "b"]).build(&mut ParamList::new()).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn record_keeps_first_position_on_overwrite() {
        let r = Record::new().value("a", 1).value("b", 2).value("a", 3);
        assert_eq!(r.columns().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn batch_reorders_matching_records() {
        let mut batch = Batch::new();
        batch
            .add(Record::new().value("name", "Bob").value("age", 40))
            .unwrap();
        batch
            .add(
                Record::new()
                    .value("age", Param::int(25))
                    .value("name", Param::string("Ann")),
            )
            .unwrap();

        let mut params = ParamList::new();
        assert_eq!(
            batch.build(&mut params).unwrap(),
            "(name, age) VALUES ('Bob', 40), (?, ?)"
        );
        assert_eq!(params.as_slice()[0].ty, ParamType::String);
        assert_eq!(params.as_slice()[1].ty, ParamType::Integer);
    }

    #[test]
    fn batch_rejects_mismatched_keys() {
        let mut batch = Batch::new();
        batch.add(Record::new().value("a", 1).value("b", 2)).unwrap();

        let err = batch.add(Record::new().value("a", 1)).unwrap_err();
        assert!(err.is_structural());
        let err = batch
            .add(Record::new().value("a", 1).value("c", 2))
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(batch.row_count(), 1);
    }

    #[test]
    fn batch_rejects_array_values() {
        let mut batch = Batch::new();
        let err = batch
            .add(Record::new().value("ids", Param::int(vec![1, 2])))
            .unwrap_err();
        assert!(err.is_shape());
        assert!(!batch.is_initialized());
        assert!(batch.fields().is_empty());
    }

    #[test]
    fn record_from_pairs() {
        let r: Record = [("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(r.columns().collect::<Vec<_>>(), ["x", "y"]);
    }
}
