//! Tabular report output.

use std::fmt;

use pricer_core::types::Date;
use serde::Serialize;

/// One cell of a [`ReportGrid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GridValue {
    /// Free text
    Text(String),
    /// Number
    Number(f64),
    /// Calendar date
    Date(Date),
    /// Flag
    Bool(bool),
    /// No value
    Empty,
}

impl GridValue {
    /// The number held by the cell, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            GridValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for GridValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridValue::Text(s) => f.write_str(s),
            GridValue::Number(v) => write!(f, "{}", v),
            GridValue::Date(d) => write!(f, "{}", d),
            GridValue::Bool(b) => write!(f, "{}", b),
            GridValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for GridValue {
    fn from(value: &str) -> Self {
        GridValue::Text(value.to_string())
    }
}

impl From<String> for GridValue {
    fn from(value: String) -> Self {
        GridValue::Text(value)
    }
}

impl From<f64> for GridValue {
    fn from(value: f64) -> Self {
        GridValue::Number(value)
    }
}

impl From<Date> for GridValue {
    fn from(value: Date) -> Self {
        GridValue::Date(value)
    }
}

impl From<bool> for GridValue {
    fn from(value: bool) -> Self {
        GridValue::Bool(value)
    }
}

impl<T: Into<GridValue>> From<Option<T>> for GridValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(GridValue::Empty, Into::into)
    }
}

/// Heading row plus data rows, spreadsheet style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportGrid {
    headings: Vec<String>,
    rows: Vec<Vec<GridValue>>,
}

impl ReportGrid {
    /// Empty grid with `headings`.
    pub fn new<I, S>(headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headings: headings.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padded or truncated to the heading width.
    pub fn push_row(&mut self, mut row: Vec<GridValue>) {
        row.resize(self.headings.len(), GridValue::Empty);
        self.rows.push(row);
    }

    /// Column headings.
    pub fn headings(&self) -> &[String] {
        &self.headings
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<GridValue>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column headed `heading`.
    pub fn column(&self, heading: &str) -> Option<usize> {
        self.headings.iter().position(|h| h == heading)
    }

    /// Cell under `heading` in data row `row`.
    pub fn cell(&self, row: usize, heading: &str) -> Option<&GridValue> {
        let col = self.column(heading)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

impl fmt::Display for ReportGrid {
    /// Tab separated, heading row first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headings.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_padded_to_heading_width() {
        let mut grid = ReportGrid::new(["Field", "Value"]);
        grid.push_row(vec!["TradeId".into()]);
        assert_eq!(grid.rows()[0], vec![GridValue::from("TradeId"), GridValue::Empty]);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_cell_lookup_by_heading() {
        let mut grid = ReportGrid::new(["Leg", "NPV"]);
        grid.push_row(vec!["Leg1".into(), 12.5_f64.into()]);
        assert_eq!(grid.cell(0, "NPV").and_then(GridValue::as_number), Some(12.5));
        assert!(grid.cell(0, "Missing").is_none());
        assert!(grid.cell(1, "NPV").is_none());
    }

    #[test]
    fn test_display_is_tab_separated() {
        let mut grid = ReportGrid::new(["A", "B"]);
        grid.push_row(vec![true.into(), GridValue::from(None::<f64>)]);
        assert_eq!(grid.to_string(), "A\tB\ntrue\t\n");
    }
}
