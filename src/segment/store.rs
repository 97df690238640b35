use super::header::ColumnSpec;
use super::selector::InstanceSelector;
use super::SegmentError;
use crate::table::Table;

/// One contiguous block of numeric rows collected under a single header.
///
/// Rows hold one value per requested column, in `ColumnSpec` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    header_line: usize,
    first_line: usize,
    last_line: usize,
    width: usize,
    rows: Vec<Vec<f64>>,
}

impl Segment {
    pub(crate) fn new(
        header_line: usize,
        first_line: usize,
        last_line: usize,
        width: usize,
        rows: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            header_line,
            first_line,
            last_line,
            width,
            rows,
        }
    }

    /// 1-based line number of the header that opened this segment
    pub fn header_line(&self) -> usize {
        self.header_line
    }

    /// 1-based line number of the first data row
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// 1-based line number of the last data row
    pub fn last_line(&self) -> usize {
        self.last_line
    }

    /// Token count of the header line (and of every accepted row)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Numeric rows in file order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Materialize as a table; `columns` must be the column list this
    /// segment was collected for
    pub(crate) fn to_table(&self, columns: &ColumnSpec) -> Table {
        let mut table = Table::with_capacity(columns.independent(), columns.len());
        for (i, name) in columns.names().iter().enumerate() {
            let values = self.rows.iter().map(|row| row[i]).collect();
            table.insert_column(name, values);
        }
        table
    }
}

/// All segments emitted while scanning one log, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSet {
    columns: ColumnSpec,
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub(crate) fn new(columns: ColumnSpec, segments: Vec<Segment>) -> Self {
        Self { columns, segments }
    }

    /// Columns the scan was run for
    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    /// All segments in file order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments found
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the scan found no segment
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate over segments in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Resolve a selector to one stored segment
    pub fn select(&self, selector: &InstanceSelector) -> Result<&Segment, SegmentError> {
        let index = selector.resolve(self.segments.len())?;
        Ok(&self.segments[index])
    }

    /// Resolve a selector and materialize the chosen segment as a table
    pub fn select_table(&self, selector: &InstanceSelector) -> Result<Table, SegmentError> {
        Ok(self.select(selector)?.to_table(&self.columns))
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
