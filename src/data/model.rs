use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the pandas dtypes we care about.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// ISO-8601 date string kept as text.
    Date(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "NaN"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) | CellValue::Date(s) => write!(f, "{s}"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell; booleans are deliberately not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DType – inferred column type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Date,
    Object,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    /// Infer the column type from its cells.
    ///
    /// Follows pandas: integers with gaps become `Float64`, and a column
    /// holding nothing but missing values is `Float64` too.
    pub fn infer(values: &[CellValue]) -> DType {
        let mut has_null = false;
        let (mut ints, mut floats, mut bools, mut dates, mut others) = (0, 0, 0, 0, 0);
        for v in values {
            match v {
                CellValue::Null => has_null = true,
                CellValue::Integer(_) => ints += 1,
                CellValue::Float(_) => floats += 1,
                CellValue::Bool(_) => bools += 1,
                CellValue::Date(_) => dates += 1,
                CellValue::Text(_) => others += 1,
            }
        }
        let non_null = ints + floats + bools + dates + others;

        if non_null == 0 {
            DType::Float64
        } else if ints == non_null && !has_null {
            DType::Int64
        } else if ints + floats == non_null {
            DType::Float64
        } else if bools == non_null {
            DType::Bool
        } else if dates == non_null {
            DType::Date
        } else {
            DType::Object
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Date => "datetime",
            DType::Object => "object",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// One named column with its inferred dtype.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let dtype = DType::infer(&values);
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Cells as optional floats (`None` for missing or non-numeric cells).
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(CellValue::as_f64).collect()
    }

    /// Present numeric values only, in row order.
    pub fn present_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(CellValue::as_f64)
            .filter(|v| !v.is_nan())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DataFrame – the complete loaded table
// ---------------------------------------------------------------------------

/// Rows × named columns. All columns have `n_rows` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataFrame {
    /// Build a frame from columns; shorter columns are padded with nulls.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let n_rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for col in &mut columns {
            if col.values.len() < n_rows {
                col.values.resize(n_rows, CellValue::Null);
                col.dtype = DType::infer(&col.values);
            }
        }
        Self { columns, n_rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// True when there is no column or no row.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.n_rows == 0
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns.get(col)?.values.get(row)
    }

    fn row_has_null(&self, row: usize) -> bool {
        self.columns.iter().any(|c| c.values[row].is_null())
    }

    /// Keep only the integer and float columns, in their original order.
    pub fn select_numeric(&self) -> DataFrame {
        DataFrame {
            columns: self
                .columns
                .iter()
                .filter(|c| c.dtype.is_numeric())
                .cloned()
                .collect(),
            n_rows: self.n_rows,
        }
    }

    /// Drop every row holding at least one missing cell.
    ///
    /// Returns the cleaned frame and the number of removed rows. Column
    /// dtypes are kept as they were, the way `dropna` leaves them.
    pub fn drop_nulls(&self) -> (DataFrame, usize) {
        let keep: Vec<usize> = (0..self.n_rows).filter(|&r| !self.row_has_null(r)).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                dtype: c.dtype,
                values: keep.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        let removed = self.n_rows - keep.len();
        (
            DataFrame {
                columns,
                n_rows: keep.len(),
            },
            removed,
        )
    }
}
