use std::collections::{HashMap, HashSet};
use std::path::Path;

use calamine::{open_workbook_auto, CellErrorType, Data, ExcelDateTime, Reader};
use chrono::Timelike;

use super::model::{CellValue, Column, DataFrame};
use crate::error::LoadError;

/// Tokens read as missing values, the same default set pandas uses.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Reader settings shared by every format.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    na_values: HashSet<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LoadOptions {
    /// Default NA set extended with user-supplied tokens.
    pub fn with_extra_na<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut opts = Self::default();
        opts.na_values.extend(extra.into_iter().map(Into::into));
        opts
    }

    fn is_na(&self, raw: &str) -> bool {
        self.na_values.contains(raw)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – comma separated, first row is the header
/// * `.xlsx` – first worksheet, first row is the header
pub fn load_file(path: &Path, opts: &LoadOptions) -> Result<DataFrame, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path, opts),
        "xlsx" => load_xlsx(path, opts),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows shorter than the header are padded with nulls; longer rows are
/// rejected since there is no column to put the extra fields in.
fn load_csv(path: &Path, opts: &LoadOptions) -> Result<DataFrame, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::NoColumns);
    }

    let names = dedupe_headers(headers.iter().map(str::to_string));
    let width = names.len();
    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); width];

    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            return Err(LoadError::TooManyFields {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: width,
                found: record.len(),
            });
        }
        for (idx, column) in cells.iter_mut().enumerate() {
            let value = record
                .get(idx)
                .map(|raw| parse_cell(raw, opts))
                .unwrap_or(CellValue::Null);
            column.push(value);
        }
    }

    Ok(build_frame(names, cells))
}

/// Classify a raw text cell: missing, boolean, integer, float or text.
fn parse_cell(raw: &str, opts: &LoadOptions) -> CellValue {
    if opts.is_na(raw) {
        return CellValue::Null;
    }
    match raw {
        "true" | "True" | "TRUE" => return CellValue::Bool(true),
        "false" | "False" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }

    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return if f.is_nan() {
            CellValue::Null
        } else {
            CellValue::Float(f)
        };
    }
    CellValue::Text(raw.to_string())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_xlsx(path: &Path, opts: &LoadOptions) -> Result<DataFrame, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheets)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(LoadError::NoColumns)?;
    let names = dedupe_headers(header.iter().map(header_text));
    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            let value = row
                .get(idx)
                .map(|cell| convert_cell(cell, opts))
                .unwrap_or(CellValue::Null);
            column.push(value);
        }
    }

    Ok(build_frame(names, cells))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data, opts: &LoadOptions) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => parse_cell(s, opts),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => float_cell(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => float_cell(dt.as_f64()),
        Data::DateTime(dt) => excel_date(dt),
        Data::DateTimeIso(s) => CellValue::Date(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(CellErrorType::NA) => CellValue::Null,
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Spreadsheets store every number as a float; whole values become integers.
fn float_cell(f: f64) -> CellValue {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if f.is_nan() {
        CellValue::Null
    } else if f.fract() == 0.0 && f.abs() < MAX_EXACT {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Float(f)
    }
}

/// Render an Excel date cell as `YYYY-MM-DD`, adding the time when it is not midnight.
///
/// calamine accounts for the 1904 date system and the phantom 1900-02-29.
fn excel_date(dt: &ExcelDateTime) -> CellValue {
    match dt.as_datetime() {
        Some(ts) if ts.num_seconds_from_midnight() == 0 => {
            CellValue::Date(ts.format("%Y-%m-%d").to_string())
        }
        Some(ts) => CellValue::Date(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Make header names unique and non-blank: `a, a` → `a, a.1`, `""` → `Unnamed: i`.
fn dedupe_headers<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let raw: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            }
        })
        .collect();

    let mut used: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(raw.len());

    for name in raw {
        if used.insert(name.clone()) {
            names.push(name);
            continue;
        }
        let counter = counters.entry(name.clone()).or_insert(0);
        let unique = loop {
            *counter += 1;
            let candidate = format!("{name}.{counter}");
            if !used.contains(&candidate) {
                break candidate;
            }
        };
        used.insert(unique.clone());
        names.push(unique);
    }
    names
}

fn build_frame(names: Vec<String>, cells: Vec<Vec<CellValue>>) -> DataFrame {
    DataFrame::from_columns(
        names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DType;
    use calamine::ExcelDateTimeType;
    use rust_xlsxwriter::{Format, Workbook};
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_infers_column_types() {
        let file = write_csv("id,height,name,ok\n1,1.70,ann,true\n2,1.82,bob,False\n3,,cid,TRUE\n");
        let df = load_file(file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(df.shape(), (3, 4));
        let dtypes: Vec<DType> = df.columns().iter().map(|c| c.dtype).collect();
        assert_eq!(dtypes, vec![DType::Int64, DType::Float64, DType::Object, DType::Bool]);
        assert_eq!(df.cell(2, 1), Some(&CellValue::Null));
        assert_eq!(df.cell(1, 3), Some(&CellValue::Bool(false)));
    }

    #[test]
    fn csv_na_tokens_and_padding() {
        let file = write_csv("a,b,c\nNA,2,x\n3,null\n4,n/a,-\n");
        let df = load_file(file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(df.column("a").unwrap().values[0], CellValue::Null);
        assert_eq!(df.column("b").unwrap().values[1], CellValue::Null);
        assert_eq!(df.column("c").unwrap().values[1], CellValue::Null);
        assert_eq!(df.column("c").unwrap().values[2], CellValue::Text("-".into()));

        let opts = LoadOptions::with_extra_na(["-"]);
        let df = load_file(file.path(), &opts).unwrap();
        assert_eq!(df.column("c").unwrap().values[2], CellValue::Null);
    }

    #[test]
    fn csv_rejects_rows_wider_than_header() {
        let file = write_csv("a,b\n1,2\n3,4,5\n");
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooManyFields { line: 3, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn empty_csv_has_no_columns() {
        let file = write_csv("");
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoColumns));
        assert_eq!(err.to_string(), "no columns to parse from file");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("data.parquet"), &LoadOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported file extension: .parquet (expected .csv or .xlsx)"
        );
    }

    #[test]
    fn headers_are_deduplicated() {
        let names = dedupe_headers(["a", "a", "", "a.1", "a"].map(String::from));
        assert_eq!(names, vec!["a", "a.1", "Unnamed: 2", "a.1.1", "a.2"]);
    }

    #[test]
    fn spreadsheet_cells_convert_like_text_cells() {
        let opts = LoadOptions::default();
        assert_eq!(convert_cell(&Data::Float(3.0), &opts), CellValue::Integer(3));
        assert_eq!(convert_cell(&Data::Float(2.5), &opts), CellValue::Float(2.5));
        assert_eq!(convert_cell(&Data::Float(f64::NAN), &opts), CellValue::Null);
        assert_eq!(convert_cell(&Data::Empty, &opts), CellValue::Null);
        assert_eq!(convert_cell(&Data::String("NA".into()), &opts), CellValue::Null);
        assert_eq!(convert_cell(&Data::String("12".into()), &opts), CellValue::Integer(12));
        assert_eq!(convert_cell(&Data::Error(CellErrorType::NA), &opts), CellValue::Null);
    }

    fn excel_date_cell(serial: f64, is_1904: bool) -> CellValue {
        let dt = ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, is_1904);
        convert_cell(&Data::DateTime(dt), &LoadOptions::default())
    }

    #[test]
    fn excel_dates_in_the_1900_system() {
        let date = |s: &str| CellValue::Date(s.to_string());
        assert_eq!(excel_date_cell(1.0, false), date("1900-01-01"));
        assert_eq!(excel_date_cell(59.0, false), date("1900-02-28"));
        assert_eq!(excel_date_cell(61.0, false), date("1900-03-01"));
        assert_eq!(excel_date_cell(25_569.0, false), date("1970-01-01"));
        assert_eq!(excel_date_cell(45_292.0, false), date("2024-01-01"));
        assert_eq!(excel_date_cell(45_292.5, false), date("2024-01-01 12:00:00"));
        assert_eq!(excel_date_cell(45_351.0, false), date("2024-02-29"));
    }

    #[test]
    fn excel_dates_in_the_1904_system() {
        assert_eq!(
            excel_date_cell(43_830.0, true),
            CellValue::Date("2024-01-01".into())
        );
        assert_eq!(
            excel_date_cell(0.25, true),
            CellValue::Date("1904-01-01 06:00:00".into())
        );
    }

    #[test]
    fn excel_durations_stay_numeric() {
        let dt = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(
            convert_cell(&Data::DateTime(dt), &LoadOptions::default()),
            CellValue::Float(1.5)
        );
    }

    fn write_xlsx(build: impl FnOnce(&mut Workbook)) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = Workbook::new();
        build(&mut workbook);
        workbook.save(file.path()).unwrap();
        file
    }

    #[test]
    fn xlsx_first_sheet_with_mixed_types_gaps_and_dates() {
        let file = write_xlsx(|workbook| {
            let stamp = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
            let sheet = workbook.add_worksheet();
            sheet.set_name("data").unwrap();
            for (col, name) in ["id", "value", "value", "label", "when", "ok"].iter().enumerate() {
                sheet.write_string(0, col as u16, *name).unwrap();
            }
            sheet.write_number(1, 0, 1.0).unwrap();
            sheet.write_number(1, 1, 2.5).unwrap();
            sheet.write_number(1, 2, 3.0).unwrap();
            sheet.write_string(1, 3, "a").unwrap();
            sheet.write_number_with_format(1, 4, 45_292.0, &stamp).unwrap();
            sheet.write_boolean(1, 5, true).unwrap();

            sheet.write_number(2, 0, 2.0).unwrap();
            sheet.write_number(2, 2, 4.0).unwrap();
            sheet.write_string(2, 3, "NA").unwrap();
            sheet.write_number_with_format(2, 4, 45_292.5, &stamp).unwrap();
            sheet.write_boolean(2, 5, false).unwrap();

            sheet.write_number(3, 0, 3.0).unwrap();

            let other = workbook.add_worksheet();
            other.write_string(0, 0, "ignored").unwrap();
        });

        let df = load_file(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(df.shape(), (3, 6));
        assert_eq!(
            df.column_names(),
            vec!["id", "value", "value.1", "label", "when", "ok"]
        );
        let dtypes: Vec<DType> = df.columns().iter().map(|c| c.dtype).collect();
        assert_eq!(
            dtypes,
            vec![
                DType::Int64,
                DType::Float64,
                DType::Float64,
                DType::Object,
                DType::Date,
                DType::Bool,
            ]
        );
        assert_eq!(
            df.column("id").unwrap().values,
            vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)]
        );
        assert_eq!(df.cell(1, 1), Some(&CellValue::Null));
        assert_eq!(df.cell(1, 3), Some(&CellValue::Null));
        assert_eq!(
            df.column("when").unwrap().values,
            vec![
                CellValue::Date("2024-01-01".into()),
                CellValue::Date("2024-01-01 12:00:00".into()),
                CellValue::Null,
            ]
        );
        assert_eq!(df.cell(0, 5), Some(&CellValue::Bool(true)));
        assert_eq!(df.cell(2, 5), Some(&CellValue::Null));
    }

    #[test]
    fn xlsx_with_empty_first_sheet_has_no_columns() {
        let file = write_xlsx(|workbook| {
            workbook.add_worksheet();
        });
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoColumns));
    }

    #[test]
    fn corrupt_xlsx_is_a_spreadsheet_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }

    #[test]
    fn header_text_for_numeric_headers() {
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
        assert_eq!(header_text(&Data::Empty), "");
    }
}
