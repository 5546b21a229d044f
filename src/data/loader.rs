use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray, UInt32Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_CLASS,
    COL_BOOSTER_CATEGORY,
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading a launch table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// `row` is the CSV line number (header is line 1), or the 1-based
    /// record number for JSON and Parquet.
    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("no launch records found")]
    Empty,
}

pub type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the launch columns (the canonical input)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – one column per field, as written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let dataset = match ext.as_str() {
        "csv" => load_csv(BufReader::new(open()?))?,
        "json" => load_json(BufReader::new(open()?))?,
        "parquet" | "pq" => load_parquet(open()?)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    if dataset.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row validation shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// One row as it appears in the CSV / JSON table. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawLaunchRow {
    #[serde(rename = "Flight Number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    class: f64,
    #[serde(rename = "Booster Version", default)]
    booster_version: Option<String>,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

impl RawLaunchRow {
    fn into_record(self, row: usize) -> Result<LaunchRecord> {
        let outcome = decode_class(self.class, row)?;
        check_payload(self.payload_mass_kg, row)?;

        Ok(LaunchRecord {
            flight_number: self.flight_number,
            launch_site: self.launch_site,
            payload_mass_kg: self.payload_mass_kg,
            outcome,
            booster_version: self.booster_version.filter(|s| !s.is_empty()),
            booster_version_category: self.booster_version_category,
        })
    }
}

fn decode_class(class: f64, row: usize) -> Result<Outcome> {
    let decoded = if class.fract() == 0.0 {
        Outcome::from_class(class as i64)
    } else {
        None
    };
    decoded.ok_or_else(|| LoadError::InvalidValue {
        row,
        column: COL_CLASS,
        value: class.to_string(),
    })
}

fn check_payload(kg: f64, row: usize) -> Result<()> {
    if kg.is_finite() && kg >= 0.0 {
        Ok(())
    } else {
        Err(LoadError::InvalidValue {
            row,
            column: COL_PAYLOAD_MASS,
            value: kg.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a CSV launch table from any reader.
pub fn load_csv<R: Read>(input: R) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);
        let row: RawLaunchRow = record.deserialize(Some(&headers))?;
        records.push(row.into_record(line)?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Flight Number": 1,
///     "Launch Site": "CCAFS LC-40",
///     "class": 0,
///     "Payload Mass (kg)": 0.0,
///     "Booster Version": "F9 v1.0  B0003",
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
pub fn load_json<R: Read>(input: R) -> Result<LaunchDataset> {
    let rows: Vec<RawLaunchRow> = serde_json::from_reader(input)?;
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.into_record(i + 1))
        .collect::<Result<Vec<_>>>()?;
    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per launch field.
///
/// Numeric columns may be any of Int32/Int64/Float32/Float64; `class` may also
/// be Boolean. String columns may be Utf8 or LargeUtf8.
pub fn load_parquet(file: File) -> Result<LaunchDataset> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let optional = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let site_col = required_column(&batch, COL_LAUNCH_SITE)?;
        let payload_col = required_column(&batch, COL_PAYLOAD_MASS)?;
        let class_col = required_column(&batch, COL_CLASS)?;
        let category_col = required_column(&batch, COL_BOOSTER_CATEGORY)?;
        let flight_col = optional(COL_FLIGHT_NUMBER);
        let version_col = optional(COL_BOOSTER_VERSION);

        for row in 0..batch.num_rows() {
            // Row numbers continue across batches.
            let row_no = records.len() + 1;

            let payload_mass_kg = number_at(payload_col, row, row_no, COL_PAYLOAD_MASS)?;
            check_payload(payload_mass_kg, row_no)?;

            let outcome = match class_col.as_any().downcast_ref::<BooleanArray>() {
                Some(flags) if !flags.is_null(row) => {
                    if flags.value(row) {
                        Outcome::Success
                    } else {
                        Outcome::Failure
                    }
                }
                _ => decode_class(number_at(class_col, row, row_no, COL_CLASS)?, row_no)?,
            };

            let flight_number = match flight_col {
                Some(col) if !col.is_null(row) => {
                    let n = number_at(col, row, row_no, COL_FLIGHT_NUMBER)?;
                    Some(decode_flight_number(n, row_no)?)
                }
                _ => None,
            };

            let booster_version = match version_col {
                Some(col) if !col.is_null(row) => {
                    Some(string_at(col, row, row_no, COL_BOOSTER_VERSION)?)
                }
                _ => None,
            };

            records.push(LaunchRecord {
                flight_number,
                launch_site: string_at(site_col, row, row_no, COL_LAUNCH_SITE)?,
                payload_mass_kg,
                outcome,
                booster_version,
                booster_version_category: string_at(category_col, row, row_no, COL_BOOSTER_CATEGORY)?,
            });
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Flight numbers must be whole and fit a `u32`, as on the CSV path.
fn decode_flight_number(n: f64, row: usize) -> Result<u32> {
    if n.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&n) {
        Ok(n as u32)
    } else {
        Err(LoadError::InvalidValue {
            row,
            column: COL_FLIGHT_NUMBER,
            value: n.to_string(),
        })
    }
}

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .schema()
        .index_of(name)
        .map(|i| batch.column(i))
        .map_err(|_| LoadError::MissingColumn(name.to_string()))
}

fn invalid(col: &ArrayRef, row: usize, row_no: usize, column: &'static str) -> LoadError {
    LoadError::InvalidValue {
        row: row_no,
        column,
        value: if col.is_null(row) {
            "<null>".to_string()
        } else {
            format!("{:?}", col.data_type())
        },
    }
}

/// Read a numeric cell as `f64`, whatever the physical integer/float type.
fn number_at(col: &ArrayRef, row: usize, row_no: usize, name: &'static str) -> Result<f64> {
    if col.is_null(row) {
        return Err(invalid(col, row, row_no, name));
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::UInt32 => any.downcast_ref::<UInt32Array>().map(|a| a.value(row) as f64),
        _ => None,
    };
    value.ok_or_else(|| invalid(col, row, row_no, name))
}

fn string_at(col: &ArrayRef, row: usize, row_no: usize, name: &'static str) -> Result<String> {
    if col.is_null(row) {
        return Err(invalid(col, row, row_no, name));
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => any.downcast_ref::<StringArray>().map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    };
    value.ok_or_else(|| invalid(col, row, row_no, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PayloadRange;
    use std::io::Write;
    use std::sync::Arc;

    const SAMPLE: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
2,3,VAFB SLC-4E,1,500.0,F9 v1.1  B1003,v1.1
3,4,KSC LC-39A,1,9600.0,F9 FT B1029.1,FT
";

    #[test]
    fn csv_with_extra_columns_loads() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(ds.payload_bounds, Some(PayloadRange::new(0.0, 9600.0)));

        let first = &ds.records[0];
        assert_eq!(first.flight_number, Some(1));
        assert_eq!(first.outcome, Outcome::Failure);
        assert_eq!(first.booster_version.as_deref(), Some("F9 v1.0  B0003"));
        assert_eq!(ds.records[3].booster_version_category, "FT");
    }

    #[test]
    fn csv_without_optional_columns_loads() {
        let input = "Launch Site,Payload Mass (kg),class,Booster Version Category\nA,10,1,FT\n";
        let ds = load_csv(input.as_bytes()).unwrap();
        assert_eq!(ds.records[0].flight_number, None);
        assert_eq!(ds.records[0].booster_version, None);
        assert_eq!(ds.records[0].outcome, Outcome::Success);
    }

    #[test]
    fn missing_column_is_rejected() {
        let input = "Launch Site,Payload Mass (kg),Booster Version Category\nA,10,FT\n";
        let err = load_csv(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "class"));
    }

    #[test]
    fn negative_payload_is_rejected() {
        let input = "Launch Site,Payload Mass (kg),class,Booster Version Category\nA,-5,1,FT\n";
        let err = load_csv(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 2, column: COL_PAYLOAD_MASS, .. }
        ));
    }

    #[test]
    fn bad_class_is_rejected() {
        let input = "Launch Site,Payload Mass (kg),class,Booster Version Category\nA,5,1,FT\nB,5,3,FT\n";
        let err = load_csv(input.as_bytes()).unwrap_err();
        // Header is line 1, so the second record sits on line 3.
        assert!(matches!(err, LoadError::InvalidValue { row: 3, column: COL_CLASS, .. }));
    }

    #[test]
    fn non_numeric_payload_is_a_csv_error() {
        let input = "Launch Site,Payload Mass (kg),class,Booster Version Category\nA,heavy,1,FT\n";
        assert!(matches!(load_csv(input.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn json_records_load() {
        let input = r#"[
            {"Launch Site": "A", "Payload Mass (kg)": 100.0, "class": 1, "Booster Version Category": "FT"},
            {"Launch Site": "B", "Payload Mass (kg)": 200, "class": 0, "Booster Version Category": "B4",
             "Flight Number": 7, "Booster Version": "F9 B4 B1039.2"}
        ]"#;
        let ds = load_json(input.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].flight_number, Some(7));
        assert_eq!(ds.records[1].payload_mass_kg, 200.0);
    }

    #[test]
    fn json_errors_count_records_from_one() {
        let input = r#"[
            {"Launch Site": "A", "Payload Mass (kg)": 1.0, "class": 1, "Booster Version Category": "FT"},
            {"Launch Site": "A", "Payload Mass (kg)": -1.0, "class": 1, "Booster Version Category": "FT"}
        ]"#;
        let err = load_json(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 2, column: COL_PAYLOAD_MASS, .. }));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spacex_launch_dash.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();

        assert_eq!(load_file(&path).unwrap().len(), 4);

        let txt = dir.path().join("launches.txt");
        std::fs::write(&txt, SAMPLE).unwrap();
        assert!(matches!(
            load_file(&txt),
            Err(LoadError::UnsupportedExtension(ref e)) if e == "txt"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn header_only_file_is_empty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "Launch Site,Payload Mass (kg),class,Booster Version Category\n").unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::Empty)));
    }

    fn write_parquet(path: &Path, columns: Vec<(&str, ArrayRef)>) {
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, col)| Field::new(*name, col.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let batch =
            RecordBatch::try_new(schema.clone(), columns.into_iter().map(|(_, c)| c).collect())
                .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    fn base_parquet_columns() -> Vec<(&'static str, ArrayRef)> {
        vec![
            (COL_LAUNCH_SITE, Arc::new(StringArray::from(vec!["A", "B"])) as ArrayRef),
            (COL_PAYLOAD_MASS, Arc::new(Float64Array::from(vec![100.0, 3000.0]))),
            (COL_CLASS, Arc::new(Int64Array::from(vec![1, 0]))),
            (COL_BOOSTER_CATEGORY, Arc::new(StringArray::from(vec!["FT", "B5"]))),
        ]
    }

    #[test]
    fn parquet_round_trips_through_arrow_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launches.parquet");
        write_parquet(&path, base_parquet_columns());

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].outcome, Outcome::Success);
        assert_eq!(ds.records[1].payload_mass_kg, 3000.0);
        assert_eq!(ds.records[1].booster_version_category, "B5");
        assert_eq!(ds.records[1].flight_number, None);
    }

    #[test]
    fn parquet_optional_columns_allow_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launches.parquet");
        let mut columns = base_parquet_columns();
        columns.push((COL_FLIGHT_NUMBER, Arc::new(Int64Array::from(vec![Some(7), None]))));
        columns.push((
            COL_BOOSTER_VERSION,
            Arc::new(StringArray::from(vec![None, Some("F9 B5 B1046.1")])),
        ));
        write_parquet(&path, columns);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].flight_number, Some(7));
        assert_eq!(ds.records[1].flight_number, None);
        assert_eq!(ds.records[0].booster_version, None);
        assert_eq!(ds.records[1].booster_version.as_deref(), Some("F9 B5 B1046.1"));
    }

    #[test]
    fn parquet_negative_flight_number_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launches.parquet");
        let mut columns = base_parquet_columns();
        columns.push((COL_FLIGHT_NUMBER, Arc::new(Int64Array::from(vec![1, -1]))));
        write_parquet(&path, columns);

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 2, column: COL_FLIGHT_NUMBER, ref value } if value == "-1"
        ));
    }

    #[test]
    fn fractional_or_oversized_flight_number_is_rejected() {
        assert_eq!(decode_flight_number(42.0, 1).unwrap(), 42);
        assert_eq!(decode_flight_number(u32::MAX as f64, 1).unwrap(), u32::MAX);
        assert!(decode_flight_number(1.5, 1).is_err());
        assert!(decode_flight_number(u32::MAX as f64 + 1.0, 1).is_err());
        assert!(decode_flight_number(f64::NAN, 1).is_err());
    }

    #[test]
    fn parquet_booster_version_of_wrong_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launches.parquet");
        let mut columns = base_parquet_columns();
        columns.push((COL_BOOSTER_VERSION, Arc::new(Int64Array::from(vec![1046, 1049]))));
        write_parquet(&path, columns);

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 1, column: COL_BOOSTER_VERSION, .. }
        ));
    }
}
