use anyhow::{Context, Result, bail};
use assetdesk::{Record, Value};
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use serde_json::value::RawValue;
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    CsvGz,
    Json,
}

impl SourceFormat {
    pub fn of(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_lowercase();
        if name.ends_with(".csv.gz") || name.ends_with(".gz") {
            Ok(SourceFormat::CsvGz)
        } else if name.ends_with(".csv") {
            Ok(SourceFormat::Csv)
        } else if name.ends_with(".json") {
            Ok(SourceFormat::Json)
        } else {
            bail!("unsupported records file: {}", path.display())
        }
    }
}

/// Records in file order plus the field names in first-seen order.
///
/// Each record keeps the exact source text it was parsed from, so writing a
/// dataset back only drops rows and never reformats the ones that remain.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub fields: Vec<String>,
    pub records: Vec<Record>,
    /// Source text of `records[i]`, line terminator included for CSV.
    raw: Vec<String>,
    /// CSV header line as read; unused for JSON.
    preamble: String,
}

impl Dataset {
    /// Removes a record together with its source text.
    pub fn remove(&mut self, index: usize) -> Record {
        self.raw.remove(index);
        self.records.remove(index)
    }
}

pub fn read_records(path: &Path) -> Result<Dataset> {
    let format = SourceFormat::of(path)?;
    let mut data = String::new();
    match format {
        SourceFormat::CsvGz => {
            let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let mut gz = GzDecoder::new(f);
            gz.read_to_string(&mut data)
                .with_context(|| format!("decompressing {}", path.display()))?;
        }
        SourceFormat::Csv | SourceFormat::Json => {
            let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            f.read_to_string(&mut data)?;
        }
    }

    let parsed = match format {
        SourceFormat::Json => parse_json(&data),
        SourceFormat::Csv | SourceFormat::CsvGz => parse_csv(&data),
    };
    parsed.with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_csv(data: &str) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());
    let fields = rdr.headers()?.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let mut records = Vec::new();
    let mut starts = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        starts.push(rec.position().map_or(data.len(), |p| p.byte() as usize));
        records.push(
            fields
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), Value::from_cell(rec.get(i).unwrap_or(""))))
                .collect::<Record>(),
        );
    }

    // record i spans from its own start to the next record's start
    let ends = starts.iter().skip(1).copied().chain(std::iter::once(data.len()));
    let raw = starts
        .iter()
        .zip(ends)
        .map(|(&start, end)| source_slice(data, start, end))
        .collect::<Result<Vec<_>>>()?;
    let preamble = source_slice(data, 0, starts.first().copied().unwrap_or(data.len()))?;

    Ok(Dataset { fields, records, raw, preamble })
}

fn source_slice(data: &str, start: usize, end: usize) -> Result<String> {
    data.get(start..end)
        .map(str::to_string)
        .with_context(|| format!("record bounds {start}..{end} fall inside a character"))
}

pub fn parse_json(data: &str) -> Result<Dataset> {
    let objects: Vec<&RawValue> = serde_json::from_str(data)?;
    let mut fields: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(objects.len());
    let mut raw = Vec::with_capacity(objects.len());
    for object in objects {
        let record: Record = serde_json::from_str(object.get())?;
        for name in record.field_names() {
            if !fields.iter().any(|f| f == name) {
                fields.push(name.to_string());
            }
        }
        records.push(record);
        raw.push(object.get().to_string());
    }
    Ok(Dataset {
        fields,
        records,
        raw,
        preamble: String::new(),
    })
}

/// Serializes `dataset` in the same format `path` was read in, reusing each
/// record's source text.
pub fn encode_records(path: &Path, dataset: &Dataset) -> Result<Vec<u8>> {
    match SourceFormat::of(path)? {
        SourceFormat::Json => Ok(encode_json(dataset).into_bytes()),
        SourceFormat::Csv => Ok(encode_csv(dataset).into_bytes()),
        SourceFormat::CsvGz => {
            let mut gz = GzEncoder::new(Vec::new(), Compression::default());
            gz.write_all(encode_csv(dataset).as_bytes())?;
            Ok(gz.finish()?)
        }
    }
}

fn encode_csv(dataset: &Dataset) -> String {
    let mut out = dataset.preamble.clone();
    for row in &dataset.raw {
        out.push_str(row);
    }
    out
}

fn encode_json(dataset: &Dataset) -> String {
    if dataset.raw.is_empty() {
        return "[]\n".to_string();
    }
    format!("[\n  {}\n]\n", dataset.raw.join(",\n  "))
}

/// Writes an export payload to `<dir>/<name>-<YYYYMMDD-HHMMSS>.csv`.
pub fn write_export(dir: &Path, name: &str, payload: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{name}-{stamp}.csv"));
    std::fs::write(&path, payload).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_become_typed_values() {
        let ds = parse_csv("tag,pof,active,note\nP101,3,true,\nV201,4.5,false,\"a, b\"\n").unwrap();
        assert_eq!(ds.fields, ["tag", "pof", "active", "note"]);
        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.records[0].value("pof"), &Value::Number(3.0));
        assert_eq!(ds.records[0].value("active"), &Value::Bool(true));
        assert_eq!(ds.records[0].value("note"), &Value::Null);
        assert_eq!(ds.records[1].value("note"), &Value::from("a, b"));
    }

    #[test]
    fn json_fields_in_first_seen_order() {
        let ds = parse_json(r#"[{"b": 1, "a": "x"}, {"a": "y", "c": null}]"#).unwrap();
        assert_eq!(ds.fields, ["b", "a", "c"]);
        assert_eq!(ds.records[1].value("b"), &Value::Null);
    }

    #[test]
    fn formats_by_file_name() {
        assert_eq!(SourceFormat::of(&PathBuf::from("a.CSV")).unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::of(&PathBuf::from("a.csv.gz")).unwrap(), SourceFormat::CsvGz);
        assert_eq!(SourceFormat::of(&PathBuf::from("a.json")).unwrap(), SourceFormat::Json);
        assert!(SourceFormat::of(&PathBuf::from("a.txt")).is_err());
    }

    #[test]
    fn export_lands_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = write_export(&target, "rbi", "Tag\n\"P101\"").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("rbi-") && name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Tag\n\"P101\"");
    }

    #[test]
    fn csv_rows_keep_their_source_text() {
        let src = "n,cost\r\nWO-1, 1200.00 \r\n\"WO-2\",1e3";
        let mut ds = parse_csv(src).unwrap();
        assert_eq!(encode_csv(&ds), src);
        ds.remove(0);
        assert_eq!(encode_csv(&ds), "n,cost\r\n\"WO-2\",1e3");
    }

    #[test]
    fn json_objects_keep_their_source_text() {
        let mut ds = parse_json(r#"[{"n": "WO-1", "cost": 99}, {"n":"WO-2","cost":99}]"#).unwrap();
        ds.remove(0);
        assert_eq!(encode_json(&ds), "[\n  {\"n\":\"WO-2\",\"cost\":99}\n]\n");
        assert_eq!(parse_json(&encode_json(&ds)).unwrap().records, ds.records);
    }

    #[test]
    fn gz_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv.gz");
        let ds = parse_csv("number,cost\nWO-1,1200\nWO-2,\n").unwrap();
        std::fs::write(&path, encode_records(&path, &ds).unwrap()).unwrap();
        let back = read_records(&path).unwrap();
        assert_eq!(back.fields, ds.fields);
        assert_eq!(back.records, ds.records);
    }
}
