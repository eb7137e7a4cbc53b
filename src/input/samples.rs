use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use serde_json::Value;

use crate::input::{InputError, TableFormat, detect_format, is_id_header, open_maybe_gz};
use crate::model::sample::{AttrValue, SampleRecord, SampleTable};

pub fn load_samples(path: &Path, id_column: Option<&str>) -> Result<SampleTable, InputError> {
    let reader = open_maybe_gz(path)?;
    match detect_format(path)? {
        TableFormat::Tsv => parse_samples_tsv(reader, id_column),
        TableFormat::Json => parse_samples_json(reader, id_column),
    }
}

pub fn parse_samples_tsv<R: BufRead>(
    mut reader: R,
    id_column: Option<&str>,
) -> Result<SampleTable, InputError> {
    let mut buf = String::new();
    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse("sample table is empty".to_string()));
    }
    let header_cols: Vec<String> = buf
        .trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(|s| s.trim().to_string())
        .collect();
    if header_cols.iter().all(|c| c.is_empty()) {
        return Err(InputError::Parse("sample table header is empty".to_string()));
    }

    let id_col = match id_column {
        Some(name) => header_cols
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| {
                InputError::InvalidInput(format!("id column '{name}' not found in sample table"))
            })?,
        None => header_cols.iter().position(|c| is_id_header(c)).unwrap_or(0),
    };
    let columns = header_cols
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != id_col)
        .map(|(_, name)| name.clone())
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let sample_id = fields.get(id_col).map(|s| s.trim()).unwrap_or("");
        if sample_id.is_empty() {
            crate::warn!("sample row has no id; skipping (line {})", line_no);
            continue;
        }
        if !seen.insert(sample_id.to_string()) {
            crate::warn!(
                "duplicate sample id in annotations; keeping first (line {}, sample {})",
                line_no,
                sample_id
            );
            continue;
        }

        let mut record = SampleRecord::new(sample_id);
        for (idx, name) in header_cols.iter().enumerate() {
            if idx == id_col {
                continue;
            }
            let value = fields.get(idx).copied().unwrap_or("");
            record
                .attributes
                .insert(name.clone(), AttrValue::from_cell(value));
        }
        records.push(record);
    }

    Ok(SampleTable {
        id_column: header_cols[id_col].clone(),
        columns,
        records,
    })
}

/// Expects a top-level array of objects. Keys absent from an object are
/// absent attributes; `null` is a present but missing value.
pub fn parse_samples_json<R: BufRead>(
    reader: R,
    id_column: Option<&str>,
) -> Result<SampleTable, InputError> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(rows) = value else {
        return Err(InputError::Parse(
            "sample JSON must be an array of objects".to_string(),
        ));
    };

    let mut objects = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        let Value::Object(map) = row else {
            return Err(InputError::Parse(format!(
                "sample JSON entry {idx} is not an object"
            )));
        };
        objects.push(map);
    }

    let id_key = match id_column {
        Some(name) => {
            if !objects.is_empty() && !objects.iter().any(|map| map.contains_key(name)) {
                return Err(InputError::InvalidInput(format!(
                    "id column '{name}' not found in sample JSON"
                )));
            }
            name.to_string()
        }
        None => match objects
            .iter()
            .find_map(|map| map.keys().find(|k| is_id_header(k)).cloned())
        {
            Some(key) => key,
            None if objects.is_empty() => String::new(),
            None => {
                return Err(InputError::InvalidInput(
                    "sample JSON has no recognisable id key (use --id-column)".to_string(),
                ));
            }
        },
    };
    let key = id_key.as_str();

    let mut columns: Vec<String> = Vec::new();
    let mut known_columns: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(objects.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (idx, map) in objects.iter().enumerate() {
        let sample_id = match map.get(key) {
            Some(v) => match json_cell(v) {
                AttrValue::Value(s) => s,
                AttrValue::Missing => String::new(),
            },
            None => String::new(),
        };
        if sample_id.is_empty() {
            crate::warn!("sample entry has no id; skipping (entry {})", idx);
            continue;
        }
        if !seen.insert(sample_id.clone()) {
            crate::warn!(
                "duplicate sample id in annotations; keeping first (entry {}, sample {})",
                idx,
                sample_id
            );
            continue;
        }

        let mut record = SampleRecord::new(sample_id);
        for (name, v) in map {
            if name == key {
                continue;
            }
            if known_columns.insert(name.clone()) {
                columns.push(name.clone());
            }
            record.attributes.insert(name.clone(), json_cell(v));
        }
        records.push(record);
    }

    Ok(SampleTable {
        id_column: id_key,
        columns,
        records,
    })
}

fn json_cell(value: &Value) -> AttrValue {
    match value {
        Value::Null => AttrValue::Missing,
        Value::String(s) => AttrValue::from_cell(s),
        Value::Bool(b) => AttrValue::Value(b.to_string()),
        Value::Number(n) => AttrValue::Value(n.to_string()),
        other => AttrValue::Value(other.to_string()),
    }
}
