use std::io::BufRead;
use std::path::Path;

use serde_json::Value;

use crate::input::{
    CoordinateSet, InputError, TableFormat, detect_format, is_id_header, open_maybe_gz,
};
use crate::model::coords::{AxisSelection, CoordinatePoint};

pub fn load_coordinates(
    path: &Path,
    x: Option<&str>,
    y: Option<&str>,
) -> Result<CoordinateSet, InputError> {
    let reader = open_maybe_gz(path)?;
    match detect_format(path)? {
        TableFormat::Tsv => parse_coordinates_tsv(reader, x, y),
        TableFormat::Json => parse_coordinates_json(reader, x, y),
    }
}

/// Explicit names must exist. Otherwise prefer `x`/`y`, then `PC1`/`PC2`,
/// then the first two components in column order.
pub fn resolve_axes(
    components: &[String],
    x: Option<&str>,
    y: Option<&str>,
) -> Result<AxisSelection, InputError> {
    let find = |name: &str| {
        components
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .cloned()
    };
    let explicit = |name: Option<&str>| -> Result<Option<String>, InputError> {
        match name {
            Some(n) => find(n).map(Some).ok_or_else(|| {
                InputError::InvalidInput(format!("coordinate component '{n}' not found"))
            }),
            None => Ok(None),
        }
    };
    let x = explicit(x)?;
    let y = explicit(y)?;
    if let (Some(x), Some(y)) = (&x, &y) {
        return Ok(AxisSelection::new(x.clone(), y.clone()));
    }

    let defaults = [("x", "y"), ("pc1", "pc2")]
        .iter()
        .find_map(|(dx, dy)| Some((find(*dx)?, find(*dy)?)))
        .or_else(|| match components {
            [first, second, ..] => Some((first.clone(), second.clone())),
            _ => None,
        });
    let Some((dx, dy)) = defaults else {
        return Err(InputError::InvalidInput(format!(
            "coordinates need at least two components, found {}",
            components.len()
        )));
    };
    Ok(AxisSelection::new(x.unwrap_or(dx), y.unwrap_or(dy)))
}

pub fn parse_coordinates_tsv<R: BufRead>(
    mut reader: R,
    x: Option<&str>,
    y: Option<&str>,
) -> Result<CoordinateSet, InputError> {
    let mut buf = String::new();
    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse("coordinate table is empty".to_string()));
    }
    let header_cols: Vec<String> = buf
        .trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(|s| s.trim().to_string())
        .collect();
    let id_col = header_cols.iter().position(|c| is_id_header(c)).unwrap_or(0);
    let label_col = header_cols
        .iter()
        .enumerate()
        .position(|(idx, c)| idx != id_col && c.eq_ignore_ascii_case("label"));
    let components = header_cols
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != id_col && Some(*idx) != label_col)
        .map(|(_, name)| name.clone())
        .collect::<Vec<_>>();
    let axes = resolve_axes(&components, x, y)?;
    let col_of = |name: &str| header_cols.iter().position(|c| c == name);
    let (Some(x_col), Some(y_col)) = (col_of(axes.x.as_str()), col_of(axes.y.as_str())) else {
        return Err(InputError::InvalidInput(
            "selected axes missing from coordinate header".to_string(),
        ));
    };

    let mut points = Vec::new();
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
            crate::warn!("coordinate row has no id; skipping (line {})", line_no);
            continue;
        }
        let x = parse_component(&fields, x_col, &axes.x, line_no)?;
        let y = parse_component(&fields, y_col, &axes.y, line_no)?;
        let point = CoordinatePoint::new(sample_id, x, y);
        match label_col
            .and_then(|idx| fields.get(idx))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            Some(label) => points.push(point.with_label(label)),
            None => points.push(point),
        }
    }

    Ok(CoordinateSet { axes, points })
}

fn parse_component(
    fields: &[&str],
    idx: usize,
    name: &str,
    line_no: usize,
) -> Result<f64, InputError> {
    let raw = fields.get(idx).map(|s| s.trim()).unwrap_or("");
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InputError::Parse(format!(
            "invalid value '{raw}' for component {name} (line {line_no})"
        ))),
    }
}

pub fn parse_coordinates_json<R: BufRead>(
    reader: R,
    x: Option<&str>,
    y: Option<&str>,
) -> Result<CoordinateSet, InputError> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(rows) = value else {
        return Err(InputError::Parse(
            "coordinate JSON must be an array of objects".to_string(),
        ));
    };
    let mut objects = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match row {
            Value::Object(map) => objects.push(map),
            _ => {
                return Err(InputError::Parse(format!(
                    "coordinate JSON entry {idx} is not an object"
                )));
            }
        }
    }

    let mut components: Vec<String> = Vec::new();
    for map in &objects {
        for (key, v) in map {
            if is_id_header(key) || key.eq_ignore_ascii_case("label") || !v.is_number() {
                continue;
            }
            if !components.contains(key) {
                components.push(key.clone());
            }
        }
    }
    if objects.is_empty() {
        let axes = AxisSelection::new(x.unwrap_or("x"), y.unwrap_or("y"));
        return Ok(CoordinateSet {
            axes,
            points: Vec::new(),
        });
    }
    let axes = resolve_axes(&components, x, y)?;

    let mut points = Vec::with_capacity(objects.len());
    for (idx, map) in objects.iter().enumerate() {
        let sample_id = map
            .iter()
            .find(|(k, _)| is_id_header(k))
            .and_then(|(_, v)| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty());
        let Some(sample_id) = sample_id else {
            crate::warn!("coordinate entry has no id; skipping (entry {})", idx);
            continue;
        };
        let component = |name: &str| {
            map.get(name).and_then(Value::as_f64).ok_or_else(|| {
                InputError::Parse(format!(
                    "missing or non-numeric component {name} (entry {idx})"
                ))
            })
        };
        let point = CoordinatePoint::new(
            sample_id,
            component(axes.x.as_str())?,
            component(axes.y.as_str())?,
        );
        match map
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("label"))
            .and_then(|(_, v)| v.as_str())
            .filter(|s| !s.trim().is_empty())
        {
            Some(label) => points.push(point.with_label(label.trim())),
            None => points.push(point),
        }
    }

    Ok(CoordinateSet { axes, points })
}
