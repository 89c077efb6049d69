//! Sketch files: save and load a [`Sketch`].
//!
//! Two on-disk formats are supported.
//!
//! **JSON** (default): a versioned wrapper around the shape list, in insertion
//! order.
//!
//! ```json
//! { "version": 1, "shapes": [ { "kind": "Box", "corner1": [10.0, 20.0], ... } ] }
//! ```
//!
//! **Legacy text**: one block per shape kind, one row per shape.
//!
//! ```text
//! {
//! 	[1]:
//! 	{
//! 		Box,(10, 20),(50, 60),(1,0,0.5,1),0,1600,0
//! 	}
//! }
//! ```
//!
//! Rows read `name,(x1, y1),(x2, y2),(r,g,b,a),type,area,rotation`. Older
//! files without the trailing `type,area,rotation` columns, or without a name,
//! are accepted too. The legacy format groups shapes by kind, so the relative
//! order of different kinds is not preserved.
//!
//! Floats are written with Rust's shortest round-trip formatting, so both
//! formats reload the exact values that were saved.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SketchError;
use crate::math::{Color, Vec2};
use crate::shape::{BODY_TYPE_DYNAMIC, BODY_TYPE_STATIC, ShapeKind, ShapeRecord};
use crate::sketch::Sketch;

/// Version written by [`to_json`].
pub const CURRENT_VERSION: u32 = 1;

/// On-disk format of a sketch file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchFormat {
    Json,
    LegacyText,
}

impl SketchFormat {
    /// `.txt` and `.sketch` files use the legacy text format, anything else JSON.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("sketch") => {
                SketchFormat::LegacyText
            }
            _ => SketchFormat::Json,
        }
    }
}

// ── JSON ────────────────────────────────────────────────────────────────

/// The JSON wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchFile {
    pub version: u32,
    pub shapes: Vec<ShapeRecord>,
}

pub fn to_json(sketch: &Sketch) -> Result<String, SketchError> {
    let file = SketchFile {
        version: CURRENT_VERSION,
        shapes: sketch.as_slice().to_vec(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

pub fn from_json(json: &str) -> Result<Sketch, SketchError> {
    from_json_value(serde_json::from_str(json)?)
}

fn from_json_value(value: serde_json::Value) -> Result<Sketch, SketchError> {
    // Check the version before the shape schema so newer files get a clear error.
    if let Some(version) = value.get("version").and_then(serde_json::Value::as_u64) {
        if version > u64::from(CURRENT_VERSION) || version == 0 {
            return Err(SketchError::UnsupportedVersion(
                u32::try_from(version).unwrap_or(u32::MAX),
            ));
        }
    }
    let file: SketchFile = serde_json::from_value(value)?;
    Ok(Sketch::from(file.shapes))
}

// ── Legacy text ─────────────────────────────────────────────────────────

pub fn write_text(sketch: &Sketch) -> String {
    let mut out = String::from("{\n");
    for (kind, shapes) in sketch.by_kind() {
        let _ = write!(out, "\t[{}]:\n\t{{\n", kind.index());
        for s in shapes {
            let _ = writeln!(
                out,
                "\t\t{},({}, {}),({}, {}),({},{},{},{}),{},{},{}",
                kind.name(),
                s.corner1.x,
                s.corner1.y,
                s.corner2.x,
                s.corner2.y,
                s.color.r,
                s.color.g,
                s.color.b,
                s.color.a,
                s.body_type_code(),
                s.area,
                s.rotation_degrees,
            );
        }
        out.push_str("\t}\n");
    }
    out.push('}');
    out
}

pub fn parse_text(text: &str) -> Result<Sketch, SketchError> {
    let mut sketch = Sketch::new();
    let mut block: Option<ShapeKind> = None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        match line {
            "" | "{" | "}" => continue,
            _ if line.starts_with('[') => block = Some(parse_header(line, line_no)?),
            _ => sketch.push(parse_row(line, block, line_no)?),
        }
    }
    Ok(sketch)
}

fn parse_header(line: &str, line_no: usize) -> Result<ShapeKind, SketchError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .map(|(index, _)| index.trim())
        .ok_or_else(|| SketchError::parse(line_no, "unterminated block header"))?;
    let index: u32 = inner
        .parse()
        .map_err(|_| SketchError::parse(line_no, format!("bad block index `{inner}`")))?;
    ShapeKind::from_index(index)
        .ok_or_else(|| SketchError::parse(line_no, format!("unknown shape index {index}")))
}

fn parse_row(line: &str, block: Option<ShapeKind>, line_no: usize) -> Result<ShapeRecord, SketchError> {
    let tokens = scan(line, line_no)?;

    let kind = match tokens.name {
        Some(name) => ShapeKind::from_name(name)
            .ok_or_else(|| SketchError::parse(line_no, format!("unknown shape `{name}`")))?,
        None => block.ok_or_else(|| SketchError::parse(line_no, "row outside of a block"))?,
    };

    let n = &tokens.numbers;
    if n.len() != 8 && n.len() != 11 {
        return Err(SketchError::parse(
            line_no,
            format!("expected 8 or 11 numbers, found {}", n.len()),
        ));
    }
    let corner1 = Vec2::new(n[0], n[1]);
    let corner2 = Vec2::new(n[2], n[3]);
    let color = Color::rgba(n[4], n[5], n[6], n[7]);

    if n.len() == 8 {
        let is_static = kind == ShapeKind::Wall;
        return Ok(ShapeRecord::new(kind, corner1, corner2, color, is_static));
    }

    if !(n[8] >= 0.0 && n[8].fract() == 0.0) {
        return Err(SketchError::parse(line_no, format!("bad body type {}", n[8])));
    }
    let is_static = match n[8] as u32 {
        BODY_TYPE_DYNAMIC => false,
        BODY_TYPE_STATIC => true,
        other => {
            return Err(SketchError::parse(line_no, format!("unknown body type {other}")));
        }
    };
    Ok(ShapeRecord::from_parts(kind, corner1, corner2, color, is_static, n[9], n[10]))
}

struct RowTokens<'a> {
    name: Option<&'a str>,
    numbers: Vec<f32>,
}

/// Split a row into its first alphabetic run and all numeric runs.
///
/// A numeric run starts at a digit, `.` or `-` and may carry an exponent
/// (`1e-5`). Everything else separates tokens.
fn scan(line: &str, line_no: usize) -> Result<RowTokens<'_>, SketchError> {
    let bytes = line.as_bytes();
    let mut name = None;
    let mut numbers = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_digit() || c == b'.' || c == b'-' {
            let start = i;
            i += 1;
            while i < bytes.len() {
                let c = bytes[i];
                let exponent_sign = (c == b'-' || c == b'+') && matches!(bytes[i - 1], b'e' | b'E');
                if c.is_ascii_digit() || c == b'.' || c == b'e' || c == b'E' || exponent_sign {
                    i += 1;
                } else {
                    break;
                }
            }
            let text = &line[start..i];
            let value = text
                .parse::<f32>()
                .map_err(|_| SketchError::parse(line_no, format!("bad number `{text}`")))?;
            numbers.push(value);
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            if name.is_some() {
                return Err(SketchError::parse(line_no, "more than one name in row"));
            }
            name = Some(&line[start..i]);
        } else {
            i += 1;
        }
    }
    Ok(RowTokens { name, numbers })
}

// ── Files ───────────────────────────────────────────────────────────────

/// Write `sketch` to `path`, replacing any existing file. The format follows
/// the extension (see [`SketchFormat::for_path`]).
pub fn save(path: impl AsRef<Path>, sketch: &Sketch) -> Result<(), SketchError> {
    let path = path.as_ref();
    let format = SketchFormat::for_path(path);
    let contents = match format {
        SketchFormat::Json => to_json(sketch)?,
        SketchFormat::LegacyText => write_text(sketch),
    };
    std::fs::write(path, contents)?;
    log::info!("Saved {} shapes to {} ({format:?})", sketch.len(), path.display());
    Ok(())
}

/// Read a sketch file in either format.
///
/// A file holding a JSON object with a `version` field is read as JSON;
/// anything else goes through the legacy text reader.
pub fn load(path: impl AsRef<Path>) -> Result<Sketch, SketchError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let sketch = match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) if value.get("version").is_some() => from_json_value(value)?,
        _ => parse_text(&text)?,
    };
    log::info!("Loaded {} shapes from {}", sketch.len(), path.display());
    Ok(sketch)
}
