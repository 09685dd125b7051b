//! I/O helpers for definitions and walk batches.
//!
//! Definitions move as JSON or CBOR. Batches additionally write as JSONL (one
//! [`WalkRecord`] per line) for consumers that stream walks one at a time.
//! Readers pick the codec from the file extension and reject unknown ones;
//! writers fall back to JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use permwalk_core::{Token, Walks};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::format::GraphDef;

/// One walk of a batch, as written to JSONL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalkRecord {
    /// Walk index within the batch.
    pub walk: usize,
    /// States in step order.
    pub states: Vec<Vec<Token>>,
    /// Distance label of each state.
    pub distances: Vec<Token>,
}

impl WalkRecord {
    /// Copy walk `w` out of `walks`.
    #[must_use]
    pub fn from_walks(walks: &Walks, w: usize) -> Self {
        Self {
            walk: w,
            states: walks.steps(w).map(<[Token]>::to_vec).collect(),
            distances: walks.distances(w).to_vec(),
        }
    }
}

/* ---------------- generic codecs ---------------- */

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("deserialize JSON {what}"))
}

fn write_json<T: Serialize>(path: &Path, v: &T, what: &str) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, v).with_context(|| format!("serialize JSON {what}"))?;
    w.flush().with_context(|| "flush JSON writer")?;
    Ok(())
}

fn read_cbor<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    ciborium::de::from_reader(BufReader::new(f)).with_context(|| format!("deserialize CBOR {what}"))
}

fn write_cbor<T: Serialize>(path: &Path, v: &T, what: &str) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    ciborium::ser::into_writer(v, &mut w).with_context(|| format!("serialize CBOR {what}"))?;
    w.flush().with_context(|| "flush CBOR writer")?;
    Ok(())
}

/* ---------------- definitions ---------------- */

/// Read a definition, picking JSON or CBOR by extension, and validate it.
pub fn read_def_auto<P: AsRef<Path>>(path: P) -> Result<GraphDef> {
    let path = path.as_ref();
    let def: GraphDef = match ext_lower(path).as_deref() {
        Some("json") => read_json(path, "definition")?,
        Some("cbor") => read_cbor(path, "definition")?,
        Some(other) => {
            return Err(anyhow!("unsupported definition extension: {other} (supported: .json, .cbor)"))
        }
        None => return Err(anyhow!("path has no extension (expected .json or .cbor)")),
    };
    def.validate().with_context(|| format!("invalid definition {}", path.display()))?;
    Ok(def)
}

/// Write a definition as CBOR for `.cbor`, JSON otherwise.
pub fn write_def_auto<P: AsRef<Path>>(path: P, def: &GraphDef) -> Result<()> {
    let path = path.as_ref();
    match ext_lower(path).as_deref() {
        Some("cbor") => write_cbor(path, def, "definition"),
        _ => write_json(path, def, "definition"),
    }
}

/* ---------------- batches ---------------- */

/// Read a batch from `.json` or `.cbor`. Buffer lengths are checked against the shape.
pub fn read_walks_auto<P: AsRef<Path>>(path: P) -> Result<Walks> {
    let path = path.as_ref();
    match ext_lower(path).as_deref() {
        Some("json") => read_json(path, "walk batch"),
        Some("cbor") => read_cbor(path, "walk batch"),
        Some(other) => Err(anyhow!("unsupported batch extension: {other} (supported: .json, .cbor)")),
        None => Err(anyhow!("path has no extension (expected .json or .cbor)")),
    }
}

/// Write one [`WalkRecord`] per line.
pub fn write_walks_jsonl<P: AsRef<Path>>(path: P, walks: &Walks) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for walk in 0..walks.num_walks() {
        serde_json::to_writer(&mut w, &WalkRecord::from_walks(walks, walk))
            .with_context(|| format!("serialize walk {walk}"))?;
        w.write_all(b"\n").with_context(|| "write JSONL newline")?;
    }
    w.flush().with_context(|| "flush JSONL writer")?;
    Ok(())
}

/// Write a batch as CBOR for `.cbor`, JSONL for `.jsonl`, JSON otherwise.
pub fn write_walks_auto<P: AsRef<Path>>(path: P, walks: &Walks) -> Result<()> {
    let path = path.as_ref();
    match ext_lower(path).as_deref() {
        Some("cbor") => write_cbor(path, walks, "walk batch"),
        Some("jsonl") => write_walks_jsonl(path, walks),
        _ => write_json(path, walks, "walk batch"),
    }
}

#[inline]
fn ext_lower(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase)
}
