//! Reading documents and weighted edgelists from disk.
//!
//! # Inputs
//!
//! - **CSV**: header row required; the configured text column is read and
//!   every other column ignored. Empty cells and cells that are not valid
//!   UTF-8 become [`RawDocument::NonText`].
//! - **TXT**: one document per line.
//! - **Directory**: every `.csv` / `.txt` file directly inside it, in file
//!   name order.
//!
//! # Downsampling
//!
//! Inputs above [`SampleConfig::max_records`] are reduced before entity
//! recognition. CSV inputs keep a random sample of `csv_sample` rows (input
//! order preserved); TXT inputs keep the window
//! `[txt_skip, txt_skip + txt_take)`, which drops front matter.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::config::SampleConfig;
use crate::document::RawDocument;
use crate::edge::EdgeRecord;
use crate::error::{Error, Result};

/// Supported document file formats, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Txt,
}

impl InputFormat {
    /// Detect the format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for anything but `.csv` / `.txt`.
    pub fn detect(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("txt") => Ok(Self::Txt),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load raw documents from a file or a directory of files.
///
/// # Errors
///
/// I/O and CSV errors, an unsupported extension, or a missing text column.
#[instrument(skip(sample))]
pub fn load_documents(
    path: &Path,
    text_column: &str,
    sample: &SampleConfig,
) -> Result<Vec<RawDocument>> {
    if path.is_dir() {
        let files = input_files(path)?;
        if files.is_empty() {
            return Err(Error::UnsupportedFormat(format!(
                "{} contains no .csv or .txt files",
                path.display()
            )));
        }
        let mut documents = Vec::new();
        for file in files {
            documents.extend(load_file(&file, text_column, sample)?);
        }
        return Ok(documents);
    }
    load_file(path, text_column, sample)
}

fn load_file(path: &Path, text_column: &str, sample: &SampleConfig) -> Result<Vec<RawDocument>> {
    let format = InputFormat::detect(path)?;
    let file = File::open(path)?;
    let source_name = path.display().to_string();

    let documents = match format {
        InputFormat::Csv => {
            let docs = read_csv_documents(file, text_column, &source_name)?;
            downsample_csv(docs, sample)
        }
        InputFormat::Txt => {
            let docs = read_txt_documents(BufReader::new(file))?;
            downsample_txt(docs, sample)
        }
    };

    info!(path = %source_name, records = documents.len(), "loaded documents");
    Ok(documents)
}

fn input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && InputFormat::detect(p).is_ok())
        .collect();
    files.sort();
    Ok(files)
}

/// Read the `text_column` of every CSV row.
///
/// # Errors
///
/// Returns [`Error::MissingColumn`] if the header lacks `text_column`, or a
/// CSV error for unreadable input.
pub fn read_csv_documents<R: Read>(
    reader: R,
    text_column: &str,
    source_name: &str,
) -> Result<Vec<RawDocument>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv.byte_headers()?.clone();
    let column = headers
        .iter()
        .position(|h| h == text_column.as_bytes())
        .ok_or_else(|| Error::MissingColumn {
            column: text_column.to_string(),
            source_name: source_name.to_string(),
            available: headers
                .iter()
                .map(String::from_utf8_lossy)
                .collect::<Vec<_>>()
                .join(", "),
        })?;

    let mut documents = Vec::new();
    for record in csv.byte_records() {
        let record = record?;
        let document = match record.get(column) {
            Some(bytes) if !bytes.is_empty() => decode_text(bytes),
            _ => RawDocument::non_text("empty cell"),
        };
        documents.push(document);
    }
    Ok(documents)
}

/// Read one document per line. Lines that are not valid UTF-8 become
/// non-text records.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn read_txt_documents<R: BufRead>(mut reader: R) -> Result<Vec<RawDocument>> {
    let mut documents = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        documents.push(decode_text(&buf));
    }
    Ok(documents)
}

fn decode_text(bytes: &[u8]) -> RawDocument {
    std::str::from_utf8(bytes).map_or_else(
        |_| RawDocument::non_text("invalid UTF-8"),
        |text| RawDocument::Text(text.to_string()),
    )
}

/// Keep a random `csv_sample` rows when the input exceeds `max_records`.
#[must_use]
pub fn downsample_csv(documents: Vec<RawDocument>, sample: &SampleConfig) -> Vec<RawDocument> {
    if documents.len() <= sample.max_records {
        return documents;
    }

    let amount = sample.csv_sample.min(documents.len());
    let mut rng = sample
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut keep = rand::seq::index::sample(&mut rng, documents.len(), amount).into_vec();
    keep.sort_unstable();

    info!(
        from = documents.len(),
        to = amount,
        "input is large; sampled a random subset of rows"
    );

    let mut keep = keep.into_iter().peekable();
    documents
        .into_iter()
        .enumerate()
        .filter_map(|(i, doc)| {
            if keep.peek() == Some(&i) {
                keep.next();
                Some(doc)
            } else {
                None
            }
        })
        .collect()
}

/// Keep lines `[txt_skip, txt_skip + txt_take)` when the input exceeds
/// `max_records`.
#[must_use]
pub fn downsample_txt(documents: Vec<RawDocument>, sample: &SampleConfig) -> Vec<RawDocument> {
    if documents.len() <= sample.max_records {
        return documents;
    }

    let from = documents.len();
    let kept: Vec<RawDocument> = documents
        .into_iter()
        .skip(sample.txt_skip)
        .take(sample.txt_take)
        .collect();

    info!(
        from,
        to = kept.len(),
        "input is large; kept a window of lines"
    );
    kept
}

// ---------------------------------------------------------------------------
// Weighted edgelists
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EdgeRow {
    #[serde(rename = "nodeA")]
    node_a: String,
    #[serde(rename = "nodeB")]
    node_b: String,
    weight: String,
}

const EDGELIST_COLUMNS: [&str; 3] = ["nodeA", "nodeB", "weight"];

/// Read a `nodeA,nodeB,weight` CSV.
///
/// Rows are returned as written; validation happens in
/// [`crate::filter::filter_records`].
///
/// # Errors
///
/// [`Error::MissingColumn`] for a missing header column,
/// [`Error::InvalidArgument`] for a weight that is not a non-negative
/// integer, CSV errors otherwise.
pub fn read_edgelist<R: Read>(reader: R, source_name: &str) -> Result<Vec<EdgeRecord>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    for column in EDGELIST_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn {
                column: column.to_string(),
                source_name: source_name.to_string(),
                available: headers.iter().collect::<Vec<_>>().join(", "),
            });
        }
    }

    let mut records = Vec::new();
    for (row, result) in csv.deserialize::<EdgeRow>().enumerate() {
        let raw = result?;
        let weight = raw.weight.parse::<u64>().map_err(|_| {
            Error::InvalidArgument(format!(
                "{source_name} row {row}: weight {:?} is not a non-negative integer",
                raw.weight
            ))
        })?;
        records.push(EdgeRecord::new(raw.node_a, raw.node_b, weight));
    }

    debug!(source = source_name, rows = records.len(), "read edgelist");
    Ok(records)
}

/// Read a weighted edgelist CSV file.
///
/// # Errors
///
/// See [`read_edgelist`].
pub fn load_edgelist(path: &Path) -> Result<Vec<EdgeRecord>> {
    let file = File::open(path)?;
    read_edgelist(file, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_sample() -> SampleConfig {
        SampleConfig {
            max_records: 4,
            csv_sample: 2,
            txt_skip: 1,
            txt_take: 2,
            seed: Some(42),
        }
    }

    #[test]
    fn detect_by_extension() {
        let csv = InputFormat::detect(Path::new("a.csv")).expect("csv");
        assert_eq!(csv, InputFormat::Csv);
        let txt = InputFormat::detect(Path::new("b.TXT")).expect("txt");
        assert_eq!(txt, InputFormat::Txt);
        assert!(matches!(
            InputFormat::detect(Path::new("c.json")),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn csv_reads_named_column_and_marks_blanks() {
        let data = "id,text\n1,Alice met Bob\n2,\n3,\"Carol, again\"\n";
        let docs = read_csv_documents(data.as_bytes(), "text", "mem.csv").expect("read");
        assert_eq!(
            docs,
            vec![
                RawDocument::from("Alice met Bob"),
                RawDocument::non_text("empty cell"),
                RawDocument::from("Carol, again"),
            ]
        );
    }

    #[test]
    fn csv_invalid_utf8_is_non_text() {
        let mut data = b"text\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"fine\n");
        let docs = read_csv_documents(data.as_slice(), "text", "mem.csv").expect("read");
        assert_eq!(docs.len(), 2);
        assert!(docs[0].as_text().is_none());
        assert_eq!(docs[1].as_text(), Some("fine"));
    }

    #[test]
    fn csv_missing_column_is_load_error() {
        let data = "id,body\n1,hello\n";
        let err = read_csv_documents(data.as_bytes(), "text", "mem.csv").expect_err("missing");
        match err {
            Error::MissingColumn {
                column, available, ..
            } => {
                assert_eq!(column, "text");
                assert_eq!(available, "id, body");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn txt_one_document_per_line() {
        let data = "first line\r\nsecond\n\nlast";
        let docs = read_txt_documents(data.as_bytes()).expect("read");
        assert_eq!(
            docs,
            vec![
                RawDocument::from("first line"),
                RawDocument::from("second"),
                RawDocument::from(""),
                RawDocument::from("last"),
            ]
        );
    }

    #[test]
    fn small_inputs_are_untouched() {
        let docs: Vec<RawDocument> = (0..4).map(|i| RawDocument::Text(i.to_string())).collect();
        assert_eq!(downsample_csv(docs.clone(), &small_sample()), docs);
        assert_eq!(downsample_txt(docs.clone(), &small_sample()), docs);
    }

    #[test]
    fn csv_sample_is_ordered_subset_and_seeded() {
        let docs: Vec<RawDocument> = (0..10).map(|i| RawDocument::Text(i.to_string())).collect();
        let a = downsample_csv(docs.clone(), &small_sample());
        let b = downsample_csv(docs.clone(), &small_sample());
        assert_eq!(a.len(), 2);
        assert_eq!(a, b, "same seed, same sample");

        let positions: Vec<usize> = a
            .iter()
            .map(|d| docs.iter().position(|x| x == d).expect("from input"))
            .collect();
        assert!(positions[0] < positions[1], "input order preserved");
    }

    #[test]
    fn txt_window_skips_front_matter() {
        let docs: Vec<RawDocument> = (0..10).map(|i| RawDocument::Text(i.to_string())).collect();
        let kept = downsample_txt(docs, &small_sample());
        assert_eq!(kept, vec![RawDocument::from("1"), RawDocument::from("2")]);
    }

    #[test]
    fn directory_loads_sorted_supported_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("b.txt"), "from b\n").expect("write");
        fs::write(dir.path().join("a.csv"), "text\nfrom a\n").expect("write");
        fs::write(dir.path().join("notes.md"), "ignored\n").expect("write");

        let docs = load_documents(dir.path(), "text", &SampleConfig::default()).expect("load");
        assert_eq!(
            docs,
            vec![RawDocument::from("from a"), RawDocument::from("from b")]
        );
    }

    #[test]
    fn edgelist_reads_rows() {
        let data = "nodeA,nodeB,weight\nAlice,Bob,2\nBob, Carol ,7\n";
        let rows = read_edgelist(data.as_bytes(), "edges.csv").expect("read");
        assert_eq!(
            rows,
            vec![
                EdgeRecord::new("Alice", "Bob", 2),
                EdgeRecord::new("Bob", "Carol", 7),
            ]
        );
    }

    #[test]
    fn edgelist_rejects_bad_weight_and_missing_column() {
        let bad = "nodeA,nodeB,weight\nAlice,Bob,-1\n";
        assert!(matches!(
            read_edgelist(bad.as_bytes(), "edges.csv"),
            Err(Error::InvalidArgument(_))
        ));

        let missing = "source,target,weight\nAlice,Bob,1\n";
        assert!(matches!(
            read_edgelist(missing.as_bytes(), "edges.csv"),
            Err(Error::MissingColumn { .. })
        ));
    }
}
