//! Streams a listing export in bounded batches and maps its columns onto
//! `RawEntry`.

use crate::config::ColumnAliases;
use crate::error::AnalysisError;
use crate::models::{Field, RawEntry};
use csv::{ByteRecord, Reader, ReaderBuilder};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-8-sig")]
    Utf8Sig,
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    /// Order in which encodings are attempted.
    pub const ORDER: [TextEncoding; 3] =
        [TextEncoding::Utf8, TextEncoding::Utf8Sig, TextEncoding::Latin1];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    fn decode_header(self, has_bom: bool, record: &ByteRecord) -> Option<Vec<String>> {
        let fields: Vec<&[u8]> = record
            .iter()
            .enumerate()
            .map(|(i, f)| if i == 0 { strip_bom(f) } else { f })
            .collect();
        let headers: Vec<String> = match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Sig => {
                if has_bom != (self == TextEncoding::Utf8Sig) {
                    return None;
                }
                fields
                    .iter()
                    .map(|f| std::str::from_utf8(f).ok().map(str::to_string))
                    .collect::<Option<Vec<_>>>()?
            }
            TextEncoding::Latin1 => fields.iter().map(|f| latin1(f)).collect(),
        };
        if headers.iter().all(|h| h.trim().is_empty()) {
            return None;
        }
        Some(headers)
    }

    /// Cells that are not valid UTF-8 under a UTF-8 header are read as
    /// latin-1 rather than replaced.
    fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Sig => match std::str::from_utf8(bytes) {
                Ok(s) => s.to_string(),
                Err(_) => latin1(bytes),
            },
            TextEncoding::Latin1 => latin1(bytes),
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn strip_bom(field: &[u8]) -> &[u8] {
    field.strip_prefix(&UTF8_BOM[..]).unwrap_or(field)
}

fn aliases_for(aliases: &ColumnAliases, field: Field) -> &[String] {
    match field {
        Field::Name => &aliases.name,
        Field::Path => &aliases.path,
        Field::ModifiedBy => &aliases.modified_by,
        Field::ItemType => &aliases.item_type,
        Field::FileSize => &aliases.file_size,
        Field::Modified => &aliases.modified,
    }
}

/// Resolved header positions for the six canonical fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [Option<usize>; 6],
}

impl ColumnMap {
    /// Case-insensitive exact alias match. Missing fields are logged once and
    /// read as empty strings.
    pub fn resolve(headers: &[String], aliases: &ColumnAliases) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut indices = [None; 6];
        for field in Field::ALL {
            indices[field.index()] = aliases_for(aliases, field).iter().find_map(|alias| {
                let alias = alias.trim().to_lowercase();
                lowered.iter().position(|h| *h == alias)
            });
            if indices[field.index()].is_none() {
                warn!(
                    column = field.canonical_header(),
                    "column not found in source; values default to empty"
                );
            }
        }
        Self { indices }
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.indices[field.index()]
    }

    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.index(*f).is_none())
            .collect()
    }
}

pub fn extract_fields(row: &[String], columns: &ColumnMap) -> RawEntry {
    let get = |field: Field| -> String {
        columns
            .index(field)
            .and_then(|i| row.get(i))
            .cloned()
            .unwrap_or_default()
    };
    RawEntry {
        name: get(Field::Name),
        path: get(Field::Path),
        modified_by: get(Field::ModifiedBy),
        item_type: get(Field::ItemType),
        file_size: get(Field::FileSize),
        modified: get(Field::Modified),
    }
}

/// Advisory header suggestions: exact alias match first, then substring
/// containment. Each header is suggested for at most one field.
pub fn propose_column_mapping(
    headers: &[String],
    aliases: &ColumnAliases,
) -> BTreeMap<Field, String> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut used: HashSet<usize> = HashSet::new();
    let mut suggested = BTreeMap::new();

    for field in Field::ALL {
        let candidates: Vec<String> = aliases_for(aliases, field)
            .iter()
            .map(|a| a.trim().to_lowercase())
            .collect();
        let exact = candidates
            .iter()
            .find_map(|a| (0..lowered.len()).find(|i| !used.contains(i) && lowered[*i] == *a));
        if let Some(i) = exact {
            used.insert(i);
            suggested.insert(field, headers[i].clone());
        }
    }
    for field in Field::ALL {
        if suggested.contains_key(&field) {
            continue;
        }
        let candidates: Vec<String> = aliases_for(aliases, field)
            .iter()
            .map(|a| a.trim().to_lowercase())
            .collect();
        let partial = candidates.iter().find_map(|a| {
            (0..lowered.len()).find(|i| !used.contains(i) && lowered[*i].contains(a.as_str()))
        });
        if let Some(i) = partial {
            used.insert(i);
            suggested.insert(field, headers[i].clone());
        }
    }
    suggested
}

/// Lazy batch iterator over a source file. Consumed by iteration; reopen the
/// file to read it again.
pub struct BatchReader {
    reader: Reader<File>,
    encoding: TextEncoding,
    headers: Vec<String>,
    columns: ColumnMap,
    batch_size: usize,
    record: ByteRecord,
    malformed: u64,
    finished: bool,
}

impl BatchReader {
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn malformed_rows(&self) -> u64 {
        self.malformed
    }

    /// Next well-formed row. Rows with more cells than the header are counted
    /// and skipped; short rows are kept and padded by `extract_fields`.
    fn next_row(&mut self) -> Result<Option<Vec<String>>, AnalysisError> {
        loop {
            match self.reader.read_byte_record(&mut self.record) {
                Ok(false) => return Ok(None),
                Ok(true) if self.record.len() > self.headers.len() => {
                    self.malformed += 1;
                    warn!(
                        line = ?self.record.position().map(|p| p.line()),
                        cells = self.record.len(),
                        expected = self.headers.len(),
                        "skipping malformed row"
                    );
                }
                Ok(true) => {
                    let encoding = self.encoding;
                    return Ok(Some(self.record.iter().map(|f| encoding.decode(f)).collect()));
                }
                Err(err) => {
                    return Err(match err.into_kind() {
                        csv::ErrorKind::Io(io) => AnalysisError::Io(io),
                        other => AnalysisError::Io(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("{other:?}"),
                        )),
                    });
                }
            }
        }
    }
}

impl Iterator for BatchReader {
    type Item = Result<Vec<RawEntry>, AnalysisError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut batch = Vec::with_capacity(self.batch_size.min(4096));
        while batch.len() < self.batch_size {
            match self.next_row() {
                Ok(Some(row)) => batch.push(extract_fields(&row, &self.columns)),
                Ok(None) => {
                    self.finished = true;
                    break;
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
        if batch.is_empty() {
            None
        } else {
            debug!(rows = batch.len(), "read batch");
            Some(Ok(batch))
        }
    }
}

fn validate_source(path: &Path) -> Result<(), AnalysisError> {
    let reason = if !path.exists() {
        "file not found"
    } else if !path.is_file() {
        "not a regular file"
    } else {
        return Ok(());
    };
    Err(AnalysisError::Validation {
        path: path.to_path_buf(),
        reason: reason.into(),
    })
}

fn has_bom(path: &Path) -> Result<bool, AnalysisError> {
    let mut buf = [0u8; 3];
    let mut file = File::open(path).map_err(|e| AnalysisError::Validation {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut read = 0;
    while read < buf.len() {
        let n = file.read(&mut buf[read..])?;
        if n == 0 {
            break;
        }
        read += n;
    }
    Ok(read == 3 && buf == UTF8_BOM)
}

fn open(path: &Path) -> Result<(Reader<File>, TextEncoding, Vec<String>), AnalysisError> {
    validate_source(path)?;
    let bom = has_bom(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| AnalysisError::Validation {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let tried = || -> Vec<String> {
        TextEncoding::ORDER
            .iter()
            .map(|e| e.label().to_string())
            .collect()
    };
    let ingestion_error = |path: &Path| AnalysisError::Ingestion {
        path: PathBuf::from(path),
        tried: tried(),
    };

    let mut header = ByteRecord::new();
    match reader.read_byte_record(&mut header) {
        Ok(true) => {}
        Ok(false) => return Err(ingestion_error(path)),
        Err(err) => {
            warn!(error = %err, "header row could not be parsed");
            return Err(ingestion_error(path));
        }
    }
    for encoding in TextEncoding::ORDER {
        if let Some(headers) = encoding.decode_header(bom, &header) {
            debug!(encoding = encoding.label(), ?headers, "header decoded");
            return Ok((reader, encoding, headers));
        }
    }
    Err(ingestion_error(path))
}

pub fn stream_batches(
    path: &Path,
    batch_size: usize,
    aliases: &ColumnAliases,
) -> Result<BatchReader, AnalysisError> {
    let (reader, encoding, headers) = open(path)?;
    let columns = ColumnMap::resolve(&headers, aliases);
    Ok(BatchReader {
        reader,
        encoding,
        headers,
        columns,
        batch_size: batch_size.max(1),
        record: ByteRecord::new(),
        malformed: 0,
        finished: false,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProposal {
    pub encoding: TextEncoding,
    pub headers: Vec<String>,
    pub suggested: BTreeMap<Field, String>,
    pub missing: Vec<Field>,
    pub sample: Vec<RawEntry>,
}

/// Reads the header and up to `sample_size` rows and proposes a column
/// mapping for them.
pub fn inspect_columns(
    path: &Path,
    sample_size: usize,
    aliases: &ColumnAliases,
) -> Result<ColumnProposal, AnalysisError> {
    let mut batches = stream_batches(path, sample_size.max(1), aliases)?;
    let headers = batches.headers().to_vec();
    let missing = batches.columns().missing();
    let encoding = batches.encoding();
    let sample = match batches.next() {
        Some(batch) => batch?,
        None => Vec::new(),
    };
    Ok(ColumnProposal {
        encoding,
        suggested: propose_column_mapping(&headers, aliases),
        headers,
        missing,
        sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_aliases_case_insensitively() {
        let cols = ColumnMap::resolve(
            &headers(&["FILENAME", "Location", "Author", "type"]),
            &ColumnAliases::default(),
        );
        assert_eq!(cols.index(Field::Name), Some(0));
        assert_eq!(cols.index(Field::Path), Some(1));
        assert_eq!(cols.index(Field::ModifiedBy), Some(2));
        assert_eq!(cols.index(Field::ItemType), Some(3));
        assert_eq!(cols.missing(), vec![Field::FileSize, Field::Modified]);

        let row = headers(&["Acme", "/a/b", "jo"]);
        let entry = extract_fields(&row, &cols);
        assert_eq!(entry.name, "Acme");
        assert_eq!(entry.modified_by, "jo");
        assert_eq!(entry.item_type, "");
        assert_eq!(entry.file_size, "");
    }

    #[test]
    fn proposes_mapping_by_substring() {
        let suggested = propose_column_mapping(
            &headers(&["Item Name", "Full Path Text", "Modified By", "Modified"]),
            &ColumnAliases::default(),
        );
        assert_eq!(suggested.get(&Field::ModifiedBy).unwrap(), "Modified By");
        assert_eq!(suggested.get(&Field::Modified).unwrap(), "Modified");
        assert_eq!(suggested.get(&Field::Name).unwrap(), "Item Name");
        assert_eq!(suggested.get(&Field::Path).unwrap(), "Full Path Text");
        assert!(!suggested.contains_key(&Field::FileSize));
    }

    #[test]
    fn streams_in_batches() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("list.csv");
        let mut body = String::from("Name,Path,Item Type\n");
        for i in 0..7 {
            body.push_str(&format!("Company {i},/root/{i},Folder\n"));
        }
        fs::write(&file, body).unwrap();

        let reader = stream_batches(&file, 3, &ColumnAliases::default()).unwrap();
        assert_eq!(reader.encoding(), TextEncoding::Utf8);
        let sizes: Vec<usize> = reader.map(|b| b.unwrap().len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn bom_selects_utf8_sig() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bom.csv");
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Name,Path\nZürich Versicherung,/x\n".as_bytes());
        fs::write(&file, bytes).unwrap();

        let mut reader = stream_batches(&file, 10, &ColumnAliases::default()).unwrap();
        assert_eq!(reader.encoding(), TextEncoding::Utf8Sig);
        assert_eq!(reader.headers()[0], "Name");
        let batch = reader.next().unwrap().unwrap();
        assert_eq!(batch[0].name, "Zürich Versicherung");
    }

    #[test]
    fn falls_back_to_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("latin.csv");
        let mut bytes = b"Name,Ort\xe9\n".to_vec();
        bytes.extend_from_slice(b"Soci\xe9t\xe9 G\xe9n\xe9rale,/p\n");
        fs::write(&file, bytes).unwrap();

        let mut reader = stream_batches(&file, 10, &ColumnAliases::default()).unwrap();
        assert_eq!(reader.encoding(), TextEncoding::Latin1);
        assert_eq!(reader.headers()[1], "Orté");
        let batch = reader.next().unwrap().unwrap();
        assert_eq!(batch[0].name, "Société Générale");
    }

    #[test]
    fn empty_file_is_ingestion_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.csv");
        fs::write(&file, "").unwrap();
        match stream_batches(&file, 10, &ColumnAliases::default()) {
            Err(AnalysisError::Ingestion { tried, .. }) => {
                assert_eq!(tried, vec!["utf-8", "utf-8-sig", "latin-1"]);
            }
            other => panic!("expected ingestion error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = stream_batches(&dir.path().join("nope.csv"), 10, &ColumnAliases::default())
            .err()
            .unwrap();
        assert!(matches!(err, AnalysisError::Validation { .. }));
        let err = stream_batches(dir.path(), 10, &ColumnAliases::default())
            .err()
            .unwrap();
        assert!(matches!(err, AnalysisError::Validation { .. }));
    }

    #[test]
    fn overlong_rows_are_counted_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ragged.csv");
        fs::write(
            &file,
            "Name,Path\nAcme,/a\nGlobex,/g,extra,cells\nInitech\nHooli,/h\n",
        )
        .unwrap();

        let mut reader = stream_batches(&file, 10, &ColumnAliases::default()).unwrap();
        let batch = reader.next().unwrap().unwrap();
        let names: Vec<&str> = batch.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Initech", "Hooli"]);
        assert_eq!(batch[1].path, "");
        assert!(reader.next().is_none());
        assert_eq!(reader.malformed_rows(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_validation_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("locked.csv");
        fs::write(&file, "Name\nAcme\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).unwrap();
        if File::open(&file).is_ok() {
            // running as root; permissions are not enforced
            return;
        }
        let err = stream_batches(&file, 10, &ColumnAliases::default())
            .err()
            .unwrap();
        assert!(matches!(err, AnalysisError::Validation { .. }));
    }

    #[test]
    fn inspect_returns_sample() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("s.csv");
        fs::write(&file, "Name,Size\nA,1\nB,2\nC,3\n").unwrap();
        let proposal = inspect_columns(&file, 2, &ColumnAliases::default()).unwrap();
        assert_eq!(proposal.sample.len(), 2);
        assert_eq!(proposal.suggested.get(&Field::FileSize).unwrap(), "Size");
        assert!(proposal.missing.contains(&Field::Path));
    }
}
