//! Byte positioning over transcript files. No parsing.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use engram_core::errors::EngramResult;

/// Read everything past `offset`. Returns `None` when the file is missing
/// or has nothing new, otherwise the delta text and the new offset.
pub fn read_delta(path: &Path, offset: u64) -> EngramResult<Option<(String, u64)>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    if len <= offset {
        return Ok(None);
    }

    file.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::with_capacity((len - offset) as usize);
    file.read_to_end(&mut buf)?;
    if buf.is_empty() {
        return Ok(None);
    }

    let new_offset = offset + buf.len() as u64;
    Ok(Some((String::from_utf8_lossy(&buf).into_owned(), new_offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.jsonl");
        assert!(read_delta(&path, 0).unwrap().is_none());
    }

    #[test]
    fn reads_from_offset_to_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        std::fs::write(&path, "hello world").unwrap();

        let (delta, offset) = read_delta(&path, 0).unwrap().unwrap();
        assert_eq!(delta, "hello world");
        assert_eq!(offset, 11);

        assert!(read_delta(&path, offset).unwrap().is_none());

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"!more").unwrap();
        drop(file);

        let (delta, offset) = read_delta(&path, offset).unwrap().unwrap();
        assert_eq!(delta, "!more");
        assert_eq!(offset, 16);
    }

    #[test]
    fn offset_past_eof_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        std::fs::write(&path, "abc").unwrap();
        assert!(read_delta(&path, 100).unwrap().is_none());
    }
}
