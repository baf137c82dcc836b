use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{AppError, Result};

/// Load artist names from a comma-delimited file.
///
/// The first row is a header and is skipped. Each following row contributes
/// its first column, trimmed; blank rows are dropped. Duplicates are kept.
pub fn load_artists(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AppError::FileNotFound(path.to_path_buf()),
        _ => AppError::Read(e.to_string()),
    })?;

    let artists = parse_artists(file)?;
    debug!("Loaded {} artists from {}", artists.len(), path.display());
    Ok(artists)
}

pub fn parse_artists<R: Read>(mut reader: R) -> Result<Vec<String>> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| AppError::Read(e.to_string()))?;

    // The first physical line is the header, even when it is blank.
    let body = match text.split_once('\n') {
        Some((_, rest)) => rest,
        None => "",
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut artists = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Read(e.to_string()))?;
        let name = record.get(0).map(str::trim).unwrap_or_default();
        if !name.is_empty() {
            artists.push(name.to_string());
        }
    }

    Ok(artists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_skips_header_and_blank_rows() {
        let data = "Artist,Stage\nArtist A,Main\n\nArtist B,Tent\n   \nArtist C\n";
        let artists = parse_artists(data.as_bytes()).unwrap();
        assert_eq!(artists, vec!["Artist A", "Artist B", "Artist C"]);
    }

    #[test]
    fn test_trims_and_keeps_duplicates() {
        let data = "name\n  Queen  \nQueen\n\"Earth, Wind & Fire\",x\n";
        let artists = parse_artists(data.as_bytes()).unwrap();
        assert_eq!(artists, vec!["Queen", "Queen", "Earth, Wind & Fire"]);
    }

    #[test]
    fn test_header_only() {
        assert!(parse_artists("Artist\n".as_bytes()).unwrap().is_empty());
        assert!(parse_artists("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let data: &[u8] = b"Artist\nGood\n\xff\xfe\n";
        let err = parse_artists(data).unwrap_err();
        assert!(matches!(err, AppError::Read(_)));
    }

    #[test]
    fn test_invalid_utf8_in_header_is_read_error() {
        let data: &[u8] = b"Art\xffist\nArtist A\n";
        let err = parse_artists(data).unwrap_err();
        assert!(matches!(err, AppError::Read(_)));
    }

    #[test]
    fn test_blank_first_row_is_the_header() {
        let artists = parse_artists("\nArtist A\nArtist B\n".as_bytes()).unwrap();
        assert_eq!(artists, vec!["Artist A", "Artist B"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let artists = parse_artists("Artist\r\nArtist A\r\n\r\nArtist B\r\n".as_bytes()).unwrap();
        assert_eq!(artists, vec!["Artist A", "Artist B"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let err = load_artists(&path).unwrap_err();
        assert!(matches!(err, AppError::FileNotFound(p) if p == path));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Artist").unwrap();
        writeln!(file, "Artist A").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Artist B").unwrap();

        let artists = load_artists(file.path()).unwrap();
        assert_eq!(artists, vec!["Artist A", "Artist B"]);
    }
}
