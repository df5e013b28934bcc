//! Reading transcripts from files and stdin.

use crate::error::{CliError, Result};
use regex::Regex;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::LazyLock;

/// File extensions accepted as transcripts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "csv", "md", "text", "log", "vtt", "srt"];

/// Largest transcript file accepted (bytes).
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

static WEBVTT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^WEBVTT.*$").expect("valid regex"));
static CUE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+$").expect("valid regex"));
static TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}[.,]\d{3}\s*-->\s*\d{2}:\d{2}:\d{2}[.,]\d{3}")
        .expect("valid regex")
});
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Read and clean a transcript file.
pub fn read_file(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CliError::InvalidInput(format!(
            "Unsupported file type: .{}. Use .txt, .csv, .md, .vtt, or .srt",
            ext
        )));
    }

    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_BYTES {
        return Err(CliError::InvalidInput(format!(
            "File is {} bytes; the limit is {} bytes",
            size, MAX_FILE_BYTES
        )));
    }

    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(clean(&text, &ext))
}

/// Read a transcript from stdin.
pub fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text.trim().to_string())
}

/// Normalize file content by format.
pub fn clean(text: &str, ext: &str) -> String {
    match ext {
        "csv" => strip_csv_header(text).trim().to_string(),
        "vtt" | "srt" => strip_subtitle_markup(text),
        _ => text.trim().to_string(),
    }
}

fn strip_csv_header(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > 1 && lines[0].contains(',') {
        lines[1..].join("\n")
    } else {
        text.to_string()
    }
}

fn strip_subtitle_markup(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = WEBVTT_HEADER.replace(&text, "");
    let text = CUE_NUMBER.replace_all(&text, "");
    let text = TIMING.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_csv_header_dropped() {
        let csv = "speaker,text\nRep,Hello there\nProspect,Hi";
        assert_eq!(clean(csv, "csv"), "Rep,Hello there\nProspect,Hi");
    }

    #[test]
    fn test_single_line_csv_kept() {
        assert_eq!(clean("a,b", "csv"), "a,b");
    }

    #[test]
    fn test_vtt_cleanup() {
        let vtt = "WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.000\nRep: Thanks for joining.\n\n2\n00:00:05.000 --> 00:00:07.500\nProspect: Happy to be here.\n";
        let cleaned = clean(vtt, "vtt");
        assert_eq!(cleaned, "Rep: Thanks for joining.\n\nProspect: Happy to be here.");
    }

    #[test]
    fn test_srt_comma_timestamps() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\nHello\n";
        assert_eq!(clean(srt, "srt"), "Hello");
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let mut file = Builder::new().suffix(".pdf").tempfile().unwrap();
        writeln!(file, "not a transcript").unwrap();

        let err = read_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type: .pdf"));
    }

    #[test]
    fn test_reads_text_file() {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "  Rep: Hello\nProspect: Hi  ").unwrap();

        assert_eq!(read_file(file.path()).unwrap(), "Rep: Hello\nProspect: Hi");
    }

    #[test]
    fn test_file_without_extension_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(read_file(file.path()).is_err());
    }
}
