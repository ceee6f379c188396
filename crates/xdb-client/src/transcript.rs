//! File classification and transcript text extraction.
//!
//! Everything here is a free function over a path; nothing is cached between
//! calls. Two JSON transcript layouts are understood:
//!
//! - the meeting-vendor export, an object whose `transcript.transcript_content`
//!   array holds `{speaker_name, text, start_time, end_time}` segments;
//! - a generic layout, a top-level array of
//!   `{speaker_name, sentence, startTime, endTime}` segments.
//!
//! Any other file is passed through as plain text.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Bytes inspected by [`detect_transcript_format`].
pub const FORMAT_SNIFF_BYTES: u64 = 500;

/// Bytes inspected for keywords by [`is_transcript_file`].
const KEYWORD_SNIFF_BYTES: u64 = 1000;

const VTT_MARKER: &str = "WEBVTT";
const VENDOR_MARKERS: [&str; 3] = ["\"speaker_name\"", "\"start_time\"", "\"end_time\""];

const TRANSCRIPT_EXTENSIONS: [&str; 4] = [".vtt", ".srt", ".txt", ".json"];
const TRANSCRIPT_MIME_TYPES: [&str; 3] = ["text/vtt", "application/json", "text/plain"];
const TRANSCRIPT_KEYWORDS: [&str; 4] = ["webvtt", "speaker_name", "start_time", "transcript"];
const VIDEO_EXTENSIONS: [&str; 6] = [".mp4", ".avi", ".mov", ".mkv", ".wmv", ".flv"];
const AUDIO_EXTENSIONS: [&str; 6] = [".mp3", ".m4a", ".wav", ".flac", ".aac", ".ogg"];

/// Transcript layout guessed from the head of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TranscriptFormat {
    Vtt,
    Json,
    Unknown,
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vtt => "VTT",
            Self::Json => "JSON",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Filesystem metadata for one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// Lowercase with a leading dot, empty when the name has no extension.
    pub extension: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub is_file: bool,
}

/// One speaker turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub speaker: String,
    pub text: String,
    pub time_range: Option<(String, String)>,
}

impl TranscriptSegment {
    fn render_into(&self, out: &mut String) {
        out.push_str(&self.speaker);
        if let Some((start, end)) = &self.time_range {
            out.push('[');
            out.push_str(start);
            out.push('-');
            out.push_str(end);
            out.push(']');
        }
        out.push_str(": ");
        out.push_str(&self.text);
        out.push(' ');
    }
}

/// Parsed transcript, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptDocument {
    pub segments: Vec<TranscriptSegment>,
}

impl TranscriptDocument {
    /// Parse the vendor export layout.
    pub fn from_vendor_json(raw: &str) -> ClientResult<Self> {
        let export: VendorExport = serde_json::from_str(raw)
            .map_err(|e| ClientError::InvalidTranscript(format!("vendor transcript: {}", e)))?;
        let segments = export
            .transcript
            .transcript_content
            .into_iter()
            .map(|s| TranscriptSegment {
                speaker: scalar_text(&s.speaker_name),
                text: scalar_text(&s.text),
                time_range: None,
            })
            .collect();
        Ok(Self { segments })
    }

    /// Parse the generic top-level array layout.
    pub fn from_generic_json(raw: &str) -> ClientResult<Self> {
        let rows: Vec<GenericSegment> = serde_json::from_str(raw)
            .map_err(|e| ClientError::InvalidTranscript(format!("generic transcript: {}", e)))?;
        let segments = rows
            .into_iter()
            .map(|s| TranscriptSegment {
                speaker: scalar_text(&s.speaker_name),
                text: scalar_text(&s.sentence),
                time_range: Some((scalar_text(&s.start_time), scalar_text(&s.end_time))),
            })
            .collect();
        Ok(Self { segments })
    }

    /// Flatten to the text sent as memory content.
    pub fn to_content(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            segment.render_into(&mut out);
        }
        out
    }
}

#[derive(Deserialize)]
struct VendorExport {
    transcript: VendorTranscript,
}

#[derive(Deserialize)]
struct VendorTranscript {
    transcript_content: Vec<VendorSegment>,
}

#[derive(Deserialize)]
struct VendorSegment {
    speaker_name: Value,
    text: Value,
}

#[derive(Deserialize)]
struct GenericSegment {
    speaker_name: Value,
    sentence: Value,
    #[serde(rename = "startTime")]
    start_time: Value,
    #[serde(rename = "endTime")]
    end_time: Value,
}

/// Strings render bare, `null` as nothing, everything else as JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Outcome of [`validate_file_content`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentValidation {
    pub valid: bool,
    pub message: String,
}

impl ContentValidation {
    fn new(valid: bool, message: impl Into<String>) -> Self {
        Self {
            valid,
            message: message.into(),
        }
    }
}

fn io_error(path: &Path, err: io::Error) -> ClientError {
    if err.kind() == io::ErrorKind::NotFound {
        ClientError::FileNotFound(path.to_path_buf())
    } else {
        ClientError::file_access(path, err)
    }
}

fn read_head(path: &Path, limit: u64) -> ClientResult<String> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut buf = Vec::with_capacity(limit as usize);
    file.take(limit)
        .read_to_end(&mut buf)
        .map_err(|e| io_error(path, e))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn read_text(path: &Path) -> ClientResult<String> {
    fs::read_to_string(path).map_err(|e| io_error(path, e))
}

/// Lowercase extension with its leading dot, or an empty string.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// MIME type guessed from the extension alone.
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let mime = match file_extension(path).as_str() {
        ".json" => "application/json",
        ".vtt" => "text/vtt",
        ".srt" => "application/x-subrip",
        ".txt" | ".log" => "text/plain",
        ".md" => "text/markdown",
        ".csv" => "text/csv",
        ".html" | ".htm" => "text/html",
        ".xml" => "text/xml",
        ".pdf" => "application/pdf",
        ".mp4" => "video/mp4",
        ".avi" => "video/x-msvideo",
        ".mov" => "video/quicktime",
        ".mkv" => "video/x-matroska",
        ".wmv" => "video/x-ms-wmv",
        ".flv" => "video/x-flv",
        ".mp3" => "audio/mpeg",
        ".m4a" => "audio/mp4",
        ".wav" => "audio/x-wav",
        ".flac" => "audio/flac",
        ".aac" => "audio/aac",
        ".ogg" => "audio/ogg",
        _ => return None,
    };
    Some(mime)
}

/// Metadata for an existing path.
pub fn classify(path: &Path) -> ClientResult<FileInfo> {
    let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
    Ok(FileInfo {
        path: path.to_path_buf(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension: file_extension(path),
        mime_type: guess_mime_type(path).map(str::to_string),
        size_bytes: metadata.len(),
        is_file: metadata.is_file(),
    })
}

/// True iff the extension is exactly `.json`; content is not inspected.
pub fn is_json_file(path: &Path) -> bool {
    file_extension(path) == ".json"
}

pub fn is_video_file(path: &Path) -> bool {
    VIDEO_EXTENSIONS.contains(&file_extension(path).as_str())
}

pub fn is_audio_file(path: &Path) -> bool {
    AUDIO_EXTENSIONS.contains(&file_extension(path).as_str())
}

/// Whether a path looks like a transcript by extension, MIME type or, as a
/// last resort, keywords in its first kilobyte. Unreadable files are not
/// transcripts.
pub fn is_transcript_file(path: &Path) -> bool {
    if TRANSCRIPT_EXTENSIONS.contains(&file_extension(path).as_str()) {
        return true;
    }
    if guess_mime_type(path).is_some_and(|m| TRANSCRIPT_MIME_TYPES.contains(&m)) {
        return true;
    }
    match read_head(path, KEYWORD_SNIFF_BYTES) {
        Ok(head) => {
            let head = head.to_lowercase();
            TRANSCRIPT_KEYWORDS.iter().any(|k| head.contains(k))
        }
        Err(_) => false,
    }
}

/// Guess the transcript layout from the first [`FORMAT_SNIFF_BYTES`] bytes.
///
/// Substring heuristics only: a vendor export whose keys fall past the sniff
/// window, or are spelled with different spacing, reads as `Unknown`.
pub fn detect_transcript_format(path: &Path) -> ClientResult<TranscriptFormat> {
    let head = read_head(path, FORMAT_SNIFF_BYTES)?;
    if head.starts_with(VTT_MARKER) {
        return Ok(TranscriptFormat::Vtt);
    }
    if VENDOR_MARKERS.iter().all(|m| head.contains(m)) {
        return Ok(TranscriptFormat::Json);
    }
    Ok(TranscriptFormat::Unknown)
}

/// Parse a `.json` transcript into segments, picking the layout with
/// [`detect_transcript_format`].
pub fn parse_json_transcript(path: &Path) -> ClientResult<TranscriptDocument> {
    let format = detect_transcript_format(path)?;
    let raw = read_text(path)?;
    debug!(path = %path.display(), format = %format, "Parsing JSON transcript");
    match format {
        TranscriptFormat::Json => TranscriptDocument::from_vendor_json(&raw),
        _ => TranscriptDocument::from_generic_json(&raw),
    }
}

/// Text to store for a transcript file.
///
/// `.json` files are flattened segment by segment in file order; any other
/// file is returned verbatim.
pub fn extract_content(path: &Path) -> ClientResult<String> {
    if !path.exists() {
        return Err(ClientError::FileNotFound(path.to_path_buf()));
    }
    if is_json_file(path) {
        Ok(parse_json_transcript(path)?.to_content())
    } else {
        read_text(path)
    }
}

/// Check that the content of a file matches its extension.
///
/// JSON must parse and VTT must start with a `WEBVTT` line; other types are
/// accepted without inspection.
pub fn validate_file_content(path: &Path) -> ClientResult<ContentValidation> {
    match file_extension(path).as_str() {
        ".json" => {
            let raw = read_text(path)?;
            Ok(match serde_json::from_str::<Value>(&raw) {
                Ok(_) => ContentValidation::new(true, "Valid JSON"),
                Err(_) => ContentValidation::new(false, "Invalid JSON content"),
            })
        }
        ".vtt" => {
            let head = read_head(path, FORMAT_SNIFF_BYTES)?;
            let first_line = head.lines().next().unwrap_or_default().trim();
            Ok(if first_line == VTT_MARKER {
                ContentValidation::new(true, "Valid VTT file")
            } else {
                ContentValidation::new(false, "Missing WEBVTT header")
            })
        }
        _ => {
            if !path.exists() {
                return Err(ClientError::FileNotFound(path.to_path_buf()));
            }
            Ok(ContentValidation::new(
                true,
                "Content validation not implemented for this type",
            ))
        }
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
