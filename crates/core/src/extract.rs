//! Best-effort plain-text extraction from uploaded course documents.
//!
//! Extraction never fails the upload: anything that cannot be read (corrupt
//! file, unsupported MIME type, encrypted PDF) yields an empty string, and
//! the material falls back to its description or title when excerpted for
//! generation.

use std::io::Read;
use std::sync::OnceLock;

use regex::Regex;

const MIME_PDF: &str = "application/pdf";
const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_DOC: &str = "application/msword";
const MIME_TEXT: &str = "text/plain";

/// MIME types accepted for course material uploads.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[MIME_PDF, MIME_DOCX, MIME_DOC, MIME_TEXT];

/// Whether the given MIME type is accepted for upload.
pub fn is_supported_mime(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}

/// Extract plain text from an uploaded document, keyed by its declared MIME
/// type. Unsupported types and unreadable files yield an empty string.
pub fn extract_text(bytes: &[u8], mime_type: &str) -> String {
    match mime_type {
        MIME_PDF => extract_from_pdf(bytes),
        MIME_DOCX | MIME_DOC => extract_from_word(bytes),
        MIME_TEXT => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    }
}

fn extract_from_pdf(bytes: &[u8]) -> String {
    pdf_extract::extract_text_from_mem(bytes).unwrap_or_default()
}

/// A `.docx` file is a zip archive with the body text in `word/document.xml`.
/// Legacy `.doc` uploads land here too and fall out as empty.
fn extract_from_word(bytes: &[u8]) -> String {
    let cursor = std::io::Cursor::new(bytes);
    let Ok(mut archive) = zip::ZipArchive::new(cursor) else {
        return String::new();
    };
    let Ok(mut entry) = archive.by_name("word/document.xml") else {
        return String::new();
    };
    let mut xml = String::new();
    if entry.read_to_string(&mut xml).is_err() {
        return String::new();
    }
    strip_document_xml(&xml)
}

/// Reduce WordprocessingML to plain text: paragraph ends become newlines,
/// all other markup is dropped, basic XML entities are decoded.
fn strip_document_xml(xml: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"[ \t]+").expect("static regex"));

    let with_breaks = xml.replace("</w:p>", "\n");
    let stripped = tag.replace_all(&with_breaks, " ");
    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    decoded
        .lines()
        .map(|line| spaces.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
