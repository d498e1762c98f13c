//! DOCX raw-text extraction.
//!
//! A .docx file is a zip archive; the document body lives in
//! `word/document.xml` with visible text inside `<w:t>` runs. Reading those
//! runs and breaking on paragraph ends gives the same raw text a full
//! converter would, without carrying a heavyweight dependency.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{IntakeError, Result};

/// Extract the raw text of a DOCX document.
pub fn extract_docx_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    let fail = |reason: String| IntakeError::Extract {
        file_name: file_name.to_string(),
        reason,
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| fail(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| fail(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| fail(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => in_run_text = false,
            Ok(Event::Text(e)) if in_run_text => {
                let chunk = e.unescape().map_err(|e| fail(e.to_string()))?;
                text.push_str(&chunk);
            }
            // Paragraph and explicit line breaks become newlines
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => text.push('\n'),
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"br" => text.push('\n'),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(fail(e.to_string())),
        }
    }

    Ok(text)
}
