//! Log sanitization for patient data.
//!
//! Every formatted log line passes through [`SanitizingMakeWriter`], which
//! redacts:
//! - Clinical `field=value` pairs (age, blood pressure, cholesterol, ...)
//! - Patient identifiers (UUIDs, MRNs)
//! - Contact details (email, phone)
//!
//! Callers should still avoid logging raw records; this is the fallback.
//! Lines longer than the configured cap are truncated before scanning.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Default per-line sanitization cap (16 KiB).
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

/// Field names of `PatientRecord` in both Rust and JSON spelling.
const CLINICAL_FIELDS: &str = r"age|gender|height|weight|bmi|systolic_bp|diastolic_bp|systolicBP|diastolicBP|cholesterol|glucose|smoking|alcohol|physical_activity|physicalActivity|family_history|familyHistory";

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let clinical = format!(
            r#"(?i)\b(?P<field>{CLINICAL_FIELDS})"?\s*[:=]\s*"?[A-Za-z0-9.]+"?"#
        );

        let sources: Vec<(String, &'static str)> = vec![
            (clinical, "${field}=[REDACTED]"),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
                    .to_string(),
                "[REDACTED-UUID]",
            ),
            (r"\bMRN[:\s#]?\d{6,10}\b".to_string(), "[REDACTED-MRN]"),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b"
                    .to_string(),
                "[REDACTED-EMAIL]",
            ),
            (
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s][0-9]{3}[-.\s][0-9]{4}\b".to_string(),
                "[REDACTED-PHONE]",
            ),
        ];

        // Patterns are compile-time constants; failure here is a programming error.
        let set = RegexSet::new(sources.iter().map(|(p, _)| p.as_str()))
            .expect("Valid sanitization regex set");
        let rules = sources
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(&pattern).expect("Valid sanitization regex"),
                replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact patient data from `input`, scanning at most `max_bytes`.
#[must_use]
pub fn sanitize(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).iter() {
        let rule = &patterns.rules[idx];
        result = rule
            .regex
            .replace_all(&result, rule.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check whether `input` contains anything [`sanitize`] would redact.
#[must_use]
pub fn contains_patient_data(input: &str) -> bool {
    patterns().set.is_match(input)
}

/// A `tracing_subscriber` writer factory that sanitizes each formatted line
/// before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M, max_bytes: usize) -> Self {
        Self { inner, max_bytes }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        let mut clean = sanitize(&text, self.max_bytes);
        // truncation can cut the terminator
        if text.ends_with('\n') && !clean.ends_with('\n') {
            clean.push('\n');
        }
        self.inner.write_all(clean.as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.flush_lines()?;

        // Only an unterminated line is left; emit it rather than buffer without bound.
        if self.buffer.len() > self.max_bytes.saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
            max_bytes: self.max_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CAP: usize = DEFAULT_SANITIZE_MAX_BYTES;

    #[test]
    fn test_redacts_clinical_fields() {
        let sanitized = sanitize("submitted age=52 systolic_bp=148 cholesterol: 231", CAP);
        assert!(sanitized.contains("age=[REDACTED]"));
        assert!(sanitized.contains("systolic_bp=[REDACTED]"));
        assert!(sanitized.contains("cholesterol=[REDACTED]"));
        assert!(!sanitized.contains("148"));
        assert!(!sanitized.contains("231"));
    }

    #[test]
    fn test_redacts_json_fields() {
        let sanitized = sanitize(r#"{"systolicBP":150,"smoking":true}"#, CAP);
        assert!(!sanitized.contains("150"));
        assert!(!sanitized.contains("true"));
    }

    #[test]
    fn test_keeps_assessment_summary() {
        let line = "Assessment complete: level=HIGH percentage=26";
        assert_eq!(sanitize(line, CAP), line);
        assert!(!contains_patient_data(line));
    }

    #[test]
    fn test_redacts_identifiers() {
        let sanitized = sanitize(
            "patient 550e8400-e29b-41d4-a716-446655440000 MRN:12345678 nurse@clinic.org",
            CAP,
        );
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(sanitized.contains("[REDACTED-MRN]"));
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize("ééééééééééé", 5);
        assert!(sanitized.ends_with("[TRUNCATED]"));
    }

    #[derive(Clone, Default)]
    struct Sink(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("sink lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let sink = Sink::default();
        let handle = sink.clone();
        let make = SanitizingMakeWriter::new(move || handle.clone(), CAP);
        {
            let mut writer = make.make_writer();
            writer.write_all(b"glucose=140 ").expect("write");
            writer.write_all(b"done\nnext").expect("write");
        }

        let out = String::from_utf8(sink.0.lock().expect("sink lock").clone()).expect("utf8");
        assert_eq!(out, "glucose=[REDACTED] done\nnext");
    }

    #[test]
    fn test_writer_keeps_every_line_of_a_large_write() {
        let sink = Sink::default();
        let handle = sink.clone();
        let make = SanitizingMakeWriter::new(move || handle.clone(), 16);

        let chunk: String = (0..10).map(|i| format!("line {i:02} ok\n")).collect();
        assert!(chunk.len() > 32);
        {
            let mut writer = make.make_writer();
            writer.write_all(chunk.as_bytes()).expect("write");
        }

        let out = String::from_utf8(sink.0.lock().expect("sink lock").clone()).expect("utf8");
        assert_eq!(out, chunk);
        assert!(!out.contains("[TRUNCATED]"));
    }

    #[test]
    fn test_writer_truncates_one_unterminated_line() {
        let sink = Sink::default();
        let handle = sink.clone();
        let make = SanitizingMakeWriter::new(move || handle.clone(), 16);
        {
            let mut writer = make.make_writer();
            writer.write_all(b"short\n").expect("write");
            writer.write_all(&[b'x'; 40]).expect("write");
        }

        let out = String::from_utf8(sink.0.lock().expect("sink lock").clone()).expect("utf8");
        assert!(out.starts_with("short\n"));
        assert!(out.ends_with("[TRUNCATED]\n"));
        assert_eq!(out.lines().count(), 2);
    }
}
