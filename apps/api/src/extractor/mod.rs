//! Extractor — heuristic PDF-resume-to-LaTeX conversion.
//!
//! Plain-text only: no layout, table, or image understanding. Every internal
//! failure degrades to a hardcoded placeholder document, so `extract` never
//! returns an error.

pub mod handlers;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

const DEFAULT_NAME: &str = "Your Name";
const DEFAULT_CONTACT: &str = "email@example.com | 555-0123";
/// How far past a section header the body scan reaches, in bytes.
const SECTION_WINDOW: usize = 500;
/// Lines kept per section.
const MAX_SECTION_LINES: usize = 5;

/// Keyword lists per section. First keyword that matches wins.
const EDUCATION_KEYWORDS: &[&str] = &["EDUCATION", "ACADEMIC"];
const SKILLS_KEYWORDS: &[&str] = &["SKILLS", "TECHNICAL SKILLS"];
const EXPERIENCE_KEYWORDS: &[&str] = &["EXPERIENCE", "WORK EXPERIENCE"];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\+\d][\d\-\.\s\(\)]{8,}\d").unwrap());
static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,}").unwrap());

/// The structured resume fields backing the fixed LaTeX skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct LatexDocument {
    pub name: String,
    pub contact: String,
    pub education: Vec<String>,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
}

impl LatexDocument {
    /// The hardcoded placeholder document used when the PDF is unreadable.
    pub fn fallback() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
            education: Vec::new(),
            skills: Vec::new(),
            experience: Vec::new(),
        }
    }

    /// Renders the fixed skeleton. Always a well-formed LaTeX shell: empty
    /// sections render a canned placeholder block instead of nothing.
    pub fn render(&self) -> String {
        format!(
            r"\documentclass[a4paper,11pt]{{article}}
\usepackage[margin=1in]{{geometry}}
\usepackage{{enumitem}}

\begin{{document}}

\begin{{center}}
  {{\Large \textbf{{{name}}}}}\\
  {contact}
\end{{center}}

\section*{{Education}}
{education}

\section*{{Skills}}
{skills}

\section*{{Experience}}
{experience}

\end{{document}}",
            name = self.name,
            contact = self.contact,
            education = render_section(&self.education, "education"),
            skills = render_section(&self.skills, "skills"),
            experience = render_section(&self.experience, "experience"),
        )
    }
}

fn render_section(lines: &[String], label: &str) -> String {
    if lines.is_empty() {
        format!("Add your {label} here")
    } else {
        lines.join("\n")
    }
}

/// Result of an extraction attempt. `degraded` marks the placeholder path so
/// callers can tell a parsed document from the hardcoded fallback.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: LatexDocument,
    pub degraded: bool,
}

/// Converts raw PDF bytes to a LaTeX resume document. Never fails: malformed
/// or unreadable input yields the placeholder document with `degraded: true`.
pub fn extract(pdf_bytes: &[u8]) -> Extraction {
    match pdf_extract::extract_text_from_mem(pdf_bytes) {
        Ok(text) => Extraction {
            document: latex_from_text(&text),
            degraded: false,
        },
        Err(e) => {
            warn!("PDF text extraction failed, using placeholder document: {e}");
            Extraction {
                document: LatexDocument::fallback(),
                degraded: true,
            }
        }
    }
}

/// Heuristic field/section split over the concatenated page text.
pub fn latex_from_text(text: &str) -> LatexDocument {
    LatexDocument {
        name: extract_name(text),
        contact: extract_contact(text),
        education: extract_section(text, EDUCATION_KEYWORDS),
        skills: extract_section(text, SKILLS_KEYWORDS),
        experience: extract_section(text, EXPERIENCE_KEYWORDS),
    }
}

/// Scans the first 3 non-empty lines for a plausible person name: at most 4
/// words, no `@`, no run of 3+ consecutive digits.
fn extract_name(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(3)
        .find(|l| {
            l.split_whitespace().count() <= 4 && !l.contains('@') && !DIGIT_RUN_RE.is_match(l)
        })
        .map(title_case)
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}

fn title_case(line: &str) -> String {
    line.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First email and first phone-like match, pipe-joined. Neither found →
/// default contact string.
fn extract_contact(text: &str) -> String {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().trim().to_string());
    let phone = PHONE_RE.find(text).map(|m| m.as_str().trim().to_string());

    let parts: Vec<String> = [email, phone].into_iter().flatten().collect();
    if parts.is_empty() {
        DEFAULT_CONTACT.to_string()
    } else {
        parts.join(" | ")
    }
}

/// Locates the first keyword occurrence (case-insensitive, list order wins)
/// and bullets up to 5 non-empty lines from the following window of text.
fn extract_section(text: &str, keywords: &[&str]) -> Vec<String> {
    let haystack = text.to_ascii_uppercase();

    for keyword in keywords {
        let Some(pos) = haystack.find(keyword) else {
            continue;
        };
        // Keyword is pure ASCII and to_ascii_uppercase is byte-preserving,
        // so this offset is a valid char boundary in the original text.
        let body = &text[pos + keyword.len()..];
        let mut end = body.len().min(SECTION_WINDOW);
        while !body.is_char_boundary(end) {
            end -= 1;
        }

        return body[..end]
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(MAX_SECTION_LINES)
            .map(bullet)
            .collect();
    }

    Vec::new()
}

fn bullet(line: &str) -> String {
    if line.starts_with('-') {
        line.to_string()
    } else {
        format!("- {line}")
    }
}
