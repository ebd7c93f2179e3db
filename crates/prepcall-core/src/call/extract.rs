//! Heuristic extraction of interview parameters from a transcript.
//!
//! A fallback utility, independent of the primary generation path (which
//! relies on LLM-structured extraction). Each turn is scanned in arrival
//! order; per field, the first match wins. Matching is case-insensitive,
//! but captures keep the transcript's original casing - except
//! `interview_type`, whose pattern is a closed enumeration and is
//! normalized to lowercase.

use once_cell::sync::Lazy;
use regex::Regex;

use super::message::TranscriptTurn;

static ROLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)role(?::|\s+is)?\s+([a-zA-Z\s]+)").unwrap());
static TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)type(?::|\s+is)?\s+(technical|behavioral|mixed)").unwrap());
static LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)level(?::|\s+is)?\s+([a-zA-Z0-9\s]+)").unwrap());
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)amount(?::|\s+is)?\s+([0-9kK]+)").unwrap());
static TECHSTACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)techstack(?::|\s+is)?\s+([a-zA-Z,\s]+)").unwrap());

/// Best-effort interview parameters pulled from a transcript.
///
/// Any field that never matched stays unset; absence is a normal outcome,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedInterviewInfo {
    pub role: Option<String>,
    pub interview_type: Option<String>,
    pub level: Option<String>,
    pub amount: Option<String>,
    pub tech_stack: Option<String>,
}

/// Scans the turns in order and captures the first match for each field.
///
/// Never fails; unmatched fields are left unset.
pub fn extract_interview_info(turns: &[TranscriptTurn]) -> ExtractedInterviewInfo {
    let mut info = ExtractedInterviewInfo::default();

    for turn in turns {
        let text = turn.content.as_str();

        if info.role.is_none() {
            info.role = capture(&ROLE_RE, text).map(|value| value.trim().to_string());
        }
        if info.interview_type.is_none() {
            info.interview_type = capture(&TYPE_RE, text).map(|value| value.to_lowercase());
        }
        if info.level.is_none() {
            info.level = capture(&LEVEL_RE, text);
        }
        if info.amount.is_none() {
            info.amount = capture(&AMOUNT_RE, text);
        }
        if info.tech_stack.is_none() {
            info.tech_stack = capture(&TECHSTACK_RE, text);
        }
    }

    info
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
