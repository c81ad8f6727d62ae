//! Lexc stem counter plugin.
//!
//! A stem is an entry whose upper (analysis) side still contains a letter
//! once multicharacter symbols, tags and archiphonemes are removed, found in
//! a lexicon reachable from `LEXICON Root`. Identical entries (same form and
//! continuation) count once.
//!
//! Before the first `LEXICON` only `Multichar_Symbols` and `Definitions` may
//! appear; an entry there makes the source malformed.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use famviz_counter::{CounterError, CounterResult, FileFormat, Plugin, StemCounter};
use regex::Regex;

static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%<[^%>]*%>|<[^<>\s]*>|\{[^}]*\}|\[[^\]]*\]").expect("invalid regex")
});

static ESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%(.)").expect("invalid regex"));

/// Lexc stem counter.
pub struct LexcCounter;

impl LexcCounter {
    /// Creates a new lexc counter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexcCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for LexcCounter {
    fn name(&self) -> &'static str {
        "lexc"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Counts stems in lexicon compiler sources"
    }
}

impl StemCounter for LexcCounter {
    fn supports(&self, format: FileFormat) -> bool {
        format == FileFormat::Lexc
    }

    fn count(&self, content: &str, _bilingual: bool) -> CounterResult<u64> {
        Ok(Lexc::parse(content)?.stem_count())
    }
}

fn malformed(reason: impl Into<String>) -> CounterError {
    CounterError::malformed("lexc", reason)
}

#[derive(Debug)]
struct Entry {
    form: String,
    continuation: String,
}

impl Entry {
    fn parse(chunk: &str) -> Option<Self> {
        let tokens: Vec<&str> = chunk.split_whitespace().collect();
        let (continuation, form) = tokens.split_last()?;
        Some(Self {
            form: form.join(" "),
            continuation: (*continuation).to_string(),
        })
    }
}

/// The section of the file preceding the first lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prologue {
    Start,
    Multichars,
    Definitions,
}

#[derive(Debug, Default)]
struct Lexc {
    multichars: Vec<String>,
    lexicons: HashMap<String, Vec<Entry>>,
}

impl Lexc {
    fn parse(content: &str) -> CounterResult<Self> {
        let mut lexc = Self::default();
        let mut current: Option<String> = None;
        let mut prologue = Prologue::Start;
        let mut pending = String::new();

        for (index, raw) in content.lines().enumerate() {
            let line = strip_comment(raw);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut words = trimmed.split_whitespace();
            match words.next() {
                Some("LEXICON") => {
                    if !pending.trim().is_empty() {
                        return Err(malformed(format!(
                            "entry without terminating ';' before line {}",
                            index + 1
                        )));
                    }
                    pending.clear();
                    let name = words
                        .next()
                        .ok_or_else(|| malformed(format!("unnamed LEXICON at line {}", index + 1)))?;
                    lexc.lexicons.entry(name.to_string()).or_default();
                    current = Some(name.to_string());
                    continue;
                }
                Some("Multichar_Symbols") if current.is_none() => {
                    prologue = Prologue::Multichars;
                    lexc.multichars.extend(words.map(String::from));
                    continue;
                }
                Some("Definitions") if current.is_none() => {
                    prologue = Prologue::Definitions;
                    continue;
                }
                _ => {}
            }

            let Some(lexicon) = &current else {
                if prologue != Prologue::Definitions && !split_entries(&line).0.is_empty() {
                    return Err(malformed(format!(
                        "entry before any LEXICON at line {}",
                        index + 1
                    )));
                }
                if prologue == Prologue::Multichars {
                    lexc.multichars
                        .extend(trimmed.split_whitespace().map(String::from));
                }
                continue;
            };

            pending.push_str(&line);
            pending.push(' ');
            let (chunks, rest) = split_entries(&pending);
            let entries = lexc.lexicons.entry(lexicon.clone()).or_default();
            entries.extend(chunks.iter().filter_map(|c| Entry::parse(c)));
            pending = rest;
        }

        if !pending.trim().is_empty() {
            return Err(malformed("entry without terminating ';' at end of file"));
        }
        if !lexc.lexicons.contains_key("Root") {
            return Err(malformed("missing LEXICON Root"));
        }

        Ok(lexc)
    }

    fn reachable_from_root(&self) -> HashSet<&str> {
        let mut seen = HashSet::new();
        let mut stack = vec!["Root"];
        while let Some(name) = stack.pop() {
            if !seen.insert(name) {
                continue;
            }
            if let Some(entries) = self.lexicons.get(name) {
                stack.extend(
                    entries
                        .iter()
                        .map(|e| e.continuation.as_str())
                        .filter(|c| self.lexicons.contains_key(*c)),
                );
            }
        }
        seen
    }

    fn is_stem(&self, entry: &Entry) -> bool {
        let mut upper = upper_side(&entry.form).to_string();
        for symbol in &self.multichars {
            upper = upper.replace(symbol.as_str(), "");
        }
        let upper = SYMBOL_RE.replace_all(&upper, "");
        let upper = ESCAPE_RE.replace_all(&upper, "$1");
        upper.chars().any(char::is_alphabetic)
    }

    fn stem_count(&self) -> u64 {
        let mut stems = HashSet::new();
        for name in self.reachable_from_root() {
            for entry in &self.lexicons[name] {
                if self.is_stem(entry) {
                    stems.insert((entry.form.as_str(), entry.continuation.as_str()));
                }
            }
        }
        stems.len() as u64
    }
}

/// Cuts a line at the first unescaped `!`.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '!' => break,
            _ => out.push(c),
        }
    }
    out
}

/// Splits text at unescaped `;` outside glosses. Returns the complete
/// entries and the unterminated remainder. Quoted glosses are dropped.
fn split_entries(text: &str) -> (Vec<String>, String) {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '%' if !in_quote => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '"' => in_quote = !in_quote,
            _ if in_quote => {}
            ';' => entries.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    (entries, current)
}

/// Returns the part of a form before the first unescaped `:`.
fn upper_side(form: &str) -> &str {
    let mut escaped = false;
    for (i, c) in form.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '%' => escaped = true,
            ':' => return &form[..i],
            _ => {}
        }
    }
    form
}
