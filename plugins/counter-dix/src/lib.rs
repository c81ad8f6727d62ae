//! Dictionary XML stem counter plugin.
//!
//! Counts `<e>` entries inside `<section>` elements. A monolingual
//! dictionary only counts entries with a lemma (`lm` attribute); a bilingual
//! one counts every entry.

use famviz_counter::{CounterError, CounterResult, FileFormat, Plugin, StemCounter};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Statistics of one dictionary source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DixInfo {
    /// Stems (monolingual) or entries (bilingual).
    pub stems: u64,
    /// Paradigm definitions.
    pub paradigms: u64,
}

/// Reads the statistics of a dictionary source.
///
/// Returns `None` if the source is not well-formed or has no
/// `<dictionary>` root.
#[must_use]
pub fn get_info(content: &str, bilingual: bool) -> Option<DixInfo> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut info = DixInfo::default();
    let mut depth = 0usize;
    let mut sections = 0usize;
    let mut has_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 && e.local_name().as_ref() == b"dictionary" {
                    has_root = true;
                }
                depth += 1;
                if e.local_name().as_ref() == b"section" {
                    sections += 1;
                }
                visit(&e, sections, bilingual, &mut info)?;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 && e.local_name().as_ref() == b"dictionary" {
                    has_root = true;
                }
                visit(&e, sections, bilingual, &mut info)?;
            }
            Ok(Event::End(e)) => {
                depth = depth.checked_sub(1)?;
                if e.local_name().as_ref() == b"section" {
                    sections = sections.saturating_sub(1);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => return None,
        }
    }

    (has_root && depth == 0).then_some(info)
}

fn visit(e: &BytesStart<'_>, sections: usize, bilingual: bool, info: &mut DixInfo) -> Option<()> {
    match e.local_name().as_ref() {
        b"pardef" => info.paradigms += 1,
        b"e" if sections > 0 => {
            if bilingual || e.try_get_attribute("lm").ok()?.is_some() {
                info.stems += 1;
            }
        }
        _ => {}
    }
    Some(())
}

/// Dictionary XML stem counter.
pub struct DixCounter;

impl DixCounter {
    /// Creates a new dix counter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DixCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DixCounter {
    fn name(&self) -> &'static str {
        "dix"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Counts stems and entries in dictionary XML sources"
    }
}

impl StemCounter for DixCounter {
    fn supports(&self, format: FileFormat) -> bool {
        matches!(format, FileFormat::Dix | FileFormat::Metadix)
    }

    fn count(&self, content: &str, bilingual: bool) -> CounterResult<u64> {
        get_info(content, bilingual)
            .map(|info| info.stems)
            .ok_or(CounterError::NoResult)
    }
}
