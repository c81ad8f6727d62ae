//! Language state tables from the project wiki.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use famviz_record::strip_prefix;

use crate::{HttpClient, RemoteError, RemoteResult};

/// Value reported when a language has no row or no state cell.
const UNKNOWN: &str = "unknown";

/// Header rows preceding the language rows.
const HEADER_ROWS: usize = 2;

/// The text of every cell of a table, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiTable {
    rows: Vec<Vec<String>>,
}

impl WikiTable {
    /// Extracts the first `wikitable sortable` table of a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be read or has no such table.
    pub fn parse(url: &str, html: &str) -> RemoteResult<Self> {
        let mut reader = Reader::from_str(html);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut depth = 0usize;
        let mut rows = Vec::new();
        let mut row: Option<Vec<String>> = None;
        let mut cell: Option<String> = None;

        loop {
            let event = reader.read_event().map_err(|e| RemoteError::Wiki {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

            match event {
                Event::Start(e) => {
                    let name = e.local_name();
                    let name = name.as_ref();
                    if name.eq_ignore_ascii_case(b"table") {
                        if depth > 0 {
                            depth += 1;
                        } else if is_sortable_table(&e) {
                            depth = 1;
                        }
                    } else if depth == 1 && name.eq_ignore_ascii_case(b"tr") {
                        close_cell(&mut cell, &mut row);
                        close_row(&mut row, &mut rows);
                        row = Some(Vec::new());
                    } else if depth == 1
                        && (name.eq_ignore_ascii_case(b"td") || name.eq_ignore_ascii_case(b"th"))
                    {
                        close_cell(&mut cell, &mut row);
                        cell = Some(String::new());
                    }
                }
                Event::End(e) if depth > 0 => {
                    let name = e.local_name();
                    let name = name.as_ref();
                    if name.eq_ignore_ascii_case(b"table") {
                        depth -= 1;
                        if depth == 0 {
                            close_cell(&mut cell, &mut row);
                            close_row(&mut row, &mut rows);
                            debug!(%url, rows = rows.len(), "read wiki table");
                            return Ok(Self { rows });
                        }
                    } else if depth == 1 && name.eq_ignore_ascii_case(b"tr") {
                        close_cell(&mut cell, &mut row);
                        close_row(&mut row, &mut rows);
                    } else if depth == 1
                        && (name.eq_ignore_ascii_case(b"td") || name.eq_ignore_ascii_case(b"th"))
                    {
                        close_cell(&mut cell, &mut row);
                    }
                }
                Event::Text(text) => {
                    if let Some(cell) = cell.as_mut() {
                        match text.unescape_with(resolve_entity) {
                            Ok(text) => cell.push_str(&text),
                            Err(_) => cell.push_str(&String::from_utf8_lossy(&text)),
                        }
                    }
                }
                Event::CData(data) => {
                    if let Some(cell) = cell.as_mut() {
                        cell.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Err(RemoteError::Wiki {
            url: url.to_string(),
            reason: "no complete `wikitable sortable` table".to_string(),
        })
    }

    /// Returns the state of `language`, read from `column` of its row.
    ///
    /// The first cell of a row names the repository (`apertium-<lang>`).
    /// Languages without a row get `"unknown"`.
    #[must_use]
    pub fn state_of(&self, language: &str, column: usize) -> String {
        self.rows
            .iter()
            .skip(HEADER_ROWS)
            .find(|row| {
                row.first()
                    .is_some_and(|name| strip_prefix(name.trim()) == language)
            })
            .and_then(|row| row.get(column))
            .map_or_else(|| UNKNOWN.to_string(), |state| state.trim().to_string())
    }
}

fn is_sortable_table(start: &BytesStart<'_>) -> bool {
    start
        .attributes()
        .with_checks(false)
        .filter_map(Result::ok)
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(b"class"))
        .is_some_and(|attr| {
            let value = String::from_utf8_lossy(&attr.value);
            let classes: Vec<&str> = value.split_whitespace().collect();
            classes.contains(&"wikitable") && classes.contains(&"sortable")
        })
}

fn resolve_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "nbsp" => Some("\u{a0}"),
        _ => resolve_predefined_entity(entity),
    }
}

fn close_cell(cell: &mut Option<String>, row: &mut Option<Vec<String>>) {
    if let Some(text) = cell.take() {
        row.get_or_insert_with(Vec::new).push(text);
    }
}

fn close_row(row: &mut Option<Vec<String>>, rows: &mut Vec<Vec<String>>) {
    if let Some(cells) = row.take() {
        rows.push(cells);
    }
}

/// Source of the language state table of a family.
#[allow(async_fn_in_trait)]
pub trait StateSource {
    /// Fetches the state table of a family.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    async fn fetch_table(&self, family: &str) -> RemoteResult<WikiTable>;
}

/// Client of the project wiki.
pub struct WikiClient {
    http: HttpClient,
    base_url: String,
}

impl WikiClient {
    /// Creates a client for the wiki rooted at `base_url`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the page URL of a family, e.g. `<wiki>/Turkic_languages`.
    #[must_use]
    pub fn page_url(&self, family: &str) -> String {
        format!("{}/{}_languages", self.base_url, family_title(family))
    }
}

impl StateSource for WikiClient {
    async fn fetch_table(&self, family: &str) -> RemoteResult<WikiTable> {
        let url = self.page_url(family);
        debug!(%url, "fetching wiki page");
        let html = self.http.get_text(&url).await?;
        WikiTable::parse(&url, &html)
    }
}

/// Returns a family name as written in titles, e.g. `Turkic`.
#[must_use]
pub fn family_title(family: &str) -> String {
    let mut chars = family.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{Reply, serve};
    use famviz_config::HttpConfig;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Turkic languages</title></head>
<body>
<table class="wikitable"><tr><td>ignored</td></tr></table>
<table class="wikitable sortable" style="text-align: center">
<tr><th colspan="8">Transducers</th></tr>
<tr><th>Name</th><th>a</th><th>b</th><th>c</th><th>d</th><th>e</th><th>State</th><th>Other</th></tr>
<tr><td><a href="/x"><code>apertium-tat</code></a></td><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td><td> production </td><td>alt</td></tr>
<tr><td><a href="/y"><code>apertium-kir</code></a></td><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td><td>beta&nbsp;</td><td>stable</td></tr>
</table>
</body>
</html>"#;

    #[test]
    fn test_parse_first_sortable_table() {
        let table = WikiTable::parse("page", PAGE).unwrap();
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[2][0], "apertium-tat");
    }

    #[test]
    fn test_state_of_default_column() {
        let table = WikiTable::parse("page", PAGE).unwrap();
        assert_eq!(table.state_of("tat", 6), "production");
    }

    #[test]
    fn test_state_of_override_column() {
        let table = WikiTable::parse("page", PAGE).unwrap();
        assert_eq!(table.state_of("tat", 7), "alt");
        assert_eq!(table.state_of("kir", 7), "stable");
    }

    #[test]
    fn test_state_of_unknown() {
        let table = WikiTable::parse("page", PAGE).unwrap();
        assert_eq!(table.state_of("kaz", 6), "unknown");
        assert_eq!(table.state_of("tat", 12), "unknown");
    }

    #[test]
    fn test_header_rows_never_match() {
        let table = WikiTable::parse(
            "page",
            r#"<table class="sortable wikitable">
<tr><th>apertium-tat</th><th>header</th></tr>
<tr><th>Name</th><th>State</th></tr>
</table>"#,
        )
        .unwrap();
        assert_eq!(table.state_of("tat", 1), "unknown");
    }

    #[test]
    fn test_parse_without_table() {
        let err = WikiTable::parse("page", "<html><body><p>nothing</p></body></html>").unwrap_err();
        assert!(matches!(err, RemoteError::Wiki { .. }));
    }

    #[test]
    fn test_family_title() {
        assert_eq!(family_title("turkic"), "Turkic");
        assert_eq!(family_title("CELTIC"), "Celtic");
        assert_eq!(family_title(""), "");
    }

    #[tokio::test]
    async fn test_fetch_table() {
        let base = serve(vec![("/Turkic_languages", Reply::ok(PAGE))]).await;
        let wiki = WikiClient::new(HttpClient::new(&HttpConfig::default()).unwrap(), base);

        let table = wiki.fetch_table("turkic").await.unwrap();
        assert_eq!(table.state_of("kir", 6), "beta");
    }
}
