//! Tolerant HTML scanning helpers for the network-backed sources.
//!
//! No DOM is built: we locate blocks with small regexes and count tag depth
//! by hand, which is enough for share pages and lookup responses.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"(?i)<(/?)([a-z][a-z0-9-]*)\b[^>]*?(/?)>").expect("tag pattern is valid")
    })
}

fn markup_regex() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| {
        Regex::new(r"(?is)<(?:script|style)\b.*?</(?:script|style)\s*>|<!--.*?-->|<[^>]*>")
            .expect("markup pattern is valid")
    })
}

fn fixture_delimiter_regex() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| {
        // List numbering ("1. ", "2) ") or a separator character ends a fixture
        Regex::new(r"(?:^|\s)\d{1,2}[.)](?:\s|$)|[,;|\n]")
            .expect("delimiter pattern is valid")
    })
}

fn versus_regex() -> &'static Regex {
    static VERSUS: OnceLock<Regex> = OnceLock::new();
    VERSUS.get_or_init(|| Regex::new(r"(?i)\s+vs\.?\s+").expect("versus pattern is valid"))
}

/// Longest side accepted as a team name
const MAX_SIDE_CHARS: usize = 60;

/// Locates the element whose `id` or `class` contains a marker string
#[derive(Debug, Clone)]
pub struct ContainerLocator {
    open: Regex,
}

impl ContainerLocator {
    pub fn new(marker: &str) -> Result<Self, regex::Error> {
        let open = Regex::new(&format!(
            r#"(?i)<([a-z][a-z0-9-]*)\b[^>]*\s(?:id|class)\s*=\s*["'][^"']*{}[^"']*["'][^>]*>"#,
            regex::escape(marker)
        ))?;
        Ok(Self { open })
    }

    /// Inner HTML of the first matching element. An unclosed element runs to
    /// the end of the document.
    pub fn inner_html<'a>(&self, html: &'a str) -> Option<&'a str> {
        let caps = self.open.captures(html)?;
        let tag = caps.get(1)?.as_str();
        let start = caps.get(0)?.end();
        let rest = &html[start..];

        let mut depth = 1usize;
        for cap in tag_regex().captures_iter(rest) {
            let name = cap.get(2).map_or("", |m| m.as_str());
            if !name.eq_ignore_ascii_case(tag) {
                continue;
            }
            let closing = cap.get(1).map_or(false, |m| !m.as_str().is_empty());
            let self_closing = cap.get(3).map_or(false, |m| !m.as_str().is_empty());

            if closing {
                depth -= 1;
                if depth == 0 {
                    let end = cap.get(0)?.start();
                    return Some(&rest[..end]);
                }
            } else if !self_closing {
                depth += 1;
            }
        }

        Some(rest)
    }
}

/// Visible text of an HTML fragment with whitespace collapsed
pub fn text_content(html: &str) -> String {
    let stripped = markup_regex().replace_all(html, " ");
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Every "home vs away" pair in raw HTML, in document order
///
/// Pairs sharing one text node must be separated by a delimiter or list
/// numbering. A run with more than one "vs" and no delimiter is ambiguous
/// and skipped.
pub fn extract_fixtures(html: &str) -> Vec<(String, String)> {
    let text = decode_entities(&markup_regex().replace_all(html, "\n"));

    fixture_delimiter_regex()
        .split(&text)
        .filter_map(|chunk| {
            let sides: Vec<&str> = versus_regex().splitn(chunk, 3).collect();
            match sides.as_slice() {
                [home, away] => Some((clean_side(home)?, clean_side(away)?)),
                [_, _, _] => {
                    debug!("Skipping ambiguous fixture text {:?}", chunk.trim());
                    None
                }
                _ => None,
            }
        })
        .collect()
}

fn clean_side(raw: &str) -> Option<String> {
    let side = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars = side.chars().count();
    (2..=MAX_SIDE_CHARS).contains(&chars).then_some(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_html_nested() {
        let locator = ContainerLocator::new("betslip").unwrap();
        let html = r#"<body><div class="header">x</div>
            <div id="share-betslip" class="card"><div>Arsenal</div><div>Chelsea</div></div>
            <div>footer</div></body>"#;

        let inner = locator.inner_html(html).unwrap();
        assert_eq!(inner, "<div>Arsenal</div><div>Chelsea</div>");
    }

    #[test]
    fn test_inner_html_missing() {
        let locator = ContainerLocator::new("betslip").unwrap();
        assert!(locator.inner_html("<div class=\"other\">x</div>").is_none());
    }

    #[test]
    fn test_inner_html_unclosed_runs_to_end() {
        let locator = ContainerLocator::new("betslip").unwrap();
        let inner = locator.inner_html("<section class='m-betslip'><p>Ajax</p>").unwrap();
        assert_eq!(inner, "<p>Ajax</p>");
    }

    #[test]
    fn test_marker_is_escaped() {
        let locator = ContainerLocator::new("slip.(x)").unwrap();
        assert!(locator.inner_html("<div class=\"slipAxx\">no</div>").is_none());
        assert_eq!(
            locator.inner_html("<div class=\"slip.(x)\">yes</div>"),
            Some("yes")
        );
    }

    #[test]
    fn test_marker_ignores_data_attributes() {
        let locator = ContainerLocator::new("betslip").unwrap();
        assert!(locator
            .inner_html("<div data-id=\"betslip\" data-class='betslip'>no</div>")
            .is_none());
        assert_eq!(
            locator.inner_html("<div data-id=\"x\" class=\"betslip\">yes</div>"),
            Some("yes")
        );
    }

    #[test]
    fn test_text_content() {
        let html = "<div>Arsenal</div>\n <div>&amp; Chelsea</div><script>var x = 1;</script><!-- c -->";
        assert_eq!(text_content(html), "Arsenal & Chelsea");
    }

    #[test]
    fn test_extract_fixtures() {
        let html = r#"<ul>
            <li class="event">Arsenal vs Chelsea</li>
            <li class="event"> Man Utd  VS  Liverpool </li>
            <li class="event">Real Madrid vs. Barcelona</li>
            <li>no fixture here</li>
        </ul>"#;

        let fixtures = extract_fixtures(html);
        assert_eq!(
            fixtures,
            vec![
                ("Arsenal".to_string(), "Chelsea".to_string()),
                ("Man Utd".to_string(), "Liverpool".to_string()),
                ("Real Madrid".to_string(), "Barcelona".to_string()),
            ]
        );
    }

    #[test]
    fn test_extract_fixtures_shared_text_node() {
        let pair = |h: &str, a: &str| (h.to_string(), a.to_string());

        assert_eq!(
            extract_fixtures("<p>Arsenal vs Chelsea, Ajax vs PSV</p>"),
            vec![pair("Arsenal", "Chelsea"), pair("Ajax", "PSV")]
        );
        assert_eq!(
            extract_fixtures("<td>1. Arsenal vs Chelsea 2. Ajax vs PSV</td>"),
            vec![pair("Arsenal", "Chelsea"), pair("Ajax", "PSV")]
        );
        assert_eq!(
            extract_fixtures("Inter vs Milan | Roma vs Lazio; Napoli vs Juventus"),
            vec![
                pair("Inter", "Milan"),
                pair("Roma", "Lazio"),
                pair("Napoli", "Juventus")
            ]
        );
    }

    #[test]
    fn test_extract_fixtures_skips_ambiguous_and_overlong_runs() {
        assert!(extract_fixtures("<p>Arsenal vs Chelsea Ajax vs PSV</p>").is_empty());

        let long_away = "x".repeat(80);
        assert!(extract_fixtures(&format!("<p>Arsenal vs {}</p>", long_away)).is_empty());
    }

    #[test]
    fn test_extract_fixtures_none() {
        assert!(extract_fixtures("<html><body>Booking code expired</body></html>").is_empty());
    }
}
