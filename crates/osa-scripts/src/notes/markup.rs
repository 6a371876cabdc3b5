//! Lightweight markdown to HTML conversion for note bodies.
//!
//! Each rule runs only when its [`Formatting`] flag is set. Paragraph
//! wrapping always runs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Which markdown constructs to convert.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag mirrors an independent request option"
)]
pub(super) struct Formatting {
    pub headings: bool,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub links: bool,
    pub lists: bool,
}

static HEADING_3: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^### (.+)$"));
static HEADING_2: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^## (.+)$"));
static HEADING_1: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^# (.+)$"));
static BOLD_STARS: Lazy<Regex> = Lazy::new(|| pattern(r"\*\*(.+?)\*\*"));
static BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| pattern(r"__(.+?)__"));
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| pattern(r"\*(.+?)\*"));
static ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| pattern(r"_(.+?)_"));
static UNDERLINE: Lazy<Regex> = Lazy::new(|| pattern(r"~(.+?)~"));
static LINK: Lazy<Regex> = Lazy::new(|| pattern(r"\[(.+?)\]\((.+?)\)"));
static BULLET_ITEM: Lazy<Regex> = Lazy::new(|| pattern(r"^[*-] (.+)$"));
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| pattern(r"^\d+\. (.+)$"));

#[expect(
    clippy::expect_used,
    reason = "every pattern is a literal exercised by the conversion tests"
)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("markdown pattern compiles")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    const fn open_tag(self) -> &'static str {
        match self {
            Self::Unordered => "<ul>",
            Self::Ordered => "<ol>",
        }
    }

    const fn close_tag(self) -> &'static str {
        match self {
            Self::Unordered => "</ul>",
            Self::Ordered => "</ol>",
        }
    }
}

/// Converts `content` to note HTML.
pub(super) fn to_html(content: &str, format: Formatting) -> String {
    let mut html = content.to_owned();
    if format.headings {
        html = substitute(&html, &HEADING_3, "<h3>$1</h3>");
        html = substitute(&html, &HEADING_2, "<h2>$1</h2>");
        html = substitute(&html, &HEADING_1, "<h1>$1</h1>");
    }
    if format.bold {
        html = substitute(&html, &BOLD_STARS, "<b>$1</b>");
        html = substitute(&html, &BOLD_UNDERSCORES, "<b>$1</b>");
    }
    if format.italic {
        html = substitute(&html, &ITALIC_STAR, "<i>$1</i>");
        html = substitute(&html, &ITALIC_UNDERSCORE, "<i>$1</i>");
    }
    if format.underline {
        html = substitute(&html, &UNDERLINE, "<u>$1</u>");
    }
    if format.links {
        html = substitute(&html, &LINK, r#"<a href="$2">$1</a>"#);
    }
    if format.lists {
        html = lists(&html);
    }
    paragraphs(&html)
}

fn substitute(text: &str, rule: &Regex, replacement: &str) -> String {
    rule.replace_all(text, replacement).into_owned()
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    let item = |kind, re: &Regex| {
        re.captures(line)
            .and_then(|captures| captures.get(1))
            .map(|content| (kind, content.as_str()))
    };
    item(ListKind::Unordered, &BULLET_ITEM).or_else(|| item(ListKind::Ordered, &ORDERED_ITEM))
}

fn close_list(out: &mut [String], open: Option<ListKind>) {
    if let (Some(kind), Some(last)) = (open, out.last_mut()) {
        last.push_str(kind.close_tag());
    }
}

/// Groups consecutive `- item` / `* item` lines into `<ul>` and `1. item`
/// lines into `<ol>`, each list collapsed onto one line.
fn lists(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<ListKind> = None;
    for line in text.lines() {
        match list_item(line) {
            Some((kind, content)) => {
                if open != Some(kind) {
                    close_list(&mut out, open.take());
                    out.push(kind.open_tag().to_owned());
                    open = Some(kind);
                }
                if let Some(last) = out.last_mut() {
                    last.push_str("<li>");
                    last.push_str(content);
                    last.push_str("</li>");
                }
            }
            None => {
                close_list(&mut out, open.take());
                out.push(line.to_owned());
            }
        }
    }
    close_list(&mut out, open.take());
    out.join("\n")
}

/// Wraps blank-line separated blocks in `<p>` unless they already start with
/// markup.
fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(|block| {
            let trimmed = block.trim();
            if trimmed.is_empty() || trimmed.starts_with('<') {
                block.to_owned()
            } else {
                format!("<p>{block}</p>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const ALL: Formatting = Formatting {
        headings: true,
        bold: true,
        italic: true,
        underline: true,
        links: true,
        lists: true,
    };

    #[rstest]
    #[case::plain("hello", Formatting::default(), "<p>hello</p>")]
    #[case::heading("## Plan", ALL, "<h2>Plan</h2>")]
    #[case::bold("a **b** __c__", ALL, "<p>a <b>b</b> <b>c</b></p>")]
    #[case::italic("*x* and _y_", ALL, "<p><i>x</i> and <i>y</i></p>")]
    #[case::underline("~u~", ALL, "<p><u>u</u></p>")]
    #[case::link("[site](http://x.y)", ALL, r#"<a href="http://x.y">site</a>"#)]
    #[case::disabled("**b**", Formatting::default(), "<p>**b**</p>")]
    fn converts_inline_markup(
        #[case] content: &str,
        #[case] format: Formatting,
        #[case] expected: &str,
    ) {
        assert_eq!(to_html(content, format), expected);
    }

    #[rstest]
    fn groups_consecutive_list_items() {
        let format = Formatting {
            lists: true,
            ..Formatting::default()
        };
        let html = to_html("Shopping\n- milk\n- eggs\n\n1. wake\n2. eat", format);
        assert_eq!(
            html,
            "<p>Shopping\n<ul><li>milk</li><li>eggs</li></ul></p>\n<ol><li>wake</li><li>eat</li></ol>"
        );
    }

    #[rstest]
    fn repeated_conversions_share_compiled_rules() {
        let first = to_html("# Title\n- **a**", ALL);
        let second = to_html("# Title\n- **a**", ALL);
        assert_eq!(first, "<h1>Title</h1>\n<ul><li><b>a</b></li></ul>");
        assert_eq!(first, second);
    }

    #[rstest]
    fn separates_paragraphs() {
        assert_eq!(
            to_html("one\n\ntwo", Formatting::default()),
            "<p>one</p>\n<p>two</p>"
        );
    }
}
