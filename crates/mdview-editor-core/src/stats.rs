//! Word, line and character counts for the status bar.
//!
//! The markdown side is counted directly. The preview side is counted over
//! the visible text of the rendered HTML, the way a browser's `innerText`
//! would present it: tags dropped, entities decoded, whitespace collapsed
//! outside `<pre>`, and block elements separated by blank lines.

use std::borrow::Cow;

use serde::Serialize;

use crate::text::TextBuffer;

/// Counts shown in the editor footer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Whitespace-separated words.
    pub words: usize,
    /// `\n` count plus one, so the empty document has one line.
    pub lines: usize,
    /// Unicode scalar values.
    pub chars: usize,
}

impl DocumentStats {
    pub fn of<T: TextBuffer + ?Sized>(text: &T) -> Self {
        let contents = text.contents();
        Self {
            words: contents.split_whitespace().count(),
            lines: text.len_lines(),
            chars: text.len_chars(),
        }
    }
}

/// Counts shown for the rendered preview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PreviewStats {
    /// Unicode scalar values of the visible text.
    pub chars: usize,
    pub words: usize,
    /// Non-blank runs separated by a blank line.
    pub paragraphs: usize,
}

impl PreviewStats {
    pub fn of_html(html: &str) -> Self {
        let text = visible_text(html);
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
            paragraphs: text
                .split("\n\n")
                .filter(|para| !para.trim().is_empty())
                .count(),
        }
    }
}

/// The text a reader sees in `html`.
pub fn visible_text(html: &str) -> String {
    let mut collector = TextCollector::with_capacity(html.len());
    // Name of the script/style element whose body is being skipped.
    let mut hidden: Option<String> = None;
    let mut rest = html;

    while !rest.is_empty() {
        let Some(tail) = rest.strip_prefix('<') else {
            let end = rest.find('<').unwrap_or(rest.len());
            if hidden.is_none() {
                collector.text(&rest[..end]);
            }
            rest = &rest[end..];
            continue;
        };

        let (tag, after) = match tail.find('>') {
            Some(end) => (&tail[..end], &tail[end + 1..]),
            None => (tail, ""),
        };
        rest = after;

        let closing = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_ascii_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if let Some(skipped) = &hidden {
            if closing && *skipped == name {
                hidden = None;
            }
            continue;
        }

        match name.as_str() {
            "script" | "style" if !closing => hidden = Some(name.clone()),
            "br" => collector.line_break(),
            "td" | "th" => collector.separate(),
            "li" | "tr" | "dt" | "dd" => collector.block_break(1),
            "pre" => {
                collector.set_preformatted(!closing);
                collector.block_break(2);
            }
            name if is_block(name) => collector.block_break(2),
            _ => {}
        }
    }

    collector.finish()
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "dl"
            | "blockquote"
            | "table"
            | "hr"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "figure"
            | "details"
    )
}

struct TextCollector {
    out: String,
    pending_space: bool,
    pre_depth: usize,
}

impl TextCollector {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            pending_space: false,
            pre_depth: 0,
        }
    }

    fn text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        if self.pre_depth > 0 {
            self.out.push_str(&decoded);
            return;
        }
        for c in decoded.chars() {
            if c.is_ascii_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
                self.out.push(' ');
            }
            self.pending_space = false;
            self.out.push(c);
        }
    }

    fn separate(&mut self) {
        self.pending_space = true;
    }

    fn line_break(&mut self) {
        self.trim_spaces();
        self.out.push('\n');
    }

    /// End the current block with at least `newlines` line breaks.
    fn block_break(&mut self, newlines: usize) {
        self.trim_spaces();
        if self.out.is_empty() {
            return;
        }
        let have = self.out.len() - self.out.trim_end_matches('\n').len();
        for _ in have..newlines {
            self.out.push('\n');
        }
    }

    fn set_preformatted(&mut self, entering: bool) {
        if entering {
            self.pre_depth += 1;
        } else {
            self.pre_depth = self.pre_depth.saturating_sub(1);
        }
    }

    fn trim_spaces(&mut self) {
        self.pending_space = false;
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }

    fn finish(mut self) -> String {
        let len = self.out.trim_end().len();
        self.out.truncate(len);
        self.out
    }
}

fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| Some((end, entity_char(&tail[..end])?)));
        match decoded {
            Some((end, c)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn entity_char(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
