//! Markdown to display blocks
//!
//! Chapter bodies are markdown. The reader screen draws them as a flat list
//! of blocks; inline emphasis is dropped and inline code keeps its backticks.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// One displayable block of a chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// A heading (level 1-6)
    Heading { level: u8, text: String },
    Paragraph(String),
    /// A fenced or indented code block
    Code { language: Option<String>, code: String },
    List { ordered: bool, items: Vec<String> },
    Quote(String),
    Rule,
}

/// Where inline text currently goes
#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<ContentBlock>,
    text: String,
    heading: Option<u8>,
    code: Option<(Option<String>, String)>,
    list: Option<(bool, Vec<String>)>,
    item: String,
    quote: Option<String>,
}

impl BlockBuilder {
    fn push_text(&mut self, s: &str) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(s);
        } else if self.list.is_some() {
            self.item.push_str(s);
        } else if let Some(quote) = self.quote.as_mut() {
            quote.push_str(s);
        } else {
            self.text.push_str(s);
        }
    }

    fn flush_paragraph(&mut self) {
        let text = std::mem::take(&mut self.text);
        let text = text.trim();
        if !text.is_empty() {
            self.blocks.push(ContentBlock::Paragraph(text.to_string()));
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parse a chapter body into display blocks
pub fn parse_blocks(markdown: &str) -> Vec<ContentBlock> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut b = BlockBuilder::default();

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                b.flush_paragraph();
                b.heading = Some(heading_level(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(level) = b.heading.take() {
                    let text = std::mem::take(&mut b.text).trim().to_string();
                    if !text.is_empty() {
                        b.blocks.push(ContentBlock::Heading { level, text });
                    }
                }
            }

            Event::End(TagEnd::Paragraph) => {
                if let Some(quote) = b.quote.as_mut() {
                    quote.push('\n');
                } else if b.list.is_none() {
                    b.flush_paragraph();
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                b.flush_paragraph();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                b.code = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, code)) = b.code.take() {
                    b.blocks.push(ContentBlock::Code { language, code: code.trim_end().to_string() });
                }
            }

            Event::Start(Tag::List(first)) => {
                b.flush_paragraph();
                b.list = Some((first.is_some(), Vec::new()));
            }
            Event::End(TagEnd::List(_)) => {
                if let Some((ordered, items)) = b.list.take() {
                    if !items.is_empty() {
                        b.blocks.push(ContentBlock::List { ordered, items });
                    }
                }
            }
            Event::Start(Tag::Item) => b.item.clear(),
            Event::End(TagEnd::Item) => {
                let item = std::mem::take(&mut b.item).trim().to_string();
                if let (Some((_, items)), false) = (b.list.as_mut(), item.is_empty()) {
                    items.push(item);
                }
            }
            Event::TaskListMarker(done) => b.push_text(if done { "[x] " } else { "[ ] " }),

            Event::Start(Tag::BlockQuote(_)) => {
                b.flush_paragraph();
                b.quote = Some(String::new());
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                if let Some(quote) = b.quote.take() {
                    let quote = quote.trim();
                    if !quote.is_empty() {
                        b.blocks.push(ContentBlock::Quote(quote.to_string()));
                    }
                }
            }

            Event::Rule => {
                b.flush_paragraph();
                b.blocks.push(ContentBlock::Rule);
            }

            Event::Text(text) => b.push_text(&text),
            Event::Code(code) => b.push_text(&format!("`{}`", code)),
            Event::SoftBreak | Event::HardBreak => {
                let sep = if b.code.is_some() || b.quote.is_some() { "\n" } else { " " };
                b.push_text(sep);
            }

            // Emphasis, links and raw HTML carry no block structure
            _ => {}
        }
    }

    b.flush_paragraph();
    b.blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn template_chapter_blocks() {
        let md = "# Intro\n\nWelcome to **Rust**.\n\n## Goals\n- Learn `match`\n- Practice\n\n1. One\n2. Two";
        assert_eq!(
            parse_blocks(md),
            vec![
                ContentBlock::Heading { level: 1, text: "Intro".into() },
                ContentBlock::Paragraph("Welcome to Rust.".into()),
                ContentBlock::Heading { level: 2, text: "Goals".into() },
                ContentBlock::List { ordered: false, items: vec!["Learn `match`".into(), "Practice".into()] },
                ContentBlock::List { ordered: true, items: vec!["One".into(), "Two".into()] },
            ]
        );
    }

    #[test]
    fn code_quote_and_rule() {
        let md = "```rust\nfn main() {}\n```\n\n> Borrow\n> checker\n\n---\n\nafter";
        assert_eq!(
            parse_blocks(md),
            vec![
                ContentBlock::Code { language: Some("rust".into()), code: "fn main() {}".into() },
                ContentBlock::Quote("Borrow\nchecker".into()),
                ContentBlock::Rule,
                ContentBlock::Paragraph("after".into()),
            ]
        );
    }

    #[test]
    fn soft_breaks_join_paragraph_lines() {
        assert_eq!(parse_blocks("one\ntwo"), vec![ContentBlock::Paragraph("one two".into())]);
    }
}
