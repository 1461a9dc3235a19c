//! Chapter generation for a subtopic
//!
//! Every subtopic is read as a short sequence of chapters. Until the backend
//! has produced content, a fixed four-chapter template is shown; generated
//! content is then laid over that template.

use crate::api::{ChapterPayload, ResourceContent};
use crate::model::duration;

/// Text shorter than this is never split into sections
const MIN_SPLIT_LEN: usize = 100;

/// Sections with this many non-blank characters or fewer are dropped
const MIN_SECTION_LEN: usize = 50;

const PLACEHOLDER: &str = "Content is being generated...";

/// Role of a chapter in the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterKind {
    Introduction,
    Concepts,
    Practical,
    Summary,
    /// Backend-defined kind
    Other(String),
}

impl ChapterKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "introduction" => Self::Introduction,
            "concepts" => Self::Concepts,
            "practical" => Self::Practical,
            "summary" => Self::Summary,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Introduction => "introduction",
            Self::Concepts => "concepts",
            Self::Practical => "practical",
            Self::Summary => "summary",
            Self::Other(s) => s,
        }
    }
}

/// One readable chapter
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub title: String,
    /// Estimated reading time in minutes
    pub duration: u32,
    pub kind: ChapterKind,
    /// Markdown body
    pub content: String,
}

/// What a chapter sequence is generated for
#[derive(Debug, Clone, Copy)]
pub struct ChapterContext<'a> {
    pub subtopic: &'a str,
    /// Effort label of the subtopic, e.g. "2 hours"
    pub time: &'a str,
    /// Course (topic) name
    pub course: &'a str,
}

impl ChapterContext<'_> {
    fn minutes(&self) -> f64 {
        duration::minutes(self.time)
    }
}

fn ceil_minutes(minutes: f64) -> u32 {
    if minutes.is_finite() && minutes > 0.0 { minutes.ceil() as u32 } else { 0 }
}

/// The four template chapters, budgeted 20/40/30/10 percent of the
/// subtopic's minutes
pub fn template_chapters(ctx: &ChapterContext<'_>) -> Vec<Chapter> {
    let minutes = ctx.minutes();
    let (subtopic, course) = (ctx.subtopic, ctx.course);
    vec![
        Chapter {
            title: format!("Introduction to {}", subtopic),
            duration: ceil_minutes(minutes * 0.2),
            kind: ChapterKind::Introduction,
            content: format!(
                "# Introduction to {subtopic}\n\n\
                 Welcome! This chapter gives an overview of {subtopic} and why it matters in {course}.\n\n\
                 ## What You'll Learn\n\
                 - Core concepts and fundamentals\n\
                 - Real-world applications\n\
                 - Key terminology and definitions\n\
                 - How {subtopic} fits into the broader {course} landscape\n\n\
                 ## Getting Started\n\
                 Start with the basics and build a solid foundation."
            ),
        },
        Chapter {
            title: format!("Core Concepts of {}", subtopic),
            duration: ceil_minutes(minutes * 0.4),
            kind: ChapterKind::Concepts,
            content: format!(
                "# Core Concepts of {subtopic}\n\n\
                 The fundamental ideas behind {subtopic}.\n\n\
                 ## Key Learning Objectives\n\
                 - Master the essential principles\n\
                 - Understand underlying mechanisms\n\
                 - Learn important terminology\n\
                 - Grasp the theoretical foundations"
            ),
        },
        Chapter {
            title: "Practical Applications & Examples".to_string(),
            duration: ceil_minutes(minutes * 0.3),
            kind: ChapterKind::Practical,
            content: format!(
                "# Practical Applications & Examples\n\n\
                 {subtopic} in action.\n\n\
                 ## What We'll Cover\n\
                 - Real-world use cases and scenarios\n\
                 - Step-by-step practical examples\n\
                 - Hands-on exercises you can try\n\
                 - Common patterns"
            ),
        },
        Chapter {
            title: "Summary & Next Steps".to_string(),
            duration: ceil_minutes(minutes * 0.1),
            kind: ChapterKind::Summary,
            content: format!(
                "# Summary & Next Steps\n\n\
                 You have worked through {subtopic}.\n\n\
                 ## Next Steps\n\
                 1. Practice what you've learned\n\
                 2. Explore related topics in {course}\n\
                 3. Apply these concepts in real projects\n\
                 4. Take the quiz for this subtopic"
            ),
        },
    ]
}

/// Build the chapter list for a subtopic from whatever the backend returned
pub fn generate_chapters(ctx: &ChapterContext<'_>, content: Option<&ResourceContent>) -> Vec<Chapter> {
    let base = template_chapters(ctx);
    match content {
        None => base,
        Some(ResourceContent::Structured { chapters }) if !chapters.is_empty() => {
            overlay(&base, chapters)
        }
        Some(ResourceContent::Structured { .. }) => base,
        Some(ResourceContent::Document { content }) | Some(ResourceContent::Text(content)) => {
            from_text(ctx, base, content)
        }
    }
}

/// Backend chapters, with missing fields taken from the template chapter at
/// the same position (or the last one)
fn overlay(base: &[Chapter], chapters: &[ChapterPayload]) -> Vec<Chapter> {
    chapters
        .iter()
        .enumerate()
        .filter_map(|(i, payload)| {
            let template = base.get(i).or_else(|| base.last())?;
            Some(Chapter {
                title: payload.title.clone().unwrap_or_else(|| template.title.clone()),
                duration: payload.duration.unwrap_or(template.duration),
                kind: payload.kind.as_deref().map_or_else(|| template.kind.clone(), ChapterKind::parse),
                content: payload.content.clone().unwrap_or_else(|| template.content.clone()),
            })
        })
        .collect()
}

fn from_text(ctx: &ChapterContext<'_>, base: Vec<Chapter>, text: &str) -> Vec<Chapter> {
    if text.chars().count() > MIN_SPLIT_LEN {
        let sections: Vec<&str> = split_sections(text)
            .into_iter()
            .filter(|s| s.trim().chars().count() > MIN_SECTION_LEN)
            .collect();

        if sections.len() >= 2 {
            let duration = ceil_minutes(ctx.minutes() / sections.len() as f64);
            return sections
                .iter()
                .enumerate()
                .map(|(i, section)| {
                    let heading =
                        section.lines().next().unwrap_or_default().trim_start_matches('#').trim();
                    let title = if !heading.is_empty() {
                        heading.to_string()
                    } else {
                        base.get(i).map_or_else(|| format!("Chapter {}", i + 1), |c| c.title.clone())
                    };
                    let kind =
                        base.get(i).map_or_else(|| ChapterKind::Other("content".into()), |c| c.kind.clone());
                    Chapter { title, duration, kind, content: section.trim().to_string() }
                })
                .collect();
        }
    }

    chunk_into(base, text)
}

/// Split markdown before every line that starts with `#`. Text before the
/// first heading forms its own section.
fn split_sections(text: &str) -> Vec<&str> {
    let mut starts = vec![0];
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if offset > 0 && line.starts_with('#') {
            starts.push(offset);
        }
        offset += line.len();
    }
    starts.push(text.len());
    starts.windows(2).map(|w| &text[w[0]..w[1]]).filter(|s| !s.is_empty()).collect()
}

/// Spread `text` evenly over the template chapters
fn chunk_into(base: Vec<Chapter>, text: &str) -> Vec<Chapter> {
    let chars: Vec<char> = text.chars().collect();
    let chunk_size = chars.len().div_ceil(base.len().max(1));

    base.into_iter()
        .enumerate()
        .map(|(i, mut chapter)| {
            let chunk: String = if chunk_size == 0 {
                String::new()
            } else {
                chars.chunks(chunk_size).nth(i).map(|c| c.iter().collect()).unwrap_or_default()
            };
            let extra = if chunk.is_empty() { PLACEHOLDER } else { chunk.as_str() };
            chapter.content = format!("{}\n\n{}", chapter.content, extra);
            chapter
        })
        .collect()
}
