//! Template parsing.
//!
//! A template is plain text with inline gap specifiers such as
//! `x = {[4-10]}` or `{[20,2-4]}`. Parsing renders each specifier as filler
//! cells and records the gap's origin in the rendered text, so the rendered
//! text and the registry come out of one pass with their coordinates in
//! lockstep.
//!
//! Specifier body: `width ["-" [max]] ["," height ["-" max]]`. A missing
//! maximum width (or a bare trailing `-`) means unbounded; a missing maximum
//! height equals the minimum; no height clause means a single-line gap.
//!
//! A backslash directly in front of either delimiter writes the delimiter
//! literally. [`escape`] produces that form.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TemplateConfig;
use crate::error::TemplateError;
use crate::gap::{GapSpec, MAX_EXTENT, SpecFault};
use crate::registry::GapRegistry;
use crate::types::Position;

static BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+)\s*(?:-\s*([0-9]*)\s*)?(?:,\s*([0-9]+)\s*(?:-\s*([0-9]+)\s*)?)?$")
        .expect("gap body pattern is valid")
});

const ESCAPE: char = '\\';

/// Rendered document text plus the gaps carved out of it.
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub text: String,
    pub registry: GapRegistry,
}

struct LineGap {
    spec: GapSpec,
    col: u32,
    template_col: usize,
}

struct RenderedLine {
    text: String,
    gaps: Vec<LineGap>,
}

/// Parses `source`, failing on the first bad specifier. No registry is
/// produced unless the whole template is valid.
pub fn parse(source: &str, config: &TemplateConfig) -> Result<ParsedTemplate, TemplateError> {
    let mut lines: Vec<String> = Vec::new();
    let mut gaps: Vec<(GapSpec, Position)> = Vec::new();

    for (idx, raw) in source.split('\n').enumerate() {
        let line_no = idx + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let rendered = render_line(line, line_no, config)?;

        if rendered.gaps.len() > 1
            && let Some(shared) = rendered.gaps.iter().find(|g| g.spec.is_multi_line())
        {
            return Err(TemplateError::SharedMultiLine {
                line: line_no,
                column: shared.template_col,
            });
        }

        let row = lines.len() as u32;
        let mut extra_rows = Vec::new();
        for gap in &rendered.gaps {
            gaps.push((gap.spec, Position { row, col: gap.col }));
            for _ in 1..gap.spec.min_height {
                let mut synthetic = " ".repeat(gap.col as usize);
                synthetic.extend(std::iter::repeat_n(config.filler, gap.spec.min_width as usize));
                extra_rows.push(synthetic);
            }
        }
        lines.push(rendered.text);
        lines.extend(extra_rows);
    }

    let registry = GapRegistry::from_checked(gaps);
    debug!(target: "gaps.template", gaps = registry.len(), rows = lines.len(), "template_parsed");
    Ok(ParsedTemplate {
        text: lines.join("\n"),
        registry,
    })
}

fn render_line(
    line: &str,
    line_no: usize,
    config: &TemplateConfig,
) -> Result<RenderedLine, TemplateError> {
    let open = config.open.as_str();
    let close = config.close.as_str();
    let mut out = RenderedLine {
        text: String::with_capacity(line.len()),
        gaps: Vec::new(),
    };
    let mut col: u32 = 0;
    let mut literal_start = 0;
    let mut i = 0;

    while i < line.len() {
        let tail = &line[i..];
        if let Some(after) = tail.strip_prefix(ESCAPE)
            && let Some(delim) = [open, close].into_iter().find(|d| after.starts_with(d))
        {
            push_literal(&mut out, &mut col, &line[literal_start..i]);
            push_literal(&mut out, &mut col, delim);
            i += ESCAPE.len_utf8() + delim.len();
            literal_start = i;
            continue;
        }
        if tail.starts_with(open) {
            push_literal(&mut out, &mut col, &line[literal_start..i]);
            let column = line[..i].chars().count() + 1;
            let body_start = i + open.len();
            let Some(body_len) = line[body_start..].find(close) else {
                return Err(TemplateError::Unterminated {
                    line: line_no,
                    column,
                });
            };
            let spec = parse_body(&line[body_start..body_start + body_len], line_no, column)?;
            out.gaps.push(LineGap {
                spec,
                col,
                template_col: column,
            });
            out.text
                .extend(std::iter::repeat_n(config.filler, spec.min_width as usize));
            col += spec.min_width;
            i = body_start + body_len + close.len();
            literal_start = i;
            continue;
        }
        i += tail.chars().next().map_or(1, char::len_utf8);
    }
    push_literal(&mut out, &mut col, &line[literal_start..]);
    Ok(out)
}

fn push_literal(out: &mut RenderedLine, col: &mut u32, s: &str) {
    out.text.push_str(s);
    *col += s.graphemes(true).count() as u32;
}

fn parse_body(body: &str, line: usize, column: usize) -> Result<GapSpec, TemplateError> {
    let malformed = || TemplateError::Malformed {
        line,
        column,
        body: body.to_string(),
    };
    let caps = BODY.captures(body).ok_or_else(malformed)?;
    let number = |group: usize| -> Result<Option<u32>, TemplateError> {
        match caps.get(group).map(|m| m.as_str()) {
            None | Some("") => Ok(None),
            Some(digits) => digits.parse::<u32>().map(Some).map_err(|_| malformed()),
        }
    };

    let min_width = number(1)?.ok_or_else(malformed)?;
    let max_width = number(2)?;
    let (min_height, max_height) = match number(3)? {
        Some(min) => (min, number(4)?.unwrap_or(min)),
        None => (1, 1),
    };

    let spec = GapSpec {
        min_width,
        max_width,
        min_height,
        max_height,
    };
    spec.check().map_err(|fault| match fault {
        SpecFault::TooLarge { dimension, value } => TemplateError::TooLarge {
            line,
            column,
            dimension,
            value,
            limit: MAX_EXTENT,
        },
        SpecFault::InvertedBounds { dimension, min, max } => TemplateError::InvertedBounds {
            line,
            column,
            dimension,
            min,
            max,
        },
        SpecFault::ZeroHeight => TemplateError::ZeroHeight { line, column },
    })?;
    Ok(spec)
}

/// Escapes every delimiter in `text` so [`parse`] reproduces it literally.
pub fn escape(text: &str, config: &TemplateConfig) -> String {
    let delims = [config.open.as_str(), config.close.as_str()];
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        let tail = &text[i..];
        if let Some(delim) = delims.into_iter().find(|d| tail.starts_with(d)) {
            out.push(ESCAPE);
            out.push_str(delim);
            i += delim.len();
            continue;
        }
        if let Some(c) = tail.chars().next() {
            out.push(c);
            i += c.len_utf8();
        }
    }
    out
}
