//! A small flexbox subset that turns a [`Node`] tree into SVG.
//!
//! Supports row and column boxes with padding, a bottom margin, `grow`,
//! main-axis justification, cross-axis alignment, a background fill and a
//! top border. Text inherits colour, size, weight and line height from its
//! ancestors and is wrapped on whitespace using the advance widths of the
//! loaded fonts.

use crate::{
    canvas::Canvas,
    fonts::{FontAssets, Weight},
};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Direction {
    #[default]
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Justify {
    #[default]
    Start,
    Center,
    SpaceBetween,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Align {
    #[default]
    Stretch,
    Center,
}

#[derive(Debug, Clone, Default)]
pub struct Style {
    pub direction: Direction,
    pub grow: f32,
    pub padding: f32,
    pub margin_bottom: f32,
    pub justify: Justify,
    pub align: Align,
    pub background: Option<&'static str>,
    /// Width and colour.
    pub border_top: Option<(f32, &'static str)>,
    pub color: Option<&'static str>,
    pub font_size: Option<f32>,
    pub weight: Option<Weight>,
    /// Multiple of the font size.
    pub line_height: Option<f32>,
    /// Maximum number of lines; the last kept line ends with an ellipsis.
    pub line_clamp: Option<usize>,
}

/// Pre-drawn vector art placed as a fixed-size box.
#[derive(Debug, Clone)]
pub struct Graphic {
    pub width: f32,
    pub height: f32,
    /// Width and height of the coordinate space `body` is drawn in.
    pub view_box: (f32, f32),
    /// SVG elements, trusted and emitted verbatim.
    pub body: &'static str,
}

#[derive(Debug, Clone)]
pub enum Content {
    Children(Vec<Node>),
    Text(String),
    Graphic(Graphic),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub style: Style,
    pub content: Content,
}

impl Node {
    pub fn container(style: Style, children: Vec<Node>) -> Node {
        Node {
            style,
            content: Content::Children(children),
        }
    }

    pub fn text(style: Style, text: impl Into<String>) -> Node {
        Node {
            style,
            content: Content::Text(text.into()),
        }
    }

    pub fn graphic(style: Style, graphic: Graphic) -> Node {
        Node {
            style,
            content: Content::Graphic(graphic),
        }
    }

    /// Every text node's content, in document order.
    #[cfg(test)]
    pub fn texts(&self) -> Vec<&str> {
        match &self.content {
            Content::Text(text) => vec![text.as_str()],
            Content::Graphic(_) => Vec::new(),
            Content::Children(children) => children.iter().flat_map(Node::texts).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    color: &'static str,
    size: f32,
    weight: Weight,
    line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: "#000",
            size: 16.0,
            weight: Weight::Regular,
            line_height: 1.2,
        }
    }
}

impl TextStyle {
    fn inherit(self, style: &Style) -> TextStyle {
        TextStyle {
            color: style.color.unwrap_or(self.color),
            size: style.font_size.unwrap_or(self.size),
            weight: style.weight.unwrap_or(self.weight),
            line_height: style.line_height.unwrap_or(self.line_height),
        }
    }

    fn line_px(&self) -> f32 {
        self.size * self.line_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Size {
    w: f32,
    h: f32,
}

const ELLIPSIS: char = '\u{2026}';

/// Escapes text for use in SVG character data and attribute values.
///
/// Characters XML 1.0 forbids are dropped.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(' '),
            ch if ch.is_control() || ch == '\u{fffe}' || ch == '\u{ffff}' => {}
            ch => out.push(ch),
        }
    }
    out
}

struct Layout<'a> {
    fonts: &'a FontAssets,
    svg: String,
}

/// Lays out `root` over the whole canvas and serializes the result.
pub fn to_svg(root: &Node, fonts: &FontAssets, canvas: Canvas) -> anyhow::Result<String> {
    let (w, h) = (canvas.width as f32, canvas.height as f32);

    let mut layout = Layout {
        fonts,
        svg: String::with_capacity(4096),
    };

    write!(
        layout.svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        canvas.width, canvas.height, canvas.width, canvas.height
    )?;
    layout.place(root, Rect { x: 0.0, y: 0.0, w, h }, TextStyle::default())?;
    layout.svg.push_str("</svg>");

    Ok(layout.svg)
}

impl Layout<'_> {
    fn wrap(
        &self,
        text: &str,
        max_width: f32,
        style: &TextStyle,
        clamp: Option<usize>,
    ) -> Vec<String> {
        let measure = |s: &str| self.fonts.measure(s, style.size, style.weight);
        let mut lines = Vec::new();
        let mut line = String::new();

        for word in text.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };

            if measure(&candidate) <= max_width {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            // Break words that do not fit on a line of their own.
            for ch in word.chars() {
                line.push(ch);
                if line.chars().count() > 1 && measure(&line) > max_width {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, ch.to_string()));
                }
            }
        }

        if !line.is_empty() {
            lines.push(line);
        }

        if let Some(clamp) = clamp {
            if lines.len() > clamp {
                lines.truncate(clamp);
                if let Some(last) = lines.last_mut() {
                    loop {
                        let candidate = format!("{}{ELLIPSIS}", last.trim_end());
                        if last.is_empty() || measure(&candidate) <= max_width {
                            *last = candidate;
                            break;
                        }
                        last.pop();
                    }
                }
            }
        }

        lines
    }

    fn measure(&self, node: &Node, max_width: f32, inherited: TextStyle) -> Size {
        let style = &node.style;
        let text_style = inherited.inherit(style);
        let border = style.border_top.map_or(0.0, |(width, _)| width);
        let inset = style.padding * 2.0;
        let inner_width = (max_width - inset).max(0.0);

        let inner = match &node.content {
            Content::Text(text) => {
                let lines = self.wrap(text, inner_width, &text_style, style.line_clamp);
                let mut widest = 0.0f32;
                for line in &lines {
                    let width = self.fonts.measure(line, text_style.size, text_style.weight);
                    widest = widest.max(width);
                }
                Size {
                    w: widest,
                    h: lines.len() as f32 * text_style.line_px(),
                }
            }
            Content::Graphic(graphic) => Size {
                w: graphic.width,
                h: graphic.height,
            },
            Content::Children(children) => match style.direction {
                Direction::Column => {
                    let mut size = Size { w: 0.0, h: 0.0 };
                    for child in children {
                        let child_size = self.measure(child, inner_width, text_style);
                        size.w = size.w.max(child_size.w);
                        size.h += child_size.h + child.style.margin_bottom;
                    }
                    size
                }
                Direction::Row => {
                    let mut size = Size { w: 0.0, h: 0.0 };
                    for child in children {
                        let remaining = (inner_width - size.w).max(0.0);
                        let child_size = self.measure(child, remaining, text_style);
                        size.w += child_size.w;
                        size.h = size.h.max(child_size.h + child.style.margin_bottom);
                    }
                    size
                }
            },
        };

        Size {
            w: inner.w + inset,
            h: inner.h + inset + border,
        }
    }

    fn place(&mut self, node: &Node, rect: Rect, inherited: TextStyle) -> anyhow::Result<()> {
        let style = &node.style;
        let text_style = inherited.inherit(style);

        if let Some(fill) = style.background {
            write!(
                self.svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"/>"#,
                rect.x, rect.y, rect.w, rect.h
            )?;
        }

        let mut inner = rect;
        if let Some((width, color)) = style.border_top {
            write!(
                self.svg,
                r#"<rect x="{}" y="{}" width="{}" height="{width}" fill="{color}"/>"#,
                rect.x, rect.y, rect.w
            )?;
            inner.y += width;
            inner.h -= width;
        }

        inner.x += style.padding;
        inner.y += style.padding;
        inner.w = (inner.w - style.padding * 2.0).max(0.0);
        inner.h = (inner.h - style.padding * 2.0).max(0.0);

        match &node.content {
            Content::Text(text) => self.place_text(text, inner, &text_style, style.line_clamp),
            Content::Graphic(graphic) => self.place_graphic(graphic, inner),
            Content::Children(children) => self.place_children(style, children, inner, text_style),
        }
    }

    fn place_children(
        &mut self,
        style: &Style,
        children: &[Node],
        inner: Rect,
        text_style: TextStyle,
    ) -> anyhow::Result<()> {
        let column = style.direction == Direction::Column;
        let main_extent = if column { inner.h } else { inner.w };
        let cross_extent = if column { inner.w } else { inner.h };

        let mut sizes = Vec::with_capacity(children.len());
        let mut used = 0.0;
        for child in children {
            let max_width = if column { inner.w } else { (inner.w - used).max(0.0) };
            let size = self.measure(child, max_width, text_style);
            used += if column {
                size.h + child.style.margin_bottom
            } else {
                size.w
            };
            sizes.push(size);
        }

        let mut free = (main_extent - used).max(0.0);
        let total_grow = children.iter().map(|child| child.style.grow).sum::<f32>();
        let mut grown = vec![0.0; children.len()];
        if total_grow > 0.0 {
            for (extra, child) in grown.iter_mut().zip(children) {
                *extra = free * child.style.grow / total_grow;
            }
            free = 0.0;
        }

        let (mut cursor, gap) = match style.justify {
            Justify::Start => (0.0, 0.0),
            Justify::Center => (free / 2.0, 0.0),
            Justify::SpaceBetween if children.len() > 1 => {
                (0.0, free / (children.len() - 1) as f32)
            }
            Justify::SpaceBetween => (0.0, 0.0),
        };

        for ((child, size), extra) in children.iter().zip(&sizes).zip(&grown) {
            let (main_size, cross_size) = if column {
                (size.h + extra, size.w)
            } else {
                (size.w + extra, size.h)
            };

            let cross_size = match style.align {
                Align::Stretch => cross_extent,
                Align::Center => cross_size.min(cross_extent),
            };
            let cross_offset = match style.align {
                Align::Center => (cross_extent - cross_size) / 2.0,
                Align::Stretch => 0.0,
            };

            let rect = if column {
                Rect {
                    x: inner.x + cross_offset,
                    y: inner.y + cursor,
                    w: cross_size,
                    h: main_size,
                }
            } else {
                Rect {
                    x: inner.x + cursor,
                    y: inner.y + cross_offset,
                    w: main_size,
                    h: cross_size,
                }
            };

            self.place(child, rect, text_style)?;

            cursor += main_size + gap;
            if column {
                cursor += child.style.margin_bottom;
            }
        }

        Ok(())
    }

    /// Scales the graphic uniformly to fit `rect`, centred, like an SVG
    /// viewBox with the default `xMidYMid meet`.
    fn place_graphic(&mut self, graphic: &Graphic, rect: Rect) -> anyhow::Result<()> {
        let (view_w, view_h) = graphic.view_box;
        let scale = (rect.w / view_w).min(rect.h / view_h);
        let x = rect.x + (rect.w - view_w * scale) / 2.0;
        let y = rect.y + (rect.h - view_h * scale) / 2.0;

        write!(
            self.svg,
            r#"<g transform="translate({x} {y}) scale({scale})">{}</g>"#,
            graphic.body
        )?;

        Ok(())
    }

    fn place_text(
        &mut self,
        text: &str,
        rect: Rect,
        style: &TextStyle,
        clamp: Option<usize>,
    ) -> anyhow::Result<()> {
        let lines = self.wrap(text, rect.w, style, clamp);
        let (ascender, descender) = self.fonts.vertical_metrics(style.weight);
        let line_px = style.line_px();
        let half_leading = (line_px - (ascender - descender) * style.size) / 2.0;
        let family = escape_xml(self.fonts.family(style.weight));

        for (index, line) in lines.iter().enumerate() {
            let baseline = rect.y + index as f32 * line_px + half_leading + ascender * style.size;
            write!(
                self.svg,
                r#"<text x="{}" y="{baseline}" font-family="'{family}'" font-size="{}" font-weight="{}" fill="{}" xml:space="preserve">{}</text>"#,
                rect.x,
                style.size,
                style.weight.css(),
                style.color,
                escape_xml(line)
            )?;
        }

        Ok(())
    }
}
