//! Render Tree
//!
//! A resolved visual tree: every node already carries its source-pixel box
//! and visibility, so pagination never needs a layout engine.

use super::geometry::Rect;

// == Color ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color as PDF `rg` operands in `0.0..=1.0`.
    pub fn unit(&self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

// == Nodes ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Takes up space but paints nothing; children may still show
    Hidden,
    /// Removed from rendering together with its subtree
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Block { background: Option<Color> },
    Text {
        content: String,
        /// CSS pixels
        font_size: f64,
        color: Color,
    },
    Link { href: String },
    Script,
    Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub kind: NodeKind,
    pub rect: Rect,
    pub visibility: Visibility,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(kind: NodeKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            visibility: Visibility::Visible,
            children: Vec::new(),
        }
    }

    pub fn block(rect: Rect, background: Option<Color>) -> Self {
        Self::new(NodeKind::Block { background }, rect)
    }

    pub fn text(rect: Rect, content: impl Into<String>, font_size: f64, color: Color) -> Self {
        Self::new(
            NodeKind::Text {
                content: content.into(),
                font_size,
                color,
            },
            rect,
        )
    }

    pub fn link(rect: Rect, href: impl Into<String>) -> Self {
        Self::new(NodeKind::Link { href: href.into() }, rect)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: RenderNode) {
        self.children.push(child);
    }

    /// Script and style nodes never render and are never descended into.
    fn is_inert(&self) -> bool {
        matches!(self.kind, NodeKind::Script | NodeKind::Style)
    }

    // == Traversal ==
    /// Every text run that would be painted, in document order.
    pub fn visible_text(&self) -> Vec<TextSpan<'_>> {
        let mut spans = Vec::new();
        self.collect_text(&mut spans);
        spans
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<TextSpan<'a>>) {
        if self.is_inert() || self.visibility == Visibility::None {
            return;
        }
        if let NodeKind::Text {
            content, font_size, ..
        } = &self.kind
        {
            let text = content.trim();
            if self.visibility == Visibility::Visible
                && *font_size > 0.0
                && !self.rect.is_empty()
                && !text.is_empty()
            {
                out.push(TextSpan {
                    text,
                    rect: self.rect,
                    font_size: *font_size,
                });
            }
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Every link with an absolute web target, in document order.
    pub fn web_links(&self) -> Vec<LinkSpan<'_>> {
        let mut links = Vec::new();
        self.collect_links(&mut links);
        links
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<LinkSpan<'a>>) {
        if self.is_inert() || self.visibility == Visibility::None {
            return;
        }
        if let NodeKind::Link { href } = &self.kind {
            if self.visibility == Visibility::Visible && !self.rect.is_empty() && is_web_url(href)
            {
                out.push(LinkSpan {
                    href: href.trim(),
                    rect: self.rect,
                });
            }
        }
        for child in &self.children {
            child.collect_links(out);
        }
    }
}

/// A paintable text run found in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSpan<'a> {
    pub text: &'a str,
    pub rect: Rect,
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkSpan<'a> {
    pub href: &'a str,
    pub rect: Rect,
}

/// True for absolute `http://` and `https://` URLs.
pub fn is_web_url(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::rgb(255, 255, 255);

    fn line(y: f64, text: &str) -> RenderNode {
        RenderNode::text(Rect::new(0.0, y, 100.0, 20.0), text, 16.0, WHITE)
    }

    #[test]
    fn test_hidden_text_skipped_but_children_kept() {
        let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, 400.0), None)
            .with_child(line(0.0, "shown"))
            .with_child(
                line(20.0, "hidden")
                    .with_visibility(Visibility::Hidden)
                    .with_child(line(40.0, "nested")),
            )
            .with_child(
                RenderNode::block(Rect::new(0.0, 60.0, 600.0, 40.0), None)
                    .with_visibility(Visibility::None)
                    .with_child(line(60.0, "gone")),
            );

        let texts: Vec<&str> = root.visible_text().iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["shown", "nested"]);
    }

    #[test]
    fn test_script_style_and_degenerate_text_skipped() {
        let mut script = RenderNode::new(NodeKind::Script, Rect::new(0.0, 0.0, 10.0, 10.0));
        script.push(line(0.0, "var x"));
        let mut style = RenderNode::new(NodeKind::Style, Rect::new(0.0, 0.0, 10.0, 10.0));
        style.push(line(0.0, ".a {}"));

        let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, 400.0), None)
            .with_child(script)
            .with_child(style)
            .with_child(RenderNode::text(
                Rect::new(0.0, 0.0, 100.0, 20.0),
                "tiny",
                0.0,
                WHITE,
            ))
            .with_child(RenderNode::text(
                Rect::new(0.0, 0.0, 0.0, 20.0),
                "flat",
                12.0,
                WHITE,
            ))
            .with_child(line(0.0, "   "))
            .with_child(line(0.0, "  padded  "));

        let texts: Vec<&str> = root.visible_text().iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["padded"]);
    }

    #[test]
    fn test_only_web_links_collected() {
        let rect = Rect::new(0.0, 0.0, 50.0, 10.0);
        let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, 400.0), None)
            .with_child(RenderNode::link(rect, "https://example.com"))
            .with_child(RenderNode::link(rect, "HTTP://EXAMPLE.ORG"))
            .with_child(RenderNode::link(rect, "mailto:someone@example.com"))
            .with_child(RenderNode::link(rect, "/relative/path"))
            .with_child(RenderNode::link(rect, "httpfoo"))
            .with_child(
                RenderNode::link(rect, "https://hidden.example").with_visibility(Visibility::None),
            );

        let hrefs: Vec<&str> = root.web_links().iter().map(|l| l.href).collect();
        assert_eq!(hrefs, vec!["https://example.com", "HTTP://EXAMPLE.ORG"]);
    }

    #[test]
    fn test_color_unit() {
        assert_eq!(Color::rgb(255, 0, 0).unit(), [1.0, 0.0, 0.0]);
    }
}
