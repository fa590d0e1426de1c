//! Document model – the intermediate representation between layout and PDF
//! rendering. This is the "frozen" structure that encodes exactly which
//! draw instructions go on each page; rendering it twice gives the same
//! document.

use serde::{Deserialize, Serialize};

/// A complete paginated document ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Title embedded in the PDF metadata.
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of draw instructions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
}

/// A positioned draw instruction: a text block or a horizontal rule.
/// Coordinates are relative to the page top-left, in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    /// Content width for text blocks; line length for rules.
    pub width: f32,
    pub text: Option<TextContent>,
    pub rule: Option<RuleStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// Positioned lines; alignment and justification are already baked
    /// into the per-line offsets.
    pub lines: Vec<TextLine>,
    pub font_size: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub line_height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// X offset within the layout box (alignment / justification).
    pub x_offset: f32,
    /// Y offset from the top of the text block.
    pub y_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// A horizontal rule. Separator rules between row groups are drawn light.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleStyle {
    pub light: bool,
}

impl LayoutBox {
    pub fn text(x: f32, y: f32, width: f32, content: TextContent) -> Self {
        Self {
            x,
            y,
            width,
            text: Some(content),
            rule: None,
        }
    }

    pub fn rule(x: f32, y: f32, length: f32, light: bool) -> Self {
        Self {
            x,
            y,
            width: length,
            text: None,
            rule: Some(RuleStyle { light }),
        }
    }
}

impl DocumentLayout {
    /// Serialise to JSON (used by the golden/determinism tests and for
    /// debugging layout decisions).
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}
