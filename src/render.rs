//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! The layout is pure data at this point; the renderer only converts
//! top-left coordinates into PDF bottom-left space and emits draw ops.
//! Text uses the builtin Helvetica faces with WinAnsi encoding.

use printpdf::*;

use crate::document::{DocumentLayout, LayoutBox};
use crate::error::Error;

const BLACK: Rgb = Rgb {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    icc_profile: None,
};

/// Separator rules are "lightly opaque" in the source material; the builtin
/// ops carry no alpha channel, so a light gray stroke stands in.
const LIGHT_GRAY: Rgb = Rgb {
    r: 0.7,
    g: 0.7,
    b: 0.7,
    icc_profile: None,
};

/// Render a document layout into PDF bytes.
pub fn render_pdf(doc: &DocumentLayout) -> Result<Vec<u8>, Error> {
    let page_w = Mm(doc.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(doc.page_height_pt * 0.352778);

    let mut pdf = PdfDocument::new(&doc.title);

    let mut pages = Vec::new();
    for page_layout in &doc.pages {
        let mut ops = Vec::new();
        for lbox in &page_layout.boxes {
            render_box(&mut ops, lbox, doc.page_height_pt);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // The layout engine always emits at least one page; keep the guard for
    // hand-built layouts.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    pdf.with_pages(pages);
    Ok(pdf.save(&PdfSaveOptions::default(), &mut Vec::new()))
}

/// Emit the ops for one draw instruction.
fn render_box(ops: &mut Vec<Op>, lbox: &LayoutBox, page_height: f32) {
    // PDF coordinate system: origin at bottom-left. Layout uses top-left.
    let pdf_y = page_height - lbox.y;

    if let Some(rule) = &lbox.rule {
        let col = if rule.light { LIGHT_GRAY } else { BLACK };
        ops.push(Op::SetOutlineColor {
            col: Color::Rgb(col),
        });
        ops.push(Op::SetOutlineThickness { pt: Pt(1.0) });
        ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    LinePoint {
                        p: Point {
                            x: Pt(lbox.x),
                            y: Pt(pdf_y),
                        },
                        bezier: false,
                    },
                    LinePoint {
                        p: Point {
                            x: Pt(lbox.x + lbox.width),
                            y: Pt(pdf_y),
                        },
                        bezier: false,
                    },
                ],
                is_closed: false,
            },
        });
    }

    if let Some(text) = &lbox.text {
        let font = if text.bold {
            BuiltinFont::HelveticaBold
        } else {
            BuiltinFont::Helvetica
        };

        for tline in &text.lines {
            if tline.text.is_empty() {
                continue;
            }
            let text_x = lbox.x + tline.x_offset;
            // Baseline ≈ top of line + ascender (approx 0.75 × font_size)
            let ascender_offset = text.font_size * 0.75;
            let text_y = pdf_y - tline.y_offset - ascender_offset;

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(text_x),
                    y: Pt(text_y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(text.font_size),
                font,
            });
            ops.push(Op::SetLineHeight {
                lh: Pt(text.line_height),
            });
            ops.push(Op::SetFillColor {
                col: Color::Rgb(BLACK),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(&tline.text))],
                font,
            });
            ops.push(Op::EndTextSection);
        }
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF). Needed for the
/// accented Spanish labels and the clipping ellipsis.
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf
    // passes these bytes straight to the PDF stream, decoded by
    // WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageLayout;

    #[test]
    fn render_empty_document() {
        let doc = DocumentLayout {
            title: "vacío".to_string(),
            page_width_pt: 612.0,
            page_height_pt: 792.0,
            pages: vec![PageLayout {
                page_index: 0,
                boxes: Vec::new(),
            }],
        };
        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        // PDF magic number
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn winlatin_passthrough_and_remap() {
        let s = to_winlatin("Descripción…");
        let bytes = s.as_bytes();
        assert_eq!(bytes[bytes.len() - 1], 0x85);
        assert!(s.len() >= "Descripción".len());
    }
}
