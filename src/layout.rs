//! Layout engine – turns an ordered product list into a paginated
//! [`DocumentLayout`].
//!
//! Both rendering modes share the same primitives: a per-call
//! [`LayoutContext`] holding the vertical cursor and the page under
//! construction, the page-break decision, and the fallback substitution on
//! [`Product`]. Only the per-item drawing template differs.
//!
//! All coordinates are top-left based; the renderer flips them into PDF
//! space.

use chrono::{DateTime, Utc};

use crate::document::{DocumentLayout, LayoutBox, PageLayout, TextAlign, TextContent, TextLine};
use crate::error::Error;
use crate::pipeline::Control;
use crate::product::Product;
use crate::text;

/// Page geometry: US Letter.
pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
/// Margin of the drawable area; also the top-of-page cursor position.
pub const PAGE_MARGIN_PT: f32 = 50.0;
/// A new page starts when the cursor has moved past this y coordinate.
pub const PAGE_BREAK_Y_PT: f32 = 700.0;
/// Fixed height of one summary table row.
pub const ROW_HEIGHT_PT: f32 = 20.0;
/// Right edge of the summary table rules.
pub const TABLE_RIGHT_PT: f32 = 550.0;
/// A light separator rule is drawn after this many rows.
pub const SEPARATOR_EVERY: usize = 5;

const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 12.0;
const HEADER_SIZE: f32 = 10.0;
const ROW_SIZE: f32 = 9.0;
const DETAIL_TITLE_SIZE: f32 = 18.0;
/// Width of the justified description block on detailed pages.
const DESCRIPTION_WIDTH_PT: f32 = 500.0;

const LINE_FACTOR: f32 = 1.2;

/// Summary table columns: header label, x offset from the left margin, width.
const COLUMNS: [(&str, f32, f32); 5] = [
    ("ID", 0.0, 40.0),
    ("NOMBRE", 45.0, 120.0),
    ("DESCRIPCIÓN", 170.0, 150.0),
    ("PRECIO", 325.0, 80.0),
    ("IMAGEN", 410.0, 100.0),
];

fn line_height(font_size: f32) -> f32 {
    font_size * LINE_FACTOR
}

fn content_width() -> f32 {
    PAGE_WIDTH_PT - 2.0 * PAGE_MARGIN_PT
}

/// Per-call layout state. Created fresh for every generation, owned by the
/// call, consumed by [`finish`](Self::finish) — concurrent generations
/// never share a context.
struct LayoutContext {
    doc: DocumentLayout,
    page: PageLayout,
    cursor_y: f32,
}

impl LayoutContext {
    fn new(title: &str) -> Self {
        Self {
            doc: DocumentLayout {
                title: title.to_string(),
                page_width_pt: PAGE_WIDTH_PT,
                page_height_pt: PAGE_HEIGHT_PT,
                pages: Vec::new(),
            },
            page: PageLayout {
                page_index: 0,
                boxes: Vec::new(),
            },
            cursor_y: PAGE_MARGIN_PT,
        }
    }

    fn push(&mut self, lbox: LayoutBox) {
        self.page.boxes.push(lbox);
    }

    /// Close the current page and reset the cursor to the top margin.
    fn break_page(&mut self) {
        let next_index = self.page.page_index + 1;
        let full = std::mem::replace(
            &mut self.page,
            PageLayout {
                page_index: next_index,
                boxes: Vec::new(),
            },
        );
        self.doc.pages.push(full);
        self.cursor_y = PAGE_MARGIN_PT;
    }

    /// Seal the document. Always yields at least one page, so an empty
    /// input still produces a valid document.
    fn finish(mut self) -> DocumentLayout {
        self.doc.pages.push(self.page);
        self.doc
    }
}

/// Build a single-line text block with alignment baked into the offset.
fn text_block(
    x: f32,
    y: f32,
    width: f32,
    font_size: f32,
    bold: bool,
    align: TextAlign,
    content: &str,
) -> LayoutBox {
    let x_offset = match align {
        TextAlign::Left | TextAlign::Justify => 0.0,
        TextAlign::Center => ((width - text::measure(content, font_size, bold)) / 2.0).max(0.0),
        TextAlign::Right => (width - text::measure(content, font_size, bold)).max(0.0),
    };
    LayoutBox::text(
        x,
        y,
        width,
        TextContent {
            lines: vec![TextLine {
                text: content.to_string(),
                x_offset,
                y_offset: 0.0,
            }],
            font_size,
            bold,
            align,
            line_height: line_height(font_size),
        },
    )
}

/// Build a left-aligned block of plain lines stacked at the line height.
fn lines_block(x: f32, y: f32, width: f32, font_size: f32, contents: &[String]) -> LayoutBox {
    let lh = line_height(font_size);
    let lines = contents
        .iter()
        .enumerate()
        .map(|(i, line)| TextLine {
            text: line.clone(),
            x_offset: 0.0,
            y_offset: i as f32 * lh,
        })
        .collect();
    LayoutBox::text(
        x,
        y,
        width,
        TextContent {
            lines,
            font_size,
            bold: false,
            align: TextAlign::Left,
            line_height: lh,
        },
    )
}

/// Word-wrap `content` into `width` and justify every line but the last by
/// spreading the slack across the word gaps. Returns the block and the
/// number of wrapped lines.
fn justified_block(
    x: f32,
    y: f32,
    width: f32,
    font_size: f32,
    content: &str,
) -> (LayoutBox, usize) {
    let wrapped = text::wrap(content, font_size, false, width);
    let lh = line_height(font_size);
    let last = wrapped.len() - 1;

    let mut lines = Vec::new();
    for (i, line) in wrapped.iter().enumerate() {
        let y_offset = i as f32 * lh;
        let words: Vec<&str> = line.split_whitespace().collect();
        if i == last || words.len() < 2 {
            lines.push(TextLine {
                text: line.clone(),
                x_offset: 0.0,
                y_offset,
            });
            continue;
        }

        // Distribute the slack over the inter-word gaps.
        let words_width: f32 = words
            .iter()
            .map(|w| text::measure(w, font_size, false))
            .sum();
        let gap = (width - words_width) / (words.len() - 1) as f32;
        let mut word_x = 0.0f32;
        for word in &words {
            lines.push(TextLine {
                text: (*word).to_string(),
                x_offset: word_x,
                y_offset,
            });
            word_x += text::measure(word, font_size, false) + gap;
        }
    }

    let count = wrapped.len();
    let block = LayoutBox::text(
        x,
        y,
        width,
        TextContent {
            lines,
            font_size,
            bold: false,
            align: TextAlign::Justify,
            line_height: lh,
        },
    );
    (block, count)
}

/// Summary mode: a dense table, one row per product.
///
/// `generated_at` is injected by the caller so layouts are reproducible
/// under test.
pub fn layout_summary(
    products: &[Product],
    generated_at: DateTime<Utc>,
    ctl: &Control,
) -> Result<DocumentLayout, Error> {
    let mut ctx = LayoutContext::new("Catálogo de productos");

    // Document header: centered title, then the generation date flush right.
    ctx.push(text_block(
        PAGE_MARGIN_PT,
        ctx.cursor_y,
        content_width(),
        TITLE_SIZE,
        true,
        TextAlign::Center,
        "CATÁLOGO DE PRODUCTOS",
    ));
    ctx.cursor_y += line_height(TITLE_SIZE) * 3.0;

    let date_line = format!("Fecha de generación: {}", generated_at.format("%d/%m/%Y"));
    ctx.push(text_block(
        PAGE_MARGIN_PT,
        ctx.cursor_y,
        content_width(),
        BODY_SIZE,
        false,
        TextAlign::Right,
        &date_line,
    ));
    ctx.cursor_y += line_height(BODY_SIZE) * 3.0;

    // Column headers and the rule underneath them.
    for (label, offset, width) in COLUMNS {
        ctx.push(text_block(
            PAGE_MARGIN_PT + offset,
            ctx.cursor_y,
            width,
            HEADER_SIZE,
            true,
            TextAlign::Left,
            &text::clip(label, HEADER_SIZE, true, width),
        ));
    }
    ctx.cursor_y += 15.0;
    ctx.push(LayoutBox::rule(
        PAGE_MARGIN_PT,
        ctx.cursor_y,
        TABLE_RIGHT_PT - PAGE_MARGIN_PT,
        false,
    ));
    ctx.cursor_y += 10.0;

    for (index, product) in products.iter().enumerate() {
        ctl.checkpoint()?;

        // Break *before* the row so a row never starts past the threshold.
        if ctx.cursor_y > PAGE_BREAK_Y_PT {
            ctx.break_page();
        }

        let cells = [
            product.id.to_string(),
            product.display_name().to_string(),
            product.display_description().to_string(),
            product.display_price(),
            product.display_image().to_string(),
        ];
        for ((_, offset, width), value) in COLUMNS.iter().zip(cells.iter()) {
            ctx.push(text_block(
                PAGE_MARGIN_PT + offset,
                ctx.cursor_y,
                *width,
                ROW_SIZE,
                false,
                TextAlign::Left,
                &text::clip(value, ROW_SIZE, false, *width),
            ));
        }
        ctx.cursor_y += ROW_HEIGHT_PT;

        // Light separator after every 5th row, independent of page breaks.
        if (index + 1) % SEPARATOR_EVERY == 0 {
            ctx.push(LayoutBox::rule(
                PAGE_MARGIN_PT,
                ctx.cursor_y,
                TABLE_RIGHT_PT - PAGE_MARGIN_PT,
                true,
            ));
            ctx.cursor_y += 10.0;
        }
    }

    // Footer with the total, also when the table is empty.
    ctx.cursor_y += line_height(ROW_SIZE) * 2.0;
    ctx.push(text_block(
        PAGE_MARGIN_PT,
        ctx.cursor_y,
        content_width(),
        BODY_SIZE,
        true,
        TextAlign::Center,
        &format!("Total de productos: {}", products.len()),
    ));

    Ok(ctx.finish())
}

/// Detailed mode: one page per product, the product name as the page title.
pub fn layout_detailed(products: &[Product], ctl: &Control) -> Result<DocumentLayout, Error> {
    let mut ctx = LayoutContext::new("Catálogo detallado de productos");

    for (index, product) in products.iter().enumerate() {
        ctl.checkpoint()?;

        if index > 0 {
            ctx.break_page();
        }

        ctx.push(text_block(
            PAGE_MARGIN_PT,
            ctx.cursor_y,
            content_width(),
            DETAIL_TITLE_SIZE,
            true,
            TextAlign::Left,
            product.display_name(),
        ));
        ctx.cursor_y += line_height(DETAIL_TITLE_SIZE) * 2.0;

        let info = [
            format!("ID: {}", product.id),
            format!("Precio: {}", product.display_price()),
            format!("Imagen: {}", product.display_image()),
        ];
        ctx.push(lines_block(
            PAGE_MARGIN_PT,
            ctx.cursor_y,
            content_width(),
            BODY_SIZE,
            &info,
        ));
        ctx.cursor_y += line_height(BODY_SIZE) * (info.len() as f32 + 1.0);

        ctx.push(text_block(
            PAGE_MARGIN_PT,
            ctx.cursor_y,
            content_width(),
            BODY_SIZE,
            true,
            TextAlign::Left,
            "Descripción:",
        ));
        ctx.cursor_y += line_height(BODY_SIZE);

        let (description, line_count) = justified_block(
            PAGE_MARGIN_PT,
            ctx.cursor_y,
            DESCRIPTION_WIDTH_PT,
            BODY_SIZE,
            product.display_description(),
        );
        ctx.push(description);
        ctx.cursor_y += line_height(BODY_SIZE) * (line_count as f32 + 2.0);

        ctx.push(LayoutBox::rule(
            PAGE_MARGIN_PT,
            ctx.cursor_y,
            TABLE_RIGHT_PT - PAGE_MARGIN_PT,
            false,
        ));
    }

    Ok(ctx.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id,
            name: Some(format!("Producto {id}")),
            description: Some("Descripción breve".to_string()),
            price: Some(9.99),
            image_url: Some(format!("https://example.com/{id}.png")),
            created_at: None,
        }
    }

    fn products(n: usize) -> Vec<Product> {
        (1..=n as i64).map(product).collect()
    }

    fn date() -> DateTime<Utc> {
        "2024-03-01T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_input_yields_one_page_with_zero_total() {
        let doc = layout_summary(&[], date(), &Control::unbounded()).unwrap();
        assert_eq!(doc.pages.len(), 1);
        let footer = doc.pages[0]
            .boxes
            .iter()
            .filter_map(|b| b.text.as_ref())
            .find(|t| t.lines[0].text.starts_with("Total"))
            .expect("footer present");
        assert_eq!(footer.lines[0].text, "Total de productos: 0");
    }

    #[test]
    fn few_rows_fit_one_page() {
        let doc = layout_summary(&products(10), date(), &Control::unbounded()).unwrap();
        assert_eq!(doc.pages.len(), 1);
    }

    #[test]
    fn rows_never_start_past_the_threshold() {
        let doc = layout_summary(&products(120), date(), &Control::unbounded()).unwrap();
        assert!(doc.pages.len() > 1);
        for page in &doc.pages {
            for lbox in &page.boxes {
                if let Some(t) = &lbox.text {
                    if t.font_size == 9.0 {
                        assert!(
                            lbox.y <= PAGE_BREAK_Y_PT,
                            "row at y={} past threshold",
                            lbox.y
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn continuation_pages_start_at_top_margin() {
        let doc = layout_summary(&products(60), date(), &Control::unbounded()).unwrap();
        assert!(doc.pages.len() >= 2);
        let first_row_y = doc.pages[1]
            .boxes
            .iter()
            .find(|b| b.text.is_some())
            .map(|b| b.y)
            .unwrap();
        assert_eq!(first_row_y, PAGE_MARGIN_PT);
    }

    #[test]
    fn separators_after_every_fifth_row() {
        let doc = layout_summary(&products(12), date(), &Control::unbounded()).unwrap();
        let light_rules = doc.pages[0]
            .boxes
            .iter()
            .filter(|b| b.rule.as_ref().is_some_and(|r| r.light))
            .count();
        assert_eq!(light_rules, 12 / SEPARATOR_EVERY);
    }

    #[test]
    fn detailed_one_page_per_product() {
        let items = products(4);
        let doc = layout_detailed(&items, &Control::unbounded()).unwrap();
        assert_eq!(doc.pages.len(), 4);
        for (page, product) in doc.pages.iter().zip(&items) {
            let title = page.boxes.iter().find_map(|b| b.text.as_ref()).unwrap();
            assert_eq!(title.lines[0].text, product.display_name());
            assert!(title.bold);
        }
    }

    #[test]
    fn detailed_empty_input_yields_one_blank_page() {
        let doc = layout_detailed(&[], &Control::unbounded()).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].boxes.is_empty());
    }

    #[test]
    fn justified_lines_fill_the_block_width() {
        let long = "una palabra repetida muchas veces ".repeat(10);
        let (block, line_count) = justified_block(50.0, 50.0, 500.0, 12.0, long.trim());
        assert!(line_count > 1);
        let text = block.text.unwrap();
        // The last word of a justified line must end at the right edge.
        let first_line_words: Vec<&TextLine> =
            text.lines.iter().filter(|l| l.y_offset == 0.0).collect();
        assert!(first_line_words.len() > 1);
        let last_word = first_line_words.last().unwrap();
        let end = last_word.x_offset + crate::text::measure(&last_word.text, 12.0, false);
        assert!((end - 500.0).abs() < 0.5, "line ends at {end}, not 500");
    }
}
