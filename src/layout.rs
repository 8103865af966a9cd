//! Page layout for invoices and offers.
//!
//! The engine walks the document once, top to bottom, keeping a vertical
//! cursor in millimetres measured from the top edge of the page. Every text
//! line is checked against the printable height before it is drawn; when the
//! cursor has reached the bottom margin the finished page gets its footer and
//! drawing continues at the top margin of a fresh page.
//!
//! The output is a list of pages of positioned drawing operations. Turning
//! them into PDF objects is left to [`crate::pdf`].

use std::mem;

use crate::kind::DocumentKind;
use crate::metrics::{text_width_mm, wrap_text, FontStyle};
use crate::model::{CompanyProfile, Document, LineItem};
use crate::totals::{format_amount, format_quantity, grand_total, line_total, parse_amount};

// ============================================================================
// Constants
// ============================================================================

/// A4 dimensions in mm
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

pub const TOP_MARGIN_MM: f32 = 10.0;
pub const BOTTOM_MARGIN_MM: f32 = 30.0;

/// Cursor positions at or beyond this force a page break.
pub const PRINTABLE_HEIGHT_MM: f32 = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;

/// Column positions
const LEFT_X: f32 = 10.0;
const RIGHT_X: f32 = 200.0;
const SENDER_X: f32 = 130.0;
const QUANTITY_X: f32 = 80.0;
const UNIT_PRICE_X: f32 = 120.0;
const LINE_TOTAL_X: f32 = 160.0;
const FOOTER_COLUMNS_X: [f32; 4] = [10.0, 60.0, 100.0, 155.0];

pub const DESCRIPTION_WIDTH_MM: f32 = 70.0;
pub const LINE_HEIGHT_MM: f32 = 6.0;
pub const ITEM_SPACING_MM: f32 = 4.0;
const CATEGORY_SPACING_MM: f32 = 8.0;
const SUBTOTAL_SPACING_MM: f32 = 10.0;
const HEADER_LINE_MM: f32 = 5.0;
const MIN_HEADER_BLOCK_MM: f32 = 40.0;

/// Tall logos are scaled down to this height, keeping their aspect ratio.
pub const MAX_LOGO_HEIGHT_MM: f32 = 60.0;

/// Footer text starts this far above the bottom edge.
const FOOTER_OFFSET_MM: f32 = 25.0;

/// Font sizes in points
const SENDER_NAME_FONT_SIZE: f32 = 14.0;
const SECTION_FONT_SIZE: f32 = 12.0;
const TOTAL_FONT_SIZE: f32 = 12.0;
pub const BODY_FONT_SIZE: f32 = 10.0;
pub const FOOTER_FONT_SIZE: f32 = 8.0;

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the baseline, measured from the top of the page.
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
    },
    /// Light grey horizontal rule.
    Rule { x1: f32, x2: f32, y: f32 },
    /// Logo box; `y` is its top edge.
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub grand_total: f64,
}

/// Lays out `doc` as `kind`.
///
/// `logo_size` is the pixel size of the decoded logo, if there is one; only
/// its aspect ratio is used.
pub fn layout_document(
    doc: &Document,
    profile: &CompanyProfile,
    kind: &DocumentKind,
    logo_size: Option<(u32, u32)>,
) -> Layout {
    let mut layouter = Layouter::new(profile);

    layouter.header(doc, kind, logo_size);
    layouter.metadata(doc, kind);
    layouter.table_header();

    for (index, entry) in doc.items.iter().enumerate() {
        match entry {
            LineItem::Category { description } => layouter.category(description, index == 0),
            LineItem::Item { .. } => layouter.item(entry),
        }
    }

    let total = grand_total(&doc.items);
    layouter.totals(kind.final_subtotal || doc.has_categories(), total, kind);

    Layout {
        pages: layouter.finish(),
        grand_total: total,
    }
}

/// Logo size in mm at `width_mm`, shrunk to fit `MAX_LOGO_HEIGHT_MM`.
fn logo_box(width_mm: f32, width_px: u32, height_px: u32) -> (f32, f32) {
    let aspect = height_px as f32 / width_px as f32;
    let height = width_mm * aspect;
    if height > MAX_LOGO_HEIGHT_MM {
        (MAX_LOGO_HEIGHT_MM / aspect, MAX_LOGO_HEIGHT_MM)
    } else {
        (width_mm, height)
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn text_lines(value: &str, placeholder: &str) -> Vec<String> {
    let lines: Vec<String> = value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        vec![placeholder.to_string()]
    } else {
        lines
    }
}

// ============================================================================
// Layout Engine
// ============================================================================

struct Layouter<'a> {
    profile: &'a CompanyProfile,
    finished: Vec<Page>,
    current: Page,
    y: f32,
    style: FontStyle,
    size: f32,
    running_subtotal: f64,
}

impl<'a> Layouter<'a> {
    fn new(profile: &'a CompanyProfile) -> Self {
        Self {
            profile,
            finished: Vec::new(),
            current: Page::default(),
            y: TOP_MARGIN_MM,
            style: FontStyle::Regular,
            size: BODY_FONT_SIZE,
            running_subtotal: 0.0,
        }
    }

    fn set_font(&mut self, style: FontStyle, size: f32) {
        self.style = style;
        self.size = size;
    }

    fn text_at(&mut self, text: impl Into<String>, x: f32, y: f32) {
        self.current.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size: self.size,
            style: self.style,
        });
    }

    fn text_right(&mut self, text: impl Into<String>, right_x: f32, y: f32) {
        let text = text.into();
        let x = right_x - text_width_mm(&text, self.style, self.size);
        self.text_at(text, x, y);
    }

    fn rule(&mut self, y: f32) {
        self.current.ops.push(DrawOp::Rule {
            x1: LEFT_X,
            x2: RIGHT_X,
            y,
        });
    }

    /// Starts a new page once the cursor has entered the bottom margin.
    fn break_page_if_needed(&mut self) -> bool {
        if self.y < PRINTABLE_HEIGHT_MM {
            return false;
        }

        self.footer();
        let done = mem::take(&mut self.current);
        self.finished.push(done);
        self.y = TOP_MARGIN_MM;
        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);
        true
    }

    fn finish(mut self) -> Vec<Page> {
        self.footer();
        self.finished.push(self.current);
        self.finished
    }

    // ------------------------------------------------------------------------
    // Header
    // ------------------------------------------------------------------------

    fn header(&mut self, doc: &Document, kind: &DocumentKind, logo_size: Option<(u32, u32)>) {
        if let Some((width_px, height_px)) = logo_size.filter(|(w, h)| *w > 0 && *h > 0) {
            let (width, height) = logo_box(kind.logo_width_mm, width_px, height_px);
            self.current.ops.push(DrawOp::Logo {
                x: (PAGE_WIDTH_MM - width) / 2.0,
                y: self.y,
                width,
                height,
            });
            self.y += height + 10.0;
        }

        self.break_page_if_needed();
        let mut block_top = Some(self.y);

        // Recipient on the left, sender on the right
        self.set_font(FontStyle::Regular, SECTION_FONT_SIZE);
        self.text_at("Kundeninformationen", LEFT_X, self.y);

        let profile = self.profile;
        self.set_font(FontStyle::Bold, SENDER_NAME_FONT_SIZE);
        self.text_at(or_placeholder(&profile.name, "[Firmenname]"), SENDER_X, self.y);
        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);

        let recipient = &doc.recipient;
        let mut left = vec![
            recipient.salutation.to_string(),
            or_placeholder(&recipient.name, "[Kundenname]").to_string(),
        ];
        left.extend(text_lines(&recipient.address, "[Kundenadresse]"));

        let mut right = vec![or_placeholder(&profile.owner, "[Inhaber]").to_string()];
        right.extend(text_lines(&profile.address, "[Adresse]"));
        right.push(format!("Tel.: {}", or_placeholder(&profile.phone, "[Telefon]")));
        right.push(format!("Email: {}", or_placeholder(&profile.email, "[E-Mail]")));

        for row in 0..left.len().max(right.len()) {
            self.y += HEADER_LINE_MM;
            if self.break_page_if_needed() {
                block_top = None;
            }
            if let Some(line) = left.get(row) {
                self.text_at(line.as_str(), LEFT_X, self.y);
            }
            if let Some(line) = right.get(row) {
                self.text_at(line.as_str(), SENDER_X, self.y);
            }
        }

        self.y += 15.0;
        if let Some(top) = block_top {
            self.y = self.y.max(top + MIN_HEADER_BLOCK_MM);
        }
    }

    fn metadata(&mut self, doc: &Document, kind: &DocumentKind) {
        self.break_page_if_needed();
        let y = self.y;

        self.set_font(FontStyle::Regular, SECTION_FONT_SIZE);
        self.text_at(kind.title, LEFT_X, y);

        self.set_font(FontStyle::Bold, BODY_FONT_SIZE);
        let number = or_placeholder(&doc.number, kind.number_placeholder);
        self.text_at(format!("{}: {}", kind.number_label, number), LEFT_X, y + 6.0);

        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);
        self.text_at(format!("Datum: {}", or_placeholder(&doc.date, "[Datum]")), LEFT_X, y + 12.0);

        self.set_font(FontStyle::Bold, BODY_FONT_SIZE);
        let project = or_placeholder(&doc.project, "[Projektname]");
        self.text_at(format!("Projekt: {}", project), LEFT_X, y + 18.0);

        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);
        self.y += 25.0;

        if let Some(intro) = kind.intro {
            let name = or_placeholder(&doc.recipient.name, "[Kundenname]");
            let greeting = doc.recipient.salutation.greeting(name);
            self.text_at(greeting, LEFT_X, self.y);
            self.y += 5.0;
            self.text_at(intro, LEFT_X, self.y);
            self.y += 10.0;
        }
    }

    fn table_header(&mut self) {
        self.break_page_if_needed();
        let y = self.y;
        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);
        self.text_at("Bezeichnung", LEFT_X, y);
        self.text_at("Menge", QUANTITY_X, y);
        self.text_at("Einzelpreis (€)", UNIT_PRICE_X, y);
        self.text_at("Gesamt (€)", LINE_TOTAL_X, y);

        self.y += 6.0;
        self.rule(self.y);
        self.y += 4.0;
    }

    // ------------------------------------------------------------------------
    // Table body
    // ------------------------------------------------------------------------

    fn subtotal(&mut self) {
        self.break_page_if_needed();
        self.set_font(FontStyle::Bold, BODY_FONT_SIZE);
        let label = format!("Zwischensumme: €{}", format_amount(self.running_subtotal));
        self.text_right(label, RIGHT_X, self.y);
        self.y += SUBTOTAL_SPACING_MM;
    }

    fn category(&mut self, label: &str, first_entry: bool) {
        if !first_entry {
            self.subtotal();
            self.break_page_if_needed();
        }
        self.running_subtotal = 0.0;

        self.set_font(FontStyle::Bold, BODY_FONT_SIZE);
        let lines = wrap_text(
            or_placeholder(label, "[Kategorie]"),
            DESCRIPTION_WIDTH_MM,
            self.style,
            self.size,
        );
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                self.y += LINE_HEIGHT_MM;
                if self.break_page_if_needed() {
                    self.set_font(FontStyle::Bold, BODY_FONT_SIZE);
                }
            }
            self.text_at(line, LEFT_X, self.y);
        }
        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);
        self.y += CATEGORY_SPACING_MM;
        self.break_page_if_needed();
    }

    fn item(&mut self, entry: &LineItem) {
        let LineItem::Item {
            description,
            quantity,
            price,
        } = entry
        else {
            return;
        };

        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);
        let lines = wrap_text(
            or_placeholder(description, "[Beschreibung]"),
            DESCRIPTION_WIDTH_MM,
            self.style,
            self.size,
        );
        let total = line_total(entry);

        for (i, line) in lines.into_iter().enumerate() {
            self.break_page_if_needed();
            let y = self.y;
            self.text_at(line, LEFT_X, y);
            if i == 0 {
                self.text_at(format_quantity(parse_amount(quantity)), QUANTITY_X, y);
                self.text_at(format!("€{}", format_amount(parse_amount(price))), UNIT_PRICE_X, y);
                self.text_at(format!("€{}", format_amount(total)), LINE_TOTAL_X, y);
            }
            self.y += LINE_HEIGHT_MM;
        }

        self.y += ITEM_SPACING_MM;
        self.running_subtotal += total;
    }

    fn totals(&mut self, final_subtotal: bool, total: f64, kind: &DocumentKind) {
        if final_subtotal {
            self.subtotal();
        }

        self.break_page_if_needed();
        self.set_font(FontStyle::Bold, TOTAL_FONT_SIZE);
        let label = format!("{}: €{}", kind.total_label, format_amount(total));
        self.text_right(label, RIGHT_X, self.y);
        self.y += 15.0;

        self.set_font(FontStyle::Regular, BODY_FONT_SIZE);
        for notice in kind.notices {
            for line in wrap_text(notice, RIGHT_X - LEFT_X, self.style, self.size) {
                self.break_page_if_needed();
                self.text_at(line, LEFT_X, self.y);
                self.y += 5.0;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Footer
    // ------------------------------------------------------------------------

    fn footer(&mut self) {
        let profile = self.profile;
        let top = PAGE_HEIGHT_MM - FOOTER_OFFSET_MM;
        self.rule(top - 5.0);

        let name = or_placeholder(&profile.name, "[Firmenname]");
        let address = text_lines(&profile.address, "[Adresse]").join(", ");
        let phone = or_placeholder(&profile.phone, "[Telefon]");
        let email = or_placeholder(&profile.email, "[E-Mail]");

        let columns: [Vec<String>; 4] = [
            vec![
                "Firmeninformationen:".to_string(),
                name.to_string(),
                address,
                format!("Mobil: {}", phone),
                format!("E-Mail: {}", email),
            ],
            vec![
                "Steuerdaten:".to_string(),
                format!("Steuer-Nr.: {}", or_placeholder(&profile.tax_number, "[Steuernummer]")),
                format!("Finanzamt: {}", or_placeholder(&profile.tax_office, "[Finanzamt]")),
            ],
            vec![
                "Bankverbindung:".to_string(),
                or_placeholder(&profile.bank_name, "[Bank]").to_string(),
                format!("IBAN: {}", or_placeholder(&profile.iban, "[IBAN]")),
                format!("BIC: {}", or_placeholder(&profile.bic, "[BIC]")),
            ],
            vec![
                "Kontakt:".to_string(),
                format!("E-Mail: {}", email),
                format!("Tel.: {}", phone),
            ],
        ];

        for (x, lines) in FOOTER_COLUMNS_X.iter().zip(columns) {
            for (i, text) in lines.into_iter().enumerate() {
                self.current.ops.push(DrawOp::Text {
                    text,
                    x: *x,
                    y: top + HEADER_LINE_MM * i as f32,
                    size: FOOTER_FONT_SIZE,
                    style: FontStyle::Regular,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CompanyProfile {
        CompanyProfile {
            name: "Muster Fliesen".to_string(),
            owner: "Inh. Max Muster".to_string(),
            address: "Hauptstr. 1, 12345 Musterstadt".to_string(),
            phone: "0123/456789".to_string(),
            email: "info@example.com".to_string(),
            tax_number: "123/456/78901".to_string(),
            tax_office: "Musterstadt".to_string(),
            bank_name: "Musterbank".to_string(),
            iban: "DE00 0000 0000 0000 0000 00".to_string(),
            bic: "MUSTDEXX".to_string(),
        }
    }

    fn footer_count(page: &Page) -> usize {
        page.texts().filter(|t| *t == "Firmeninformationen:").count()
    }

    fn assert_body_within_printable(layout: &Layout) {
        for page in &layout.pages {
            assert_eq!(footer_count(page), 1);
            for op in &page.ops {
                if let DrawOp::Text { y, size, text, .. } = op {
                    if *size != FOOTER_FONT_SIZE {
                        assert!(*y < PRINTABLE_HEIGHT_MM, "{text:?} drawn at {y}");
                    }
                }
            }
        }
    }

    fn text_y(page: &Page, needle: &str) -> Option<f32> {
        page.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == needle => Some(*y),
            _ => None,
        })
    }

    #[test]
    fn test_wrapped_item_advances_by_line_count() {
        let profile = profile();
        let mut layouter = Layouter::new(&profile);
        layouter.y = 100.0;

        let description = "Bodenfliesen im Erdgeschoss inklusive Ausgleichsmasse, \
                           Trittschalldämmung und Sockelleisten fachgerecht verlegen";
        let k = wrap_text(description, DESCRIPTION_WIDTH_MM, FontStyle::Regular, BODY_FONT_SIZE).len();
        assert!(k > 1);

        layouter.item(&LineItem::item(description, "1", "1"));
        let expected = 100.0 + k as f32 * LINE_HEIGHT_MM + ITEM_SPACING_MM;
        assert!((layouter.y - expected).abs() < 1e-4, "{} != {}", layouter.y, expected);
        assert!(layouter.finished.is_empty());
    }

    #[test]
    fn test_cursor_in_bottom_margin_breaks_page() {
        let profile = profile();
        let mut layouter = Layouter::new(&profile);
        layouter.y = PRINTABLE_HEIGHT_MM + 1.0;

        layouter.item(&LineItem::item("Silikonfugen", "2", "10"));

        assert_eq!(layouter.finished.len(), 1);
        assert_eq!(footer_count(&layouter.finished[0]), 1);
        assert_eq!(text_y(&layouter.current, "Silikonfugen"), Some(TOP_MARGIN_MM));
        assert_eq!(text_y(&layouter.current, "€20.00"), Some(TOP_MARGIN_MM));
    }

    #[test]
    fn test_no_break_above_printable_height() {
        let profile = profile();
        let mut layouter = Layouter::new(&profile);
        layouter.y = PRINTABLE_HEIGHT_MM - 0.5;
        assert!(!layouter.break_page_if_needed());
        layouter.y = PRINTABLE_HEIGHT_MM;
        layouter.set_font(FontStyle::Bold, SECTION_FONT_SIZE);
        assert!(layouter.break_page_if_needed());
        assert_eq!(layouter.y, TOP_MARGIN_MM);
        assert_eq!((layouter.style, layouter.size), (FontStyle::Regular, BODY_FONT_SIZE));
    }

    #[test]
    fn test_single_item_invoice() {
        let doc = Document {
            items: vec![LineItem::item("Fliesen verlegen", "10", "25")],
            ..Document::default()
        };
        let layout = layout_document(&doc, &profile(), &DocumentKind::INVOICE, None);

        assert_eq!(layout.pages.len(), 1);
        let page = &layout.pages[0];
        assert!(page.contains_text("Gesamtbetrag: €250.00"));
        assert!(page.contains_text("€250.00"));
        assert!(page.contains_text("10"));
        assert!(!page.texts().any(|t| t.starts_with("Zwischensumme")));
        assert!(page.contains_text("Es wird gemäß §19 Abs. 1 Umsatzsteuergesetz keine Umsatzsteuer erhoben."));
        assert_eq!(footer_count(page), 1);
    }

    #[test]
    fn test_category_isolates_subtotal() {
        let doc = Document {
            items: vec![
                LineItem::category("Bad"),
                LineItem::item("Fliesen verlegen", "10", "25"),
            ],
            ..Document::default()
        };
        let layout = layout_document(&doc, &profile(), &DocumentKind::OFFER, None);
        let page = &layout.pages[0];

        assert_eq!(format_amount(layout.grand_total), "250.00");
        assert!(page.contains_text("Bad"));
        assert!(page.contains_text("Zwischensumme: €250.00"));
        assert!(page.contains_text("Angebotsbetrag: €250.00"));
        assert!(page.contains_text("Sehr geehrter Herr [Kundenname],"));
    }

    #[test]
    fn test_subtotal_emitted_before_each_later_category() {
        let doc = Document {
            items: vec![
                LineItem::item("Anfahrt", "1", "40"),
                LineItem::category("Bad"),
                LineItem::item("Fliesen", "10", "25"),
                LineItem::category("Küche"),
                LineItem::item("Sockel", "abc", "3"),
            ],
            ..Document::default()
        };
        let layout = layout_document(&doc, &profile(), &DocumentKind::OFFER, None);
        let subtotals: Vec<&str> = layout.pages[0]
            .texts()
            .filter(|t| t.starts_with("Zwischensumme"))
            .collect();

        assert_eq!(
            subtotals,
            vec!["Zwischensumme: €40.00", "Zwischensumme: €250.00", "Zwischensumme: €0.00"]
        );
        assert!(layout.pages[0].contains_text("Angebotsbetrag: €290.00"));
    }

    #[test]
    fn test_empty_document_uses_placeholders() {
        let doc = Document {
            date: String::new(),
            ..Document::default()
        };
        let layout = layout_document(&doc, &CompanyProfile::default(), &DocumentKind::INVOICE, None);

        assert_eq!(layout.pages.len(), 1);
        let page = &layout.pages[0];
        for expected in [
            "[Kundenname]",
            "[Kundenadresse]",
            "[Firmenname]",
            "Rechnungsnummer: [Rechnungsnummer]",
            "Datum: [Datum]",
            "Projekt: [Projektname]",
            "Gesamtbetrag: €0.00",
            "IBAN: [IBAN]",
        ] {
            assert!(page.contains_text(expected), "missing {expected:?}");
        }
        assert_eq!(footer_count(page), 1);
    }

    #[test]
    fn test_long_item_list_paginates_with_footers() {
        let mut doc = Document::default();
        for i in 0..40 {
            if i % 10 == 0 {
                doc.push_category(format!("Raum {}", i / 10 + 1));
            }
            doc.items.push(LineItem::item(
                format!("Position {} mit einer etwas längeren Beschreibung der Arbeiten", i),
                "2",
                "12.5",
            ));
        }
        let layout = layout_document(&doc, &profile(), &DocumentKind::OFFER, None);

        assert!(layout.pages.len() > 1);
        assert_body_within_printable(&layout);
        let last = layout.pages.last().unwrap();
        assert!(last.contains_text("Angebotsbetrag: €1000.00"));
    }

    #[test]
    fn test_logo_is_centered_and_pushes_header_down() {
        let doc = Document::default();
        let layout = layout_document(&doc, &profile(), &DocumentKind::OFFER, Some((200, 100)));
        let page = &layout.pages[0];

        assert_eq!(
            page.ops[0],
            DrawOp::Logo {
                x: 55.0,
                y: TOP_MARGIN_MM,
                width: 100.0,
                height: 50.0
            }
        );
        assert_eq!(text_y(page, "Kundeninformationen"), Some(70.0));
    }

    #[test]
    fn test_totals_right_aligned() {
        let doc = Document {
            items: vec![LineItem::item("Fliesen", "1", "1")],
            ..Document::default()
        };
        let layout = layout_document(&doc, &profile(), &DocumentKind::INVOICE, None);
        let (x, text) = layout.pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, x, .. } if text.starts_with("Gesamtbetrag") => Some((*x, text.clone())),
                _ => None,
            })
            .unwrap();
        let width = text_width_mm(&text, FontStyle::Bold, TOTAL_FONT_SIZE);
        assert!((x + width - RIGHT_X).abs() < 1e-3);
    }

    #[test]
    fn test_tall_logo_is_capped() {
        let doc = Document::default();
        let layout = layout_document(&doc, &profile(), &DocumentKind::OFFER, Some((10, 100)));
        let page = &layout.pages[0];

        assert_eq!(
            page.ops[0],
            DrawOp::Logo {
                x: 102.0,
                y: TOP_MARGIN_MM,
                width: 6.0,
                height: MAX_LOGO_HEIGHT_MM
            }
        );
        assert_eq!(text_y(page, "Kundeninformationen"), Some(80.0));
        assert!(page.contains_text("Angebot"));
        assert!(page.contains_text("Bezeichnung"));
        assert_body_within_printable(&layout);
    }

    #[test]
    fn test_long_header_block_continues_on_next_page() {
        let address: Vec<String> = (1..=60).map(|i| format!("Zeile {}", i)).collect();
        let mut doc = Document::default();
        doc.recipient.address = address.join("\n");
        doc.push_item();
        let layout = layout_document(&doc, &profile(), &DocumentKind::INVOICE, None);

        assert!(layout.pages.len() > 1);
        assert_body_within_printable(&layout);
        assert_eq!(text_y(&layout.pages[1], "Zeile 50"), Some(TOP_MARGIN_MM));
        assert!(layout.pages[1].contains_text("Rechnung"));
        assert!(layout.pages[1].contains_text("Gesamtbetrag: €0.00"));
    }

    #[test]
    fn test_offer_without_categories_closes_with_subtotal() {
        let doc = Document {
            items: vec![LineItem::item("Fliesen", "10", "25")],
            ..Document::default()
        };
        let layout = layout_document(&doc, &profile(), &DocumentKind::OFFER, None);
        let page = &layout.pages[0];

        assert!(page.contains_text("Zwischensumme: €250.00"));
        assert!(page.contains_text("Angebotsbetrag: €250.00"));
    }

    #[test]
    fn test_long_category_label_is_wrapped() {
        let label = "Badezimmer im Obergeschoss einschließlich Dusche, Wanne und Gäste-WC";
        let doc = Document {
            items: vec![LineItem::category(label), LineItem::item("Fliesen", "1", "1")],
            ..Document::default()
        };
        let layout = layout_document(&doc, &profile(), &DocumentKind::OFFER, None);
        let page = &layout.pages[0];

        let lines = wrap_text(label, DESCRIPTION_WIDTH_MM, FontStyle::Bold, BODY_FONT_SIZE);
        assert!(lines.len() > 1);
        let first = text_y(page, &lines[0]).unwrap();
        let second = text_y(page, &lines[1]).unwrap();
        assert_eq!(second - first, LINE_HEIGHT_MM);
        for line in &lines {
            assert!(text_width_mm(line, FontStyle::Bold, BODY_FONT_SIZE) <= DESCRIPTION_WIDTH_MM);
        }
        let item_y = text_y(page, "Fliesen").unwrap();
        let last = text_y(page, lines.last().unwrap()).unwrap();
        assert_eq!(item_y - last, CATEGORY_SPACING_MM);
    }
}
