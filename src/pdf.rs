// ============================================================================
// PDF Output
// ============================================================================

use ::image::{DynamicImage, Rgba, RgbImage};
use log::info;
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;

use crate::error::AppError;
use crate::kind::DocumentKind;
use crate::layout::{layout_document, DrawOp, Layout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::logo::{load_logo, LogoAccess};
use crate::metrics::FontStyle;
use crate::model::{CompanyProfile, Document};
use crate::totals::format_amount;

/// Rule colour, light grey
const RULE_GRAY: f32 = 200.0 / 255.0;
const RULE_THICKNESS: f32 = 0.5;

/// Lays out and renders `doc`, resolving its logo on the way.
pub fn render_document(
    doc: &Document,
    profile: &CompanyProfile,
    kind: &DocumentKind,
    logo_access: LogoAccess,
) -> Result<PdfDocumentReference, AppError> {
    let logo = doc
        .logo
        .as_deref()
        .and_then(|source| load_logo(source, logo_access));
    let logo_size = logo.as_ref().map(|img| (img.width(), img.height()));

    let layout = layout_document(doc, profile, kind, logo_size);
    info!(
        "{} laid out on {} page(s), total {}",
        kind.title,
        layout.pages.len(),
        format_amount(layout.grand_total)
    );

    render_layout(&layout, kind.title, logo.as_ref())
}

/// Writes the document to `output_path`.
pub fn save_pdf(
    doc: &Document,
    profile: &CompanyProfile,
    kind: &DocumentKind,
    logo_access: LogoAccess,
    output_path: &str,
) -> Result<(), AppError> {
    let pdf = render_document(doc, profile, kind, logo_access)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    pdf.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    Ok(())
}

/// Returns the finished document as bytes, e.g. for an inline preview.
pub fn pdf_bytes(
    doc: &Document,
    profile: &CompanyProfile,
    kind: &DocumentKind,
    logo_access: LogoAccess,
) -> Result<Vec<u8>, AppError> {
    render_document(doc, profile, kind, logo_access)?
        .save_to_bytes()
        .map_err(|e| AppError::PdfError(e.to_string()))
}

pub fn render_layout(
    layout: &Layout,
    title: &str,
    logo: Option<&DynamicImage>,
) -> Result<PdfDocumentReference, AppError> {
    let (doc, page1, layer1) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    // Load built-in fonts
    let font_regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (new_page, new_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(new_page).get_layer(new_layer)
        };

        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.set_outline_color(Color::Rgb(Rgb::new(RULE_GRAY, RULE_GRAY, RULE_GRAY, None)));
        layer.set_outline_thickness(RULE_THICKNESS);

        for op in &page.ops {
            match op {
                DrawOp::Text {
                    text,
                    x,
                    y,
                    size,
                    style,
                } => {
                    let font = match style {
                        FontStyle::Regular => &font_regular,
                        FontStyle::Bold => &font_bold,
                    };
                    layer.use_text(text.as_str(), *size, Mm(*x), Mm(to_pdf_y(*y)), font);
                }
                DrawOp::Rule { x1, x2, y } => {
                    draw_line(&layer, *x1, to_pdf_y(*y), *x2, to_pdf_y(*y));
                }
                DrawOp::Logo {
                    x,
                    y,
                    width,
                    height,
                } => {
                    if let Some(img) = logo {
                        embed_logo(&layer, img, *x, to_pdf_y(*y + *height), *width);
                    }
                }
            }
        }
    }

    Ok(doc)
}

/// Layout measures from the top edge, PDF from the bottom.
fn to_pdf_y(y_from_top: f32) -> f32 {
    PAGE_HEIGHT_MM - y_from_top
}

fn embed_logo(
    layer: &PdfLayerReference,
    logo_image: &DynamicImage,
    x: f32,
    bottom_y: f32,
    width_mm: f32,
) {
    // Convert to RGBA first to handle transparency
    let rgba_image = logo_image.to_rgba8();
    let (width_px, height_px) = rgba_image.dimensions();

    // Composite against white background
    let mut rgb_image = RgbImage::new(width_px, height_px);
    for (px, py, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(px, py, ::image::Rgb([out_r, out_g, out_b]));
    }

    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb_image.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI = pixels / (mm / 25.4); the height follows from the aspect ratio
    let dpi = (width_px as f32) / (width_mm / 25.4);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(bottom_y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y2)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}
