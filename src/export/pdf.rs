//! `DrawingSurface` backed by a single-page PDF built with lopdf.
//!
//! Text uses the standard Helvetica fonts, so nothing is embedded; widths for
//! alignment come from the Helvetica metrics below.

use anyhow::{anyhow, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::surface::{Align, DrawingSurface, Rect, Stroke, TextStyle};
use crate::render::Rgb;

const POINTS_PER_MM: f32 = 72.0 / 25.4;
/// Control-point distance for approximating a quarter circle with a Bezier.
const KAPPA: f32 = 0.552_284_8;

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

pub struct PdfSurface {
    width_mm: f32,
    height_mm: f32,
    operations: Vec<Operation>,
}

impl PdfSurface {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            height_mm,
            operations: Vec::new(),
        }
    }

    fn x(&self, mm: f32) -> f32 {
        mm * POINTS_PER_MM
    }

    /// Flip a top-left millimetre y into a bottom-left point y.
    fn y(&self, mm: f32) -> f32 {
        (self.height_mm - mm) * POINTS_PER_MM
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_fill(&mut self, color: Rgb) {
        let [r, g, b] = color.unit();
        self.op("rg", vec![real(r), real(g), real(b)]);
    }

    fn set_stroke(&mut self, stroke: Stroke) {
        let [r, g, b] = stroke.color.unit();
        self.op("RG", vec![real(r), real(g), real(b)]);
        self.op("w", vec![real(stroke.width * POINTS_PER_MM)]);
        let dash = match stroke.dash {
            Some((on, off)) => vec![real(on * POINTS_PER_MM), real(off * POINTS_PER_MM)],
            None => Vec::new(),
        };
        self.op("d", vec![Object::Array(dash), Object::Integer(0)]);
    }

    fn rect_path(&mut self, rect: Rect) {
        let (x, y) = (self.x(rect.x), self.y(rect.bottom()));
        self.op(
            "re",
            vec![real(x), real(y), real(rect.w * POINTS_PER_MM), real(rect.h * POINTS_PER_MM)],
        );
    }

    fn rounded_path(&mut self, rect: Rect, radius: f32) {
        let x0 = self.x(rect.x);
        let y0 = self.y(rect.bottom());
        let w = rect.w * POINTS_PER_MM;
        let h = rect.h * POINTS_PER_MM;
        let r = (radius * POINTS_PER_MM).min(w / 2.0).min(h / 2.0).max(0.0);
        let k = r * KAPPA;

        self.op("m", vec![real(x0 + r), real(y0)]);
        self.op("l", vec![real(x0 + w - r), real(y0)]);
        self.curve([x0 + w - r + k, y0, x0 + w, y0 + r - k, x0 + w, y0 + r]);
        self.op("l", vec![real(x0 + w), real(y0 + h - r)]);
        self.curve([x0 + w, y0 + h - r + k, x0 + w - r + k, y0 + h, x0 + w - r, y0 + h]);
        self.op("l", vec![real(x0 + r), real(y0 + h)]);
        self.curve([x0 + r - k, y0 + h, x0, y0 + h - r + k, x0, y0 + h - r]);
        self.op("l", vec![real(x0), real(y0 + r)]);
        self.curve([x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0]);
        self.op("h", vec![]);
    }

    fn curve(&mut self, points: [f32; 6]) {
        self.op("c", points.iter().map(|p| real(*p)).collect());
    }

    /// Encode the page into a complete PDF file.
    pub fn finish(self, title: &str) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let content = Content { operations: self.operations };
        let encoded = content
            .encode()
            .map_err(|e| anyhow!("Failed to encode page content: {}", e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(self.width_mm * POINTS_PER_MM),
                real(self.height_mm * POINTS_PER_MM),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(win_ansi(title)),
            "Producer" => Object::string_literal(concat!("weekgrid ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| anyhow!("Failed to write PDF: {}", e))?;
        Ok(bytes)
    }
}

impl DrawingSurface for PdfSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.op("q", vec![]);
        self.set_fill(color);
        self.rect_path(rect);
        self.op("f", vec![]);
        self.op("Q", vec![]);
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        self.op("q", vec![]);
        self.set_stroke(stroke);
        self.rect_path(rect);
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Rgb, stroke: Stroke) {
        self.op("q", vec![]);
        self.set_fill(fill);
        self.set_stroke(stroke);
        self.rounded_path(rect, radius);
        self.op("B", vec![]);
        self.op("Q", vec![]);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let encoded = win_ansi(text);
        let width_mm = text_width_pt(&encoded, style.size, style.bold) / POINTS_PER_MM;
        let left = match style.align {
            Align::Left => x,
            Align::Center => x - width_mm / 2.0,
            Align::Right => x - width_mm,
        };
        let font = if style.bold { BOLD_FONT } else { REGULAR_FONT };
        let (tx, ty) = (self.x(left), self.y(y));

        self.op("q", vec![]);
        self.set_fill(style.color);
        self.op("BT", vec![]);
        self.op("Tf", vec![Object::Name(font.to_vec()), real(style.size)]);
        self.op("Td", vec![real(tx), real(ty)]);
        self.op("Tj", vec![Object::string_literal(encoded)]);
        self.op("ET", vec![]);
        self.op("Q", vec![]);
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Map text onto WinAnsi bytes; characters outside it become '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95, // bullet
            '\u{2026}' => 0x85, // ellipsis
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Width of encoded text in points.
fn text_width_pt(encoded: &[u8], size: f32, bold: bool) -> f32 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let units: u32 = encoded
        .iter()
        .map(|&b| match b {
            32..=126 => table[(b - 32) as usize] as u32,
            0x95 => 350,
            0x85 | 0x97 => 1000,
            0x91 | 0x92 if bold => 278,
            0x91 | 0x92 => 222,
            0x93 | 0x94 if bold => 500,
            0x93 | 0x94 => 333,
            // en dash and most Latin-1 letters
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

// Advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_single_page_pdf() {
        let mut surface = PdfSurface::new(297.0, 210.0);
        surface.fill_rect(Rect::new(15.0, 30.0, 100.0, 20.0), Rgb(248, 249, 250));
        surface.rounded_rect(
            Rect::new(20.0, 35.0, 30.0, 10.0),
            1.0,
            Rgb(155, 89, 182),
            Stroke::solid(Rgb(115, 49, 142), 0.3),
        );
        surface.stroke_rect(Rect::new(15.0, 30.0, 100.0, 20.0), Stroke::dashed(Rgb(52, 152, 219), 0.8, 3.0, 3.0));
        surface.text("NOW", 40.0, 45.0, TextStyle::new(7.0, Rgb::WHITE).bold().centered());

        let bytes = surface.finish("Weekly Availability Schedule").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let operators: Vec<&str> = content.operations.iter().map(|op| op.operator.as_str()).collect();
        assert!(operators.contains(&"re"));
        assert!(operators.contains(&"B"));
        assert!(operators.contains(&"Tj"));
        assert!(operators.contains(&"d"));
    }

    #[test]
    fn y_axis_is_flipped() {
        let surface = PdfSurface::new(297.0, 210.0);
        assert!((surface.y(0.0) - 210.0 * POINTS_PER_MM).abs() < 1e-3);
        assert!(surface.y(210.0).abs() < 1e-3);
    }

    #[test]
    fn win_ansi_maps_common_punctuation() {
        assert_eq!(win_ansi("a \u{2022} b"), vec![b'a', b' ', 0x95, b' ', b'b']);
        assert_eq!(win_ansi("Caf\u{e9}"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(win_ansi("\u{65e5}"), vec![b'?']);
    }

    #[test]
    fn bold_text_is_wider() {
        let text = win_ansi("Planning Session");
        assert!(text_width_pt(&text, 10.0, true) > text_width_pt(&text, 10.0, false));
        assert_eq!(text_width_pt(b"0", 10.0, false), 5.56);
    }

    #[test]
    fn punctuation_outside_ascii_has_its_own_width() {
        assert_eq!(text_width_pt(&win_ansi("\u{2022}"), 10.0, false), 3.5);
        assert_eq!(text_width_pt(&win_ansi("\u{2026}"), 10.0, true), 10.0);
        assert_eq!(text_width_pt(&win_ansi("\u{2013}"), 10.0, false), 5.56);
        assert_eq!(text_width_pt(&win_ansi("\u{201C}"), 10.0, false), 3.33);
        assert_eq!(text_width_pt(&win_ansi("\u{2019}"), 10.0, true), 2.78);
    }
}
