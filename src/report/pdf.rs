use crate::errors::{AppError, AppResult};
use crate::report::chart::{OTHER_LABEL, StackedChart, X_LABEL, Y_LABEL};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Segment colours, cycled per series.
const PALETTE: [(f32, f32, f32); 10] = [
    (0.298, 0.447, 0.690),
    (0.867, 0.518, 0.322),
    (0.333, 0.659, 0.408),
    (0.769, 0.306, 0.322),
    (0.506, 0.447, 0.702),
    (0.576, 0.471, 0.376),
    (0.855, 0.545, 0.765),
    (0.800, 0.725, 0.455),
    (0.392, 0.710, 0.804),
    (0.549, 0.549, 0.549),
];
const OTHER_COLOUR: (f32, f32, f32) = (0.75, 0.75, 0.75);

const LEGEND_LABEL_CHARS: usize = 28;

/// Plot area in page coordinates.
struct Frame {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    lo: f64,
    hi: f64,
}

impl Frame {
    fn y(&self, value: f64) -> f32 {
        let t = (value - self.lo) / (self.hi - self.lo);
        self.y0 + (t as f32) * (self.y1 - self.y0)
    }
}

/// Single-page PDF rendering of a [`StackedChart`] (A4 landscape).
pub struct PdfChart {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
    font_id: Ref,

    page_w: f32,
    page_h: f32,
    margin: f32,
    legend_w: f32,

    font_size: f32,
    tick_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfChart {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfChart {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            next_id: 4,
            font_id,

            page_w: 842.0,
            page_h: 595.0,
            margin: 50.0,
            legend_w: 170.0,

            font_size: 10.0,
            tick_font_size: 8.0,
            title_font_size: 14.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Lay out the whole chart on a new page.
    pub fn draw(mut self, chart: &StackedChart) -> Self {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), self.font_id);
        drop(page);

        let (lo, hi) = chart.value_range();
        let step = tick_step(hi - lo);
        let frame = Frame {
            x0: self.margin + 45.0,
            y0: self.margin + 50.0,
            x1: self.page_w - self.margin - self.legend_w,
            y1: self.page_h - self.margin - 35.0,
            lo: (lo / step).floor() * step,
            hi: ((hi / step).ceil() * step).max((lo / step).floor() * step + step),
        };

        let mut content = Content::new();

        if let Some(title) = &chart.title {
            self.draw_text(
                &mut content,
                frame.x0,
                self.page_h - self.margin + 10.0,
                self.title_font_size,
                title,
            );
        }

        self.draw_y_axis(&mut content, &frame, step);
        self.draw_bars(&mut content, &frame, chart);
        self.draw_x_axis(&mut content, &frame, chart);
        self.draw_legend(&mut content, &frame, chart);

        self.pdf.stream(content_id, &content.finish());
        self
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        self.draw_text_matrix(content, [1.0, 0.0, 0.0, 1.0, x, y], size, text);
    }

    fn draw_text_matrix(&self, content: &mut Content, matrix: [f32; 6], size: f32, text: &str) {
        let bytes = latin_text(text);
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix(matrix);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn draw_line(&self, content: &mut Content, from: (f32, f32), to: (f32, f32), grey: f32) {
        content.save_state();
        content.set_stroke_rgb(grey, grey, grey);
        content.set_line_width(0.6);
        content.move_to(from.0, from.1);
        content.line_to(to.0, to.1);
        content.stroke();
        content.restore_state();
    }

    fn draw_y_axis(&self, content: &mut Content, frame: &Frame, step: f64) {
        let mut v = frame.lo;
        while v <= frame.hi + step * 1e-6 {
            let y = frame.y(v);
            self.draw_line(content, (frame.x0, y), (frame.x1, y), 0.88);
            let label = trim_number(v);
            let w = approx_width(&label, self.tick_font_size);
            self.draw_text(content, frame.x0 - w - 6.0, y - 3.0, self.tick_font_size, &label);
            v += step;
        }

        self.draw_line(content, (frame.x0, frame.y0), (frame.x0, frame.y1), 0.2);

        // rotated label, reading bottom to top
        let mid = (frame.y0 + frame.y1) / 2.0 - approx_width(Y_LABEL, self.font_size) / 2.0;
        self.draw_text_matrix(
            content,
            [0.0, 1.0, -1.0, 0.0, self.margin - 5.0, mid],
            self.font_size,
            Y_LABEL,
        );
    }

    fn draw_bars(&self, content: &mut Content, frame: &Frame, chart: &StackedChart) {
        let slot = (frame.x1 - frame.x0) / chart.months.len().max(1) as f32;

        for (i, series) in chart.series.iter().enumerate() {
            let (r, g, b) = series_colour(i, &series.label);
            content.save_state();
            content.set_fill_rgb(r, g, b);
            for seg in &series.segments {
                if seg.height == 0.0 {
                    continue;
                }
                let x = frame.x0 + seg.month_index as f32 * slot + slot * 0.1;
                let y = frame.y(seg.bottom);
                content.rect(x, y, slot * 0.8, frame.y(seg.top()) - y);
            }
            content.fill_nonzero();
            content.restore_state();
        }
    }

    fn draw_x_axis(&self, content: &mut Content, frame: &Frame, chart: &StackedChart) {
        let zero = frame.y(0.0);
        self.draw_line(content, (frame.x0, zero), (frame.x1, zero), 0.2);

        let n = chart.months.len();
        let slot = (frame.x1 - frame.x0) / n.max(1) as f32;
        let every = n.div_ceil(18).max(1);
        let (c, s) = (0.7071_f32, 0.7071_f32);

        for (i, month) in chart.months.iter().enumerate().step_by(every) {
            let x = frame.x0 + (i as f32 + 0.5) * slot;
            let label = month.format("%Y-%m").to_string();
            // 45° slant going down and to the right of the tick
            self.draw_text_matrix(
                content,
                [c, -s, s, c, x - 3.0, frame.y0 - 8.0],
                self.tick_font_size,
                &label,
            );
        }

        let w = approx_width(X_LABEL, self.font_size);
        self.draw_text(
            content,
            (frame.x0 + frame.x1) / 2.0 - w / 2.0,
            self.margin - 25.0,
            self.font_size,
            X_LABEL,
        );
    }

    fn draw_legend(&self, content: &mut Content, frame: &Frame, chart: &StackedChart) {
        let x = frame.x1 + 20.0;
        let mut y = frame.y1 - 12.0;

        for (i, series) in chart.series.iter().enumerate() {
            let (r, g, b) = series_colour(i, &series.label);
            content.save_state();
            content.set_fill_rgb(r, g, b);
            content.rect(x, y, 10.0, 10.0);
            content.fill_nonzero();
            content.restore_state();

            let label = if series.label.chars().count() > LEGEND_LABEL_CHARS {
                let mut l: String = series.label.chars().take(LEGEND_LABEL_CHARS - 3).collect();
                l.push_str("...");
                l
            } else {
                series.label.clone()
            };
            self.draw_text(content, x + 15.0, y + 1.5, self.font_size, &label);

            y -= 16.0;
            if y < frame.y0 {
                break;
            }
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
        drop(pages);

        self.pdf.finish()
    }

    pub fn save(self, path: &Path) -> AppResult<()> {
        let bytes = self.finish();
        let mut f = File::create(path)
            .map_err(|e| AppError::from(io::Error::other(format!("PDF write error: {e}"))))?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

fn series_colour(index: usize, label: &str) -> (f32, f32, f32) {
    if label == OTHER_LABEL {
        OTHER_COLOUR
    } else {
        PALETTE[index % PALETTE.len()]
    }
}

/// A "nice" grid step (1, 2 or 5 × 10^k) giving about five ticks.
fn tick_step(span: f64) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let raw = span / 5.0;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

fn trim_number(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Helvetica averages about half an em per character.
fn approx_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// Type1 base fonts only cover Latin-1; anything else becomes '?'.
fn latin_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}
