use eframe::egui;
use egui::{Color32, FontId, Pos2, Rect, RichText, Ui};

use super::theme::color;
use crate::render::{
    block_extent, category_color, Palette, RenderFrame, Renderer, Rgb,
};
use crate::schedule::{compact_range, format_hours, Category, GridLayout, PlacedActivity, Statistics};

const TIME_COLUMN_WIDTH: f32 = 90.0;
const HEADER_HEIGHT: f32 = 40.0;
const MIN_DAY_WIDTH: f32 = 110.0;
const BLOCK_MARGIN: f32 = 2.0;

/// Pixel geometry of the on-screen grid, relative to the grid's top-left.
///
/// Each row is `pixels_per_hour` scaled by its own nominal minutes, so a
/// block of `height_units` rows is exactly its duration in hours tall.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenGeometry {
    pub day_width: f32,
    row_tops: Vec<f32>,
    row_heights: Vec<f32>,
}

impl ScreenGeometry {
    pub fn new(layout: &GridLayout, pixels_per_hour: f32, available_width: f32) -> Self {
        let days = layout.day_count().max(1) as f32;
        let day_width = ((available_width - TIME_COLUMN_WIDTH) / days).max(MIN_DAY_WIDTH);

        let row_heights: Vec<f32> = layout
            .rows
            .iter()
            .map(|row| pixels_per_hour * row.nominal_minutes as f32 / 60.0)
            .collect();
        let mut row_tops = Vec::with_capacity(row_heights.len());
        let mut y = HEADER_HEIGHT;
        for height in &row_heights {
            row_tops.push(y);
            y += height;
        }

        Self { day_width, row_tops, row_heights }
    }

    pub fn width(&self, days: usize) -> f32 {
        TIME_COLUMN_WIDTH + self.day_width * days as f32
    }

    pub fn height(&self) -> f32 {
        HEADER_HEIGHT + self.row_heights.iter().sum::<f32>()
    }

    pub fn row_height(&self, slot: usize) -> f32 {
        self.row_heights.get(slot).copied().unwrap_or(0.0)
    }

    pub fn cell_rect(&self, origin: Pos2, slot: usize, day: usize) -> Rect {
        Rect::from_min_size(
            egui::pos2(
                origin.x + TIME_COLUMN_WIDTH + day as f32 * self.day_width,
                origin.y + self.row_tops.get(slot).copied().unwrap_or(HEADER_HEIGHT),
            ),
            egui::vec2(self.day_width, self.row_height(slot)),
        )
    }

    /// Block for an activity starting at `(slot, day)`. `None` when it has no
    /// height to draw.
    pub fn block_rect(&self, origin: Pos2, slot: usize, day: usize, placed: &PlacedActivity) -> Option<Rect> {
        let extent = block_extent(placed, self.row_height(slot));
        if extent.height <= 0.0 {
            return None;
        }
        let cell = self.cell_rect(origin, slot, day);
        Some(Rect::from_min_size(
            egui::pos2(cell.min.x + BLOCK_MARGIN, cell.min.y + extent.top + BLOCK_MARGIN),
            egui::vec2(
                (cell.width() - 2.0 * BLOCK_MARGIN).max(0.0),
                (extent.height - 2.0 * BLOCK_MARGIN).max(1.0),
            ),
        ))
    }
}

#[derive(Default)]
pub struct ScreenResult {
    /// Index into the document's activities of a clicked block.
    pub clicked_activity: Option<usize>,
}

/// Paints legend, statistics and the week grid into a `Ui`.
pub struct ScreenRenderer<'u> {
    ui: &'u mut Ui,
    pixels_per_hour: f32,
}

impl<'u> ScreenRenderer<'u> {
    pub fn new(ui: &'u mut Ui, pixels_per_hour: f32) -> Self {
        Self { ui, pixels_per_hour }
    }
}

impl Renderer for ScreenRenderer<'_> {
    type Output = ScreenResult;

    fn render(&mut self, frame: &RenderFrame<'_>) -> ScreenResult {
        render_legend(self.ui);
        self.ui.add_space(6.0);
        render_statistics(self.ui, frame.statistics);
        self.ui.add_space(10.0);

        let pixels_per_hour = self.pixels_per_hour;
        let mut result = ScreenResult::default();
        egui::ScrollArea::both().auto_shrink([false, false]).show(self.ui, |ui| {
            result = render_grid(ui, frame, pixels_per_hour);
        });
        result
    }
}

pub fn render_legend(ui: &mut Ui) {
    ui.horizontal_wrapped(|ui| {
        for category in Category::ALL {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter().rect_filled(swatch, 3.0, color(category_color(Some(category))));
            ui.label(RichText::new(category.legend_label()).size(13.0));
            ui.add_space(12.0);
        }
    });
}

pub fn render_statistics(ui: &mut Ui, stats: &Statistics) {
    let figures = [
        ("Total Hours", format_hours(stats.total_hours)),
        ("Free Time", format_hours(stats.hours(Category::FreeTime))),
        ("Work Hours", format_hours(stats.hours(Category::Work))),
        ("Activities", stats.count.to_string()),
    ];

    ui.horizontal(|ui| {
        for (name, value) in figures {
            egui::Frame::none()
                .fill(Color32::WHITE)
                .stroke(egui::Stroke::new(1.0, color(Palette::GRID_LINE)))
                .rounding(egui::Rounding::same(6.0))
                .inner_margin(egui::Margin::symmetric(14.0, 8.0))
                .show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(value).size(18.0).strong().color(color(Palette::HEADER)));
                        ui.label(RichText::new(name).size(12.0).color(color(Palette::SUBTITLE)));
                    });
                });
        }
    });
}

fn render_grid(ui: &mut Ui, frame: &RenderFrame<'_>, pixels_per_hour: f32) -> ScreenResult {
    let mut result = ScreenResult::default();
    let layout = frame.layout;
    let days = layout.day_count();
    let slots = layout.slot_count();
    let geometry = ScreenGeometry::new(layout, pixels_per_hour, ui.available_width());

    let (grid_rect, _) = ui.allocate_exact_size(
        egui::vec2(geometry.width(days), geometry.height()),
        egui::Sense::hover(),
    );
    let origin = grid_rect.min;
    let painter = ui.painter();

    painter.rect_filled(grid_rect, 0.0, Color32::WHITE);

    // Header row
    let header_font = FontId::proportional(14.0);
    let corner = Rect::from_min_size(origin, egui::vec2(TIME_COLUMN_WIDTH, HEADER_HEIGHT));
    painter.rect_filled(corner, 0.0, color(Palette::HEADER));
    painter.text(corner.center(), egui::Align2::CENTER_CENTER, "Time / Day", header_font.clone(), Color32::WHITE);
    for (index, day) in layout.days.iter().enumerate() {
        let header = Rect::from_min_size(
            egui::pos2(origin.x + TIME_COLUMN_WIDTH + index as f32 * geometry.day_width, origin.y),
            egui::vec2(geometry.day_width, HEADER_HEIGHT),
        );
        painter.rect_filled(header, 0.0, color(Palette::HEADER));
        painter.text(header.center(), egui::Align2::CENTER_CENTER, day, header_font.clone(), Color32::WHITE);
    }

    // Time labels and cell backgrounds
    let line = egui::Stroke::new(1.0, color(Palette::GRID_LINE));
    for (slot, row) in layout.rows.iter().enumerate() {
        let background = color(Palette::slot_background(slot));
        let label_cell = Rect::from_min_size(
            egui::pos2(origin.x, geometry.cell_rect(origin, slot, 0).min.y),
            egui::vec2(TIME_COLUMN_WIDTH, geometry.row_height(slot)),
        );
        painter.rect_filled(label_cell, 0.0, background);
        painter.text(
            label_cell.center(),
            egui::Align2::CENTER_CENTER,
            row.display_label(),
            FontId::proportional(12.0),
            color(Palette::SLOT_TEXT),
        );
        for day in 0..days {
            painter.rect_filled(geometry.cell_rect(origin, slot, day), 0.0, background);
        }
    }

    let now_cell = frame
        .now
        .filter(|now| now.slot < slots && now.day < days)
        .map(|now| geometry.cell_rect(origin, now.slot, now.day));
    if let Some(cell) = now_cell {
        painter.rect_filled(cell, 0.0, color(Palette::NOW).gamma_multiply(0.15));
    }

    // Grid lines under the blocks, so multi-row blocks cover the lines they span
    for slot in 0..slots {
        for day in 0..days {
            painter.rect_stroke(geometry.cell_rect(origin, slot, day), 0.0, line);
        }
    }
    painter.rect_stroke(grid_rect, 0.0, egui::Stroke::new(1.0, color(Palette::CONTAINER)));

    for (slot, day, placed) in layout.placed() {
        let Some(block) = geometry.block_rect(origin, slot, day, placed) else {
            continue;
        };
        let activity = placed.activity(frame.document);
        let fill = category_color(activity.category());
        let range = compact_range(&activity.start_time, &activity.end_time);
        paint_block(painter, block, fill, [activity.title.as_str(), range.as_str(), activity.description_text()]);

        let response = ui
            .interact(block, ui.id().with(("activity", placed.activity_index)), egui::Sense::click())
            .on_hover_text(activity.tooltip());
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() {
            result.clicked_activity = Some(placed.activity_index);
        }
    }

    if let Some(cell) = now_cell {
        let painter = ui.painter();
        painter.rect_stroke(cell.shrink(1.0), 2.0, egui::Stroke::new(2.0, color(Palette::NOW)));
    }

    result
}

/// Top offset, font size and opacity of the title, range and description lines.
const BLOCK_LINES: [(f32, f32, f32); 3] = [(4.0, 13.0, 1.0), (21.0, 11.0, 0.85), (36.0, 11.0, 0.75)];

/// How many of the block's text lines fit in a block of this height.
/// The title is always drawn and clipped when the block is short.
fn block_line_count(height: f32) -> usize {
    if height > 54.0 {
        3
    } else if height > 36.0 {
        2
    } else {
        1
    }
}

/// `lines` are title, time range and description, in that order.
fn paint_block(painter: &egui::Painter, rect: Rect, fill: Rgb, lines: [&str; 3]) {
    painter.rect(rect, 4.0, color(fill), egui::Stroke::new(1.0, color(fill.darken(40))));

    let clipped = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    let text_left = rect.min.x + 6.0;
    let visible = block_line_count(rect.height());
    for (text, (offset, size, opacity)) in lines.iter().zip(BLOCK_LINES).take(visible) {
        if text.is_empty() {
            continue;
        }
        clipped.text(
            egui::pos2(text_left, rect.min.y + offset),
            egui::Align2::LEFT_TOP,
            *text,
            FontId::proportional(size),
            Color32::WHITE.gamma_multiply(opacity),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{layout, ScheduleDocument};

    fn default_geometry() -> (GridLayout, ScreenGeometry) {
        let grid = layout(&ScheduleDocument::default());
        let geometry = ScreenGeometry::new(&grid, 50.0, 1000.0);
        (grid, geometry)
    }

    #[test]
    fn hourly_rows_are_fifty_pixels() {
        let (grid, geometry) = default_geometry();
        assert_eq!(geometry.row_height(0), 50.0);
        assert_eq!(geometry.height(), HEADER_HEIGHT + 50.0 * grid.slot_count() as f32);
        assert_eq!(geometry.day_width, (1000.0 - TIME_COLUMN_WIDTH) / 7.0);
    }

    #[test]
    fn ninety_minute_block_is_seventy_five_pixels() {
        let (grid, geometry) = default_geometry();
        let origin = Pos2::ZERO;
        let (slot, day) = (3, 1);
        let placed = grid.cell(slot, day).unwrap();

        let block = geometry.block_rect(origin, slot, day, placed).unwrap();
        assert!((block.height() - (75.0 - 2.0 * BLOCK_MARGIN)).abs() < 1e-3);
        assert_eq!(block.min.y, HEADER_HEIGHT + 3.0 * 50.0 + BLOCK_MARGIN);
    }

    #[test]
    fn half_hour_rows_keep_blocks_in_hours() {
        let mut document = ScheduleDocument::default();
        document.time_slots = vec!["9:00 AM".into(), "9:30 AM".into(), "10:00 AM".into(), "10:30 AM".into()];
        document.activities.retain(|a| a.title == "Team Meeting");
        let grid = layout(&document);
        let geometry = ScreenGeometry::new(&grid, 50.0, 800.0);

        assert_eq!(geometry.row_height(0), 25.0);
        let placed = grid.cell(2, 1).unwrap();
        let block = geometry.block_rect(Pos2::ZERO, 2, 1, placed).unwrap();
        assert!((block.height() + 2.0 * BLOCK_MARGIN - 75.0).abs() < 1e-3);
    }

    #[test]
    fn zero_length_blocks_are_not_drawn() {
        let mut document = ScheduleDocument::default();
        document.activities[0].end_time = document.activities[0].start_time.clone();
        let grid = layout(&document);
        let geometry = ScreenGeometry::new(&grid, 50.0, 1000.0);
        let (slot, day) = grid.position_of(0).unwrap();
        assert!(geometry.block_rect(Pos2::ZERO, slot, day, grid.cell(slot, day).unwrap()).is_none());
    }

    #[test]
    fn tall_blocks_show_the_description() {
        let (grid, geometry) = default_geometry();
        // Team meeting: 90 minutes, tall enough for a description
        let meeting = geometry.block_rect(Pos2::ZERO, 3, 1, grid.cell(3, 1).unwrap()).unwrap();
        assert_eq!(block_line_count(meeting.height()), 3);

        assert_eq!(block_line_count(50.0 - 2.0 * BLOCK_MARGIN), 2);
        assert_eq!(block_line_count(30.0), 1);
        assert_eq!(block_line_count(0.5), 1);
    }

    #[test]
    fn narrow_windows_keep_a_minimum_column() {
        let grid = layout(&ScheduleDocument::default());
        let geometry = ScreenGeometry::new(&grid, 50.0, 300.0);
        assert_eq!(geometry.day_width, MIN_DAY_WIDTH);
    }
}
