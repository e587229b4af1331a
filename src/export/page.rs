use chrono::NaiveDateTime;

use super::surface::{DrawingSurface, Rect, Stroke, TextStyle};
use crate::render::{
    block_extent, category_color, truncate_label, Palette, RenderFrame, Renderer, Rgb,
};
use crate::schedule::{compact_range, format_hours, Category};

pub const DOCUMENT_TITLE: &str = "WEEKLY AVAILABILITY SCHEDULE";

/// Page layout in millimetres (A4 landscape by default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Space above the grid taken by the title block.
    pub title_height: f32,
    pub time_column_width: f32,
    /// Reserved to the right of the grid for the legend.
    pub legend_width: f32,
    pub stats_height: f32,
    /// Vertical room between the stats panel and the footer line.
    pub footer_gap: f32,
    pub panel_gap: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 297.0,
            page_height: 210.0,
            margin: 15.0,
            title_height: 15.0,
            time_column_width: 25.0,
            legend_width: 45.0,
            stats_height: 20.0,
            footer_gap: 5.0,
            panel_gap: 5.0,
        }
    }
}

impl PageGeometry {
    pub fn grid_top(&self) -> f32 {
        self.margin + self.title_height
    }

    pub fn stats_top(&self) -> f32 {
        self.page_height - self.margin - self.footer_gap - self.stats_height
    }

    pub fn grid_rect(&self) -> Rect {
        let width = self.page_width - 2.0 * self.margin - self.legend_width - self.panel_gap;
        let height = self.stats_top() - self.panel_gap - self.grid_top();
        Rect::new(self.margin, self.grid_top(), width, height)
    }

    pub fn day_column_width(&self, days: usize) -> f32 {
        (self.grid_rect().w - self.time_column_width) / days.max(1) as f32
    }

    /// One extra row holds the day headers.
    pub fn row_height(&self, slots: usize) -> f32 {
        self.grid_rect().h / (slots + 1) as f32
    }

    /// Rectangle of the grid cell at `(slot, day)`.
    pub fn cell_rect(&self, slot: usize, day: usize, slots: usize, days: usize) -> Rect {
        let grid = self.grid_rect();
        let row_height = self.row_height(slots);
        let column_width = self.day_column_width(days);
        Rect::new(
            grid.x + self.time_column_width + day as f32 * column_width,
            grid.y + row_height * (slot + 1) as f32,
            column_width,
            row_height,
        )
    }
}

/// Draws the printable page onto any [`DrawingSurface`].
pub struct PageExporter<'s, S: DrawingSurface> {
    surface: &'s mut S,
    geometry: PageGeometry,
    generated_at: NaiveDateTime,
}

const BLOCK_PADDING: f32 = 1.0;
const BLOCK_RADIUS: f32 = 1.0;

impl<'s, S: DrawingSurface> PageExporter<'s, S> {
    pub fn new(surface: &'s mut S, geometry: PageGeometry, generated_at: NaiveDateTime) -> Self {
        Self { surface, geometry, generated_at }
    }

    fn draw_title(&mut self, frame: &RenderFrame<'_>) {
        let g = self.geometry;
        let center = g.page_width / 2.0;

        self.surface.text(
            DOCUMENT_TITLE,
            center,
            g.margin - 5.0,
            TextStyle::new(24.0, Palette::HEADER).bold().centered(),
        );

        let subtitle = subtitle(frame);
        if !subtitle.is_empty() {
            self.surface.text(
                &subtitle,
                center,
                g.margin + 5.0,
                TextStyle::new(12.0, Palette::SUBTITLE).centered(),
            );
        }

        let footer = TextStyle::new(10.0, Palette::SUBTITLE);
        let generated = format!(
            "Generated: {}",
            self.generated_at.format("%A, %B %-d, %Y, %I:%M %p")
        );
        self.surface.text(&generated, g.margin, g.page_height - g.margin, footer);
        self.surface.text(
            "Page 1/1",
            g.page_width - g.margin,
            g.page_height - g.margin,
            footer.right(),
        );
    }

    fn draw_headers(&mut self, frame: &RenderFrame<'_>) {
        let g = self.geometry;
        let grid = g.grid_rect();
        let slots = frame.layout.slot_count();
        let row_height = g.row_height(slots);
        let column_width = g.day_column_width(frame.layout.day_count());

        self.surface.fill_rect(grid, Rgb::WHITE);
        self.surface.stroke_rect(grid, Stroke::solid(Palette::CONTAINER, 0.2));

        let white = TextStyle::new(11.0, Rgb::WHITE).bold().centered();
        for (index, day) in frame.layout.days.iter().enumerate() {
            let header = Rect::new(
                grid.x + g.time_column_width + index as f32 * column_width,
                grid.y,
                column_width,
                row_height,
            );
            self.surface.fill_rect(header, Palette::HEADER);

            let short: String = day.chars().take(3).collect::<String>().to_uppercase();
            let mid = header.y + row_height / 2.0;
            self.surface.text(&short, header.center_x(), mid, white);
            self.surface.text(day, header.center_x(), mid + 4.0, TextStyle { size: 8.0, ..white });
        }

        let corner = Rect::new(grid.x, grid.y, g.time_column_width, row_height);
        self.surface.fill_rect(corner, Palette::HEADER);
        self.surface.text("TIME", corner.center_x(), corner.y + row_height / 2.0, white);
    }

    fn draw_time_column(&mut self, frame: &RenderFrame<'_>) {
        let g = self.geometry;
        let grid = g.grid_rect();
        let row_height = g.row_height(frame.layout.slot_count());

        for (slot, row) in frame.layout.rows.iter().enumerate() {
            let cell = Rect::new(
                grid.x,
                grid.y + row_height * (slot + 1) as f32,
                g.time_column_width,
                row_height,
            );
            self.surface.fill_rect(cell, Palette::slot_background(slot));
            self.surface.text(
                &row.display_label(),
                cell.center_x(),
                cell.y + row_height / 2.0,
                TextStyle::new(9.0, Palette::SLOT_TEXT).centered(),
            );
        }
    }

    fn draw_cells(&mut self, frame: &RenderFrame<'_>) {
        let (slots, days) = (frame.layout.slot_count(), frame.layout.day_count());
        for slot in 0..slots {
            for day in 0..days {
                let cell = self.geometry.cell_rect(slot, day, slots, days);
                self.surface.fill_rect(cell, Palette::slot_background(slot));
            }
        }
    }

    fn draw_activities(&mut self, frame: &RenderFrame<'_>) {
        let (slots, days) = (frame.layout.slot_count(), frame.layout.day_count());
        let row_height = self.geometry.row_height(slots);

        for (slot, day, placed) in frame.layout.placed() {
            let extent = block_extent(placed, row_height);
            if extent.height <= 0.0 {
                continue;
            }
            let activity = placed.activity(frame.document);
            let color = category_color(activity.category());
            let cell = self.geometry.cell_rect(slot, day, slots, days);

            let block = Rect::new(
                cell.x + BLOCK_PADDING,
                cell.y + extent.top + BLOCK_PADDING,
                cell.w - 2.0 * BLOCK_PADDING,
                (extent.height - 2.0 * BLOCK_PADDING).max(0.0),
            );
            self.surface.rounded_rect(block, BLOCK_RADIUS, color, Stroke::solid(color.darken(40), 0.3));

            let text_x = block.center_x();
            let text_y = block.y + extent.height / 2.0 - 2.0 * BLOCK_PADDING;
            let label = TextStyle::new(7.0, Rgb::WHITE).bold().centered();
            self.surface.text(&truncate_label(&activity.title), text_x, text_y, label);

            if placed.spans_multiple_rows() {
                let range = compact_range(&activity.start_time, &activity.end_time);
                self.surface.text(&range, text_x, text_y + 3.0, TextStyle { size: 6.0, ..label });
            }
        }
    }

    fn draw_grid_lines(&mut self, frame: &RenderFrame<'_>) {
        let g = self.geometry;
        let grid = g.grid_rect();
        let (slots, days) = (frame.layout.slot_count(), frame.layout.day_count());
        let row_height = g.row_height(slots);
        let thin = Stroke::solid(Palette::GRID_LINE, 0.2);

        for slot in 0..slots {
            for day in 0..days {
                self.surface.stroke_rect(g.cell_rect(slot, day, slots, days), thin);
            }
            let time_cell = Rect::new(grid.x, grid.y + row_height * (slot + 1) as f32, g.time_column_width, row_height);
            self.surface.stroke_rect(time_cell, thin);
        }

        let frame_stroke = Stroke::solid(Palette::FRAME, 0.5);
        self.surface.stroke_rect(grid, frame_stroke);
        self.surface.stroke_rect(
            Rect::new(grid.x + g.time_column_width, grid.y, grid.w - g.time_column_width, row_height),
            frame_stroke,
        );
        self.surface.stroke_rect(Rect::new(grid.x, grid.y, g.time_column_width, grid.h), frame_stroke);
    }

    fn draw_now(&mut self, frame: &RenderFrame<'_>) {
        let Some(now) = frame.now else {
            return;
        };
        let (slots, days) = (frame.layout.slot_count(), frame.layout.day_count());
        if now.slot >= slots || now.day >= days {
            return;
        }
        let cell = self.geometry.cell_rect(now.slot, now.day, slots, days);
        self.surface
            .stroke_rect(cell.inset(2.0), Stroke::dashed(Palette::NOW, 0.8, 3.0, 3.0));
        self.surface.text(
            "NOW",
            cell.center_x(),
            cell.bottom() - 3.0,
            TextStyle::new(7.0, Palette::NOW).bold().centered(),
        );
    }

    fn draw_legend(&mut self) {
        let g = self.geometry;
        let grid = g.grid_rect();
        let x = grid.right() + g.panel_gap;
        let top = grid.y;

        self.surface.text(
            "LEGEND",
            x + g.legend_width / 2.0,
            top,
            TextStyle::new(10.0, Palette::HEADER).bold().centered(),
        );

        for (index, category) in Category::ALL.iter().enumerate() {
            let y = top + 10.0 + index as f32 * 8.0;
            let swatch = Rect::new(x, y - 2.0, 6.0, 6.0);
            self.surface.fill_rect(swatch, category_color(Some(*category)));
            self.surface.stroke_rect(swatch, Stroke::solid(Palette::FRAME, 0.1));
            self.surface.text(
                category.short_label(),
                x + 10.0,
                y + 2.0,
                TextStyle::new(8.0, Palette::HEADER),
            );
        }
    }

    fn draw_statistics(&mut self, frame: &RenderFrame<'_>) {
        let g = self.geometry;
        let stats = frame.statistics;
        let panel = Rect::new(g.margin, g.stats_top(), g.grid_rect().w, g.stats_height);

        self.surface.fill_rect(panel, Palette::SLOT);
        self.surface.stroke_rect(panel, Stroke::solid(Palette::GRID_LINE, 0.3));
        self.surface.text(
            "SCHEDULE STATISTICS",
            panel.x + 10.0,
            panel.y + 7.0,
            TextStyle::new(9.0, Palette::HEADER).bold(),
        );

        let figures = [
            ("Total Hours:", format_hours(stats.total_hours)),
            ("Free Time:", format_hours(stats.hours(Category::FreeTime))),
            ("Work Hours:", format_hours(stats.hours(Category::Work))),
            ("Meetings:", format_hours(stats.hours(Category::Meeting))),
            ("Activities:", stats.count.to_string()),
        ];
        let label = TextStyle::new(8.0, Palette::HEADER);
        for (index, (name, value)) in figures.iter().enumerate() {
            let x = panel.x + 10.0 + index as f32 * 30.0;
            self.surface.text(name, x, panel.y + 13.0, label);
            self.surface.text(value, x, panel.y + 17.5, label.bold());
        }

        let availability = format!("{:.1}% Available", stats.free_time_percentage());
        self.surface.text(
            &availability,
            panel.right() - 10.0,
            panel.y + 14.0,
            TextStyle::new(9.0, category_color(Some(Category::FreeTime))).bold().right(),
        );
    }
}

impl<S: DrawingSurface> Renderer for PageExporter<'_, S> {
    type Output = ();

    fn render(&mut self, frame: &RenderFrame<'_>) {
        self.draw_title(frame);
        self.draw_headers(frame);
        self.draw_time_column(frame);
        self.draw_cells(frame);
        self.draw_activities(frame);
        self.draw_grid_lines(frame);
        self.draw_now(frame);
        self.draw_legend();
        self.draw_statistics(frame);
    }
}

/// "7:00 AM - 8:00 PM • Monday to Sunday"
fn subtitle(frame: &RenderFrame<'_>) -> String {
    let slots = &frame.document.time_slots;
    let days = &frame.document.week_days;
    let mut parts = Vec::new();
    if let (Some(first), Some(last)) = (slots.first(), slots.last()) {
        parts.push(format!("{} - {}", first, last));
    }
    if let (Some(first), Some(last)) = (days.first(), days.last()) {
        parts.push(format!("{} to {}", first, last));
    }
    parts.join(" \u{2022} ")
}
