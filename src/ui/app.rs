use anyhow::{Context, Result};
use chrono::Local;
use eframe::egui;
use egui::{Color32, RichText};
use log::{info, warn};
use std::sync::mpsc::{channel, Receiver, Sender};

use super::notify::Notifier;
use super::theme;
use super::views::ScreenRenderer;
use crate::config::Config;
use crate::export;
use crate::render::{Palette, RenderFrame, Renderer};
use crate::schedule::{dated_file_name, load_schedule, ScheduleDocument, ScheduleStore};

pub struct WeekGridApp {
    config: Config,
    store: ScheduleStore,
    notifier: Notifier,

    // JSON editor window; `None` when closed
    editor: Option<JsonEditor>,
    show_reset_confirm: bool,

    loading: bool,

    // Async communication
    ctx: egui::Context,
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

struct JsonEditor {
    text: String,
    /// Heading naming the activity whose block opened the editor.
    focus: Option<String>,
}

enum AsyncResult {
    ScheduleLoaded(Result<ScheduleDocument>),
}

/// What a button in one of the windows asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EditorAction {
    Save,
    Reset,
    Cancel,
}

impl WeekGridApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let config = Config::load()
            .inspect_err(|e| warn!("Failed to load config, using defaults: {:#}", e))
            .unwrap_or_default();
        theme::setup_fonts(&cc.egui_ctx);
        theme::setup_theme(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let (result_tx, result_rx) = channel();

        let mut app = Self {
            config,
            store: ScheduleStore::default(),
            notifier: Notifier::default(),
            editor: None,
            show_reset_confirm: false,
            loading: false,
            ctx: cc.egui_ctx.clone(),
            runtime,
            result_rx,
            result_tx,
        };
        app.load_initial();
        Ok(app)
    }

    fn load_initial(&mut self) {
        if self.loading {
            return;
        }
        self.loading = true;

        let source = self.config.data_source();
        let tx = self.result_tx.clone();
        let ctx = self.ctx.clone();

        self.runtime.spawn(async move {
            let result = load_schedule(&source).await;
            let _ = tx.send(AsyncResult::ScheduleLoaded(result));
            ctx.request_repaint();
        });
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.loading = false;
            match result {
                AsyncResult::ScheduleLoaded(result) => {
                    if let Some(warning) = self.store.apply_load(result) {
                        self.notifier.warning(warning);
                    }
                }
            }
        }
    }

    fn open_editor(&mut self, clicked_activity: Option<usize>) {
        let text = match self.store.to_pretty_json() {
            Ok(text) => text,
            Err(e) => {
                self.notifier.error(format!("Error: {}", e));
                return;
            }
        };
        let focus = clicked_activity
            .and_then(|index| self.store.document().activities.get(index))
            .map(|activity| {
                format!(
                    "Editing \"{}\" ({} {} - {})",
                    activity.title, activity.day, activity.start_time, activity.end_time
                )
            });
        self.editor = Some(JsonEditor { text, focus });
        self.notifier.info("JSON editor opened. Edit your schedule data.");
    }

    fn save_editor(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        match self.store.replace_from_json(&editor.text) {
            Ok(()) => {
                self.editor = None;
                self.notifier.success("Schedule updated successfully!");
            }
            Err(e) => self.notifier.error(format!("Error: {}", e)),
        }
    }

    fn reset_to_default(&mut self) {
        self.store.reset();
        self.editor = None;
        self.notifier.info("Schedule reset to default data.");
    }

    fn refresh(&mut self) {
        self.store.refresh();
        self.notifier.success("Schedule refreshed!");
    }

    fn json_dialog(&self) -> rfd::FileDialog {
        rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_directory(self.config.export_dir())
    }

    fn export_json(&mut self) {
        let Some(path) = self
            .json_dialog()
            .set_file_name(dated_file_name("schedule", Local::now().date_naive(), "json"))
            .save_file()
        else {
            return;
        };
        match self.store.export_to(&path) {
            Ok(()) => self
                .notifier
                .success(format!("Schedule data saved to {}", path.display())),
            Err(e) => self.notifier.error(format!("Error saving file: {:#}", e)),
        }
    }

    fn import_json(&mut self) {
        let Some(path) = self.json_dialog().pick_file() else {
            return;
        };
        match self.store.import_file(&path) {
            Ok(()) => self.notifier.success("Schedule loaded from JSON file successfully!"),
            Err(e) => self.notifier.error(format!("Error loading file: {:#}", e)),
        }
    }

    fn export_pdf(&mut self) {
        let now = Local::now().naive_local();
        let frame = RenderFrame::from_store(&self.store, self.store.now_cell(now));

        match export::export_pdf(&frame, &self.config.export_dir(), now) {
            Ok(path) => {
                self.notifier.success("PDF with grid layout generated successfully!");
                if self.config.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!("Failed to open {}: {}", path.display(), e);
                    }
                }
            }
            Err(e) => self.notifier.error(format!("Error generating PDF: {:#}", e)),
        }
    }

    fn open_export_folder(&mut self) {
        let dir = self.config.export_dir();
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            self.notifier.error(format!("Could not open {}: {}", dir.display(), e));
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(egui_phosphor::fill::CALENDAR_BLANK)
                    .size(24.0)
                    .family(theme::phosphor_fill_family())
                    .color(theme::color(Palette::HEADER)),
            );
            ui.heading(RichText::new("Weekly Availability").strong().color(theme::color(Palette::HEADER)));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let enabled = !self.loading;
                if ui
                    .add_enabled(enabled, toolbar_button(egui_phosphor::regular::FOLDER_OPEN, ""))
                    .on_hover_text("Open export folder")
                    .clicked()
                {
                    self.open_export_folder();
                }
                if ui.add_enabled(enabled, toolbar_button(egui_phosphor::regular::FLOPPY_DISK, "Save JSON")).clicked() {
                    self.export_json();
                }
                if ui.add_enabled(enabled, toolbar_button(egui_phosphor::regular::UPLOAD_SIMPLE, "Load JSON")).clicked() {
                    self.import_json();
                }
                if ui.add_enabled(enabled, toolbar_button(egui_phosphor::regular::FILE_PDF, "Export PDF")).clicked() {
                    self.export_pdf();
                }
                if ui.add_enabled(enabled, toolbar_button(egui_phosphor::regular::ARROWS_CLOCKWISE, "Refresh")).clicked() {
                    self.refresh();
                }
                if ui.add_enabled(enabled, toolbar_button(egui_phosphor::regular::BRACKETS_CURLY, "Edit JSON")).clicked() {
                    self.open_editor(None);
                }
            });
        });

        let updated = self.store.last_updated().format("%A, %B %-d, %Y, %I:%M %p");
        ui.label(
            RichText::new(format!("Last updated: {}", updated))
                .size(12.0)
                .color(theme::color(Palette::SUBTITLE)),
        );
    }

    fn render_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        let mut action = None;

        egui::Window::new("Edit Schedule JSON")
            .collapsible(false)
            .resizable(true)
            .default_width(700.0)
            .default_height(520.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(theme::dialog_frame())
            .show(ctx, |ui| {
                if let Some(focus) = &editor.focus {
                    ui.label(RichText::new(focus).strong().color(theme::color(Palette::HEADER)));
                    ui.add_space(6.0);
                }

                egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut editor.text)
                            .code_editor()
                            .desired_rows(24)
                            .desired_width(f32::INFINITY),
                    );
                });

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button(format!("{} Save", egui_phosphor::regular::CHECK)).clicked() {
                        action = Some(EditorAction::Save);
                    }
                    if ui.button(format!("{} Reset", egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE)).clicked() {
                        action = Some(EditorAction::Reset);
                    }
                    if ui.button(format!("{} Cancel", egui_phosphor::regular::X)).clicked() {
                        action = Some(EditorAction::Cancel);
                    }
                });
            });

        match action {
            Some(EditorAction::Save) => self.save_editor(),
            Some(EditorAction::Reset) => self.show_reset_confirm = true,
            Some(EditorAction::Cancel) => {
                self.editor = None;
                self.notifier.warning("JSON editor closed without saving.");
            }
            None => {}
        }
    }

    fn render_reset_confirm(&mut self, ctx: &egui::Context) {
        if !self.show_reset_confirm {
            return;
        }
        let mut confirmed = false;
        let mut cancelled = false;

        egui::Window::new("Confirm Reset")
            .collapsible(false)
            .resizable(false)
            .default_width(400.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(theme::dialog_frame())
            .show(ctx, |ui| {
                ui.label("Are you sure you want to reset to default schedule data?");
                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    let reset_color = Color32::from_rgb(231, 76, 60);
                    if ui.button(RichText::new("Reset").color(reset_color)).clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            self.show_reset_confirm = false;
            self.reset_to_default();
        }
        if cancelled {
            self.show_reset_confirm = false;
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.editor.is_none() {
            return;
        }
        let save = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
        if ctx.input_mut(|i| i.consume_shortcut(&save)) {
            self.save_editor();
        } else if !self.show_reset_confirm && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            // Escape closes without the warning the Cancel button raises
            self.editor = None;
        }
    }
}

fn toolbar_button(icon: &str, label: &str) -> egui::Button<'static> {
    let (button_bg, button_text) = theme::button_colors();
    let text = if label.is_empty() {
        icon.to_string()
    } else {
        format!("{} {}", icon, label)
    };
    egui::Button::new(RichText::new(text).color(button_text)).fill(button_bg)
}

impl eframe::App for WeekGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.apply_zoom(zoom_delta);
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(e) = self.config.save() {
                    warn!("Failed to save config: {:#}", e);
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::none().fill(Color32::WHITE).inner_margin(egui::Margin::symmetric(16.0, 10.0)))
            .show(ctx, |ui| self.render_toolbar(ui));

        let mut clicked_activity = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::same(16.0)).fill(ctx.style().visuals.panel_fill))
            .show(ctx, |ui| {
                if self.loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading schedule...");
                    });
                    return;
                }

                let now = self.store.now_cell(Local::now().naive_local());
                let frame = RenderFrame::from_store(&self.store, now);
                let result = ScreenRenderer::new(ui, self.config.pixels_per_hour).render(&frame);
                clicked_activity = result.clicked_activity;
            });

        if let Some(index) = clicked_activity {
            info!("activity {} clicked, opening editor", index);
            self.open_editor(Some(index));
        }

        self.render_editor(ctx);
        self.render_reset_confirm(ctx);
        self.notifier.show(ctx);

        // Keep the NOW highlight current without input.
        ctx.request_repaint_after(std::time::Duration::from_secs(30));
    }
}
