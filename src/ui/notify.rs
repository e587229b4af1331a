use eframe::egui;
use egui::{Color32, RichText};
use log::{error, info, warn};
use std::time::{Duration, Instant};

/// How long a message stays fully visible.
pub const DISPLAY_FOR: Duration = Duration::from_millis(4000);
/// Fade-out after [`DISPLAY_FOR`] elapses.
pub const FADE_FOR: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    fn icon(self) -> &'static str {
        match self {
            NoticeKind::Success => egui_phosphor::regular::CHECK_CIRCLE,
            NoticeKind::Error => egui_phosphor::regular::WARNING_CIRCLE,
            NoticeKind::Warning => egui_phosphor::regular::WARNING,
            NoticeKind::Info => egui_phosphor::regular::INFO,
        }
    }

    fn color(self) -> Color32 {
        match self {
            NoticeKind::Success => Color32::from_rgb(39, 174, 96),
            NoticeKind::Error => Color32::from_rgb(231, 76, 60),
            NoticeKind::Warning => Color32::from_rgb(243, 156, 18),
            NoticeKind::Info => Color32::from_rgb(52, 152, 219),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    shown_at: Instant,
}

/// Single-slot transient message. A new notice replaces the current one.
#[derive(Default)]
pub struct Notifier {
    current: Option<Notice>,
}

impl Notifier {
    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notify_at(kind, message, Instant::now());
    }

    pub fn notify_at(&mut self, kind: NoticeKind, message: impl Into<String>, at: Instant) {
        let message = message.into();
        match kind {
            NoticeKind::Error => error!("{}", message),
            NoticeKind::Warning => warn!("{}", message),
            NoticeKind::Success | NoticeKind::Info => info!("{}", message),
        }
        self.current = Some(Notice { kind, message, shown_at: at });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(NoticeKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(NoticeKind::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notify(NoticeKind::Warning, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(NoticeKind::Info, message);
    }

    /// The notice still on screen at `now` and its opacity. Expired notices
    /// are dropped.
    pub fn visible_at(&mut self, now: Instant) -> Option<(&Notice, f32)> {
        let elapsed = now.saturating_duration_since(self.current.as_ref()?.shown_at);
        if elapsed >= DISPLAY_FOR + FADE_FOR {
            self.current = None;
            return None;
        }
        let alpha = if elapsed <= DISPLAY_FOR {
            1.0
        } else {
            1.0 - (elapsed - DISPLAY_FOR).as_secs_f32() / FADE_FOR.as_secs_f32()
        };
        self.current.as_ref().map(|notice| (notice, alpha))
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Paint the current notice in the top-right corner.
    pub fn show(&mut self, ctx: &egui::Context) {
        let mut dismiss = false;
        if let Some((notice, alpha)) = self.visible_at(Instant::now()) {
            let accent = notice.kind.color().gamma_multiply(alpha);
            let text = Color32::WHITE.gamma_multiply(alpha);

            egui::Area::new(egui::Id::new("notification"))
                .anchor(egui::Align2::RIGHT_TOP, [-20.0, 60.0])
                .order(egui::Order::Foreground)
                .interactable(true)
                .show(ctx, |ui| {
                    let response = egui::Frame::none()
                        .fill(accent)
                        .rounding(egui::Rounding::same(6.0))
                        .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(notice.kind.icon()).size(16.0).color(text));
                                ui.label(RichText::new(&notice.message).size(14.0).color(text));
                            });
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() {
                        dismiss = true;
                    }
                });

            // Keep the timer and the fade moving without input.
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        if dismiss {
            self.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_notice_replaces_the_previous_one() {
        let mut notifier = Notifier::default();
        let start = Instant::now();
        notifier.notify_at(NoticeKind::Info, "first", start);
        notifier.notify_at(NoticeKind::Error, "second", start);

        let (notice, alpha) = notifier.visible_at(start).unwrap();
        assert_eq!(notice.message, "second");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(alpha, 1.0);
    }

    #[test]
    fn notice_fades_then_disappears() {
        let mut notifier = Notifier::default();
        let start = Instant::now();
        notifier.notify_at(NoticeKind::Success, "Schedule refreshed!", start);

        assert_eq!(notifier.visible_at(start + Duration::from_millis(3999)).unwrap().1, 1.0);

        let (_, alpha) = notifier.visible_at(start + Duration::from_millis(4150)).unwrap();
        assert!(alpha > 0.4 && alpha < 0.6);

        assert!(notifier.visible_at(start + Duration::from_millis(4300)).is_none());
        // Expired notices stay gone
        assert!(notifier.visible_at(start).is_none());
    }

    #[test]
    fn dismiss_clears_immediately() {
        let mut notifier = Notifier::default();
        notifier.warning("closed");
        notifier.dismiss();
        assert!(notifier.visible_at(Instant::now()).is_none());
    }
}
