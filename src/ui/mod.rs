mod app;
mod notify;
mod theme;
mod views;

pub use app::WeekGridApp;
