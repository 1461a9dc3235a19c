//! Pathwise - a terminal learning companion
//!
//! Pathwise turns a topic into a week-by-week roadmap, reads generated
//! chapters for every subtopic, quizzes you on them and keeps track of your
//! progress in a local store.

pub mod api;
pub mod app;
pub mod config;
pub mod hardness;
pub mod model;
pub mod progress;
pub mod quiz;
pub mod reader;
pub mod store;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
