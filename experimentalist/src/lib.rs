#![warn(clippy::all, rust_2018_idioms)]

mod app;

pub use app::config::Config;
pub use app::session::{RenderOutcome, Session};
pub use app::EguiApp;
