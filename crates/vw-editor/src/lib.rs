pub mod config;
pub mod engine;
pub mod input;
pub mod panel;
pub mod rules;
pub mod tools;
pub mod widgets;

pub use config::WidgetConfig;
pub use engine::{Redraw, WidgetEngine, WidgetMutation};
pub use input::InputEvent;
pub use widgets::{Readout, WidgetKind};
