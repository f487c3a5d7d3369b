pub mod app;
pub mod side_panel;
pub mod story_panel;

pub mod settings;
pub mod settings_io;
