pub mod height_panel;
pub mod status_bar;
