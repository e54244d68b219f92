pub mod app;
pub mod config;
pub mod editor;
pub mod project;
pub mod shared;
pub mod widgets;
