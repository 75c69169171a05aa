mod component;
pub mod controller;
mod dialog;
pub mod graph;
pub mod layout;
mod render;
mod state;
pub mod style;
pub mod types;

pub use component::MindMapCanvas;
