// UI module organization
pub mod components;
pub mod layout;
pub mod overlays;
pub mod views;

// Re-export the main UI function
pub use layout::render_ui;
