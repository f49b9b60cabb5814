//! Shared color constants for the UI.

use egui::Color32;

/// Red color for the error state.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Subtle gray for table borders.
pub const COLOR_BORDER: Color32 = Color32::from_rgb(200, 200, 200);

/// Muted gray for secondary text such as the refresh indicator.
pub const COLOR_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
