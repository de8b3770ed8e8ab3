use bevy::prelude::*;

/// Pale grey text over the starfield
pub const LABEL_TEXT: Color = Color::srgb(0.82, 0.85, 0.88);

/// Near-white text for headers
pub const HEADER_TEXT: Color = Color::srgb(0.95, 0.96, 0.98);

/// Near-white text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.92, 0.93, 0.95);
/// #2b3a55
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.169, 0.227, 0.333);
/// #41587f
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.255, 0.345, 0.498);
/// #1c2638
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.110, 0.149, 0.220);
