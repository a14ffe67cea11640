// Color palette shared by all views
use ratatui::style::Color;

/// Delete / destructive actions
pub const ACCENT_DELETE: Color = Color::Rgb(211, 47, 47);
/// Keep / success
pub const ACCENT_KEEP: Color = Color::Rgb(56, 142, 60);
/// Move
pub const ACCENT_MOVE: Color = Color::Rgb(25, 118, 210);
/// Titles and focused borders
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(255, 193, 7);
/// "All clean" banner
pub const ACCENT_CLEAN: Color = Color::Rgb(76, 175, 80);

pub const TEXT_PRIMARY: Color = Color::Rgb(230, 230, 230);
pub const TEXT_SECONDARY: Color = Color::Rgb(150, 150, 150);
pub const BORDER_COLOR: Color = Color::Rgb(97, 97, 97);
pub const BG_DARK: Color = Color::Rgb(24, 24, 24);
