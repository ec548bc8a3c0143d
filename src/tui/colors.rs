// Panel color palette

use ratatui::style::Color;

pub const BG_DARK: Color = Color::Rgb(24, 24, 32);
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 225);
pub const TEXT_SECONDARY: Color = Color::Rgb(140, 140, 150);
pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 120, 100);
pub const ACCENT_SECONDARY: Color = Color::Rgb(120, 200, 140);
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(130, 170, 255);
