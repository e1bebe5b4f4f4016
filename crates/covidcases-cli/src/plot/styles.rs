use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);

/// Line colours, cycled when there are more areas than colours
pub const SERIES: [Color; 8] = [
    PRIMARY,
    SECONDARY,
    ACCENT,
    ERROR,
    Color::Rgb(160, 96, 192),
    Color::Rgb(64, 176, 176),
    Color::Rgb(224, 128, 160),
    Color::White,
];

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn series_style(index: usize) -> Style {
    Style::default().fg(SERIES[index % SERIES.len()])
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}
