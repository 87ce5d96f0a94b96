use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    /// INC, DEB and END
    pub keyword: Color,
    /// Register numbers
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    /// Lines the current statement may jump to
    pub branch_line_bg: Color,
    pub label: Color,
    /// Register touched by the current statement
    pub changed_value: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),
    number: Color::Rgb(250, 179, 135),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    branch_line_bg: Color::Rgb(40, 40, 56),
    label: Color::Rgb(249, 226, 175),
    changed_value: Color::Rgb(245, 194, 231),
};
