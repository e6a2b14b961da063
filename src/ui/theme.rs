use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_placeholder: Color,
    pub accent: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Idle, busy, saturated.
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            "mono" => Self::mono(),
            _ => Self::dark(),
        }
    }

    pub fn next(&self) -> Self {
        let next_name = match self.name {
            "dark" => "light",
            "light" => "mono",
            _ => "dark",
        };
        Theme::from_config(next_name)
    }

    /// Color for a utilization ratio; ratios above 1.0 count as saturated.
    pub fn heat(&self, ratio: f64) -> Color {
        if ratio >= 0.75 {
            self.heat_colors[2]
        } else if ratio >= 0.25 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_placeholder: Color::DarkGray,
            accent: Color::Green,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            gauge_filled: Color::Rgb(103, 232, 249),
            gauge_unfilled: Color::DarkGray,
            selection_bg: Color::Rgb(51, 65, 85),
            selection_fg: Color::White,
            heat_colors: [
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            status_ok: Color::Rgb(21, 128, 61),
            status_err: Color::Rgb(185, 28, 28),
            statusbar_bg: Color::Rgb(226, 232, 240),
            overlay_border: Color::Gray,
            text_primary: Color::Black,
            text_secondary: Color::Rgb(71, 85, 105),
            text_placeholder: Color::Gray,
            accent: Color::Blue,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(241, 245, 249),
            gauge_filled: Color::Rgb(37, 99, 235),
            gauge_unfilled: Color::Rgb(203, 213, 225),
            selection_bg: Color::Rgb(191, 219, 254),
            selection_fg: Color::Black,
            heat_colors: [
                Color::Rgb(21, 128, 61),
                Color::Rgb(194, 65, 12),
                Color::Rgb(185, 28, 28),
            ],
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::White,
            header_accent_fg: Color::Black,
            status_ok: Color::White,
            status_err: Color::White,
            statusbar_bg: Color::Reset,
            overlay_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_placeholder: Color::DarkGray,
            accent: Color::White,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::Gray,
            surface_bg: Color::Reset,
            gauge_filled: Color::White,
            gauge_unfilled: Color::DarkGray,
            selection_bg: Color::White,
            selection_fg: Color::Black,
            heat_colors: [Color::Gray, Color::White, Color::White],
        }
    }
}
