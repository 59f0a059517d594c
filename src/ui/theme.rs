use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const PANEL_BG: Color = Color::Rgb(30, 32, 40);
    pub const APP_BAR_BG: Color = Color::Rgb(40, 44, 56);
    pub const ACCENT_TEAL: Color = Color::Rgb(0, 191, 165);
    pub const ICON_INACTIVE: Color = Color::Rgb(96, 98, 108);
    pub const BORDER_DIM: Color = Color::Rgb(60, 62, 74);
    pub const TEXT_MUTED: Color = Color::Rgb(140, 142, 150);
    pub const BANNER_BG: Color = Color::Rgb(70, 40, 40);

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn border_type() -> BorderType {
        BorderType::Rounded
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Self::PANEL_BG)
    }

    pub fn title() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn app_bar() -> Style {
        Style::default().fg(Color::White).bg(Self::APP_BAR_BG)
    }

    pub fn tab() -> Style {
        Style::default().fg(Self::TEXT_MUTED).bg(Self::APP_BAR_BG)
    }

    pub fn tab_selected() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Self::APP_BAR_BG)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn tab_unread_marker() -> Style {
        Style::default().fg(Color::Yellow).bg(Self::APP_BAR_BG)
    }

    pub fn tab_mention_marker() -> Style {
        Style::default()
            .fg(Color::LightRed)
            .bg(Self::APP_BAR_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn timestamp() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn nick_self() -> Style {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    }

    /// Stable per-nick colour so a speaker keeps the same colour.
    pub fn nick_color(nick: &str) -> Style {
        const PALETTE: [Color; 6] = [
            Color::Cyan,
            Color::LightBlue,
            Color::LightMagenta,
            Color::LightYellow,
            Color::LightCyan,
            Color::LightRed,
        ];
        let hash = nick
            .to_lowercase()
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
        Style::default().fg(PALETTE[hash % PALETTE.len()])
    }

    pub fn scrollbar_thumb() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn scrollbar_track() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn message_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn notice_message() -> Style {
        Style::default().fg(Color::LightMagenta)
    }

    pub fn system_message() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn error_message() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn action_message() -> Style {
        Style::default().fg(Color::Magenta)
    }

    pub fn join_message() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn part_message() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn server_connected() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn server_disconnected() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn server_connecting() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn user_op() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn user_voice() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn user_normal() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn selection() -> Style {
        Style::default().fg(Color::Black).bg(Self::ACCENT_TEAL)
    }

    pub fn suggestion() -> Style {
        Style::default().fg(Color::White).bg(Self::APP_BAR_BG)
    }

    pub fn suggestion_selected() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn banner() -> Style {
        Style::default().fg(Color::White).bg(Self::BANNER_BG)
    }

    pub fn banner_action() -> Style {
        Style::default()
            .fg(Self::ACCENT_TEAL)
            .bg(Self::BANNER_BG)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }
}
