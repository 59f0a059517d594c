use crate::chat::composer::CommandBanner;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const CLOSE_LABEL: &str = " ✕ ";

/// Clickable parts of the banner row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerHit {
    Action,
    Close,
}

fn label_width(label: &str) -> u16 {
    u16::try_from(label.width()).unwrap_or(u16::MAX)
}

fn action_text(banner: &CommandBanner) -> Option<String> {
    banner.action_label().map(|label| format!(" {} (F3) ", label))
}

/// Columns of the close button and of the action button, right-aligned.
fn button_columns(area: Rect, banner: &CommandBanner) -> (Rect, Option<Rect>) {
    let close_width = label_width(CLOSE_LABEL).min(area.width);
    let close = Rect {
        x: area.right() - close_width,
        width: close_width,
        height: 1,
        ..area
    };
    let action = action_text(banner).map(|text| {
        let width = label_width(&text).min(close.x.saturating_sub(area.x));
        Rect {
            x: close.x - width,
            width,
            ..close
        }
    });
    (close, action)
}

pub fn render(frame: &mut Frame, area: Rect, banner: &CommandBanner) {
    frame.render_widget(
        Paragraph::new(format!(" ⚠ {}", banner.message())).style(Theme::banner()),
        area,
    );
    let (close, action) = button_columns(area, banner);
    if let (Some(rect), Some(text)) = (action, action_text(banner)) {
        frame.render_widget(Paragraph::new(text).style(Theme::banner_action()), rect);
    }
    frame.render_widget(Paragraph::new(CLOSE_LABEL).style(Theme::banner()), close);
}

pub fn hit_test(area: Rect, banner: &CommandBanner, column: u16) -> Option<BannerHit> {
    let (close, action) = button_columns(area, banner);
    if column >= close.x && column < close.right() {
        return Some(BannerHit::Close);
    }
    action
        .filter(|r| column >= r.x && column < r.right())
        .map(|_| BannerHit::Action)
}
