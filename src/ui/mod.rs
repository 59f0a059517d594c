mod app_bar;
mod banner;
pub mod composer;
pub mod elevation;
pub mod format_bar;
pub mod layout;
mod member_drawer;
mod message_area;
mod mirc_colors;
mod status_bar;
pub mod suggestions;
mod theme;

pub use banner::{hit_test as banner_hit_test, BannerHit};

use crate::app::state::AppState;
use crate::chat::ChatFragment;
use layout::{ChatLayout, LayoutInputs};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Layout of the chat screen for a terminal of `width` x `height`.
pub fn screen_layout(fragment: &ChatFragment, width: u16, height: u16) -> ChatLayout {
    layout::compute_layout(
        Rect::new(0, 0, width, height),
        LayoutInputs::from_fragment(fragment),
    )
}

/// Push geometry the chat model needs back into it before drawing.
pub fn sync_layout(state: &mut AppState) {
    let (width, height) = (state.width, state.height);
    if let Some(fragment) = state.fragment.as_mut() {
        let layout = screen_layout(fragment, width, height);
        fragment.set_tab_strip_width(layout.tab_strip.map_or(0, |r| r.width));
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let Some(fragment) = state.fragment.as_ref() else {
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        frame.render_widget(
            Paragraph::new(" No servers configured. Add one to config.toml and restart.")
                .style(theme::Theme::panel_bg()),
            layout[0],
        );
        status_bar::render(frame, layout[1], state);
        return;
    };

    let chat = layout::compute_layout(area, LayoutInputs::from_fragment(fragment));

    if let Some(toolbar) = chat.toolbar {
        app_bar::render_toolbar(frame, toolbar, fragment);
    }
    if let Some(strip) = chat.tab_strip {
        app_bar::render_tab_strip(frame, strip, fragment);
    }
    message_area::render(frame, chat.messages, state, fragment);
    if let Some(drawer) = chat.drawer {
        member_drawer::render(frame, drawer, fragment.drawer());
    }
    if let Some(dropdown) = chat.suggestions {
        suggestions::render(frame, dropdown, fragment.suggestions());
    }
    if let (Some(area), Some(banner)) = (chat.banner, fragment.composer().banner()) {
        banner::render(frame, area, banner);
    }
    if let Some(bar) = chat.format_bar {
        format_bar::render(frame, bar);
    }
    composer::render(frame, &chat, fragment);
    status_bar::render(frame, chat.status_bar, state);
}
