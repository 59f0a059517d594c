use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::AppState;
use crate::chat::format::TextFormat;
use crate::chat::ChatFragment;
use crate::ui;
use crate::ui::format_bar::FormatButton;
use crate::ui::layout::contains;
use crate::ui::BannerHit;
use crossterm::event::{
    Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Instant;

const WHEEL_STEP: isize = 3;

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            let actions = handle_terminal(state, cevent);
            if let Some(fragment) = state.fragment.as_mut() {
                sync_format_bar(fragment);
            }
            actions
        }
        other => {
            state.apply_event(other);
            vec![]
        }
    }
}

/// The format bar belongs to a selection and goes away with it.
fn sync_format_bar(fragment: &mut ChatFragment) {
    if fragment.is_format_bar_visible() && !fragment.has_send_message_text_selection() {
        fragment.set_format_bar_visible(false);
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Mouse(mouse) => {
            handle_mouse(state, mouse);
            vec![]
        }
        CEvent::Resize(width, height) => {
            state.resize(width, height);
            vec![]
        }
        CEvent::Paste(text) => {
            if let Some(fragment) = state.fragment.as_mut() {
                let line = text.replace(['\r', '\n'], " ");
                fragment.edit_composer(|c| c.insert_str(&line));
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    // Global keybindings
    if ctrl {
        match key.code {
            KeyCode::Char('c') => return vec![Action::Quit { message: None }],
            KeyCode::Char('n') => {
                state.next_connection();
                return vec![];
            }
            KeyCode::Char('p') => {
                state.prev_connection();
                return vec![];
            }
            KeyCode::Char('r') => {
                return state
                    .active_server_id()
                    .map(|server_id| vec![Action::Connect { server_id }])
                    .unwrap_or_default();
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::F(4) => {
            let mode = state.settings.chat_appbar_compact_mode().next();
            state.settings.set_chat_appbar_compact_mode(mode);
            state.status_message = Some(format!("Compact app bar: {}", mode.as_str()));
            return vec![Action::SaveSettings];
        }
        KeyCode::F(5) => {
            let visible = !state.settings.is_nick_autocomplete_button_visible();
            state.settings.set_nick_autocomplete_button_visible(visible);
            return vec![Action::SaveSettings];
        }
        KeyCode::F(6) => {
            let enabled = !state.settings.is_nick_autocomplete_double_tap_enabled();
            state.settings.set_nick_autocomplete_double_tap_enabled(enabled);
            return vec![Action::SaveSettings];
        }
        _ => {}
    }

    let page_rows = isize::try_from((state.height / 2).max(1)).unwrap_or(1);
    let Some(fragment) = state.fragment.as_mut() else {
        return vec![];
    };
    if alt {
        match key.code {
            KeyCode::Left => fragment.select_prev_page(),
            KeyCode::Right => fragment.select_next_page(),
            KeyCode::Char(c @ '1'..='9') => {
                let page = c as usize - '1' as usize;
                fragment.select_page(page);
            }
            KeyCode::Backspace => fragment.edit_composer(|c| c.delete_word_back()),
            _ => {}
        }
        return vec![];
    }

    handle_chat_key(fragment, key, page_rows);
    vec![]
}

fn handle_chat_key(fragment: &mut ChatFragment, key: KeyEvent, page_rows: isize) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let dropdown = fragment.suggestions().is_visible();

    match key.code {
        KeyCode::F(2) => {
            fragment.toggle_drawer();
        }
        KeyCode::F(3) => {
            fragment.send_raw_from_banner();
        }
        KeyCode::F(7) => {
            fragment.show_format_bar_for_selection();
        }
        KeyCode::F(8) => {
            let hidden = fragment.toolbar().tabs_hidden();
            fragment.set_tabs_hidden(!hidden);
        }
        KeyCode::Esc => {
            // Close the innermost transient element only.
            if !fragment.dismiss_drop_down() && !fragment.dismiss_banner() {
                if fragment.is_format_bar_visible() {
                    fragment.set_format_bar_visible(false);
                } else {
                    fragment.close_drawer();
                }
            }
        }
        KeyCode::Enter => {
            if !(dropdown && fragment.accept_suggestion()) {
                fragment.send_message();
            }
        }
        KeyCode::Tab => {
            if dropdown {
                fragment.select_next_suggestion();
            } else {
                fragment.request_tab_complete();
            }
        }
        KeyCode::BackTab => fragment.select_prev_suggestion(),
        KeyCode::Up if dropdown => fragment.select_prev_suggestion(),
        KeyCode::Down if dropdown => fragment.select_next_suggestion(),
        KeyCode::Up => fragment.edit_composer(|c| c.history_up()),
        KeyCode::Down => fragment.edit_composer(|c| c.history_down()),
        KeyCode::PageUp => fragment.scroll_messages(page_rows),
        KeyCode::PageDown => fragment.scroll_messages(-page_rows),
        KeyCode::Backspace => fragment.edit_composer(|c| c.delete_back()),
        KeyCode::Delete => fragment.edit_composer(|c| c.delete_forward()),
        KeyCode::Left => fragment.edit_composer(|c| c.move_left(shift)),
        KeyCode::Right => fragment.edit_composer(|c| c.move_right(shift)),
        KeyCode::Home => fragment.edit_composer(|c| c.move_home(shift)),
        KeyCode::End => fragment.edit_composer(|c| c.move_end(shift)),
        KeyCode::Char(c) if ctrl => {
            if fragment.is_format_bar_visible() {
                let format = match c {
                    'b' => Some(TextFormat::Bold),
                    't' => Some(TextFormat::Italic),
                    'u' => Some(TextFormat::Underline),
                    'k' => Some(TextFormat::Color(4)),
                    'o' => Some(TextFormat::Reset),
                    _ => None,
                };
                if let Some(format) = format {
                    fragment.apply_format(format);
                    return;
                }
            }
            match c {
                'a' => fragment.edit_composer(|c| c.move_home(false)),
                'e' => fragment.edit_composer(|c| c.move_end(false)),
                'w' => fragment.edit_composer(|c| c.delete_word_back()),
                'u' => fragment.edit_composer(|c| c.delete_to_start()),
                _ => {}
            }
        }
        KeyCode::Char(c) => fragment.edit_composer(|composer| composer.insert_char(c)),
        _ => {}
    }
}

fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let (width, height) = (state.width, state.height);
    let Some(fragment) = state.fragment.as_mut() else {
        return;
    };
    let layout = ui::screen_layout(fragment, width, height);
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(area) = layout.suggestions.filter(|r| contains(*r, col, row)) {
                if let Some(index) = ui::suggestions::item_at_row(area, fragment.suggestions(), row)
                {
                    fragment.select_suggestion(index);
                    fragment.accept_suggestion();
                }
                return;
            }
            if let Some(strip) = layout.tab_strip.filter(|r| contains(*r, col, row)) {
                if let Some(index) = fragment.tabs().tab_at_column(col - strip.x) {
                    fragment.select_page(index);
                }
                return;
            }
            if let Some(area) = layout.banner.filter(|r| contains(*r, col, row)) {
                let hit = fragment
                    .composer()
                    .banner()
                    .and_then(|b| ui::banner_hit_test(area, b, col));
                match hit {
                    Some(BannerHit::Action) => {
                        fragment.send_raw_from_banner();
                    }
                    Some(BannerHit::Close) => {
                        fragment.dismiss_banner();
                    }
                    None => {}
                }
                return;
            }
            if let Some(bar) = layout.format_bar.filter(|r| contains(*r, col, row)) {
                match ui::format_bar::button_at(bar, col) {
                    Some(FormatButton::Apply(format)) => fragment.apply_format(format),
                    Some(FormatButton::Close) => fragment.set_format_bar_visible(false),
                    None => {}
                }
                return;
            }
            if layout.tab_button.is_some_and(|r| contains(r, col, row)) {
                fragment.request_tab_complete();
                return;
            }
            if contains(layout.send_button, col, row) {
                fragment.send_message();
                return;
            }
            if contains(layout.composer_text, col, row) {
                let text_area = layout.composer_text;
                fragment.edit_composer(|c| {
                    let byte = ui::composer::byte_at_column(c, col - text_area.x, text_area.width);
                    c.set_cursor(byte);
                });
                fragment.on_composer_click(Instant::now());
            }
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let up = mouse.kind == MouseEventKind::ScrollUp;
            if layout.suggestions.is_some_and(|r| contains(r, col, row)) {
                if up {
                    fragment.select_prev_suggestion();
                } else {
                    fragment.select_next_suggestion();
                }
            } else if let Some(drawer) = layout.drawer.filter(|r| contains(*r, col, row)) {
                let rows = usize::from(drawer.height.saturating_sub(2));
                fragment.scroll_drawer(if up { -WHEEL_STEP } else { WHEEL_STEP }, rows);
            } else if contains(layout.messages, col, row) {
                fragment.scroll_messages(if up { WHEEL_STEP } else { -WHEEL_STEP });
            }
        }
        _ => {}
    }
}
