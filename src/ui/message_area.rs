use crate::app::state::AppState;
use crate::chat::ChatFragment;
use crate::irc::session::{ChatMessage, MessageKind};
use crate::ui::mirc_colors;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, fragment: &ChatFragment) {
    frame.render_widget(
        ratatui::widgets::Block::default().style(Theme::panel_bg()),
        area,
    );

    let messages = fragment.current_messages();
    if messages.is_empty() {
        let hint = match fragment.current_channel() {
            Some(channel) => format!("No messages in {} yet.", channel),
            None => "Server messages will appear here. Try /join #channel.".to_string(),
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Theme::TEXT_MUTED)),
            area,
        );
        return;
    }

    let available_height = area.height as usize;
    let total = messages.len();

    // Visible range with the scroll offset counted from the bottom
    let end = total.saturating_sub(fragment.message_scroll());
    let start = end.saturating_sub(available_height);

    let our_nick = fragment.connection_info().user_nick();
    let options = FormatOptions {
        our_nick: &our_nick,
        timestamp_format: &state.config.ui.timestamp_format,
        parse_colors: state.config.ui.parse_mirc_colors,
    };

    let lines: Vec<Line> = messages[start..end]
        .iter()
        .map(|msg| format_message(msg, &options))
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);

    if total > available_height {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(available_height)).position(start);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .thumb_symbol("┃")
            .track_symbol(Some("│"))
            .thumb_style(Theme::scrollbar_thumb())
            .track_style(Theme::scrollbar_track());

        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

struct FormatOptions<'a> {
    our_nick: &'a str,
    timestamp_format: &'a str,
    parse_colors: bool,
}

fn format_message(msg: &ChatMessage, options: &FormatOptions<'_>) -> Line<'static> {
    let ts = Span::styled(
        format!("[{}] ", msg.timestamp.format(options.timestamp_format)),
        Theme::timestamp(),
    );

    match msg.kind {
        MessageKind::Normal => {
            let nick_style = if options.our_nick.eq_ignore_ascii_case(&msg.sender) {
                Theme::nick_self()
            } else {
                Theme::nick_color(&msg.sender)
            };

            let mut spans = vec![ts, Span::styled(format!("<{}> ", msg.sender), nick_style)];
            if options.parse_colors {
                spans.extend(mirc_colors::parse_mirc_formatted(
                    &msg.text,
                    Theme::message_text(),
                ));
            } else {
                spans.push(Span::styled(msg.text.clone(), Theme::message_text()));
            }
            Line::from(spans)
        }
        MessageKind::Action => Line::from(vec![
            ts,
            Span::styled(
                format!("* {} {}", msg.sender, msg.text),
                Theme::action_message(),
            ),
        ]),
        MessageKind::System => Line::from(vec![
            ts,
            Span::styled("• ", Style::default().fg(Color::Yellow)),
            Span::styled(msg.text.clone(), Theme::system_message()),
        ]),
        MessageKind::Error => Line::from(vec![
            ts,
            Span::styled("✘ ", Style::default().fg(Color::Red)),
            Span::styled(msg.text.clone(), Theme::error_message()),
        ]),
        MessageKind::Join => Line::from(vec![
            ts,
            Span::styled(
                format!("→ {} {}", msg.sender, msg.text),
                Theme::join_message(),
            ),
        ]),
        MessageKind::Part | MessageKind::Quit => Line::from(vec![
            ts,
            Span::styled(
                format!("← {} {}", msg.sender, msg.text),
                Theme::part_message(),
            ),
        ]),
        MessageKind::Notice => Line::from(vec![
            ts,
            Span::styled(format!("-{}- ", msg.sender), Theme::notice_message()),
            Span::styled(msg.text.clone(), Theme::notice_message()),
        ]),
    }
}
