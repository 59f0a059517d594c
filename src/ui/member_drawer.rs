use crate::chat::drawer::MemberDrawer;
use crate::irc::session::NickWithPrefix;
use crate::ui::elevation::{ElevationDecoration, ElevationPainter, VisibleItem};
use crate::ui::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

/// Members holding a channel mode are drawn raised above the rest.
struct MemberElevation<'a>(&'a [NickWithPrefix]);

impl ElevationDecoration for MemberElevation<'_> {
    fn is_item_elevated(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(|m| m.prefix.is_some())
    }

    fn item_count(&self) -> usize {
        self.0.len()
    }
}

fn member_style(member: &NickWithPrefix) -> (&'static str, Style) {
    match member.prefix {
        Some('~' | '&' | '@') => (" ★ ", Theme::user_op()),
        Some('%' | '+') => (" ○ ", Theme::user_voice()),
        Some(_) => (" · ", Theme::user_voice()),
        None => ("   ", Theme::user_normal()),
    }
}

/// Row of every member from `scroll` on, relative to the list top. Blank
/// rows are left where elevation changes so the shadows have room.
fn visible_items(decoration: &dyn ElevationDecoration, scroll: usize, height: u16) -> Vec<VisibleItem> {
    let mut items = Vec::new();
    let mut top: i32 = 0;
    for index in scroll..decoration.item_count() {
        if index > scroll {
            let was = decoration.is_item_elevated(index - 1);
            let is = decoration.is_item_elevated(index);
            top += match (was, is) {
                (false, true) => 1,
                (true, false) => 2,
                _ => 0,
            };
        }
        if top >= i32::from(height) {
            break;
        }
        items.push(VisibleItem {
            index,
            top,
            height: 1,
        });
        top += 1;
    }
    items
}

/// Draw the member list into `area` (inside the drawer border).
pub fn draw_members(buf: &mut Buffer, area: Rect, members: &[NickWithPrefix], scroll: usize) {
    buf.set_style(area, Theme::panel_bg());
    let decoration = MemberElevation(members);
    let visible = visible_items(&decoration, scroll, area.height);

    for item in &visible {
        let (Some(member), Ok(row)) = (members.get(item.index), u16::try_from(item.top)) else {
            continue;
        };
        let (icon, style) = member_style(member);
        let y = area.y + row;
        let (x, _) = buf.set_stringn(area.x, y, icon, usize::from(area.width), style);
        let room = usize::from(area.right().saturating_sub(x));
        buf.set_stringn(x, y, &member.nick, room, style);
    }

    ElevationPainter::new(Theme::PANEL_BG).draw(buf, area, &decoration, &visible);
}

pub fn render(frame: &mut Frame, area: Rect, drawer: &MemberDrawer) {
    let members = drawer.members();
    let block = Block::default()
        .title(format!(" Members ({}) ", members.len()))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border())
        .style(Theme::panel_bg());
    let inner = block.inner(area);
    let buf = frame.buffer_mut();
    block.render(area, buf);
    draw_members(buf, inner, members, drawer.scroll());
}
