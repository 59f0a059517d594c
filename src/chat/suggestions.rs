//! Tab completion for the composer and its suggestion dropdown.

use crate::chat::composer::Composer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Command,
    Channel,
    Nick,
}

/// Everything completion can draw from for the current page.
#[derive(Debug, Clone, Default)]
pub struct CompletionSource {
    pub commands: Vec<String>,
    pub channels: Vec<String>,
    pub nicks: Vec<String>,
    pub channel_types: Vec<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Byte offset of the word being completed.
    pub start: usize,
    pub kind: CompletionKind,
    pub items: Vec<String>,
}

/// The word that ends at `cursor`, with its start offset.
pub fn current_word(text: &str, cursor: usize) -> (usize, &str) {
    let before = &text[..cursor];
    let start = before
        .rfind(char::is_whitespace)
        .map(|i| i + before[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    (start, &before[start..])
}

fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

pub fn collect_candidates(
    source: &CompletionSource,
    text: &str,
    cursor: usize,
) -> Option<CompletionRequest> {
    let (start, word) = current_word(text, cursor);
    let first = word.chars().next()?;

    let (kind, items) = if start == 0 && first == '/' {
        let prefix = &word[1..];
        let items = source
            .commands
            .iter()
            .filter(|c| starts_with_ignore_case(c, prefix))
            .map(|c| format!("/{}", c))
            .collect();
        (CompletionKind::Command, items)
    } else if source.channel_types.contains(&first) {
        let items = source
            .channels
            .iter()
            .filter(|c| starts_with_ignore_case(c, word))
            .cloned()
            .collect();
        (CompletionKind::Channel, items)
    } else {
        let items = source
            .nicks
            .iter()
            .filter(|n| starts_with_ignore_case(n, word))
            .cloned()
            .collect();
        (CompletionKind::Nick, items)
    };
    Some(CompletionRequest { start, kind, items })
}

/// Replace the word being completed with `item`.
pub fn apply_completion(composer: &mut Composer, start: usize, kind: CompletionKind, item: &str) {
    let suffix = if kind == CompletionKind::Nick && start == 0 {
        ": "
    } else {
        " "
    };
    let end = composer.cursor();
    composer.replace_range(start..end, &format!("{}{}", item, suffix));
}

/// Dropdown listing several completion candidates.
#[derive(Debug, Default)]
pub struct Suggestions {
    request: Option<CompletionRequest>,
    selected: usize,
}

impl Suggestions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.request.is_some()
    }

    pub fn items(&self) -> &[String] {
        self.request
            .as_ref()
            .map(|r| r.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.items().len() {
            self.selected = index;
        }
    }

    pub fn dismiss(&mut self) {
        self.request = None;
        self.selected = 0;
    }

    /// Complete the word at the cursor. A single candidate is applied
    /// directly, several open the dropdown. Returns whether anything matched.
    pub fn request_tab_complete(&mut self, composer: &mut Composer, source: &CompletionSource) -> bool {
        self.dismiss();
        let Some(request) = collect_candidates(source, composer.text(), composer.cursor()) else {
            return false;
        };
        match request.items.len() {
            0 => false,
            1 => {
                apply_completion(composer, request.start, request.kind, &request.items[0]);
                true
            }
            _ => {
                self.request = Some(request);
                true
            }
        }
    }

    /// Apply the selected candidate and close the dropdown.
    pub fn accept(&mut self, composer: &mut Composer) -> bool {
        let Some(request) = self.request.take() else {
            return false;
        };
        if let Some(item) = request.items.get(self.selected) {
            apply_completion(composer, request.start, request.kind, item);
        }
        self.selected = 0;
        true
    }

    /// Re-filter an open dropdown after the text changed; closes it when
    /// nothing matches any more.
    pub fn refilter(&mut self, composer: &Composer, source: &CompletionSource) {
        if self.request.is_none() {
            return;
        }
        match collect_candidates(source, composer.text(), composer.cursor()) {
            Some(request) if !request.items.is_empty() => {
                self.selected = self.selected.min(request.items.len() - 1);
                self.request = Some(request);
            }
            _ => self.dismiss(),
        }
    }
}
