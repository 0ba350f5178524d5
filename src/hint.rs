use ratatui::{
    style::{Style, Stylize},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// A key hint shown in the footer, e.g. `Search [/]`.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

impl Shortcut {
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self { name, keys }
    }

    fn to_spans(self) -> Vec<Span<'static>> {
        let mut spans = vec![Span::styled(self.name, Style::default().bold()), Span::raw(" ")];
        for key in self.keys {
            spans.push(Span::raw("["));
            spans.push(Span::styled(*key, Style::default().cyan()));
            spans.push(Span::raw("]"));
        }
        spans
    }

    fn width(&self) -> usize {
        self.name.width() + 1 + self.keys.iter().map(|k| k.width() + 2).sum::<usize>()
    }
}

#[macro_export]
macro_rules! shortcuts {
    ($(($name:literal, [$($key:literal),+ $(,)?])),* $(,)?) => {
        vec![$($crate::hint::Shortcut::new($name, &[$($key),+])),*].into_boxed_slice()
    };
}

const GAP: usize = 3;

/// Packs shortcuts into as few lines as fit in `width` (minus the border).
pub fn create_shortcut_list(shortcuts: Box<[Shortcut]>, width: u16) -> Vec<Line<'static>> {
    let usable = (width as usize).saturating_sub(2).max(1);
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;

    for sc in shortcuts.iter() {
        let w = sc.width();
        if used > 0 && used + GAP + w > usable {
            lines.push(Line::from(std::mem::take(&mut current)));
            used = 0;
        }
        if used > 0 {
            current.push(Span::raw(" ".repeat(GAP)));
            used += GAP;
        }
        current.extend(sc.to_spans());
        used += w;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}
