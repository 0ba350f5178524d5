use crate::theme::Theme;
use chrono::{DateTime, Duration, Local};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

const TOAST_SECONDS: i64 = 4;
const TOAST_WIDTH: u16 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    expires_at: DateTime<Local>,
}

/// Short-lived notifications stacked in the bottom-right corner.
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Local::now());
    }

    fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: DateTime<Local>) {
        let message = message.into();
        match kind {
            ToastKind::Error => log::warn!("toast: {message}"),
            _ => log::info!("toast: {message}"),
        }
        self.items.push(Toast {
            kind,
            message,
            expires_at: now + Duration::seconds(TOAST_SECONDS),
        });
    }

    pub fn expire(&mut self, now: DateTime<Local>) {
        self.items.retain(|t| t.expires_at > now);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.expire(Local::now());
        let width = TOAST_WIDTH.min(area.width);
        let mut bottom = area.y + area.height;
        for toast in self.items.iter().rev() {
            let height = 3 + (toast.message.len() as u16 / width.saturating_sub(2).max(1));
            if bottom < area.y + height {
                break;
            }
            bottom -= height;
            let rect = Rect::new(area.x + area.width - width, bottom, width, height);
            let (title, color) = match toast.kind {
                ToastKind::Info => (" Info ", theme.focused_color()),
                ToastKind::Success => (" Done ", theme.success_color()),
                ToastKind::Error => (" Error ", theme.danger_color()),
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(toast.message.as_str())
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(color))
                    .block(
                        Block::default()
                            .title(title)
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(color)),
                    ),
                rect,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire() {
        let now = Local::now();
        let mut toasts = Toasts::default();
        toasts.push_at(ToastKind::Error, "delete failed", now);
        toasts.push_at(ToastKind::Success, "exported", now + Duration::seconds(3));
        toasts.expire(now + Duration::seconds(5));
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].kind, ToastKind::Success);
    }
}
