use console_engine::Severity;
use ratatui::{prelude::*, style::palette::tailwind};

/// Application theme - centralized color and style management
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg_primary: Color,
    pub bg_status: Color,

    // Text colors
    pub text_primary: Color,
    pub text_muted: Color,

    // Accent colors
    pub accent_primary: Color,

    // Status colors
    pub status_success: Color,
    pub status_error: Color,
    pub status_warning: Color,
    pub status_info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg_primary: tailwind::SLATE.c950,
            bg_status: tailwind::SLATE.c800,

            text_primary: tailwind::SLATE.c100,
            text_muted: tailwind::SLATE.c400,

            accent_primary: tailwind::CYAN.c400,

            status_success: tailwind::GREEN.c400,
            status_error: tailwind::RED.c400,
            status_warning: tailwind::YELLOW.c400,
            status_info: tailwind::BLUE.c400,
        }
    }

    pub fn panel_background(&self) -> Style {
        Style::default().bg(self.bg_primary).fg(self.text_primary)
    }

    pub fn panel_border(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn panel_title(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.bg_status).fg(self.text_muted)
    }

    pub fn status_message(&self) -> Style {
        Style::default()
            .bg(self.bg_status)
            .fg(self.status_error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input_prompt(&self) -> Style {
        Style::default().fg(self.accent_primary)
    }

    /// Style for a console line of the given severity
    pub fn log_line(&self, severity: Severity) -> Style {
        match severity {
            Severity::Default => Style::default().fg(self.text_primary),
            Severity::Info => Style::default().fg(self.status_info),
            Severity::Warn => Style::default().fg(self.status_warning),
            Severity::Error => Style::default().fg(self.status_error),
            Severity::Success => Style::default()
                .fg(self.status_success)
                .add_modifier(Modifier::BOLD),
        }
    }
}
