use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use restorekit_runner::RestoreSummary;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    if std::io::stdout().is_terminal() && !no_color {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn current() -> Self {
        Self::from_style(current_output_style())
    }

    pub(crate) fn style(self) -> OutputStyle {
        self.style
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        println!("{}", render_status_line(self.style, status, message));
    }

    pub(crate) fn print_section(self, title: &str) {
        if self.style == OutputStyle::Rich {
            println!("{}", colorize(section_style(), &format!("== {title} ==")));
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[..]",
    }
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

pub(crate) fn format_summary_lines(summary: &RestoreSummary, style: OutputStyle) -> Vec<String> {
    let elapsed = format_elapsed(summary.elapsed);
    let name = &summary.project_name;
    let mut lines = Vec::with_capacity(1 + summary.errors.len());

    if !summary.success {
        lines.push(render_status_line(
            style,
            "err",
            &format!("{name}: restore failed after {elapsed}"),
        ));
        lines.extend(summary.errors.iter().map(|error| format!("  {}", error.message)));
        return lines;
    }

    let line = if summary.no_op {
        render_status_line(style, "skip", &format!("{name}: up-to-date ({elapsed})"))
    } else {
        let target = summary
            .lock_file_path
            .as_ref()
            .map(|path| format!(" -> {}", path.display()))
            .unwrap_or_default();
        render_status_line(style, "ok", &format!("{name}: restored in {elapsed}{target}"))
    };
    lines.push(line);
    lines
}

pub(crate) fn format_totals_line(summaries: &[RestoreSummary], style: OutputStyle) -> String {
    let failed = summaries.iter().filter(|summary| !summary.success).count();
    let up_to_date = summaries
        .iter()
        .filter(|summary| summary.success && summary.no_op)
        .count();
    let restored = summaries.len() - failed - up_to_date;
    let status = if failed == 0 { "ok" } else { "err" };
    render_status_line(
        style,
        status,
        &format!("restored={restored} up_to_date={up_to_date} failed={failed}"),
    )
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
