//! Status lines for human-facing commands
//!
//! Every step funnels through [`emit`], which picks the cliclack log level
//! in a terminal or a bracketed tag on plain output.

use super::context::UiContext;
use console::{style, StyledObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Info,
}

impl Status {
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Self::Ok => style("[OK]").green(),
            Self::Warn => style("[WARN]").yellow(),
            Self::Info => style("[INFO]").cyan(),
        }
    }
}

/// `message (note)`, with the note dimmed in a terminal
fn annotate(ctx: &UiContext, message: &str, note: Option<&str>) -> String {
    match note {
        Some(note) if ctx.use_fancy_output() => format!("{} ({})", message, style(note).dim()),
        Some(note) => format!("{} ({})", message, note),
        None => message.to_string(),
    }
}

fn emit(ctx: &UiContext, status: Status, line: String) {
    if !ctx.use_fancy_output() {
        println!("  {} {}", status.tag(), line);
        return;
    }
    let shown = match status {
        Status::Ok => cliclack::log::success(line),
        Status::Warn => cliclack::log::warning(line),
        Status::Info => cliclack::log::info(line),
    };
    shown.ok();
}

/// Heading above a group of lines
pub fn section(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

/// A completed step, optionally with a detail such as a size or path
pub fn step_ok(ctx: &UiContext, message: &str, detail: Option<&str>) {
    emit(ctx, Status::Ok, annotate(ctx, message, detail));
}

/// A step that degraded, optionally with a hint on what happens next
pub fn step_warn(ctx: &UiContext, message: &str, hint: Option<&str>) {
    emit(ctx, Status::Warn, annotate(ctx, message, hint));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    emit(ctx, Status::Info, message.to_string());
}

/// Secondary line under a section (one per listed entry)
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("    {}", message);
    }
}

pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    let key = if ctx.use_fancy_output() {
        style(key).dim().to_string()
    } else {
        key.to_string()
    };
    println!("  {}: {}", key, value);
}
