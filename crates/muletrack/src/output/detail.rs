use muletrack_types::MonitorResult;
use std::fmt::Write;

use super::format_timestamp;

const GREEN: &str = "\x1b[38;5;46m";
const CYAN: &str = "\x1b[38;5;51m";
const GREY: &str = "\x1b[38;5;245m";
const RED: &str = "\x1b[38;5;196m";
const RESET: &str = "\x1b[0m";

fn rule(out: &mut String) {
    let _ = writeln!(out, "{}{}{}", GREY, "═".repeat(50), RESET);
}

/// Key/value view of a single monitored application.
pub fn render_detail(result: &MonitorResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}Application {}{}", GREEN, result.app_id, RESET);
    rule(&mut out);
    let _ = writeln!(out, "Type:           {}{}{}", CYAN, result.app_type, RESET);
    let _ = writeln!(
        out,
        "Last Called:    {}{}{} {}(window {}){}",
        CYAN,
        format_timestamp(result.last_called.as_ref()),
        RESET,
        GREY,
        result.last_called_window,
        RESET
    );
    let _ = writeln!(
        out,
        "Request Count:  {}{}{} {}(window {}){}",
        CYAN, result.request_count, RESET, GREY, result.request_count_window, RESET
    );
    if let Some(ref failure) = result.failure {
        let _ = writeln!(out, "Error:          {}{}{}", RED, failure, RESET);
    }
    rule(&mut out);
    out
}
