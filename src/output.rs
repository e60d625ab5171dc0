//! Shared output formatting for cgrs commands.
//!
//! JSON mode wraps every payload in a versioned envelope; human mode renders
//! a header followed by summary, detail, warning and next-step sections.

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "cgrs.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Error::Validation(fields) = err {
        for (field, message) in fields.iter() {
            eprintln!("  {field}: {message}");
        }
    }
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

/// Command name for error envelopes, worked out before clap parses.
pub fn infer_command_name_from_args() -> String {
    command_name(std::env::args().skip(1))
}

fn command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter().filter(|arg| !arg.starts_with('-'));

    let command = match args.next() {
        Some(cmd) => cmd,
        None => return "cgrs".to_string(),
    };

    if matches!(
        command.as_str(),
        "board" | "task" | "request" | "rsvp" | "calendar"
    ) {
        if let Some(sub) = args.next() {
            return format!("{command} {sub}");
        }
    }

    command
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        exit_codes::USER_ERROR => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::NotFound { kind: "task", .. } => vec!["cgrs board show".to_string()],
        Error::NotFound { kind: "board", .. } => vec!["cgrs board list".to_string()],
        Error::NotFound { kind: "event", .. } => vec!["cgrs calendar month".to_string()],
        Error::Validation(_) => vec!["correct the listed fields and resubmit".to_string()],
        Error::InvalidConfig(_) => vec!["fix .cgrs.toml then retry".to_string()],
        Error::LockFailed(path) => vec![format!(
            "remove {} if no other cgrs process is running",
            path.display()
        )],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn format_human_skips_empty_sections() {
        let mut human = HumanOutput::new("cgrs board: Grounds");
        human.push_summary("tasks", "3");
        human.push_next_step("cgrs task move <id> <status>");
        let text = format_human(&human);
        assert!(text.starts_with("cgrs board: Grounds"));
        assert!(text.contains("Summary:\n- tasks: 3"));
        assert!(text.contains("Next steps:\n- cgrs task move <id> <status>"));
        assert!(!text.contains("Warnings:"));
        assert!(!text.contains("Details:"));
    }

    #[test]
    fn summary_without_value_renders_key_only() {
        let mut human = HumanOutput::new("header");
        human.push_summary("no filters", "");
        assert!(format_human(&human).lines().any(|line| line == "- no filters"));
    }

    #[test]
    fn command_name_includes_subcommand_for_groups() {
        assert_eq!(
            command_name(args(&["--json", "task", "move", "t1", "done"])),
            "task move"
        );
        assert_eq!(command_name(args(&["rsvp", "--json", "toggle", "e1"])), "rsvp toggle");
        assert_eq!(command_name(args(&["--help"])), "cgrs");
    }

    #[test]
    fn error_kinds_follow_exit_codes() {
        assert_eq!(error_kind(&Error::not_found("task", "t1")), "user_error");
        assert_eq!(
            error_kind(&Error::OperationFailed("disk".to_string())),
            "operation_failed"
        );
    }

    #[test]
    fn not_found_suggests_listing_command() {
        assert_eq!(
            error_next_steps(&Error::not_found("event", "gala")),
            vec!["cgrs calendar month".to_string()]
        );
        assert!(error_next_steps(&Error::OperationFailed("x".into())).is_empty());
    }
}
