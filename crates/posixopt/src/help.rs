//! Plain-text help and version rendering.

use crate::getopt::GetOpt;
use crate::option::Opt;
use std::sync::Arc;

/// Program-level text shown around the option tables.
#[derive(Debug, Clone, Default)]
pub struct HelpMeta {
    pub name: String,
    pub summary: String,
    pub version: String,
    pub description: String,
    pub examples: Vec<String>,
}

fn option_name(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

fn format_value_name(opt: &Opt) -> String {
    opt.value_name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| opt.name().to_ascii_uppercase())
}

fn format_left(opt: &Opt) -> String {
    match opt {
        Opt::Command(_) => opt.names().join(", "),
        Opt::Term(_) => {
            let n = format_value_name(opt);
            if opt.required() {
                format!("<{n}>")
            } else {
                format!("[{n}]")
            }
        }
        Opt::Flag(_) | Opt::Param(_) => {
            // Short names first, like `-v, --verbose`.
            let mut names: Vec<&String> = opt.names().iter().collect();
            names.sort_by_key(|n| n.chars().count() != 1);
            let mut out = names
                .iter()
                .map(|n| option_name(n))
                .collect::<Vec<_>>()
                .join(", ");
            if opt.accepts_value() {
                out.push_str(&format!(" <{}>", format_value_name(opt)));
            }
            out
        }
    }
}

fn format_help(opt: &Opt) -> String {
    let mut out = opt.description().trim().to_string();
    let mut annotate = |text: String| {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&text);
    };
    if opt.required() && !opt.is_term() {
        annotate("(required)".to_string());
    }
    if let Opt::Param(_) = opt {
        let default = opt.default_value();
        if !default.is_null() {
            annotate(format!("[default: {default}]"));
        }
    }
    out
}

fn push_section(out: &mut String, title: &str, opts: &[&Arc<Opt>]) {
    if opts.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let rows: Vec<(String, String)> = opts
        .iter()
        .map(|o| (format_left(o), format_help(o)))
        .collect();
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

fn usage_line(
    getopt: &GetOpt,
    meta: &HelpMeta,
    command: Option<&str>,
    terms: &[&Arc<Opt>],
    switches: &[&Arc<Opt>],
) -> String {
    let mut line = meta.name.clone();
    match command {
        Some(command) => {
            line.push(' ');
            line.push_str(command);
        }
        None if getopt.options().has_commands() => line.push_str(" <COMMAND>"),
        None => {}
    }
    if !switches.is_empty() {
        line.push_str(" [OPTIONS]");
    }
    for term in terms {
        line.push(' ');
        line.push_str(&format_left(term));
    }
    line
}

fn render_with(getopt: &GetOpt, meta: &HelpMeta, command: Option<&Opt>) -> String {
    let allowed = |opt: &Arc<Opt>| match command {
        Some(command) => getopt.usage().is_allowed(command.name(), opt.name()),
        None => true,
    };

    let mut out = String::new();
    let title = match command {
        Some(command) => format!("{} {}", meta.name, command.name()),
        None => meta.name.clone(),
    };
    let summary = match command {
        Some(command) => command.description().trim(),
        None => meta.summary.trim(),
    };
    if summary.is_empty() {
        out.push_str(&title);
        out.push('\n');
    } else {
        out.push_str(&format!("{title} - {summary}\n"));
    }

    let registry = getopt.options();
    let terms: Vec<&Arc<Opt>> = registry.terms().iter().filter(|o| allowed(*o)).collect();
    let switches: Vec<&Arc<Opt>> = registry
        .options()
        .iter()
        .filter(|o| matches!(o.as_ref(), Opt::Flag(_) | Opt::Param(_)))
        .filter(|o| allowed(*o))
        .collect();

    out.push_str(&format!(
        "\nUsage: {}\n",
        usage_line(getopt, meta, command.map(|c| c.name()), &terms, &switches)
    ));

    if command.is_none() && !meta.description.trim().is_empty() {
        out.push('\n');
        out.push_str(meta.description.trim_end());
        out.push('\n');
    }

    if command.is_none() {
        let commands: Vec<&Arc<Opt>> = registry.commands().iter().collect();
        push_section(&mut out, "Commands", &commands);
    }
    push_section(&mut out, "Arguments", &terms);
    push_section(&mut out, "Options", &switches);

    if command.is_none() && !meta.examples.is_empty() {
        out.push_str("\nExamples:\n");
        for ex in &meta.examples {
            if ex.trim().is_empty() {
                continue;
            }
            out.push_str(&format!("  {}\n", ex.trim_end()));
        }
    }

    out
}

/// Render help for the whole program.
pub fn render(getopt: &GetOpt, meta: &HelpMeta) -> String {
    render_with(getopt, meta, None)
}

/// Render help for one command, listing only the options its usage
/// definition allows. Returns `None` for unknown commands.
pub fn render_command(getopt: &GetOpt, meta: &HelpMeta, command: &str) -> Option<String> {
    let command = getopt.options().find_command(command)?;
    Some(render_with(getopt, meta, Some(command.as_ref())))
}

/// Render a version line.
pub fn version(meta: &HelpMeta) -> String {
    if meta.version.trim().is_empty() {
        format!("{}\n", meta.name)
    } else {
        format!("{} {}\n", meta.name, meta.version.trim())
    }
}
