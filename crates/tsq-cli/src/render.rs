//! Human-readable rendering of responses for one-shot queries.

use std::io::Write;

use colored::Colorize;
use tsq_services::Response;
use tsq_services::jsdoc::TagInfo;

pub fn render(response: &Response, out: &mut impl Write) -> std::io::Result<()> {
    match response {
        Response::Completions(None)
        | Response::CompletionDetails(None)
        | Response::Hover(None)
        | Response::SignatureHelp(None) => writeln!(out, "{}", "no result".dimmed()),
        Response::Completions(Some(list)) => {
            if list.is_new_identifier_location {
                writeln!(out, "{}", "(new identifier location)".dimmed())?;
            }
            for item in &list.items {
                write!(out, "{:<32} {:<14} {}", item.label.bold(), item.kind.as_str().cyan(), item.sort_text)?;
                if let Some(insert) = &item.insert_text {
                    write!(out, "  {} {insert}", "->".dimmed())?;
                }
                if item.deprecated {
                    write!(out, "  {}", "deprecated".yellow())?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
        Response::CompletionDetails(Some(details)) => {
            writeln!(out, "{}", details.display_string().bold())?;
            render_documentation(&details.documentation.to_text(), &details.tags, out)
        }
        Response::Hover(Some(info)) => {
            writeln!(out, "{}", info.display_string().bold())?;
            render_documentation(&info.documentation_string(), &info.tags, out)
        }
        Response::Definition(found) => {
            if found.is_empty() {
                return writeln!(out, "{}", "no result".dimmed());
            }
            for definition in found {
                writeln!(
                    out,
                    "{}:{} {} {}",
                    definition.file_name.green(),
                    definition.text_span.start,
                    definition.kind.as_str().cyan(),
                    qualified(&definition.container_name, &definition.name)
                )?;
            }
            Ok(())
        }
        Response::References(found) => {
            if found.is_empty() {
                return writeln!(out, "{}", "no result".dimmed());
            }
            for entry in found {
                let marker = match (entry.is_definition, entry.is_write_access) {
                    (true, _) => "def".magenta(),
                    (false, true) => "write".yellow(),
                    (false, false) => "read".normal(),
                };
                writeln!(
                    out,
                    "{}:{} {:<5} {}",
                    entry.file_name.green(),
                    entry.text_span.start,
                    marker,
                    entry.line_text.trim()
                )?;
            }
            Ok(())
        }
        Response::SignatureHelp(Some(help)) => {
            for (index, item) in help.items.iter().enumerate() {
                let label = item.label();
                if index == help.selected_item_index {
                    writeln!(out, "{} {}", ">".green(), label.bold())?;
                } else {
                    writeln!(out, "  {label}")?;
                }
            }
            writeln!(
                out,
                "{}",
                format!("argument {} of {}", help.argument_index + 1, help.argument_count.max(1)).dimmed()
            )
        }
    }
}

fn render_documentation(documentation: &str, tags: &[TagInfo], out: &mut impl Write) -> std::io::Result<()> {
    if !documentation.is_empty() {
        writeln!(out)?;
        writeln!(out, "{documentation}")?;
    }
    for tag in tags {
        match &tag.text {
            Some(text) => writeln!(out, "{} {text}", format!("@{}", tag.name).italic())?,
            None => writeln!(out, "{}", format!("@{}", tag.name).italic())?,
        }
    }
    Ok(())
}

fn qualified(container: &str, name: &str) -> String {
    if container.is_empty() {
        name.to_string()
    } else {
        format!("{container}.{name}")
    }
}
