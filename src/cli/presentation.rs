//! CLI presentation: text and json formatters for identity and output summaries.

use crate::command::ClosedOutputs;
use crate::environment::CiEnvironment;
use crate::error::ApiError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

const VALUE_PREVIEW_LEN: usize = 60;

fn preview(value: &str) -> String {
    let first_line = value.lines().next().unwrap_or("");
    let mut out: String = first_line.chars().take(VALUE_PREVIEW_LEN).collect();
    if out.len() < value.len() {
        out.push_str("...");
    }
    out
}

pub fn format_identity_text(environment: &dyn CiEnvironment) -> String {
    let identity = environment.identity();
    let destination = environment
        .destination()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let ref_type = identity
        .ref_type()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Platform".to_string(), environment.platform().to_string()]);
    table.add_row(vec!["Run".to_string(), identity.id()]);
    table.add_row(vec!["Run ID".to_string(), identity.run_id().to_string()]);
    table.add_row(vec!["Run number".to_string(), identity.run_number().to_string()]);
    table.add_row(vec!["SHA".to_string(), identity.sha().to_string()]);
    table.add_row(vec!["Short SHA".to_string(), identity.sha_short().to_string()]);
    table.add_row(vec!["Actor".to_string(), identity.actor().to_string()]);
    table.add_row(vec!["Repository".to_string(), identity.repository().to_string()]);
    table.add_row(vec!["Ref".to_string(), identity.ref_name().to_string()]);
    table.add_row(vec!["Ref type".to_string(), ref_type]);
    table.add_row(vec![
        "Scratch dir".to_string(),
        identity.write_dir().display().to_string(),
    ]);
    table.add_row(vec!["Output file".to_string(), destination]);
    format!("Run identity\n\n{}", table)
}

pub fn format_identity_json(environment: &dyn CiEnvironment) -> Result<String, ApiError> {
    let identity = environment.identity();
    let out = json!({
        "platform": environment.platform(),
        "id": identity.id(),
        "run_id": identity.run_id(),
        "run_number": identity.run_number(),
        "sha": identity.sha(),
        "sha_short": identity.sha_short(),
        "actor": identity.actor(),
        "repository": identity.repository(),
        "ref_name": identity.ref_name(),
        "ref_type": identity.ref_type(),
        "write_dir": identity.write_dir(),
        "destination": environment.destination(),
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn format_close_summary_text(closed: &ClosedOutputs) -> String {
    if closed.outputs.is_empty() {
        return "No outputs recorded.".to_string();
    }
    let report = &closed.report;
    let mut out = match report.destination {
        Some(ref path) => format!(
            "Wrote {} output(s) to {}",
            report.written.len(),
            path.display()
        ),
        None => format!(
            "No platform output file; {} output(s) echoed to console",
            report.echoed
        ),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Key", "Encoding", "Value"]);
    for (key, value) in closed.outputs.iter() {
        let encoding = if value.needs_delimited_block() {
            "block"
        } else {
            "line"
        };
        let shown = if value.visible_on_stdout() {
            preview(value.as_str())
        } else {
            "(hidden)".to_string()
        };
        table.add_row(vec![key.to_string(), encoding.to_string(), shown]);
    }
    out.push_str(&format!("\n\n{}", table));
    out
}

pub fn format_close_summary_json(closed: &ClosedOutputs) -> Result<String, ApiError> {
    let keys: Vec<&str> = closed.outputs.keys().collect();
    let out = json!({
        "destination": closed.report.destination,
        "outputs": keys,
        "written": closed.report.written,
        "skipped": closed.report.skipped,
        "echoed": closed.report.echoed,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}
