use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::lookup::aggregate::ResultMap;
use crate::lookup::outcome::LookupOutcome;

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Hostname / Reason")]
    detail: String,
}

pub fn batch_header_msg(request_count: usize, parallelism: usize, timeout: u64, resolver: &str) -> String {
    format!(
        "Looking up {request_count} address(es) with {parallelism} worker(s), {timeout}ms timeout, {resolver} resolver"
    )
}

pub fn unsupported_msg(token: &str) -> String {
    format!("Skipping `{token}`: only IP address lookups are supported")
}

pub fn outcome_msg(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Resolved { .. } => format!("RESOLVED {outcome}"),
        LookupOutcome::Failed { .. } => format!("FAILED {outcome}"),
    }
}

/// The result map as JSON, four space indent, keys sorted.
pub fn result_map_json(map: &ResultMap) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    map.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Every outcome, failures included, sorted by IP.
pub fn outcome_table_msg(outcomes: &[LookupOutcome]) -> String {
    let mut rows: Vec<OutcomeRow> = outcomes
        .iter()
        .map(|outcome| match outcome {
            LookupOutcome::Resolved { ip, hostname } => OutcomeRow {
                ip: ip.to_owned(),
                status: "resolved".to_owned(),
                detail: hostname.to_owned(),
            },
            LookupOutcome::Failed { ip, reason } => OutcomeRow {
                ip: ip.to_owned(),
                status: "failed".to_owned(),
                detail: reason.to_string(),
            },
        })
        .collect();
    rows.sort_by(|a, b| a.ip.cmp(&b.ip));

    Table::new(rows).with(Style::modern()).to_string()
}

pub fn summary_msg(resolved: usize, failed: usize, unsupported: usize, elapsed: &str) -> String {
    format!("{resolved} resolved, {failed} failed, {unsupported} skipped\nElapsed time: {elapsed} seconds.")
}
