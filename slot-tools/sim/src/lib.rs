//! Output rendering for the `slot-sim` harness.
//!
//! The binary parses arguments and loads files; everything that turns a
//! scenario run or a class's slot table into text lives here so it can be
//! tested without spawning a process.

use serde::Serialize;

use slotc::sim::ScenarioRun;
use slotc::{ClassId, DispatchKind, ResolverConfig, Scenario, TypeGraph};

/// Render a run as one line per call, with trace lines indented beneath and
/// unmet expectations flagged.
pub fn render_text(run: &ScenarioRun) -> String {
    let mut out = String::new();
    for entry in &run.entries {
        out.push_str(&entry.report.to_string());
        out.push('\n');
        for line in &entry.trace {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        if !entry.meets_expectation() {
            if let Some(expected) = &entry.expected {
                out.push_str(&format!("    MISMATCH: expected {}\n", expected));
            }
        }
    }
    out
}

/// One-line tally of a run.
pub fn summary(run: &ScenarioRun) -> String {
    let total = run.entries.len();
    let checked = run.entries.iter().filter(|e| e.expected.is_some()).count();
    let unmet = run.unmet_expectations().count();
    format!(
        "{} calls, {} with expectations, {} unmet",
        total, checked, unmet
    )
}

/// Render a run as pretty-printed JSON.
pub fn render_json(run: &ScenarioRun) -> serde_json::Result<String> {
    serde_json::to_string_pretty(run)
}

/// One row of a class's slot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VtableRow {
    /// `Origin.Name(params)` of the member that introduced the slot.
    pub slot: String,
    /// `Class.Name(params)` of the implementation a call through the slot runs.
    pub target: String,
    pub kind: DispatchKind,
}

/// The slot table of `class`, in slot introduction order.
pub fn vtable_rows(graph: &TypeGraph, class: ClassId) -> Vec<VtableRow> {
    graph
        .vtable(class)
        .into_iter()
        .map(|(slot, method)| {
            VtableRow {
                slot: graph.qualified_name(graph.slot(slot).origin),
                target: graph.qualified_name(method),
                kind: graph.method(method).kind,
            }
        })
        .collect()
}

/// Render a slot table with aligned columns.
pub fn render_vtable(rows: &[VtableRow]) -> String {
    let width = rows.iter().map(|r| r.slot.len()).max().unwrap_or(0);
    rows.iter()
        .map(|r| format!("{:<width$}  -> {} ({})\n", r.slot, r.target, r.kind, width = width))
        .collect()
}

/// Default configuration as TOML.
pub fn render_default_config() -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&ResolverConfig::default())
}

/// Build a scenario's graph and look up `class` in it.
pub fn scenario_class(scenario: &Scenario, class: &str) -> anyhow::Result<(TypeGraph, ClassId)> {
    let graph = scenario.build()?;
    let id = graph
        .class_by_name(class)
        .ok_or_else(|| anyhow::anyhow!("unknown class `{}`", class))?;
    Ok((graph, id))
}
