//! Scenario files.
//!
//! A scenario is a TOML document declaring a hierarchy and a list of calls:
//!
//! ```toml
//! [config]
//! override_lookup = "at-override"
//!
//! [[class]]
//! name = "Base"
//! methods = [{ name = "DoWork", kind = "virtual", params = ["int"] }]
//!
//! [[class]]
//! name = "Derived"
//! parent = "Base"
//! methods = [
//!     { name = "DoWork", kind = "override", params = ["int"] },
//!     { name = "DoWork", kind = "plain", params = ["double"] },
//! ]
//!
//! [[call]]
//! static = "Base"
//! runtime = "Derived"
//! method = "DoWork"
//! args = ["int"]
//! expect = "Derived.DoWork(int)"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ResolverConfig;
use crate::dispatch::{CallSite, CallSiteError};
use crate::graph::{BodyCall, DeclError, DispatchKind, MethodDecl, TypeGraph};
use crate::ty::{PrimitiveTy, Signature};

use super::{CallReport, Simulator};

/// Scenario errors.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("declaration rejected: {0}")]
    Decl(#[from] DeclError),

    #[error("call #{index}: {source}")]
    CallSite {
        index: usize,
        #[source]
        source: CallSiteError,
    },
}

/// A class entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

/// A method entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    pub kind: DispatchKind,
    #[serde(default)]
    pub params: Vec<PrimitiveTy>,
    /// Calls made on `this`.
    #[serde(default)]
    pub body: Vec<BodyCall>,
}

impl MethodSpec {
    fn to_decl(&self) -> MethodDecl {
        MethodDecl::new(self.name.clone(), Signature::new(self.params.clone()), self.kind)
            .with_body(self.body.clone())
    }
}

/// A call entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSpec {
    #[serde(rename = "static")]
    pub static_type: String,
    /// Defaults to the static type.
    #[serde(default)]
    pub runtime: Option<String>,
    pub method: String,
    #[serde(default)]
    pub args: Vec<PrimitiveTy>,
    /// Expected `Class.Name(params)` or failure kind.
    #[serde(default)]
    pub expect: Option<String>,
    /// Also execute the resolved body.
    #[serde(default)]
    pub trace: bool,
}

/// A hierarchy plus the calls to run against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: ResolverConfig,
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassSpec>,
    #[serde(default, rename = "call")]
    pub calls: Vec<CallSpec>,
}

/// One executed call entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEntry {
    #[serde(flatten)]
    pub report: CallReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Execution trace lines; a failing execution ends with an `error:` line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
}

impl RunEntry {
    /// Whether the result matches the expectation, if one was given.
    pub fn meets_expectation(&self) -> bool {
        self.expected
            .as_deref()
            .map_or(true, |expected| expected == self.report.result_text())
    }
}

/// Results of running a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScenarioRun {
    pub entries: Vec<RunEntry>,
}

impl ScenarioRun {
    /// Entries whose result differs from their expectation.
    pub fn unmet_expectations(&self) -> impl Iterator<Item = &RunEntry> {
        self.entries.iter().filter(|e| !e.meets_expectation())
    }

    pub fn all_expectations_met(&self) -> bool {
        self.unmet_expectations().next().is_none()
    }
}

impl Scenario {
    /// Parse a scenario from TOML text.
    pub fn from_toml(source: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading scenario");
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Replay the class and method declarations in order.
    pub fn build(&self) -> Result<TypeGraph, ScenarioError> {
        let mut graph = TypeGraph::new();
        for class in &self.classes {
            let id = graph.declare_class(class.name.clone(), class.parent.as_deref())?;
            for method in &class.methods {
                graph.declare_method(id, method.to_decl())?;
            }
        }
        info!(
            classes = graph.class_count(),
            methods = graph.method_count(),
            "built type graph"
        );
        Ok(graph)
    }

    /// Build the call sites against `graph`.
    pub fn call_sites(&self, graph: &TypeGraph) -> Result<Vec<CallSite>, ScenarioError> {
        self.calls
            .iter()
            .enumerate()
            .map(|(index, call)| {
                let runtime = call.runtime.as_deref().unwrap_or(&call.static_type);
                CallSite::by_name(graph, &call.static_type, runtime, call.method.clone(), &call.args)
                    .map_err(|source| ScenarioError::CallSite { index, source })
            })
            .collect()
    }

    /// Build the graph, resolve every call and execute the traced ones.
    pub fn run(&self, config: &ResolverConfig) -> Result<ScenarioRun, ScenarioError> {
        let graph = self.build()?;
        let sites = self.call_sites(&graph)?;
        let sim = Simulator::with_config(&graph, config.clone());

        let entries = self
            .calls
            .iter()
            .zip(&sites)
            .zip(sim.report(&sites))
            .map(|((spec, site), report)| {
                let trace = if spec.trace {
                    match sim.execute(site) {
                        Ok(trace) => trace.lines(&graph),
                        Err(err) => vec![format!("error: {}", err)],
                    }
                } else {
                    Vec::new()
                };
                RunEntry {
                    report,
                    expected: spec.expect.clone(),
                    trace,
                }
            })
            .collect();

        Ok(ScenarioRun { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverrideLookup;
    use pretty_assertions::assert_eq;

    const OVERLOADS: &str = r#"
[[class]]
name = "Base"
methods = [{ name = "DoWork", kind = "virtual", params = ["int"] }]

[[class]]
name = "Derived"
parent = "Base"
methods = [
    { name = "DoWork", kind = "override", params = ["int"] },
    { name = "DoWork", kind = "plain", params = ["double"] },
]

[[call]]
static = "Base"
method = "DoWork"
args = ["int"]
expect = "Base.DoWork(int)"

[[call]]
static = "Derived"
method = "DoWork"
args = ["int"]
expect = "Derived.DoWork(int)"

[[call]]
static = "Base"
runtime = "Derived"
method = "DoWork"
args = ["int"]
expect = "Derived.DoWork(int)"
"#;

    #[test]
    fn test_parse_and_run() {
        let scenario = Scenario::from_toml(OVERLOADS).unwrap();
        assert_eq!(scenario.classes.len(), 2);
        assert_eq!(scenario.calls.len(), 3);
        assert_eq!(scenario.config, ResolverConfig::default());

        let run = scenario.run(&scenario.config).unwrap();
        assert!(run.all_expectations_met());
        let results: Vec<_> = run.entries.iter().map(|e| e.report.result_text()).collect();
        assert_eq!(
            results,
            vec!["Base.DoWork(int)", "Derived.DoWork(int)", "Derived.DoWork(int)"]
        );
    }

    #[test]
    fn test_config_changes_expectations() {
        let scenario = Scenario::from_toml(OVERLOADS).unwrap();
        let config = ResolverConfig::default().with_override_lookup(OverrideLookup::AtIntroduction);

        let run = scenario.run(&config).unwrap();
        let unmet: Vec<_> = run.unmet_expectations().map(|e| e.report.result_text()).collect();
        assert_eq!(unmet, vec!["Derived.DoWork(double)"]);
    }

    #[test]
    fn test_config_table() {
        let scenario = Scenario::from_toml(
            r#"
[config]
override_lookup = "at-introduction"
max_call_depth = 8
"#,
        )
        .unwrap();
        assert_eq!(scenario.config.override_lookup, OverrideLookup::AtIntroduction);
        assert_eq!(scenario.config.max_call_depth, 8);
        assert!(scenario.classes.is_empty());
    }

    #[test]
    fn test_unknown_type_tag() {
        let err = Scenario::from_toml(
            r#"
[[class]]
name = "A"
methods = [{ name = "F", kind = "plain", params = ["decimal"] }]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn test_new_is_an_alias_for_hide() {
        let scenario = Scenario::from_toml(
            r#"
[[class]]
name = "A"
methods = [{ name = "F", kind = "plain" }]

[[class]]
name = "B"
parent = "A"
methods = [{ name = "F", kind = "new" }]
"#,
        )
        .unwrap();
        assert_eq!(scenario.classes[1].methods[0].kind, DispatchKind::Hide);
    }

    #[test]
    fn test_build_surfaces_first_declaration_error() {
        let scenario = Scenario::from_toml(
            r#"
[[class]]
name = "A"
methods = [{ name = "F", kind = "override" }]

[[class]]
name = "B"
parent = "Missing"
"#,
        )
        .unwrap();
        match scenario.build() {
            Err(ScenarioError::Decl(DeclError::InvalidOverride { class, method, .. })) => {
                assert_eq!(class, "A");
                assert_eq!(method, "F");
            }
            other => panic!("Expected InvalidOverride, got {:?}", other),
        }
    }

    #[test]
    fn test_call_site_errors_carry_index() {
        let scenario = Scenario::from_toml(
            r#"
[[class]]
name = "A"

[[class]]
name = "B"
parent = "A"

[[call]]
static = "A"
method = "F"

[[call]]
static = "B"
runtime = "A"
method = "F"
"#,
        )
        .unwrap();
        let graph = scenario.build().unwrap();
        match scenario.call_sites(&graph) {
            Err(ScenarioError::CallSite { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(source, CallSiteError::NotADescendant { .. }));
            }
            other => panic!("Expected CallSite error, got {:?}", other),
        }
    }

    #[test]
    fn test_trace_entries() {
        let scenario = Scenario::from_toml(
            r#"
[[class]]
name = "Parent"
methods = [
    { name = "Foo", kind = "virtual" },
    { name = "Func", kind = "plain", body = [{ method = "Foo" }] },
]

[[class]]
name = "Child"
parent = "Parent"
methods = [{ name = "Foo", kind = "override" }]

[[call]]
static = "Child"
method = "Func"
trace = true
"#,
        )
        .unwrap();
        let run = scenario.run(&scenario.config).unwrap();
        assert_eq!(run.entries[0].trace, vec!["Parent.Func()", "  Child.Foo()"]);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overloads.toml");
        std::fs::write(&path, OVERLOADS).unwrap();

        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario, Scenario::from_toml(OVERLOADS).unwrap());
        assert!(matches!(
            Scenario::load(dir.path().join("missing.toml")),
            Err(ScenarioError::Io(_))
        ));
    }
}
