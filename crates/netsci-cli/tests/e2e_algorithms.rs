//! E2E tests for the algorithm commands:
//! `netsci bfs`, `netsci paths`, `netsci betweenness`, `netsci clustering`,
//! `netsci walk`, `netsci power`.
//!
//! Every test runs in a fresh temp dir with JSON output and checks the
//! values worked out by hand for the course graphs.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn netsci_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("netsci"));
    cmd.current_dir(dir);
    cmd.env("NETSCI_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd.env("HOME", dir);
    cmd.env_remove("FORMAT");
    cmd
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = netsci_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("netsci should not crash");
    assert!(
        output.status.success(),
        "netsci {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn node<'a>(states: &'a Value, id: &str) -> &'a Value {
    states
        .as_array()
        .expect("array")
        .iter()
        .find(|entry| entry["node"] == id)
        .unwrap_or_else(|| panic!("node {id} missing"))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ---------------------------------------------------------------------------
// bfs / paths
// ---------------------------------------------------------------------------

#[test]
fn bfs_final_state_matches_course_values() {
    let dir = TempDir::new().unwrap();
    let json = run_json(dir.path(), &["bfs", "--fixture", "shortest-paths"]);

    let final_state = &json["final"];
    assert_eq!(final_state["phase"], "complete");
    let nodes = &final_state["nodes"];
    let expected = [
        ("0", 0, 1),
        ("1", 1, 1),
        ("2", 1, 1),
        ("3", 2, 1),
        ("4", 2, 2),
        ("5", 3, 3),
        ("6", 3, 2),
    ];
    for (id, distance, multiplicity) in expected {
        let state = node(nodes, id);
        assert_eq!(state["distance"], distance, "distance of {id}");
        assert_eq!(state["multiplicity"], multiplicity, "multiplicity of {id}");
    }
    assert_eq!(node(nodes, "5")["predecessors"], serde_json::json!(["3", "4"]));
    assert!(json["trace"].as_array().is_some_and(|t| !t.is_empty()));
}

#[test]
fn bfs_final_only_omits_trace() {
    let dir = TempDir::new().unwrap();
    let json = run_json(
        dir.path(),
        &["bfs", "-x", "betweenness", "--final-only", "-g", "neighbor"],
    );
    assert!(json.get("trace").is_none());
    assert_eq!(json["granularity"], "neighbor");
}

#[test]
fn bfs_unreachable_nodes_have_null_distance() {
    let dir = TempDir::new().unwrap();
    let graph = dir.path().join("split.toml");
    std::fs::write(
        &graph,
        "name = \"split\"\nnodes = [\"a\", \"b\", \"c\"]\nedges = [[\"a\", \"b\"]]\n",
    )
    .unwrap();

    let json = run_json(dir.path(), &["bfs", "-f", "split.toml", "-s", "a"]);
    let state = node(&json["final"]["nodes"], "c");
    assert!(state["distance"].is_null());
    assert_eq!(state["multiplicity"], 0);
}

#[test]
fn paths_to_target_lists_three_paths() {
    let dir = TempDir::new().unwrap();
    let json = run_json(
        dir.path(),
        &["paths", "--fixture", "shortest-paths", "--target", "5"],
    );
    let entry = &json["targets"][0];
    assert_eq!(entry["distance"], 3);
    assert_eq!(
        entry["paths"],
        serde_json::json!([["0", "1", "3", "5"], ["0", "1", "4", "5"], ["0", "2", "4", "5"]])
    );
}

#[test]
fn paths_text_output_is_one_line_per_path() {
    let dir = TempDir::new().unwrap();
    netsci_cmd(dir.path())
        .args(["paths", "-x", "shortest-paths", "-t", "6", "--format", "text"])
        .assert()
        .success()
        .stdout("6\t0-1-4-6\n6\t0-2-4-6\n");
}

// ---------------------------------------------------------------------------
// betweenness
// ---------------------------------------------------------------------------

#[test]
fn single_source_scores_from_zero() {
    let dir = TempDir::new().unwrap();
    let json = run_json(dir.path(), &["betweenness", "--fixture", "betweenness"]);
    assert_eq!(json["leaves"], serde_json::json!(["3", "4"]));
    let scores = &json["scores"];
    for (id, expected) in [("0", 5.0), ("1", 2.0), ("2", 2.0), ("3", 1.0), ("4", 1.0)] {
        let got = scores[id].as_f64().expect("score");
        assert!(close(got, expected), "score of {id}: {got}");
    }
}

#[test]
fn all_sources_betweenness_sums_to_four() {
    let dir = TempDir::new().unwrap();
    let json = run_json(
        dir.path(),
        &["betweenness", "--fixture", "betweenness", "--all-sources"],
    );
    let rows = &json["nodes"];
    for (id, expected) in [("0", 0.0), ("1", 1.5), ("2", 1.5), ("3", 0.5), ("4", 0.5)] {
        let got = node(rows, id)["betweenness"].as_f64().expect("betweenness");
        assert!(close(got, expected), "betweenness of {id}: {got}");
    }
}

// ---------------------------------------------------------------------------
// clustering
// ---------------------------------------------------------------------------

#[test]
fn local_clustering_of_bowtie_centre() {
    let dir = TempDir::new().unwrap();
    let json = run_json(dir.path(), &["clustering", "-x", "clustering-local"]);
    assert_eq!(json["node"], "2");
    assert_eq!(json["degree"], 4);
    assert_eq!(json["possible_pairs"], 6);
    assert_eq!(json["checks"].as_array().map(Vec::len), Some(6));
    assert!(close(json["coefficient"].as_f64().expect("coefficient"), 1.0 / 3.0));
}

#[test]
fn global_clustering_of_bowtie() {
    let dir = TempDir::new().unwrap();
    let json = run_json(
        dir.path(),
        &["clustering", "-x", "clustering-local", "--global"],
    );
    assert_eq!(json["paths_of_length_two"], 20);
    assert_eq!(json["closed_paths"], 12);
    assert!(close(json["coefficient"].as_f64().expect("coefficient"), 0.6));
    assert!(close(
        node(&json["nodes"], "0")["coefficient"].as_f64().expect("local"),
        1.0
    ));
}

#[test]
fn degree_one_node_is_an_error_locally() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("line.toml"),
        "edges = [[\"a\", \"b\"], [\"b\", \"c\"]]\n",
    )
    .unwrap();
    netsci_cmd(dir.path())
        .args(["clustering", "-f", "line.toml", "--node", "a", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3002"));
}

// ---------------------------------------------------------------------------
// walks and matrix powers
// ---------------------------------------------------------------------------

#[test]
fn walk_with_repeat_is_not_a_path() {
    let dir = TempDir::new().unwrap();
    let json = run_json(dir.path(), &["walk", "-x", "walk-path", "A,B,D,E,B,C"]);
    assert_eq!(json["kind"], "walk");
    assert_eq!(json["length"], 5);
    assert_eq!(json["repeated"], serde_json::json!(["B"]));
}

#[test]
fn walk_with_missing_edge_is_rejected() {
    let dir = TempDir::new().unwrap();
    netsci_cmd(dir.path())
        .args(["walk", "-x", "walk-path", "A", "C", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3003"));
}

#[test]
fn power_counts_and_lists_walks() {
    let dir = TempDir::new().unwrap();
    let json = run_json(
        dir.path(),
        &["power", "-x", "matrix-powers", "-k", "2", "--from", "0", "--to", "2"],
    );
    assert_eq!(json["matrix"]["rows"][0][2], 2);
    assert_eq!(json["matrix"]["rows"][0][0], 3);
    assert_eq!(json["walks"]["count"], 2);
    assert_eq!(json["walks"]["walks"].as_array().map(Vec::len), Some(2));
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

#[test]
fn unknown_source_renders_json_error() {
    let dir = TempDir::new().unwrap();
    let output = netsci_cmd(dir.path())
        .args(["bfs", "-x", "betweenness", "-s", "nope", "--json"])
        .output()
        .expect("netsci should not crash");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let json_part = stderr
        .find('{')
        .and_then(|start| stderr.rfind('}').map(|end| &stderr[start..=end]))
        .expect("JSON error on stderr");
    let json: Value = serde_json::from_str(json_part).expect("valid JSON error");
    assert_eq!(json["error"]["error_code"], "E2001");
    assert!(
        json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("nope"))
    );
}

#[test]
fn self_loop_in_graph_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.toml"), "edges = [[\"a\", \"a\"]]\n").unwrap();
    netsci_cmd(dir.path())
        .args(["bfs", "-f", "bad.toml", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"));
}

#[test]
fn unparseable_graph_file_reports_e1002() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.json"), "{\"edges\": [[\"a\"").unwrap();
    netsci_cmd(dir.path())
        .args(["bfs", "-f", "bad.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1002]"));
}
