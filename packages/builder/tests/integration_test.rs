//! End-to-end integration tests for the builder pipeline.
//!
//! Runs the complete build against fixture data modelled on the European
//! Digital Identity Framework (Regulation (EU) 2024/1183) and one of its
//! implementing acts.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

use regdocs_builder::config::BuildPaths;
use regdocs_builder::search::SearchIndex;
use regdocs_builder::{build, build_excerpts};

/// Fixture directory for the EU data set.
fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("eu")
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Copy the fixtures into a scratch data directory.
fn scratch_data() -> TempDir {
    let dir = tempdir().unwrap();
    copy_dir(&fixture_dir(), dir.path());
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&read(path)).unwrap()
}

/// Keep only the first `count` terminology records.
fn truncate_terminology(dir: &Path, count: usize) {
    let path = dir.join("terminology.json");
    let mut value = read_json(&path);
    let terms = value["terms"].as_array_mut().unwrap();
    terms.truncate(count);
    fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
}

fn builder_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_regdocs-builder"))
}

#[test]
fn test_build_anchors_hosted_regulation() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);

    let report = build(&paths, |_| {}).unwrap();
    assert_eq!(report.documents, 2);
    assert_eq!(report.links, 2);

    let html = read(&paths.content_output("2024-1183"));
    for id in [
        "recital-1",
        "recital-2",
        "article-3-point-a",
        "article-5a-para-1",
        "article-5a-para-2",
        "article-5a-para-2-point-a",
        "article-5a-para-2-point-a-subpoint-ii",
        "article-5a-para-2-point-b",
        "article-5a-para-4",
        "annex-i-para-1",
    ] {
        assert!(html.contains(&format!("id=\"{id}\"")), "missing anchor {id}");
    }
    assert!(!html.contains("id=\"article-5a-para-3\""));
    assert!(html.contains("<ol start=\"4\">"));
}

#[test]
fn test_build_nested_units_carry_enclosing_para_and_point() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    build(&paths, |_| {}).unwrap();

    let html = read(&paths.content_output("2024-1183"));
    assert!(html.contains(
        "<li id=\"article-5a-para-2-point-b\" data-point=\"b\" data-article=\"article-5a\" data-para=\"2\" class=\"linkable-point\">"
    ));
    assert!(html.contains(
        "<li id=\"article-5a-para-2-point-a-subpoint-ii\" data-subpoint=\"ii\" data-article=\"article-5a\" data-para=\"2\" data-point=\"a\" class=\"linkable-subpoint\">"
    ));
    assert!(html.contains(
        "<li id=\"article-3-point-a\" data-point=\"a\" data-article=\"article-3\" class=\"linkable-point\">"
    ));
}

#[test]
fn test_build_roman_i_is_read_as_a_letter() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    build(&paths, |_| {}).unwrap();

    let html = read(&paths.content_output("2024-1183"));
    assert!(html.contains("id=\"article-5a-para-2-point-i\""));
    assert!(!html.contains("subpoint-i\""));
}

#[test]
fn test_build_links_external_citations() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    build(&paths, |_| {}).unwrap();

    let eidas = read(&paths.content_output("2024-1183"));
    assert!(eidas.contains("CELEX:32022R1925#006.007"));
    assert!(eidas.contains("data-doc-short=\"DMA\""));

    let implementing = read(&paths.content_output("2024-2977"));
    assert!(implementing.contains("CELEX:32016R0679\""));
    assert!(!implementing.contains("2024/1183</a>"));
    assert!(implementing.contains("Regulation (EU) 2024/1183"));
}

#[test]
fn test_build_links_defined_terms() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    let report = build(&paths, |_| {}).unwrap();
    assert!(report.term_links > 0);

    let eidas = read(&paths.content_output("2024-1183"));
    assert!(eidas.contains(
        "<span class=\"term-link\" data-term-id=\"trust-service\" tabindex=\"0\">trust services</span>"
    ));
    assert!(eidas.contains("data-term-id=\"electronic-signature\" tabindex=\"0\">electronic signatures</span>"));
    assert!(eidas.contains("data-term-id=\"qualified-certificate\" tabindex=\"0\">qualified certificates</span>"));

    // Article 3 defines the terms and links none of them
    let start = eidas.find("id=\"article-3\"").unwrap();
    let end = eidas.find("id=\"chapter-ii\"").unwrap();
    assert!(!eidas[start..end].contains("term-link"));
    assert!(eidas[end..].contains("data-term-id=\"person-identification-data\""));

    let implementing = read(&paths.content_output("2024-2977"));
    assert!(implementing.contains(
        "<span class=\"term-link\" data-term-id=\"person-identification-data\" tabindex=\"0\">person identification data</span>"
    ));
}

#[test]
fn test_build_writes_excerpts_and_sections() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    build(&paths, |_| {}).unwrap();

    let excerpts = read_json(&paths.excerpts_output());
    let eidas = &excerpts["2024-1183"];
    assert!(eidas["article-5a-para-4"]["excerpt"]
        .as_str()
        .unwrap()
        .starts_with("Gatekeepers designated"));
    assert_eq!(eidas["recital-2"]["title"], "Recital 2");
    assert!(eidas.get("article-5a-para-2-point-a-subpoint-ii").is_none());

    let sections = read_json(&paths.sections_output());
    let ids: Vec<&str> = sections
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "2024-1183#article-1",
            "2024-1183#article-3",
            "2024-1183#article-5a",
            "2024-2977",
        ]
    );

    let fallback = &sections[3];
    assert_eq!(fallback["section"], "PID and EAA");
    assert_eq!(fallback["docTitle"], "PID and EAA");
}

#[test]
fn test_build_writes_addressable_units() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    build(&paths, |_| {}).unwrap();

    let units = read_json(&paths.units_output());
    let eidas = units["2024-1183"].as_array().unwrap();
    let para = eidas
        .iter()
        .find(|u| u["id"] == "article-5a-para-4")
        .unwrap();
    assert_eq!(para["kind"], "paragraph");
    assert_eq!(para["article"], "article-5a");
    assert!(para["excerpt"]
        .as_str()
        .unwrap()
        .starts_with("Gatekeepers designated"));
    assert!(eidas.iter().any(|u| u["id"] == "article-5a" && u["kind"] == "article"));
    assert!(units.get("2024-2977").is_none());
}

#[test]
fn test_build_search_index_ranks_terms() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    let report = build(&paths, |_| {}).unwrap();

    let index = SearchIndex::from_json(&read(&paths.search_index_output())).unwrap();
    assert_eq!(index.len(), 54);
    assert_eq!(report.index_documents, Some(54));

    let hits = index.search("wallet unit", 5);
    assert_eq!(hits[0].document.id, "term-wallet-unit");
    assert_eq!(hits[0].document.source_count, 2);

    let hits = index.search("gatekeepers", 5);
    assert_eq!(hits[0].document.id, "2024-1183#article-5a");
}

#[test]
fn test_build_into_separate_output_dir() {
    let dir = scratch_data();
    let out = tempdir().unwrap();
    let paths = BuildPaths::new(dir.path(), Some(out.path().to_path_buf()));
    build(&paths, |_| {}).unwrap();

    assert!(out.path().join("content").join("2024-1183.html").is_file());
    assert!(out.path().join("search-index.json").is_file());
    assert!(!dir.path().join("search-index.json").exists());
}

#[test]
fn test_build_excerpts_only() {
    let dir = scratch_data();
    let paths = BuildPaths::new(dir.path(), None);
    fs::remove_file(dir.path().join("terminology.json")).unwrap();

    let report = build_excerpts(&paths, |_| {}).unwrap();
    assert_eq!(report.index_documents, None);
    assert!(report.excerpts > 0);

    let excerpts = read_json(&paths.excerpts_output());
    assert!(excerpts["2024-1183"]["article-5a-para-1"].is_object());
    assert!(!paths.search_index_output().exists());
    assert!(!paths.content_output("2024-1183").exists());
}

#[test]
fn test_build_skips_missing_document() {
    let dir = scratch_data();
    fs::remove_file(dir.path().join("regulations").join("2024-2977.json")).unwrap();
    let paths = BuildPaths::new(dir.path(), None);

    let report = build(&paths, |_| {}).unwrap();
    assert_eq!(report.documents, 1);
    assert_eq!(report.skipped, 1);
    assert!(paths.content_output("2024-1183").is_file());
    assert!(!paths.content_output("2024-2977").exists());

    let excerpts = read_json(&paths.excerpts_output());
    assert!(excerpts["2024-1183"]["article-5a-para-1"].is_object());
    assert!(paths.search_index_output().is_file());
}

#[test]
fn test_build_skips_unparseable_document() {
    let dir = scratch_data();
    fs::write(dir.path().join("regulations").join("2024-1183.json"), "{ \"slug\": ").unwrap();
    let paths = BuildPaths::new(dir.path(), None);

    let report = build(&paths, |_| {}).unwrap();
    assert_eq!(report.documents, 1);
    assert_eq!(report.skipped, 1);
    assert!(paths.content_output("2024-2977").is_file());
}

#[test]
fn test_build_without_registry_links_nothing() {
    let dir = scratch_data();
    fs::remove_file(dir.path().join("external-documents.yaml")).unwrap();
    let paths = BuildPaths::new(dir.path(), None);

    let report = build(&paths, |_| {}).unwrap();
    assert_eq!(report.links, 0);
    assert!(!read(&paths.content_output("2024-1183")).contains("external-law-link"));
}

#[test]
fn test_cli_build() {
    let dir = scratch_data();

    builder_cmd()
        .args(["build", "--data"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed"));

    assert!(dir.path().join("search-index.json").is_file());
}

#[test]
fn test_cli_build_below_terminology_threshold() {
    let dir = scratch_data();
    truncate_terminology(dir.path(), 49);

    builder_cmd()
        .args(["build", "--data"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("49")));

    assert!(!dir.path().join("search-index.json").exists());
    assert!(!dir.path().join("article-excerpts.json").exists());
    assert!(!dir.path().join("content").exists());
}

#[test]
fn test_cli_search() {
    let dir = scratch_data();
    builder_cmd()
        .args(["build", "-d"])
        .arg(dir.path())
        .assert()
        .success();

    builder_cmd()
        .args(["search", "--index"])
        .arg(dir.path().join("search-index.json"))
        .args(["wallet unit", "--limit", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("term-wallet-unit"));
}

#[test]
fn test_cli_missing_data_dir() {
    let dir = tempdir().unwrap();

    builder_cmd()
        .args(["build", "--data"])
        .arg(dir.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Data directory does not exist"));
}
