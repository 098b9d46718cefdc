mod common;

use common::TestResult;
use common::fixtures::*;
use serde_json::json;
use std::fs;
use std::process::Command;

fn icsr() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_icsr"));
    cmd.env_remove("ICSR_MAPPING").env_remove("ICSR_SCHEMA");
    cmd
}

#[test]
fn single_record_writes_one_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("case.json");
    let output = dir.path().join("case.xml");
    fs::write(&input, serde_json::to_vec(&full_case())?)?;

    let status = icsr()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--message-id", "MSG-CLI", "--creation-time", "20240301"])
        .status()?;
    assert!(status.success());

    let xml = fs::read_to_string(&output)?;
    let doc = roxmltree::Document::parse(&xml)?;
    let root = doc.root_element();
    let id = root.children().find(|n| n.has_tag_name("id")).ok_or("no id")?;
    assert_eq!(id.attribute("extension"), Some("MSG-CLI"));
    assert!(xml.contains("\n  <id "), "indented by default");
    Ok(())
}

#[test]
fn generated_message_ids_differ_per_record() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("batch.json");
    let output = dir.path().join("out.xml");
    fs::write(
        &input,
        serde_json::to_vec(&json!([
            identifier_only_case("CASE-1"),
            enveloped(identifier_only_case("CASE-2"))
        ]))?,
    )?;

    let status = icsr()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--no-pretty", "-j", "2"])
        .status()?;
    assert!(status.success());

    let first = fs::read_to_string(dir.path().join("out-1.xml"))?;
    let second = fs::read_to_string(dir.path().join("out-2.xml"))?;
    assert!(first.contains(r#"extension="CASE-1""#));
    assert!(second.contains(r#"extension="CASE-2""#));
    assert!(!first.contains('\n'));

    assert_ne!(message_id(&first), message_id(&second));
    Ok(())
}

#[test]
fn fixed_message_id_is_numbered_for_arrays() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("batch.json");
    let output = dir.path().join("out.xml");
    fs::write(
        &input,
        serde_json::to_vec(&json!([
            identifier_only_case("CASE-1"),
            identifier_only_case("CASE-2")
        ]))?,
    )?;

    let status = icsr()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--message-id", "M1"])
        .status()?;
    assert!(status.success());

    let first = fs::read_to_string(dir.path().join("out-1.xml"))?;
    let second = fs::read_to_string(dir.path().join("out-2.xml"))?;
    assert_eq!(message_id(&first).as_deref(), Some("M1-1"));
    assert_eq!(message_id(&second).as_deref(), Some("M1-2"));
    Ok(())
}

/// The `extension` of the message-level `<id>`.
fn message_id(xml: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(xml).ok()?;
    let id = doc.root_element().children().find(|n| n.has_tag_name("id"))?;
    id.attribute("extension").map(str::to_string)
}

#[test]
fn stdout_is_used_without_output_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("case.json");
    fs::write(&input, serde_json::to_vec(&identifier_only_case("CASE-OUT"))?)?;

    let out = icsr().arg("-i").arg(&input).output()?;
    assert!(out.status.success());
    let xml = String::from_utf8(out.stdout)?;
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"extension="CASE-OUT""#));
    Ok(())
}

#[test]
fn bad_mapping_file_fails() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("case.json");
    let mapping = dir.path().join("mapping.csv");
    fs::write(&input, serde_json::to_vec(&identifier_only_case("CASE-1"))?)?;
    fs::write(&mapping, "tag,source_path\nD.1,a\nD.1,b\n")?;

    let out = icsr().arg("-i").arg(&input).arg("-m").arg(&mapping).output()?;
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    Ok(())
}
