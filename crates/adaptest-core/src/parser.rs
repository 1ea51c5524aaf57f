//! Item bank and response data parsers.
//!
//! Loads item banks, recorded session histories and item-analysis data sets
//! from TOML (and, for histories, JSON) files, and validates banks.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::discrimination::ItemOutcomes;
use crate::irt::{DIFFICULTY_MAX, DIFFICULTY_MIN};
use crate::model::{Item, ItemBank, Response};
use crate::stopping::DEFAULT_MIN_QUESTIONS;
use crate::validation::{parse_responses, validate_responses};

/// Intermediate TOML structure for item bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    items: Vec<TomlItem>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: String,
    #[serde(default)]
    prompt: String,
    difficulty: f64,
    #[serde(default)]
    topic: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlSessionFile {
    #[serde(default)]
    responses: Vec<Response>,
}

#[derive(Debug, Deserialize)]
struct TomlAnalysisFile {
    #[serde(default)]
    items: Vec<ItemOutcomes>,
}

/// Parse a single TOML file into an `ItemBank`.
pub fn parse_item_bank(path: &Path) -> Result<ItemBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item bank file: {}", path.display()))?;

    parse_item_bank_str(&content, path)
}

/// Parse a TOML string into an `ItemBank` (useful for testing).
pub fn parse_item_bank_str(content: &str, source_path: &Path) -> Result<ItemBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let items = parsed
        .items
        .into_iter()
        .map(|i| Item {
            id: i.id,
            prompt: i.prompt,
            difficulty: i.difficulty,
            topic: i.topic,
        })
        .collect();

    Ok(ItemBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        items,
    })
}

/// Recursively load all `.toml` item bank files from a directory.
pub fn load_item_bank_directory(dir: &Path) -> Result<Vec<ItemBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            banks.extend(load_item_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_item_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a recorded response history.
///
/// `.json` files hold an array of `{itemDifficulty, correct}` objects and go
/// through boundary validation; anything else is read as TOML with
/// `[[responses]]` tables.
pub fn parse_session_file(path: &Path) -> Result<Vec<Response>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))?;
        let responses = parse_responses(&value)
            .with_context(|| format!("invalid responses in {}", path.display()))?;
        return Ok(responses);
    }

    let parsed: TomlSessionFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
    validate_responses(&parsed.responses)
        .with_context(|| format!("invalid responses in {}", path.display()))?;
    Ok(parsed.responses)
}

/// Load top/bottom group outcomes for item analysis.
pub fn parse_item_analysis_file(path: &Path) -> Result<Vec<ItemOutcomes>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item analysis file: {}", path.display()))?;
    let parsed: TomlAnalysisFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
    anyhow::ensure!(
        !parsed.items.is_empty(),
        "no items found in {}",
        path.display()
    );
    Ok(parsed.items)
}

/// A warning from item bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item ID (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an item bank for common issues.
pub fn validate_item_bank(bank: &ItemBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.items.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "bank has no items".into(),
        });
        return warnings;
    }

    if bank.items.len() < DEFAULT_MIN_QUESTIONS as usize {
        warnings.push(ValidationWarning {
            item_id: None,
            message: format!(
                "bank has {} items, fewer than the {} needed before a session can stop",
                bank.items.len(),
                DEFAULT_MIN_QUESTIONS
            ),
        });
    }

    // Check for duplicate item IDs
    let mut seen_ids = HashSet::new();
    for item in &bank.items {
        if !seen_ids.insert(&item.id) {
            warnings.push(ValidationWarning {
                item_id: Some(item.id.clone()),
                message: format!("duplicate item ID: {}", item.id),
            });
        }
    }

    // Check difficulty calibration range
    for item in &bank.items {
        if !(DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&item.difficulty) {
            warnings.push(ValidationWarning {
                item_id: Some(item.id.clone()),
                message: format!(
                    "difficulty {} is outside the calibrated range [0, 100]",
                    item.difficulty
                ),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "cardio"
name = "Cardiology Basics"
description = "Introductory cardiology items"

[[items]]
id = "cardio-001"
prompt = "Which chamber pumps oxygenated blood to the systemic circulation?"
difficulty = 20
topic = "anatomy"

[[items]]
id = "cardio-002"
prompt = "First-line treatment for stable angina?"
difficulty = 55.5
topic = "pharmacology"

[[items]]
id = "cardio-003"
difficulty = 80
"#;

    #[test]
    fn parse_valid_bank() {
        let bank = parse_item_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.id, "cardio");
        assert_eq!(bank.name, "Cardiology Basics");
        assert_eq!(bank.items.len(), 3);
        assert_eq!(bank.items[0].difficulty, 20.0);
        assert_eq!(bank.items[1].topic.as_deref(), Some("pharmacology"));
        assert!(bank.items[2].prompt.is_empty());
        assert!(validate_item_bank(&bank).is_empty());
    }

    #[test]
    fn validate_duplicates_and_range() {
        let toml = r#"
[bank]
id = "dupes"
name = "Dupes"

[[items]]
id = "same"
difficulty = 40

[[items]]
id = "same"
difficulty = 140

[[items]]
id = "other"
difficulty = 60
"#;
        let bank = parse_item_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_item_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("outside")));
    }

    #[test]
    fn validate_small_and_empty_banks() {
        let toml = "[bank]\nid = \"tiny\"\nname = \"Tiny\"\n\n[[items]]\nid = \"a\"\ndifficulty = 50\n";
        let bank = parse_item_bank_str(toml, &PathBuf::from("tiny.toml")).unwrap();
        assert!(validate_item_bank(&bank)
            .iter()
            .any(|w| w.message.contains("fewer than")));

        let empty = parse_item_bank_str("[bank]\nid = \"e\"\nname = \"E\"\n", &PathBuf::from("e.toml")).unwrap();
        assert!(validate_item_bank(&empty)[0].message.contains("no items"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_item_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "nope = [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_item_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "cardio");
    }

    #[test]
    fn session_files_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("session.toml");
        std::fs::write(
            &toml_path,
            "[[responses]]\nitem_difficulty = 50\ncorrect = true\n\n[[responses]]\nitem_difficulty = 65\ncorrect = false\n",
        )
        .unwrap();
        let responses = parse_session_file(&toml_path).unwrap();
        assert_eq!(responses, vec![Response::correct(50.0), Response::incorrect(65.0)]);

        let json_path = dir.path().join("session.json");
        std::fs::write(
            &json_path,
            r#"[{"itemDifficulty": 30, "correct": true}, {"itemDifficulty": 70, "correct": false}]"#,
        )
        .unwrap();
        assert_eq!(parse_session_file(&json_path).unwrap().len(), 2);

        std::fs::write(&json_path, r#"[{"itemDifficulty": 30, "correct": 1}]"#).unwrap();
        let err = parse_session_file(&json_path).unwrap_err();
        assert!(format!("{err:#}").contains("boolean"));

        std::fs::write(&toml_path, "responses = []\n").unwrap();
        assert!(parse_session_file(&toml_path).is_err());
    }

    #[test]
    fn item_analysis_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        std::fs::write(
            &path,
            "[[items]]\nid = \"q1\"\ntop = [1, 1, 0]\nbottom = [0, 0, 1]\n",
        )
        .unwrap();
        let items = parse_item_analysis_file(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].top, vec![1, 1, 0]);

        std::fs::write(&path, "").unwrap();
        assert!(parse_item_analysis_file(&path).is_err());
    }
}
