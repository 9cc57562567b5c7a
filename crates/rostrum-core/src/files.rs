//! Imported transcript files and their rows

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timestamp;
use crate::transcript::Transcript;

/// A dataset question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub correct_answer: String,
    pub incorrect_answer: String,
    #[serde(default)]
    pub dataset: Option<String>,
}

/// An imported file of transcripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    pub path: String,
    #[serde(default)]
    pub path_hash: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub imported_at: NaiveDateTime,
}

impl File {
    /// First eight characters of the path hash, as used in row URLs
    pub fn short_hash(&self) -> Option<&str> {
        self.path_hash
            .as_deref()
            .map(|h| h.get(..8).unwrap_or(h))
    }
}

/// Entry of the file listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    #[serde(flatten)]
    pub file: File,
    #[serde(default)]
    pub row_count: Option<u32>,
}

/// One row of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRow {
    pub id: i64,
    pub row_number: u32,
    pub question: Question,
    #[serde(default)]
    pub is_judgement_correct: Option<bool>,
}

/// A file with all its rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetail {
    #[serde(flatten)]
    pub file: File,
    #[serde(default)]
    pub rows: Vec<FileRow>,
}

impl FileDetail {
    /// Share of rows the model judge got right, in percent
    pub fn percentage_correct(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let correct = self
            .rows
            .iter()
            .filter(|r| r.is_judgement_correct == Some(true))
            .count();
        Some(correct as f64 / self.rows.len() as f64 * 100.0)
    }
}

/// Verdict of a model judge stored with a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelJudgement {
    pub judgement_text: String,
    pub judge_name: String,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

impl ModelJudgement {
    /// Judge name, falling back to the transcript's hint for unnamed models
    pub fn display_judge_name<'a>(&'a self, transcript: Option<&'a Transcript>) -> &'a str {
        if self.judge_name == "Unknown Model" {
            if let Some(name) = transcript
                .and_then(|t| t.extra_hint("judge_name"))
                .and_then(|v| v.as_str())
            {
                return name;
            }
        }
        &self.judge_name
    }
}

/// A single row with its transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDetail {
    pub id: i64,
    pub row_number: u32,
    pub question: Question,
    pub file: File,
    #[serde(default)]
    pub raw_transcript: String,
    #[serde(default)]
    pub transcript: Option<Transcript>,
    #[serde(default)]
    pub judgement: Option<ModelJudgement>,
    #[serde(default)]
    pub next_available: Option<bool>,
}

/// Node of a [`FileTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory(FileTree),
    File(FileSummary),
}

/// Files nested by their path components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    entries: BTreeMap<String, TreeNode>,
}

impl FileTree {
    /// Nest files by path. A single leading `/` is ignored.
    ///
    /// A file whose path is also a directory of other files is dropped,
    /// whichever comes first.
    pub fn build(files: impl IntoIterator<Item = FileSummary>) -> Self {
        let mut root = FileTree::default();
        for file in files {
            let path = file.file.path.strip_prefix('/').unwrap_or(&file.file.path);
            let parts: Vec<String> = path.split('/').map(String::from).collect();
            root.insert(&parts, file);
        }
        root
    }

    fn insert(&mut self, parts: &[String], file: FileSummary) {
        match parts {
            [] => {}
            [leaf] => {
                if let Some(TreeNode::Directory(_)) = self.entries.get(leaf) {
                    tracing::warn!(path = %file.file.path, "file path collides with a directory, skipping");
                    return;
                }
                self.entries.insert(leaf.clone(), TreeNode::File(file));
            }
            [dir, rest @ ..] => {
                if let Some(TreeNode::File(existing)) = self.entries.get(dir) {
                    tracing::warn!(path = %existing.file.path, "file path collides with a directory, skipping");
                    self.entries.remove(dir);
                }
                let node = self
                    .entries
                    .entry(dir.clone())
                    .or_insert_with(|| TreeNode::Directory(FileTree::default()));
                if let TreeNode::Directory(tree) = node {
                    tree.insert(rest, file);
                }
            }
        }
    }

    /// Skip down single-directory chains.
    ///
    /// Returns the skipped prefix (starting and ending with `/`) and the first
    /// node with more than one entry or with a file in it.
    pub fn first_branch(&self) -> (String, &FileTree) {
        let mut root = String::from("/");
        let mut node = self;
        while node.entries.len() == 1 {
            match node.entries.iter().next() {
                Some((name, TreeNode::Directory(child))) => {
                    root.push_str(name);
                    root.push('/');
                    node = child;
                }
                _ => break,
            }
        }
        (root, node)
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sub-directories, by name
    pub fn directories(&self) -> impl Iterator<Item = (&str, &FileTree)> {
        self.entries.iter().filter_map(|(name, node)| match node {
            TreeNode::Directory(tree) => Some((name.as_str(), tree)),
            TreeNode::File(_) => None,
        })
    }

    /// Files directly in this directory, by name
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileSummary)> {
        self.entries.iter().filter_map(|(name, node)| match node {
            TreeNode::File(file) => Some((name.as_str(), file)),
            TreeNode::Directory(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: i64, path: &str) -> FileSummary {
        let at = chrono::DateTime::from_timestamp(1_702_000_000, 0)
            .unwrap()
            .naive_utc();
        FileSummary {
            file: File {
                id,
                path: path.to_string(),
                path_hash: Some(format!("{id:0>12}")),
                created_at: at,
                imported_at: at,
            },
            row_count: Some(3),
        }
    }

    #[test]
    fn test_tree_nests_directories() {
        let tree = FileTree::build(vec![
            summary(1, "/runs/a/one.csv"),
            summary(2, "runs/a/two.csv"),
            summary(3, "runs/b.csv"),
            summary(4, "top.csv"),
        ]);

        assert_eq!(tree.len(), 2);
        let files: Vec<_> = tree.files().map(|(n, _)| n).collect();
        assert_eq!(files, vec!["top.csv"]);

        let (name, runs) = tree.directories().next().unwrap();
        assert_eq!(name, "runs");
        assert_eq!(runs.len(), 2);
        let (_, a) = runs.directories().next().unwrap();
        let names: Vec<_> = a.files().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["one.csv", "two.csv"]);
    }

    #[test]
    fn test_file_and_directory_collision_keeps_directory() {
        for files in [
            vec![summary(1, "runs/a/one.csv"), summary(2, "runs/a")],
            vec![summary(2, "runs/a"), summary(1, "runs/a/one.csv")],
        ] {
            let tree = FileTree::build(files);
            let (_, runs) = tree.directories().next().unwrap();
            assert_eq!(runs.files().count(), 0);
            let (name, a) = runs.directories().next().unwrap();
            assert_eq!(name, "a");
            assert_eq!(a.files().map(|(n, _)| n).collect::<Vec<_>>(), vec!["one.csv"]);
        }
    }

    #[test]
    fn test_unknown_model_uses_transcript_hint() {
        let judgement = ModelJudgement {
            judgement_text: "A is right".to_string(),
            judge_name: "Unknown Model".to_string(),
            is_correct: Some(true),
        };
        let mut transcript = Transcript::default();
        assert_eq!(judgement.display_judge_name(Some(&transcript)), "Unknown Model");
        transcript
            .extra
            .insert("judge_name".to_string(), serde_json::json!("claude"));
        assert_eq!(judgement.display_judge_name(Some(&transcript)), "claude");
        assert_eq!(judgement.display_judge_name(None), "Unknown Model");
    }

    #[test]
    fn test_first_branch_skips_single_directories() {
        let tree = FileTree::build(vec![
            summary(1, "/data/runs/a/one.csv"),
            summary(2, "/data/runs/b/two.csv"),
        ]);
        let (root, node) = tree.first_branch();
        assert_eq!(root, "/data/runs/");
        assert_eq!(node.directories().map(|(n, _)| n).collect::<Vec<_>>(), vec!["a", "b"]);

        let flat = FileTree::build(vec![summary(3, "only.csv")]);
        let (root, node) = flat.first_branch();
        assert_eq!(root, "/");
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn test_short_hash() {
        let s = summary(1, "x.csv");
        assert_eq!(s.file.short_hash(), Some("00000000"));
    }

    #[test]
    fn test_percentage_correct() {
        let question = Question {
            id: 1,
            question_text: "Q".to_string(),
            correct_answer: "a".to_string(),
            incorrect_answer: "b".to_string(),
            dataset: None,
        };
        let row = |n: u32, correct: Option<bool>| FileRow {
            id: n as i64,
            row_number: n,
            question: question.clone(),
            is_judgement_correct: correct,
        };
        let mut detail = FileDetail {
            file: summary(1, "x.csv").file,
            rows: vec![],
        };
        assert_eq!(detail.percentage_correct(), None);
        detail.rows = vec![row(0, Some(true)), row(1, Some(false)), row(2, None), row(3, Some(true))];
        assert_eq!(detail.percentage_correct(), Some(50.0));
    }
}
