//! In-memory repository used by unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use super::{ContentResponse, FileContent, FileNode, NodeKind, RemoteClient, RepositoryRef, SearchHit};
use crate::error::{Result, ScoutError};
use crate::search::compose_query;

#[derive(Default)]
pub(crate) struct FakeRemote {
    /// Directory path ("" = root) to its children, in listing order.
    dirs: BTreeMap<String, Vec<FileNode>>,
    files: BTreeMap<String, String>,
    failing: HashSet<String>,
    hits: Vec<SearchHit>,
    calls: Mutex<Vec<String>>,
}

impl FakeRemote {
    /// Builds a tree from file paths; directories are derived and listed in
    /// first-seen order.
    pub fn with_files(paths: &[&str]) -> Self {
        let mut fake = Self::default();
        fake.dirs.insert(String::new(), Vec::new());
        for path in paths {
            let mut parent = String::new();
            let parts: Vec<&str> = path.split('/').collect();
            for (i, part) in parts.iter().enumerate() {
                let full = if parent.is_empty() {
                    part.to_string()
                } else {
                    format!("{}/{}", parent, part)
                };
                let is_file = i == parts.len() - 1;
                let node = if is_file {
                    FileNode::file(full.clone())
                } else {
                    FileNode::directory(full.clone())
                };
                let siblings = fake.dirs.entry(parent.clone()).or_default();
                if !siblings.contains(&node) {
                    siblings.push(node);
                }
                if is_file {
                    fake.files.insert(full.clone(), format!("contents of {}", full));
                } else {
                    fake.dirs.entry(full.clone()).or_default();
                }
                parent = full;
            }
        }
        fake
    }

    pub fn with_empty_dir(mut self, path: &str) -> Self {
        self = self.with_root_node(FileNode::directory(path));
        self.dirs.insert(path.to_string(), Vec::new());
        self
    }

    /// Appends a node to the root listing without backing content.
    pub fn with_root_node(mut self, node: FileNode) -> Self {
        self.dirs.entry(String::new()).or_default().push(node);
        self
    }

    /// Any call touching `path` fails with HTTP 500.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn with_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.hits = hits;
        self
    }

    /// Log of calls as `op:detail`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, path: &str) -> Result<()> {
        if self.failing.contains(path) {
            Err(ScoutError::remote(Some(500), format!("boom at {}", path)))
        } else {
            Ok(())
        }
    }

    fn file_content(&self, path: &str) -> Option<FileContent> {
        self.files.get(path).map(|text| FileContent {
            path: path.to_string(),
            content: Some(STANDARD.encode(text)),
            size: Some(text.len() as u64),
            sha: Some(format!("sha-{}", path)),
        })
    }
}

#[async_trait]
impl RemoteClient for FakeRemote {
    async fn list_directory(&self, _repo: &RepositoryRef, path: &str) -> Result<Vec<FileNode>> {
        self.record(format!("list:{}", path));
        self.check(path)?;
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| ScoutError::remote(Some(404), "Not Found"))
    }

    async fn get_content(&self, _repo: &RepositoryRef, path: &str) -> Result<ContentResponse> {
        self.record(format!("content:{}", path));
        self.check(path)?;
        if let Some(file) = self.file_content(path) {
            return Ok(ContentResponse::File(file));
        }
        match self.dirs.get(path) {
            Some(children) => Ok(ContentResponse::Directory(
                children
                    .iter()
                    .map(|node| match node.kind {
                        NodeKind::File => FileContent {
                            content: None,
                            ..self.file_content(&node.path).unwrap()
                        },
                        _ => FileContent {
                            path: node.path.clone(),
                            content: None,
                            size: Some(0),
                            sha: None,
                        },
                    })
                    .collect(),
            )),
            None => Err(ScoutError::remote(Some(404), "Not Found")),
        }
    }

    async fn search_code(
        &self,
        repo: &RepositoryRef,
        query: &str,
        extension: Option<&str>,
        per_page: usize,
    ) -> Result<Vec<SearchHit>> {
        let composed = compose_query(repo, query, extension);
        self.record(format!("search:{}", composed));
        self.check(query)?;
        Ok(self.hits.iter().take(per_page).cloned().collect())
    }
}
