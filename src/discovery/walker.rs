use crate::error::Result;
use crate::remote::{NodeKind, RemoteClient, RepositoryRef};

/// Expands a repository's directory structure into a flat list of file paths.
pub struct TreeWalker<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: RemoteClient + ?Sized> TreeWalker<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Every file path in `repo`, depth-first: a directory's files appear
    /// where the directory sits in its parent's listing, siblings keep the
    /// order the API returned them in.
    ///
    /// Any failed listing aborts the whole walk.
    pub async fn enumerate(&self, repo: &RepositoryRef) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut pending = self.client.list_directory(repo, "").await?;
        pending.reverse();
        let mut directories = 1usize;

        while let Some(node) = pending.pop() {
            match node.kind {
                NodeKind::File => files.push(node.path),
                NodeKind::Directory => {
                    tracing::debug!(path = %node.path, "expanding directory");
                    let mut children = self.client.list_directory(repo, &node.path).await?;
                    directories += 1;
                    children.reverse();
                    pending.extend(children);
                }
                NodeKind::Other => {}
            }
        }

        tracing::debug!(
            repo = %repo.full_name(),
            reference = %repo.reference,
            files = files.len(),
            directories,
            "enumerated tree"
        );
        Ok(files)
    }
}
