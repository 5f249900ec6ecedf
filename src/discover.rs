//! Filesystem discovery of candidate documents.

use crate::detect::kind_from_path;
use crate::error::{Error, Result};
use crate::model::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Find every PDF and raster image under `root`, sorted by path.
///
/// `root` may be a directory (walked recursively) or a single file. Files
/// with unsupported extensions are ignored.
pub fn find_documents<P: AsRef<Path>>(root: P) -> Result<Vec<Document>> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(Error::PathNotFound(root.to_path_buf()));
    }

    let mut paths = Vec::new();
    if root.is_file() {
        paths.push(root.to_path_buf());
    } else {
        walk(root, &mut paths)?;
    }
    paths.sort();

    let documents: Vec<Document> = paths
        .into_iter()
        .filter_map(|path| kind_from_path(&path).map(|kind| Document::new(path, kind)))
        .collect();

    log::info!(
        "Discovered {} document(s) under {}",
        documents.len(),
        root.display()
    );
    Ok(documents)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(&path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        } else if file_type.is_symlink() && path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path() {
        let result = find_documents("/definitely/not/here");
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_recursive_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("b").join("c");
        fs::create_dir_all(&nested).unwrap();

        fs::write(dir.path().join("z.pdf"), b"%PDF-1.4\n").unwrap();
        fs::write(dir.path().join("a.PNG"), b"").unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();
        fs::write(nested.join("scan.tif"), b"").unwrap();

        let docs = find_documents(dir.path()).unwrap();
        let names: Vec<_> = docs
            .iter()
            .map(|d| d.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.PNG"),
                PathBuf::from("b/c/scan.tif"),
                PathBuf::from("z.pdf"),
            ]
        );
        assert_eq!(docs[0].kind, DocumentKind::Raster);
        assert_eq!(docs[2].kind, DocumentKind::Pdf);
    }

    #[test]
    fn test_single_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("only.pdf");
        fs::write(&file, b"%PDF-1.4\n").unwrap();

        let docs = find_documents(&file).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "only");
    }
}
