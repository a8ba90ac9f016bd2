//! Source tree directory listing

use std::path::Path;

use jwalk::WalkDir;

/// Lists immediate subdirectories of a source tree
pub trait DirectoryLister {
    /// Names of directories directly under `root`, sorted.
    ///
    /// ## Remarks
    /// Entries that cannot be read are skipped.
    fn list(&self, root: &Path) -> Vec<String>;
}

/// [`DirectoryLister`] over the file system
#[derive(Debug, Default, Clone, Copy)]
pub struct JwalkLister;

impl DirectoryLister for JwalkLister {
    fn list(&self, root: &Path) -> Vec<String> {
        let root = decorate_path(&root.to_string_lossy());
        let mut names: Vec<String> = WalkDir::new(root)
            .skip_hidden(true)
            .follow_links(false)
            .max_depth(1)
            .sort(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.depth == 1 && e.file_type().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// On Windows trailing back slash (\) to be added if volume and colon passed (like c:).
#[cfg(target_os = "windows")]
fn decorate_path(path: &str) -> String {
    if path.len() == 2 && path.ends_with(':') {
        format!("{path}\\")
    } else {
        path.to_owned()
    }
}

/// On Unix just passthrough as is
#[cfg(not(target_os = "windows"))]
fn decorate_path(path: &str) -> String {
    path.to_owned()
}
