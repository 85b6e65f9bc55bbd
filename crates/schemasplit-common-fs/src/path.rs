//! Path utilities.

use std::path::{Component, Path, PathBuf};

/// Join a relative path onto a base, refusing anything that would escape it.
pub fn safe_join(base: impl AsRef<Path>, path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();

    if path.is_absolute() {
        return None;
    }

    let mut result = base.as_ref().to_path_buf();
    for component in path.components() {
        match component {
            Component::Normal(c) => result.push(c),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(result)
}

/// Convert a path to a Unix-style string (forward slashes).
pub fn to_unix_string(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Replace the extension of a `/`-separated relative path.
///
/// `index/types/Foo.json` with `md` becomes `index/types/Foo.md`. Only the
/// final segment is considered, so dots in directory names are left alone.
pub fn with_extension(path: &str, extension: &str) -> String {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    };
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };
    match dir {
        Some(dir) => format!("{dir}/{stem}.{extension}"),
        None => format!("{stem}.{extension}"),
    }
}

/// Final segment of a `/`-separated relative path.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}
