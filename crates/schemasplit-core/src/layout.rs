//! File names and glob patterns of the exploded tree.

use schemasplit_common_core::Result;
use schemasplit_common_fs::{TreeSink, TreeSource};
use schemasplit_format::Format;
use tracing::debug;

use crate::description::DESCRIPTION_EXTENSION;
use crate::schema::EntityKind;

pub const BASE: &str = "base";
pub const CONFIG: &str = "config";
pub const PROVIDER: &str = "provider";
pub const LANGUAGE: &str = "language";

/// `base.<ext>`, `config.<ext>` and so on.
pub fn section_file(section: &str, format: Format) -> String {
    format!("{section}.{}", format.extension())
}

/// Pattern matching a single-file section in any format.
pub fn section_pattern(section: &str) -> String {
    format!("{section}.*")
}

/// `language.<name>.<ext>`.
pub fn language_file(name: &str, format: Format) -> String {
    format!("{LANGUAGE}.{name}.{}", format.extension())
}

/// Pattern matching every language file.
pub fn language_pattern() -> String {
    format!("{LANGUAGE}.*.*")
}

/// Whether a language name can be stored as `language.<name>.<ext>` and read
/// back unambiguously.
pub fn is_language_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Patterns matching structured entity files of `kind`, one per format.
pub fn entity_patterns(kind: EntityKind) -> Vec<String> {
    Format::ALL
        .iter()
        .map(|format| format!("**/{}/*.{}", kind.as_str(), format.extension()))
        .collect()
}

/// Pattern matching sibling description files of `kind`.
pub fn description_pattern(kind: EntityKind) -> String {
    format!("**/{}/*.{DESCRIPTION_EXTENSION}", kind.as_str())
}

/// Every file in `source` that belongs to an exploded tree, sorted.
pub fn exploded_files<S: TreeSource + ?Sized>(source: &S) -> Result<Vec<String>> {
    let mut patterns = vec![
        section_pattern(BASE),
        section_pattern(CONFIG),
        section_pattern(PROVIDER),
        language_pattern(),
    ];
    for kind in EntityKind::ALL {
        patterns.extend(entity_patterns(kind));
        patterns.push(description_pattern(kind));
    }

    let mut files = Vec::new();
    for pattern in &patterns {
        files.extend(source.find(pattern)?);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Remove a previously exploded tree so that entities deleted from the
/// document do not reappear on the next implode. Returns the number of files
/// removed. Files outside the layout are left alone.
pub fn clean<T: TreeSource + TreeSink + ?Sized>(tree: &mut T) -> Result<usize> {
    let files = exploded_files(tree)?;
    let mut removed = 0;
    for file in &files {
        if tree.remove(file)? {
            debug!(path = %file, "removed");
            removed += 1;
        }
    }
    Ok(removed)
}
