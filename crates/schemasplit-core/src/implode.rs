//! Reassemble a schema document from a file tree.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, info_span, warn};

use schemasplit_common_core::{Error, Result};
use schemasplit_common_fs::path::{file_name, with_extension};
use schemasplit_common_fs::TreeSource;
use schemasplit_format::{decode_file, Format};

use crate::description::{self, DESCRIPTION_EXTENSION};
use crate::explode::TOKEN_FIELD;
use crate::layout::{self, BASE, CONFIG, LANGUAGE, PROVIDER};
use crate::schema::{Collection, EntityKind, EntitySpec, SchemaDocument};
use crate::token::map_token;

/// Rebuild the document stored in `source`.
///
/// Entities are keyed by the `$token` inside each file, never by where the
/// file sits; a file whose location disagrees with its token is still read
/// and only logged.
pub fn implode<S: TreeSource + ?Sized>(source: &S) -> Result<SchemaDocument> {
    let span = info_span!("implode", root = %source.root().display());
    let _guard = span.enter();

    let base_path = select_section(source, BASE)?.ok_or_else(|| Error::MissingBaseDocument {
        root: source.root().to_path_buf(),
    })?;
    let mut document: SchemaDocument = read_as(source, &base_path)?;

    if let Some(path) = select_section(source, CONFIG)? {
        document.config = Some(read_value(source, &path)?);
    }
    if let Some(path) = select_section(source, PROVIDER)? {
        document.provider = Some(read_value(source, &path)?);
    }

    read_languages(source, &mut document)?;

    for kind in EntityKind::ALL {
        read_collection(source, kind, document.collection_mut(kind))?;
    }

    info!(entities = document.entity_count(), "imploded schema");
    Ok(document)
}

/// Pick the one file for a single-file section such as `base.*`.
///
/// Matches with a recognized extension win; if only unrecognized ones exist,
/// the first is reported as an unknown format.
fn select_section<S: TreeSource + ?Sized>(source: &S, section: &str) -> Result<Option<String>> {
    let matches = source.find(&layout::section_pattern(section))?;
    let (known, unknown): (Vec<_>, Vec<_>) = matches
        .into_iter()
        .partition(|path| Format::from_path(path).is_ok());

    let Some(selected) = known.first() else {
        return match unknown.first() {
            Some(first) => Format::from_path(first).map(|_| Some(first.clone())),
            None => Ok(None),
        };
    };

    for ignored in known.iter().skip(1).chain(unknown.iter()) {
        warn!(section, selected = %selected, ignored = %ignored, "ignoring extra section file");
    }
    Ok(Some(selected.clone()))
}

fn read_value<S: TreeSource + ?Sized>(source: &S, path: &str) -> Result<Value> {
    let text = source.read(path)?;
    debug!(path, bytes = text.len(), "read");
    decode_file(path, &text)
}

fn read_as<S: TreeSource + ?Sized, T: DeserializeOwned>(source: &S, path: &str) -> Result<T> {
    let value = read_value(source, path)?;
    if !value.is_object() {
        return Err(Error::malformed_file(path, "expected a mapping"));
    }
    serde_json::from_value(value).map_err(|e| Error::malformed_file(path, e.to_string()))
}

fn read_languages<S: TreeSource + ?Sized>(source: &S, document: &mut SchemaDocument) -> Result<()> {
    let files = source.find(&layout::language_pattern())?;
    if files.is_empty() {
        return Ok(());
    }

    let mut languages = document.language.take().unwrap_or_default();
    for path in &files {
        let name = language_name(path)?;
        if languages.contains_key(name) {
            return Err(Error::malformed_file(
                path.as_str(),
                format!("language `{name}` is defined more than once"),
            ));
        }
        let value = read_value(source, path)?;
        languages.insert(name.to_string(), value);
    }
    document.language = Some(languages);
    Ok(())
}

/// `language.<name>.<ext>` → `<name>`.
fn language_name(path: &str) -> Result<&str> {
    let parts: Vec<&str> = file_name(path).split('.').collect();
    match parts[..] {
        [LANGUAGE, name, extension] if !name.is_empty() && !extension.is_empty() => Ok(name),
        _ => Err(Error::malformed_file(
            path,
            "language file name must be `language.<name>.<ext>`",
        )),
    }
}

fn read_collection<S: TreeSource + ?Sized>(
    source: &S,
    kind: EntityKind,
    slot: &mut Option<Collection>,
) -> Result<()> {
    let mut files = Vec::new();
    for pattern in layout::entity_patterns(kind) {
        files.extend(source.find(&pattern)?);
    }
    if files.is_empty() {
        return Ok(());
    }
    files.sort();

    let collection = slot.get_or_insert_with(Collection::new);
    for path in &files {
        let (token, entity) = read_entity(source, path)?;
        check_location(kind, &token, path);

        if collection.contains_key(&token) {
            return Err(Error::DuplicateToken {
                kind: kind.to_string(),
                token,
                path: path.clone(),
            });
        }
        collection.insert(token, entity);
    }
    debug!(%kind, count = files.len(), "assembled collection");
    Ok(())
}

/// Read one entity file, strip its `$token` and reattach a sibling description.
fn read_entity<S: TreeSource + ?Sized>(source: &S, path: &str) -> Result<(String, EntitySpec)> {
    let Value::Object(mut fields) = read_value(source, path)? else {
        return Err(Error::malformed_file(path, "expected a mapping"));
    };

    let token = match fields.remove(TOKEN_FIELD) {
        Some(Value::String(token)) => token,
        _ => {
            return Err(Error::MissingTokenIdentity {
                path: path.to_string(),
            })
        }
    };

    let entity: EntitySpec = serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::malformed_file(path, e.to_string()))?;

    let sibling_path = with_extension(path, DESCRIPTION_EXTENSION);
    if !source.exists(&sibling_path) {
        return Ok((token, entity));
    }
    if entity.description.is_some() {
        warn!(path = %sibling_path, "inline description present, ignoring sibling file");
        return Ok((token, entity));
    }

    let text = source.read(&sibling_path)?;
    debug!(path = %sibling_path, bytes = text.len(), "read description");
    Ok((token, description::join(entity, Some(text))))
}

/// Warn when a file is not where its token says it should be.
fn check_location(kind: EntityKind, token: &str, path: &str) {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match map_token(kind, token) {
        Ok(location) if location.file(extension) == path => {}
        Ok(location) => warn!(
            path,
            token,
            expected = %location.file(extension),
            "entity file is not where its token maps"
        ),
        Err(e) => warn!(path, token, error = %e, "entity file carries a malformed token"),
    }
}
