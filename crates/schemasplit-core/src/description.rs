//! Inline vs. sibling-file storage of entity descriptions.

use crate::schema::EntitySpec;

/// Descriptions longer than this many characters move to a `.md` file.
pub const DESCRIPTION_THRESHOLD: usize = 400;

/// Extension of sibling description files.
pub const DESCRIPTION_EXTENSION: &str = "md";

/// Whether a description is long enough to be stored out of line.
pub fn should_externalize(description: &str) -> bool {
    description.chars().count() > DESCRIPTION_THRESHOLD
}

/// Strip a long description from `entity`, returning it separately.
pub fn split(mut entity: EntitySpec) -> (EntitySpec, Option<String>) {
    match entity.description.take() {
        Some(description) if should_externalize(&description) => (entity, Some(description)),
        description => {
            entity.description = description;
            (entity, None)
        }
    }
}

/// Reattach a sibling description. An inline description takes precedence.
pub fn join(mut entity: EntitySpec, sibling: Option<String>) -> EntitySpec {
    if entity.description.is_none() {
        entity.description = sibling;
    }
    entity
}
