//! Token parsing and token-to-path mapping.
//!
//! A token is `provider:modulePath:name` where `modulePath` is `module` or
//! `module/submodule`. The provider is not part of the path: it is carried in
//! the `$token` field of the stored file instead.

use schemasplit_common_core::{Error, Result};

use crate::schema::EntityKind;

/// A parsed token. Borrows from the original string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub provider: &'a str,
    pub module: &'a str,
    pub submodule: Option<&'a str>,
    pub name: &'a str,
}

impl<'a> Token<'a> {
    /// Parse a token, rejecting anything that cannot be stored as a path.
    pub fn parse(token: &'a str) -> Result<Self> {
        let parts: Vec<&str> = token.split(':').collect();
        let [provider, module_path, name] = parts[..] else {
            return Err(Error::malformed_token(
                token,
                format!("expected 3 `:`-separated parts, found {}", parts.len()),
            ));
        };

        if provider.is_empty() {
            return Err(Error::malformed_token(token, "empty provider"));
        }
        if module_path.is_empty() {
            return Err(Error::malformed_token(token, "empty module"));
        }

        let (module, submodule) = match module_path.split_once('/') {
            Some((module, submodule)) => (module, Some(submodule)),
            None => (module_path, None),
        };

        check_segment(token, "module", module)?;
        if let Some(submodule) = submodule {
            for segment in submodule.split('/') {
                check_segment(token, "submodule", segment)?;
            }
        }
        check_segment(token, "name", name)?;

        Ok(Self {
            provider,
            module,
            submodule,
            name,
        })
    }

    /// Whether the submodule duplicates the name and is left out of the path.
    /// Case is compared with full Unicode lowercasing, not just ASCII.
    pub fn elides_submodule(&self) -> bool {
        match self.submodule {
            None => true,
            Some(submodule) => lowercase(submodule).eq(lowercase(self.name)),
        }
    }

    /// Directory and leaf name for an entity of `kind`.
    pub fn path(&self, kind: EntityKind) -> TokenPath {
        let directory = match self.submodule {
            Some(submodule) if !self.elides_submodule() => {
                format!("{}/{}/{}", self.module, submodule, kind.as_str())
            }
            _ => format!("{}/{}", self.module, kind.as_str()),
        };
        TokenPath {
            directory,
            leaf: self.name.to_string(),
        }
    }
}

fn lowercase(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// A segment becomes a directory or file name; it must be non-empty, must not
/// contain a separator, and must not start with `.` (which would either
/// escape the tree or be skipped by the wildcard patterns used on read).
fn check_segment(token: &str, what: &str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::malformed_token(token, format!("empty {what}")));
    }
    if segment.contains('/') || segment.contains('\\') {
        return Err(Error::malformed_token(
            token,
            format!("{what} `{segment}` contains a path separator"),
        ));
    }
    if segment.starts_with('.') {
        return Err(Error::malformed_token(
            token,
            format!("{what} `{segment}` starts with `.`"),
        ));
    }
    Ok(())
}

/// Where an entity is stored, relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenPath {
    pub directory: String,
    pub leaf: String,
}

impl TokenPath {
    /// Full relative path with the given extension.
    pub fn file(&self, extension: &str) -> String {
        format!("{}/{}.{}", self.directory, self.leaf, extension)
    }
}

/// Map a token to its storage location for `kind`.
pub fn map_token(kind: EntityKind, token: &str) -> Result<TokenPath> {
    Ok(Token::parse(token)?.path(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("pkg:foo/Foo:Foo", EntityKind::Resources, "foo/resources", "Foo" ; "submodule equal to name is elided")]
    #[test_case("pkg:foo/foo:Foo", EntityKind::Resources, "foo/resources", "Foo" ; "elision ignores case")]
    #[test_case("pkg:foo/bar:Foo", EntityKind::Types, "foo/bar/types", "Foo" ; "distinct submodule is kept")]
    #[test_case("pkg:geo/ÉTAT:État", EntityKind::Types, "geo/types", "État" ; "elision folds non ascii case")]
    #[test_case("pkg:geo/Straße:STRASSE", EntityKind::Types, "geo/Straße/types", "STRASSE" ; "lowercasing does not expand sharp s")]
    #[test_case("pkg:index:Provider", EntityKind::Resources, "index/resources", "Provider" ; "no submodule")]
    #[test_case("aws:s3/bucket:Bucket", EntityKind::Resources, "s3/resources", "Bucket" ; "lowercase submodule")]
    #[test_case("aws:ec2/getAmi:getAmi", EntityKind::Functions, "ec2/functions", "getAmi" ; "function elision")]
    #[test_case("k8s:apps/v1:Deployment", EntityKind::Types, "apps/v1/types", "Deployment" ; "versioned submodule")]
    #[test_case("pkg:a/b/c:Thing", EntityKind::Types, "a/b/c/types", "Thing" ; "nested submodule")]
    fn test_map_token(token: &str, kind: EntityKind, directory: &str, leaf: &str) {
        let path = map_token(kind, token).unwrap();
        assert_eq!(path.directory, directory);
        assert_eq!(path.leaf, leaf);
    }

    #[test_case("pkg:index" ; "two parts")]
    #[test_case("pkg" ; "one part")]
    #[test_case("pkg:a:b:c" ; "four parts")]
    #[test_case(":index:Foo" ; "empty provider")]
    #[test_case("pkg::Foo" ; "empty module")]
    #[test_case("pkg:index:" ; "empty name")]
    #[test_case("pkg:foo/:Foo" ; "empty submodule")]
    #[test_case("pkg:/bar:Foo" ; "empty module before slash")]
    #[test_case("pkg:index:a/b" ; "name with slash")]
    #[test_case("pkg:index:a\\b" ; "name with backslash")]
    #[test_case("pkg:..:Foo" ; "parent module")]
    #[test_case("pkg:foo/..:Foo" ; "parent submodule")]
    #[test_case("pkg:index:.hidden" ; "hidden name")]
    fn test_malformed_tokens(token: &str) {
        match map_token(EntityKind::Types, token).unwrap_err() {
            Error::MalformedToken { token: reported, .. } => assert_eq!(reported, token),
            other => panic!("Expected MalformedToken, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_fields() {
        let token = Token::parse("aws:s3/bucket:Bucket").unwrap();
        assert_eq!(token.provider, "aws");
        assert_eq!(token.module, "s3");
        assert_eq!(token.submodule, Some("bucket"));
        assert_eq!(token.name, "Bucket");
        assert!(token.elides_submodule());

        let token = Token::parse("pkg:index:Foo").unwrap();
        assert_eq!(token.submodule, None);
        assert!(token.elides_submodule());
    }

    #[test]
    fn test_error_reason_counts_parts() {
        let err = map_token(EntityKind::Functions, "pkg:a:b:c").unwrap_err();
        assert!(err.to_string().contains("found 4"));
    }

    #[test]
    fn test_token_path_file() {
        let path = map_token(EntityKind::Types, "pkg:foo/bar:Foo").unwrap();
        assert_eq!(path.file("json"), "foo/bar/types/Foo.json");
        assert_eq!(path.file("md"), "foo/bar/types/Foo.md");
    }

    #[test]
    fn test_elision_collides_with_plain_module() {
        let elided = map_token(EntityKind::Resources, "pkg:foo/Foo:Foo").unwrap();
        let plain = map_token(EntityKind::Resources, "pkg:foo:Foo").unwrap();
        assert_eq!(elided, plain);
    }
}
