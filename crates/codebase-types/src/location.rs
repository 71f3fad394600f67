//! Fetchable locations
//!
//! Provides [`Location`], an absolute URI naming a codebase entry, an archive,
//! or a single resource inside either.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// Scheme used for entries addressed inside an archive
pub const ARCHIVE_SCHEME: &str = "jar";

/// Separator between an archive location and the entry inside it
const ARCHIVE_SEPARATOR: &str = "!/";

/// Absolute location with a scheme
///
/// A location ending in `/` is a directory; anything else is treated as an
/// archive when entries are looked up beneath it.
///
/// # Examples
/// - `http://example.org/app/` + `pkg/Main.class` → `http://example.org/app/pkg/Main.class`
/// - `http://example.org/app.jar` + `pkg/Main.class` → `jar:http://example.org/app.jar!/pkg/Main.class`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Parse an absolute location
    ///
    /// # Errors
    /// Returns error if the input is empty, has no valid scheme, or contains
    /// whitespace or control characters
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        if input.is_empty() {
            return Err(LocationError::Empty);
        }
        if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(LocationError::InvalidCharacter(input.to_string()));
        }

        let Some((scheme, rest)) = input.split_once(':') else {
            return Err(LocationError::MissingScheme(input.to_string()));
        };
        if !is_valid_scheme(scheme) {
            return Err(LocationError::InvalidScheme(input.to_string()));
        }
        if rest.is_empty() {
            return Err(LocationError::MissingPath(input.to_string()));
        }

        Ok(Self(input.to_string()))
    }

    /// Full location text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scheme, without the trailing `:`
    #[inline]
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.split_once(':').map_or("", |(scheme, _)| scheme)
    }

    /// Check scheme, ignoring ASCII case
    #[inline]
    #[must_use]
    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.scheme().eq_ignore_ascii_case(scheme)
    }

    /// Directory codebase entry (trailing `/`)
    #[inline]
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Location of the entry `name` beneath this codebase entry
    ///
    /// Directories are joined textually; archives produce a `jar:` entry
    /// location. A leading `/` on `name` is ignored.
    ///
    /// # Errors
    /// Returns error if `name` is empty or contains empty, `.` or `..` segments
    pub fn entry(&self, name: &str) -> Result<Self, LocationError> {
        let name = normalize_entry_name(name)?;
        if self.is_directory() {
            Ok(Self(format!("{}{name}", self.0)))
        } else {
            Ok(Self(format!(
                "{ARCHIVE_SCHEME}:{}{ARCHIVE_SEPARATOR}{name}",
                self.0
            )))
        }
    }

    /// Resolve a possibly relative reference against this location
    ///
    /// Absolute references are parsed as-is. Relative references replace the
    /// last path segment; references starting with `/` replace the whole path.
    /// A base with no path resolves against its authority root. `.` and `..`
    /// segments are removed from the result.
    ///
    /// # Errors
    /// Returns error if the result is not a valid location
    pub fn resolve(&self, reference: &str) -> Result<Self, LocationError> {
        if reference.is_empty() {
            return Err(LocationError::Empty);
        }
        if has_scheme_prefix(reference) {
            return Self::parse(reference);
        }

        let root = self.authority_root();
        let path = if reference.starts_with('/') {
            reference.to_string()
        } else {
            let base_path = &self.0[root.len()..];
            let directory = match base_path.rfind('/') {
                Some(idx) => &base_path[..=idx],
                None => "/",
            };
            format!("{directory}{reference}")
        };
        let path = if path.starts_with('/') {
            remove_dot_segments(&path)
        } else {
            path
        };
        Self::parse(&format!("{root}{path}"))
    }

    /// Archive holding this entry, for `jar:` entry locations
    #[must_use]
    pub fn archive(&self) -> Option<Self> {
        self.split_archive_entry().map(|(archive, _)| archive)
    }

    /// Entry name inside the archive, for `jar:` entry locations
    #[must_use]
    pub fn archive_entry(&self) -> Option<&str> {
        if !self.has_scheme(ARCHIVE_SCHEME) {
            return None;
        }
        self.0
            .split_once(ARCHIVE_SEPARATOR)
            .map(|(_, entry)| entry)
    }

    /// Check whether this location lives under `root`
    ///
    /// True for entries beneath the directory `root`, for `root` itself, for
    /// paths continuing `root` at a `/` boundary, and for entries of the
    /// archive `root`.
    #[must_use]
    pub fn is_under(&self, root: &Self) -> bool {
        if self.archive().is_some_and(|a| a == *root) {
            return true;
        }
        match self.0.strip_prefix(root.as_str()) {
            Some("") => true,
            Some(rest) => root.is_directory() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Local path for `file:` locations
    ///
    /// `%XX` escapes are decoded; a path that does not decode to UTF-8 has no
    /// local form.
    #[must_use]
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if !self.has_scheme("file") {
            return None;
        }
        let rest = &self.0[self.scheme().len() + 1..];
        let path = match rest.strip_prefix("//") {
            Some(authority_and_path) => {
                let authority_end = authority_and_path.find('/')?;
                let authority = &authority_and_path[..authority_end];
                if !authority.is_empty() && !authority.eq_ignore_ascii_case("localhost") {
                    return None;
                }
                &authority_and_path[authority_end..]
            }
            None => rest,
        };
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        Some(PathBuf::from(decoded.as_ref()))
    }

    fn split_archive_entry(&self) -> Option<(Self, &str)> {
        if !self.has_scheme(ARCHIVE_SCHEME) {
            return None;
        }
        let inner = &self.0[ARCHIVE_SCHEME.len() + 1..];
        let (archive, entry) = inner.split_once(ARCHIVE_SEPARATOR)?;
        Self::parse(archive).ok().map(|archive| (archive, entry))
    }

    /// `scheme://authority` (or `scheme:` when there is no authority)
    fn authority_root(&self) -> &str {
        let scheme_end = self.scheme().len() + 1;
        match self.0[scheme_end..].strip_prefix("//") {
            Some(after) => {
                let authority_len = after.find('/').unwrap_or(after.len());
                &self.0[..scheme_end + 2 + authority_len]
            }
            None => &self.0[..scheme_end],
        }
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn has_scheme_prefix(reference: &str) -> bool {
    match reference.find(':') {
        Some(idx) => {
            let candidate = &reference[..idx];
            !candidate.contains('/') && is_valid_scheme(candidate)
        }
        None => false,
    }
}

/// Remove `.` and `..` segments from an absolute path
fn remove_dot_segments(path: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut segments = path.split('/').skip(1).peekable();
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        match segment {
            "." => {}
            ".." => {
                kept.pop();
            }
            other => {
                kept.push(other);
                continue;
            }
        }
        if last {
            kept.push("");
        }
    }
    format!("/{}", kept.join("/"))
}

fn normalize_entry_name(name: &str) -> Result<&str, LocationError> {
    let trimmed = name.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(LocationError::InvalidEntryName(name.to_string()));
    }
    let bad_segment = trimmed
        .split('/')
        .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad_segment || trimmed.chars().any(char::is_control) {
        return Err(LocationError::InvalidEntryName(name.to_string()));
    }
    Ok(trimmed)
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Location {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Location parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Empty input
    #[error("empty location")]
    Empty,

    /// No `scheme:` prefix
    #[error("location has no scheme: '{0}'")]
    MissingScheme(String),

    /// Scheme has invalid characters
    #[error("invalid scheme in location: '{0}'")]
    InvalidScheme(String),

    /// Nothing after the scheme
    #[error("location has no path: '{0}'")]
    MissingPath(String),

    /// Whitespace or control characters
    #[error("invalid character in location: '{0}'")]
    InvalidCharacter(String),

    /// Entry name cannot be addressed beneath a codebase entry
    #[error("invalid entry name: '{0}'")]
    InvalidEntryName(String),
}
