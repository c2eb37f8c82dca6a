use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A location in the schema referenced by a document.
///
/// Field references render as `Type.field`. Input types referenced through an
/// operation's variable declarations render as a bare `Type`.
/// See: <https://spec.graphql.org/draft/#sec-Schema-Coordinates>
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaCoordinate {
    Type(Arc<str>),
    Field {
        type_name: Arc<str>,
        field_name: Arc<str>,
    },
}

impl SchemaCoordinate {
    #[must_use]
    pub fn field(type_name: impl Into<Arc<str>>, field_name: impl Into<Arc<str>>) -> Self {
        Self::Field {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    #[must_use]
    pub fn type_name(type_name: impl Into<Arc<str>>) -> Self {
        Self::Type(type_name.into())
    }

    /// Parse `Type` or `Type.field`. Returns `None` for empty segments or
    /// more than one `.` separator.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.split_once('.') {
            Some((type_name, field_name)) => {
                if type_name.is_empty() || field_name.is_empty() || field_name.contains('.') {
                    return None;
                }
                Some(Self::field(type_name, field_name))
            }
            None if text.is_empty() => None,
            None => Some(Self::type_name(text)),
        }
    }

    /// The type half of the coordinate.
    #[must_use]
    pub fn parent_type(&self) -> &str {
        match self {
            Self::Type(type_name) | Self::Field { type_name, .. } => type_name,
        }
    }

    #[must_use]
    pub const fn is_field(&self) -> bool {
        matches!(self, Self::Field { .. })
    }
}

impl fmt::Display for SchemaCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(type_name) => write!(f, "{type_name}"),
            Self::Field {
                type_name,
                field_name,
            } => write!(f, "{type_name}.{field_name}"),
        }
    }
}

impl Serialize for SchemaCoordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The deduplicated set of coordinates a document touches.
///
/// Iteration order is unspecified; use [`CoordinateSet::to_sorted_strings`]
/// for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateSet(HashSet<SchemaCoordinate>);

impl CoordinateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the coordinate was not already present.
    pub fn insert(&mut self, coordinate: SchemaCoordinate) -> bool {
        self.0.insert(coordinate)
    }

    /// Membership test by rendered coordinate, e.g. `"User.name"`.
    #[must_use]
    pub fn contains(&self, coordinate: &str) -> bool {
        SchemaCoordinate::parse(coordinate).is_some_and(|c| self.0.contains(&c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaCoordinate> {
        self.0.iter()
    }

    /// Union another set into this one.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn to_sorted_strings(&self) -> Vec<String> {
        let mut rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        rendered.sort_unstable();
        rendered
    }
}

impl Extend<SchemaCoordinate> for CoordinateSet {
    fn extend<I: IntoIterator<Item = SchemaCoordinate>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<SchemaCoordinate> for CoordinateSet {
    fn from_iter<I: IntoIterator<Item = SchemaCoordinate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for CoordinateSet {
    type Item = SchemaCoordinate;
    type IntoIter = std::collections::hash_set::IntoIter<SchemaCoordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CoordinateSet {
    type Item = &'a SchemaCoordinate;
    type IntoIter = std::collections::hash_set::Iter<'a, SchemaCoordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for CoordinateSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_sorted_strings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_field_and_type() {
        assert_eq!(SchemaCoordinate::field("User", "name").to_string(), "User.name");
        assert_eq!(SchemaCoordinate::type_name("UserInput").to_string(), "UserInput");
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(
            SchemaCoordinate::parse("Query.user"),
            Some(SchemaCoordinate::field("Query", "user"))
        );
        assert_eq!(
            SchemaCoordinate::parse("Episode"),
            Some(SchemaCoordinate::type_name("Episode"))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(SchemaCoordinate::parse(""), None);
        assert_eq!(SchemaCoordinate::parse(".name"), None);
        assert_eq!(SchemaCoordinate::parse("User."), None);
        assert_eq!(SchemaCoordinate::parse("User.name.first"), None);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut set = CoordinateSet::new();
        assert!(set.insert(SchemaCoordinate::field("User", "id")));
        assert!(!set.insert(SchemaCoordinate::field("User", "id")));
        assert_eq!(set.len(), 1);
        assert!(set.contains("User.id"));
        assert!(!set.contains("User"));
    }

    #[test]
    fn test_sorted_strings_and_json() {
        let set: CoordinateSet = [
            SchemaCoordinate::field("Query", "user"),
            SchemaCoordinate::type_name("UserFilter"),
            SchemaCoordinate::field("User", "id"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            set.to_sorted_strings(),
            vec!["Query.user", "User.id", "UserFilter"]
        );
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Query.user","User.id","UserFilter"]"#);
    }

    #[test]
    fn test_merge_unions_sets() {
        let mut left: CoordinateSet = [SchemaCoordinate::field("A", "x")].into_iter().collect();
        let right: CoordinateSet = [
            SchemaCoordinate::field("A", "x"),
            SchemaCoordinate::field("B", "y"),
        ]
        .into_iter()
        .collect();
        left.merge(right);
        assert_eq!(left.to_sorted_strings(), vec!["A.x", "B.y"]);
    }
}
