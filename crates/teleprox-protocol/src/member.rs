//! Member descriptor parsing.
//!
//! API descriptors list members as plain strings. A plain name is a
//! callable method; a name suffixed with `:get` or `:set` is a property
//! accessor. Names may be dotted for nested addressing, and accessors are
//! grouped into properties by the trailing segment after the last dot, so
//! `"motor.speed:get"` and `"motor.speed:set"` together describe one
//! read/write property `speed`.

use std::collections::{BTreeMap, BTreeSet};

/// Suffix marking a property read accessor.
pub const GETTER_SUFFIX: &str = ":get";

/// Suffix marking a property write accessor.
pub const SETTER_SUFFIX: &str = ":set";

/// What a single member-list entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A callable method.
    Method,
    /// A property read accessor.
    Getter,
    /// A property write accessor.
    Setter,
}

/// A parsed member-list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberDescriptor<'a> {
    raw: &'a str,
    path: &'a str,
    kind: MemberKind,
}

impl<'a> MemberDescriptor<'a> {
    /// Parses a raw member-list entry.
    pub fn parse(raw: &'a str) -> Self {
        let (path, kind) = if let Some(path) = raw.strip_suffix(GETTER_SUFFIX) {
            (path, MemberKind::Getter)
        } else if let Some(path) = raw.strip_suffix(SETTER_SUFFIX) {
            (path, MemberKind::Setter)
        } else {
            (raw, MemberKind::Method)
        };
        Self { raw, path, kind }
    }

    /// The entry exactly as it appeared in the member list.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// The dotted path without any accessor suffix.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// The trailing path segment, used to group `:get`/`:set` pairs.
    pub fn name(&self) -> &'a str {
        match self.path.rsplit_once('.') {
            Some((_, name)) => name,
            None => self.path,
        }
    }

    /// Whether the entry is a property accessor.
    pub fn is_accessor(&self) -> bool {
        self.kind != MemberKind::Method
    }

    /// The kind of member the entry describes.
    pub fn kind(&self) -> MemberKind {
        self.kind
    }
}

/// Access mode of a grouped property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccess {
    /// Only a `:get` accessor was listed.
    ReadOnly,
    /// Only a `:set` accessor was listed.
    WriteOnly,
    /// Both accessors were listed.
    ReadWrite,
}

impl PropertyAccess {
    /// Adds read access.
    pub fn with_read(self) -> Self {
        match self {
            Self::WriteOnly | Self::ReadWrite => Self::ReadWrite,
            Self::ReadOnly => Self::ReadOnly,
        }
    }

    /// Adds write access.
    pub fn with_write(self) -> Self {
        match self {
            Self::ReadOnly | Self::ReadWrite => Self::ReadWrite,
            Self::WriteOnly => Self::WriteOnly,
        }
    }

    /// Whether the property can be read.
    pub fn readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Whether the property can be written.
    pub fn writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

impl std::fmt::Display for PropertyAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ReadOnly => "read-only",
            Self::WriteOnly => "write-only",
            Self::ReadWrite => "read/write",
        })
    }
}

/// Partitions a member list into callable methods and grouped properties.
///
/// All entries are processed before any property is final: a property is
/// read/write exactly when both of its accessors appear somewhere in the
/// list, regardless of order.
pub fn partition_members(
    members: &[String],
) -> (BTreeSet<String>, BTreeMap<String, PropertyAccess>) {
    let mut methods = BTreeSet::new();
    let mut properties: BTreeMap<String, PropertyAccess> = BTreeMap::new();

    for raw in members {
        let member = MemberDescriptor::parse(raw);
        match member.kind() {
            MemberKind::Method => {
                methods.insert(member.raw().to_string());
            }
            MemberKind::Getter => {
                properties
                    .entry(member.name().to_string())
                    .and_modify(|access| *access = access.with_read())
                    .or_insert(PropertyAccess::ReadOnly);
            }
            MemberKind::Setter => {
                properties
                    .entry(member.name().to_string())
                    .and_modify(|access| *access = access.with_write())
                    .or_insert(PropertyAccess::WriteOnly);
            }
        }
    }

    (methods, properties)
}
