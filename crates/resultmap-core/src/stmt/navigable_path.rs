use std::fmt;

/// Name reserved for the element part of a plural attribute.
const ELEMENT: &str = "element";

/// Name reserved for the index (list position or map key) part of a plural
/// attribute.
const INDEX: &str = "key";

/// A path through the domain model, starting at a root entity.
///
/// The root carries the alias it was declared with, so two roots of the same
/// entity under different aliases are distinct paths: `Order(o)` and
/// `Order(o2)`. Each further step names an attribute: `Order(o).customer`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigablePath {
    parts: Vec<Part>,
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Part {
    name: String,
    alias: Option<String>,
}

impl NavigablePath {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                name: root.into(),
                alias: None,
            }],
        }
    }

    pub fn with_alias(root: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            parts: vec![Part {
                name: root.into(),
                alias: if alias.is_empty() { None } else { Some(alias) },
            }],
        }
    }

    /// Returns a new path one step below this one.
    pub fn append(&self, name: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(Part {
            name: name.into(),
            alias: None,
        });
        Self { parts }
    }

    /// The path of the element part when this path names a plural attribute.
    pub fn element(&self) -> Self {
        self.append(ELEMENT)
    }

    /// The path of the index part when this path names a plural attribute.
    pub fn index(&self) -> Self {
        self.append(INDEX)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.parts.split_last()?;
        if rest.is_empty() {
            return None;
        }

        Some(Self {
            parts: rest.to_vec(),
        })
    }

    pub fn local_name(&self) -> &str {
        &self.parts[self.parts.len() - 1].name
    }

    /// Alias of the root, if one was given.
    pub fn alias(&self) -> Option<&str> {
        self.parts[0].alias.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parts.len() == 1
    }

    pub fn is_element(&self) -> bool {
        !self.is_root() && self.local_name() == ELEMENT
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if `self` is `other` or one of its ancestors.
    pub fn is_parent_or_equal(&self, other: &NavigablePath) -> bool {
        other.parts.len() >= self.parts.len() && other.parts[..self.parts.len()] == self.parts[..]
    }

    pub fn full_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NavigablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&part.name)?;
            if let Some(alias) = &part.alias {
                write!(f, "({alias})")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for NavigablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NavigablePath({self})")
    }
}
