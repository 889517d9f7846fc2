//! Deep search over nested structures.
//!
//! [`locate`] walks a tree of mappings and sequences and collects every
//! container that has at least one direct child accepted by a comparator.
//! Typical use is finding filter fragments buried in a configuration
//! document.

/// A node that may hold children.
///
/// Sequences yield children with no key; mappings yield `Some(key)`. Leaves
/// return `None` from [`entries`](Enumerable::entries).
pub trait Enumerable {
    /// Mapping key type.
    type Key: ?Sized;

    /// Direct children, or `None` for a leaf.
    fn entries(&self) -> Option<Vec<(Option<&Self::Key>, &Self)>>;
}

/// Collects every container with a direct child accepted by `comparator`.
///
/// The comparator receives `(key, child, container)`, with `key` set to
/// `None` for sequence elements. Matching containers are returned in
/// depth-first pre-order, parent before child. Recursion continues into
/// every child whether or not its parent matched. Input must be acyclic.
///
/// ```
/// use serde_json::json;
/// use strainer::locate;
///
/// let config = json!({
///     "reports": [
///         { "title": "cheap", "filter": { "price_lt": 15 } },
///         { "title": "all" }
///     ]
/// });
///
/// let found = locate(|key, _, _| key == Some("filter"), &config);
/// assert_eq!(found, vec![&config["reports"][0]]);
/// ```
pub fn locate<'a, N, F>(mut comparator: F, root: &'a N) -> Vec<&'a N>
where
    N: Enumerable,
    F: FnMut(Option<&N::Key>, &N, &N) -> bool,
{
    let mut found = Vec::new();
    walk(&mut comparator, root, &mut found);
    tracing::trace!(matches = found.len(), "deep locate finished");
    found
}

fn walk<'a, N, F>(comparator: &mut F, node: &'a N, found: &mut Vec<&'a N>)
where
    N: Enumerable,
    F: FnMut(Option<&N::Key>, &N, &N) -> bool,
{
    let Some(entries) = node.entries() else {
        return;
    };

    if entries
        .iter()
        .any(|&(key, child)| comparator(key, child, node))
    {
        found.push(node);
    }

    for (_, child) in entries {
        walk(comparator, child, found);
    }
}

impl Enumerable for serde_json::Value {
    type Key = str;

    fn entries(&self) -> Option<Vec<(Option<&str>, &Self)>> {
        match self {
            serde_json::Value::Array(items) => Some(items.iter().map(|item| (None, item)).collect()),
            serde_json::Value::Object(map) => {
                Some(map.iter().map(|(key, value)| (Some(key.as_str()), value)).collect())
            }
            _ => None,
        }
    }
}

impl Enumerable for serde_yaml::Value {
    type Key = serde_yaml::Value;

    fn entries(&self) -> Option<Vec<(Option<&Self::Key>, &Self)>> {
        match self {
            serde_yaml::Value::Sequence(items) => {
                Some(items.iter().map(|item| (None, item)).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                Some(map.iter().map(|(key, value)| (Some(key), value)).collect())
            }
            serde_yaml::Value::Tagged(tagged) => tagged.value.entries(),
            _ => None,
        }
    }
}
