//! Entity trait shared by every persisted business object.

use std::cmp::Ordering;
use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::shared::pagination::{Direction, Sort};

/// A persisted business object with a server-assigned numeric id.
///
/// The serialized form doubles as the search document.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Entity name used in logs, metrics and index keys.
    const NAME: &'static str;

    /// Properties accepted in sort orders.
    const SORTABLE: &'static [&'static str];

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Text fed to the search analyzer.
    fn searchable_text(&self) -> Vec<String>;

    /// Value of a sortable property. Properties outside [`Entity::SORTABLE`]
    /// yield [`SortValue::Null`].
    fn sort_value(&self, property: &str) -> SortValue;

    /// Copy relations owned by the other side from the stored row.
    ///
    /// Writes to this entity never change its inverse relations.
    fn retain_inverse_relations(&mut self, _stored: &Self) {}
}

/// Comparable property value. `Null` sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Null,
    Int(i64),
    Text(String),
}

impl From<Option<i64>> for SortValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SortValue::Null, SortValue::Int)
    }
}

impl From<Option<&String>> for SortValue {
    fn from(value: Option<&String>) -> Self {
        value.map_or(SortValue::Null, |s| SortValue::Text(s.to_lowercase()))
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }
}

/// A sort order named a property the entity does not expose.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported sort property: {0}")]
pub struct UnknownSortProperty(pub String);

/// Reject sort orders on properties outside [`Entity::SORTABLE`].
pub fn check_sort<E: Entity>(sort: &[Sort]) -> Result<(), UnknownSortProperty> {
    match sort
        .iter()
        .find(|s| !E::SORTABLE.contains(&s.property.as_str()))
    {
        Some(bad) => Err(UnknownSortProperty(bad.property.clone())),
        None => Ok(()),
    }
}

/// Order entities by the requested sorts, falling back to id order.
pub fn sort_entities<E: Entity>(items: &mut [E], sort: &[Sort]) -> Result<(), UnknownSortProperty> {
    check_sort::<E>(sort)?;

    items.sort_by(|a, b| {
        sort.iter()
            .map(|s| {
                let ord = a.sort_value(&s.property).cmp(&b.sort_value(&s.property));
                match s.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| a.id().cmp(&b.id()))
    });

    Ok(())
}
