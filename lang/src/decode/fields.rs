use std::collections::HashMap;

use super::{DecodeError, DuplicateFields};
use crate::parser::ast::List;

/// Name to sub-list lookup over a list's elements.
///
/// Every element that is itself a list contributes an entry keyed by its
/// prefix, so `(IntA 1)` is the field `IntA`. Other elements are skipped.
/// The map borrows from the tree and is rebuilt for every record decoded.
#[derive(Debug, Default)]
pub struct FieldMap<'de> {
    entries: HashMap<&'de str, &'de List>,
}

impl<'de> FieldMap<'de> {
    pub fn build(list: &'de List, duplicates: DuplicateFields) -> Result<Self, DecodeError> {
        let mut entries = HashMap::with_capacity(list.elements.len());
        for field in list.elements.iter().filter_map(|node| node.as_list()) {
            let previous = entries.insert(field.name(), field);
            if previous.is_some() && duplicates == DuplicateFields::Reject {
                return Err(DecodeError::DuplicateField {
                    name: field.name().to_string(),
                    span: field.prefix.span,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&'de List> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
