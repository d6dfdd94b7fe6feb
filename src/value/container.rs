/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the MUNI programming language project.
 *
 * MUNI is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

//! Shared handles for list and dictionary storage.
//!
//! Both containers are `Arc<RwLock<..>>` so that handler threads spawned by
//! `emit` and `watch` can read and mutate them alongside the main
//! evaluator. Every lock is held only for the duration of one method call;
//! nothing here calls back into the interpreter while a guard is alive.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{MuniError, MuniResult};
use crate::types::TypeSpec;
use crate::value::Value;

/* ----------------------------- */
/* LISTS                         */
/* ----------------------------- */

#[derive(Debug)]
struct ListData {
    items: Vec<Value>,
    elem: TypeSpec,
    /// Variables watching this list for in-place mutation.
    subscribers: Vec<String>,
}

/// Handle to a typed list. Clones share storage.
#[derive(Clone)]
pub struct ListRef(Arc<RwLock<ListData>>);

impl ListRef {
    /// Wraps already-validated items.
    pub fn new(items: Vec<Value>, elem: TypeSpec) -> Self {
        ListRef(Arc::new(RwLock::new(ListData {
            items,
            elem,
            subscribers: Vec::new(),
        })))
    }

    /// Builds a list whose every item is converted to `elem`.
    pub fn typed(items: Vec<Value>, elem: TypeSpec) -> MuniResult<Self> {
        let items = items
            .iter()
            .map(|item| item.coerce_to(&elem))
            .collect::<MuniResult<Vec<_>>>()?;
        Ok(Self::new(items, elem))
    }

    pub fn elem_type(&self) -> TypeSpec {
        self.0.read().elem.clone()
    }

    pub fn len(&self) -> usize {
        self.0.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().items.is_empty()
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<Value> {
        self.0.read().items.clone()
    }

    pub fn get_item(&self, index: &Value) -> MuniResult<Value> {
        let data = self.0.read();
        let slot = resolve_index(index, data.items.len())?;
        Ok(data.items[slot].clone())
    }

    /// Replaces one item after converting it to the element type.
    pub fn set_item(&self, index: &Value, value: &Value) -> MuniResult<()> {
        let value = value.coerce_to(&self.elem_type())?;
        let mut data = self.0.write();
        let slot = resolve_index(index, data.items.len())?;
        data.items[slot] = value;
        Ok(())
    }

    pub fn push(&self, value: &Value) -> MuniResult<()> {
        let value = value.coerce_to(&self.elem_type())?;
        self.0.write().items.push(value);
        Ok(())
    }

    /// Removes the first item equal to `value`. Returns whether one was found.
    pub fn remove_first(&self, value: &Value) -> bool {
        let mut data = self.0.write();
        match data.items.iter().position(|item| Value::same_value(item, value)) {
            Some(pos) => {
                data.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items().iter().any(|item| Value::same_value(item, value))
    }

    /// Sorts numbers numerically and strings lexically. Mixed kinds are a
    /// `TypeError`.
    pub fn sort(&self) -> MuniResult<()> {
        let mut items = self.items();
        if items.iter().all(|v| v.as_f64().is_some()) {
            items.sort_by(|a, b| {
                let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
                x.total_cmp(&y)
            });
        } else if items.iter().all(|v| v.as_str().is_some()) {
            items.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
        } else {
            return Err(MuniError::type_error(
                "sort requires a list of numbers or a list of strings",
            ));
        }
        self.0.write().items = items;
        Ok(())
    }

    pub fn subscribe(&self, name: &str) {
        let mut data = self.0.write();
        if !data.subscribers.iter().any(|n| n == name) {
            data.subscribers.push(name.to_string());
        }
    }

    pub fn subscribers(&self) -> Vec<String> {
        self.0.read().subscribers.clone()
    }

    pub fn ptr_eq(&self, other: &ListRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ListRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.items() == other.items()
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items().iter()).finish()
    }
}

/// Maps a possibly negative int index onto `0..len`.
fn resolve_index(index: &Value, len: usize) -> MuniResult<usize> {
    let raw = index.as_int().ok_or_else(|| {
        MuniError::index_error(format!(
            "list indices must be int, not {}",
            index.type_name()
        ))
    })?;

    let slot = if raw < 0 { raw + len as i64 } else { raw };
    if slot < 0 || slot >= len as i64 {
        return Err(MuniError::index_error(format!(
            "list index {} out of range for length {}",
            raw, len
        )));
    }
    Ok(slot as usize)
}

/* ----------------------------- */
/* DICTIONARIES                  */
/* ----------------------------- */

#[derive(Debug)]
struct DictData {
    /// Insertion-ordered entries; keys are unique by value equality.
    entries: Vec<(Value, Value)>,
    key: TypeSpec,
    value: TypeSpec,
    subscribers: Vec<String>,
}

/// Handle to a typed dictionary. Clones share storage.
#[derive(Clone)]
pub struct DictRef(Arc<RwLock<DictData>>);

impl DictRef {
    pub fn new(key: TypeSpec, value: TypeSpec) -> Self {
        DictRef(Arc::new(RwLock::new(DictData {
            entries: Vec::new(),
            key,
            value,
            subscribers: Vec::new(),
        })))
    }

    /// Builds a dictionary, converting every key and value to its tag.
    pub fn typed(entries: Vec<(Value, Value)>, key: TypeSpec, value: TypeSpec) -> MuniResult<Self> {
        let dict = DictRef::new(key, value);
        for (k, v) in &entries {
            dict.set(k, v)?;
        }
        Ok(dict)
    }

    /// Key and value tags.
    pub fn tags(&self) -> (TypeSpec, TypeSpec) {
        let data = self.0.read();
        (data.key.clone(), data.value.clone())
    }

    pub fn len(&self) -> usize {
        self.0.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().entries.is_empty()
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.read().entries.clone()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.0.read().entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.read().entries.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Missing keys read as `void`.
    pub fn get(&self, key: &Value) -> Value {
        self.0
            .read()
            .entries
            .iter()
            .find(|(k, _)| Value::same_value(k, key))
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Void)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.0
            .read()
            .entries
            .iter()
            .any(|(k, _)| Value::same_value(k, key))
    }

    /// Inserts or replaces, keeping the original position of an existing key.
    pub fn set(&self, key: &Value, value: &Value) -> MuniResult<()> {
        let (key_tag, value_tag) = self.tags();
        let key = key.coerce_to(&key_tag)?;
        let value = value.coerce_to(&value_tag)?;

        let mut data = self.0.write();
        match data.entries.iter_mut().find(|(k, _)| Value::same_value(k, &key)) {
            Some(entry) => entry.1 = value,
            None => data.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        let mut data = self.0.write();
        let pos = data.entries.iter().position(|(k, _)| Value::same_value(k, key))?;
        Some(data.entries.remove(pos).1)
    }

    pub fn subscribe(&self, name: &str) {
        let mut data = self.0.write();
        if !data.subscribers.iter().any(|n| n == name) {
            data.subscribers.push(name.to_string());
        }
    }

    pub fn subscribers(&self) -> Vec<String> {
        self.0.read().subscribers.clone()
    }

    pub fn ptr_eq(&self, other: &DictRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for DictRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.entries() == other.entries()
    }
}

impl fmt::Debug for DictRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn clones_share_storage() {
        let list = ListRef::new(vec![Value::Int(1)], TypeSpec::Int);
        let alias = list.clone();
        alias.push(&Value::Int(2)).unwrap();
        assert_eq!(list.items(), vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn typed_list_rejects_wrong_items() {
        let list = ListRef::new(vec![], TypeSpec::Int);
        let err = list.push(&Value::String("x".into())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn typed_list_widens_numbers() {
        let list = ListRef::typed(vec![Value::Int(1)], TypeSpec::Float).unwrap();
        assert_eq!(list.items(), vec![Value::Float(1.0)]);
    }

    #[test]
    fn negative_and_out_of_range_indices() {
        let list = ListRef::new(vec![Value::Int(1), Value::Int(2)], TypeSpec::Untyped);
        assert_eq!(list.get_item(&Value::Int(-1)).unwrap(), Value::Int(2));
        let err = list.get_item(&Value::Int(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexError);
    }

    #[test]
    fn dict_keeps_insertion_order_and_replaces_in_place() {
        let dict = DictRef::new(TypeSpec::Untyped, TypeSpec::Untyped);
        dict.set(&Value::String("b".into()), &Value::Int(1)).unwrap();
        dict.set(&Value::String("a".into()), &Value::Int(2)).unwrap();
        dict.set(&Value::String("b".into()), &Value::Int(3)).unwrap();
        assert_eq!(
            dict.keys(),
            vec![Value::String("b".into()), Value::String("a".into())]
        );
        assert_eq!(dict.get(&Value::String("b".into())), Value::Int(3));
        assert_eq!(dict.get(&Value::String("zzz".into())), Value::Void);
    }

    #[test]
    fn subscribers_are_unique() {
        let list = ListRef::new(vec![], TypeSpec::Untyped);
        list.subscribe("xs");
        list.subscribe("xs");
        assert_eq!(list.subscribers(), vec!["xs".to_string()]);
    }
}
