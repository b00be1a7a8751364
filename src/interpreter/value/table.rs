use std::{
    cell::RefCell,
    hash::{Hash, Hasher},
    rc::Rc,
};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, function::Function},
    },
    util::num::{f64_to_i64_exact, usize_to_f64},
};

/// The hashable projection of a [`Value`] used as a table key.
///
/// `nil` and NaN have no key form. Numbers are normalized so that `-0` and
/// `0` name the same slot; tables and functions are keyed by identity.
#[derive(Clone)]
pub enum TableKey {
    Boolean(bool),
    Number(OrderedFloat<f64>),
    String(Rc<str>),
    Table(Rc<RefCell<Table>>),
    Function(Rc<Function>),
}

impl TableKey {
    /// Converts a value into a key.
    ///
    /// # Returns
    /// - `Some(TableKey)`: for every value except `nil` and NaN.
    /// - `None`: otherwise.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Nil => None,
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => Some(Self::Number(OrderedFloat(if *n == 0.0 { 0.0 } else { *n }))),
            Value::Boolean(b) => Some(Self::Boolean(*b)),
            Value::String(s) => Some(Self::String(Rc::clone(s))),
            Value::Table(t) => Some(Self::Table(Rc::clone(t))),
            Value::Function(f) => Some(Self::Function(Rc::clone(f))),
        }
    }

    /// Converts a value into a key for a write, rejecting `nil` and NaN.
    ///
    /// # Errors
    /// `InvalidTableKey` for `nil` or NaN.
    pub fn for_write(value: &Value, line: usize) -> EvalResult<Self> {
        Self::from_value(value).ok_or_else(|| {
                                   let details = if value.is_nil() { "nil" } else { "NaN" };
                                   RuntimeError::InvalidTableKey { details: details.to_string(),
                                                                   line }
                               })
    }

    /// The key of the `index`th sequence slot.
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self::Number(OrderedFloat(usize_to_f64(index)))
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Boolean(b) => Value::Boolean(*b),
            Self::Number(n) => Value::Number(n.into_inner()),
            Self::String(s) => Value::String(Rc::clone(s)),
            Self::Table(t) => Value::Table(Rc::clone(t)),
            Self::Function(f) => Value::Function(Rc::clone(f)),
        }
    }
}

impl PartialEq for TableKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Table(a), Self::Table(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for TableKey {}

impl std::fmt::Debug for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_value())
    }
}

impl Hash for TableKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Boolean(b) => {
                state.write_u8(0);
                b.hash(state);
            },
            Self::Number(n) => {
                state.write_u8(1);
                n.hash(state);
            },
            Self::String(s) => {
                state.write_u8(2);
                s.hash(state);
            },
            Self::Table(t) => {
                state.write_u8(3);
                std::ptr::hash(Rc::as_ptr(t), state);
            },
            Self::Function(f) => {
                state.write_u8(4);
                std::ptr::hash(Rc::as_ptr(f), state);
            },
        }
    }
}

/// Compaction never runs on tables with fewer tombstones than this.
const MIN_COMPACTION: usize = 16;

/// An insertion-ordered map from keys to non-nil values.
///
/// Storing `nil` under an existing key keeps the slot as a tombstone so that
/// a traversal with `next` can continue past it; tombstones are invisible to
/// every reader. They are swept out when a new key is inserted and they
/// outnumber the live entries, so a table used as a queue stays bounded.
/// Inserting new keys during a traversal is not supported, so the sweep never
/// runs under a `next` loop that only updates or clears fields.
///
/// The table also caches its border: the largest `n` such that `t[1]` to
/// `t[n]` are all non-nil. Appending at `n + 1` and clearing at or below `n`
/// keep it current without a scan.
#[derive(Default)]
pub struct Table {
    entries:    IndexMap<TableKey, Value>,
    live:       usize,
    tombstones: usize,
    border:     usize,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("entries", &self.live).finish()
    }
}

/// The position of a key in the array part, if it is a positive integer.
fn sequence_index(key: &TableKey) -> Option<usize> {
    match key {
        TableKey::Number(n) => f64_to_i64_exact(n.into_inner()).and_then(|i| usize::try_from(i).ok())
                                                               .filter(|&i| i >= 1),
        _ => None,
    }
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sequence `{v1, v2, ...}`.
    #[must_use]
    pub fn from_sequence(values: Vec<Value>) -> Self {
        let mut table = Self::new();
        for (i, value) in values.into_iter().enumerate() {
            table.set(TableKey::index(i + 1), value);
        }
        table
    }

    /// Reads a key. Missing keys, `nil` and NaN read as `nil`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Value {
        TableKey::from_value(key).and_then(|key| self.entries.get(&key))
                                 .cloned()
                                 .unwrap_or(Value::Nil)
    }

    /// Reads the integer key `index`.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Value {
        self.entries.get(&TableKey::index(index)).cloned().unwrap_or(Value::Nil)
    }

    /// Stores a value. Storing `nil` removes the key from every reader's view.
    pub fn set(&mut self, key: TableKey, value: Value) {
        let index = sequence_index(&key);

        if value.is_nil() {
            if let Some(slot) = self.entries.get_mut(&key)
               && !slot.is_nil()
            {
                *slot = Value::Nil;
                self.live -= 1;
                self.tombstones += 1;
                if let Some(index) = index
                   && index <= self.border
                {
                    self.border = index - 1;
                }
            }
            return;
        }

        match self.entries.get_mut(&key) {
            Some(slot) => {
                if slot.is_nil() {
                    self.tombstones -= 1;
                    self.live += 1;
                }
                *slot = value;
            },
            None => {
                if self.tombstones >= MIN_COMPACTION && self.tombstones > self.live {
                    self.compact();
                }
                self.entries.insert(key, value);
                self.live += 1;
            },
        }

        if index == Some(self.border + 1) {
            self.border += 1;
            while !self.get_index(self.border + 1).is_nil() {
                self.border += 1;
            }
        }
    }

    /// Drops every tombstone.
    fn compact(&mut self) {
        self.entries.retain(|_, value| !value.is_nil());
        self.tombstones = 0;
    }

    /// Number of live entries.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.live
    }

    /// Returns the border: the largest `n` such that `t[1]` to `t[n]` are all
    /// non-nil, or 0 when `t[1]` is nil.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.border
    }

    /// Returns the entry following `key` in traversal order, or the first
    /// entry when `key` is `nil`.
    ///
    /// # Returns
    /// - `Ok(Some((key, value)))`: the next live entry.
    /// - `Ok(None)`: the traversal is complete.
    ///
    /// # Errors
    /// `ArgumentError` if `key` is not present in the table.
    pub fn next(&self, key: &Value, line: usize) -> EvalResult<Option<(Value, Value)>> {
        let start = if key.is_nil() {
            0
        } else {
            let index = TableKey::from_value(key).and_then(|k| self.entries.get_index_of(&k))
                                                 .ok_or_else(|| RuntimeError::ArgumentError {
                                                     function: "next",
                                                     details: "invalid key".to_string(),
                                                     line,
                                                 })?;
            index + 1
        };

        Ok(self.entries
               .iter()
               .skip(start)
               .find(|(_, value)| !value.is_nil())
               .map(|(k, v)| (k.to_value(), v.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: f64) -> TableKey {
        TableKey::from_value(&Value::Number(n)).unwrap()
    }

    #[test]
    fn rejects_nil_and_nan_keys() {
        assert!(TableKey::from_value(&Value::Nil).is_none());
        assert!(TableKey::from_value(&Value::Number(f64::NAN)).is_none());
        assert!(matches!(TableKey::for_write(&Value::Nil, 4),
                         Err(RuntimeError::InvalidTableKey { line: 4, .. })));
    }

    #[test]
    fn negative_zero_is_zero() {
        let mut table = Table::new();
        table.set(key(-0.0), Value::from("zero"));
        assert_eq!(table.get(&Value::Number(0.0)), Value::from("zero"));
    }

    #[test]
    fn nil_assignment_hides_entry() {
        let mut table = Table::from_sequence(vec![Value::Number(10.0), Value::Number(20.0)]);
        table.set(key(2.0), Value::Nil);
        assert_eq!(table.get(&Value::Number(2.0)), Value::Nil);
        assert_eq!(table.count(), 1);
        assert_eq!(table.length(), 1);
    }

    #[test]
    fn border_of_sequences_and_holes() {
        let mut table = Table::from_sequence(vec![Value::Boolean(true); 3]);
        assert_eq!(table.length(), 3);
        table.set(key(5.0), Value::Boolean(true));
        assert_eq!(table.length(), 3);
        assert_eq!(Table::new().length(), 0);
    }

    #[test]
    fn border_follows_appends_and_removals() {
        let mut table = Table::new();
        for i in 1..=10 {
            table.set(key(f64::from(i)), Value::Number(f64::from(i)));
        }
        table.set(TableKey::String(Rc::from("name")), Value::Boolean(true));
        assert_eq!(table.length(), 10);

        table.set(key(10.0), Value::Nil);
        assert_eq!(table.length(), 9);
        table.set(key(4.0), Value::Nil);
        assert_eq!(table.length(), 3);
        table.set(key(4.0), Value::Number(4.0));
        assert_eq!(table.length(), 9);
    }

    #[test]
    fn out_of_order_filling_extends_border() {
        let mut table = Table::new();
        table.set(key(2.0), Value::Number(2.0));
        table.set(key(3.0), Value::Number(3.0));
        assert_eq!(table.length(), 0);
        table.set(key(1.0), Value::Number(1.0));
        assert_eq!(table.length(), 3);
        table.set(key(1.5), Value::Number(1.5));
        assert_eq!(table.length(), 3);
    }

    #[test]
    fn tombstones_are_swept_by_later_inserts() {
        let mut table = Table::new();
        for i in 0..10_000 {
            table.set(key(f64::from(i)), Value::Boolean(true));
            table.set(key(f64::from(i)), Value::Nil);
        }
        assert_eq!(table.count(), 0);
        assert!(table.entries.len() <= 2 * MIN_COMPACTION);
    }

    #[test]
    fn clearing_during_traversal_keeps_next_working() {
        let mut table = Table::from_sequence(vec![Value::Boolean(true); 40]);
        let mut current = Value::Nil;
        let mut visited = 0;
        while let Some((k, _)) = table.next(&current, 1).unwrap() {
            table.set(TableKey::from_value(&k).unwrap(), Value::Nil);
            current = k;
            visited += 1;
        }
        assert_eq!(visited, 40);
        assert_eq!(table.count(), 0);
        assert_eq!(table.length(), 0);
    }

    #[test]
    fn next_walks_insertion_order_and_skips_tombstones() {
        let mut table = Table::new();
        table.set(TableKey::String(Rc::from("a")), Value::Number(1.0));
        table.set(TableKey::String(Rc::from("b")), Value::Number(2.0));
        table.set(TableKey::String(Rc::from("c")), Value::Number(3.0));
        table.set(TableKey::String(Rc::from("b")), Value::Nil);

        let first = table.next(&Value::Nil, 1).unwrap().unwrap();
        assert_eq!(first.0, Value::from("a"));
        let second = table.next(&first.0, 1).unwrap().unwrap();
        assert_eq!(second, (Value::from("c"), Value::Number(3.0)));
        assert_eq!(table.next(&second.0, 1).unwrap(), None);
        assert!(table.next(&Value::from("zzz"), 1).is_err());
    }
}
