use std::rc::Rc;

use crate::{
    ast::{Expr, TableEntry},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            environment::Environment,
        },
        value::{
            core::Value,
            table::{Table, TableKey},
        },
    },
};

impl Context {
    /// Evaluates a table constructor.
    ///
    /// Entries are evaluated in written order. Positional entries take the
    /// keys 1, 2, ... and keyed entries do not consume a slot. A call or `...`
    /// in the last positional slot contributes all of its values.
    ///
    /// # Errors
    /// `InvalidTableKey` for an explicit `nil` or NaN key, reported on the
    /// key's line.
    pub(crate) fn eval_table_constructor(&mut self,
                                         entries: &[TableEntry],
                                         env: &Rc<Environment>)
                                         -> EvalResult<Value> {
        let mut table = Table::new();
        let mut position = 1;

        for (i, entry) in entries.iter().enumerate() {
            match &entry.key {
                Some(key_expr) => {
                    let key = self.eval(key_expr, env)?;
                    let value = self.eval(&entry.value, env)?;
                    table.set(TableKey::for_write(&key, key_expr.line())?, value);
                },
                None if i + 1 == entries.len() && entry.value.is_multi_valued() => {
                    for value in self.eval_multi(&entry.value, env)? {
                        table.set(TableKey::index(position), value);
                        position += 1;
                    }
                },
                None => {
                    let value = self.eval(&entry.value, env)?;
                    table.set(TableKey::index(position), value);
                    position += 1;
                },
            }
        }

        Ok(Value::from(table))
    }

    /// Evaluates `table[key]`. Missing keys read as `nil`.
    ///
    /// # Errors
    /// `IndexOnNonTable` if the indexed value is not a table.
    pub(crate) fn eval_index(&mut self,
                             table: &Expr,
                             key: &Expr,
                             line: usize,
                             env: &Rc<Environment>)
                             -> EvalResult<Value> {
        let table = self.eval(table, env)?;
        let key = self.eval(key, env)?;
        Ok(table.as_table(line)?.borrow().get(&key))
    }
}
