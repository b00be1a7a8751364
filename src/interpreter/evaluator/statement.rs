use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{Expr, FunctionBody, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            environment::Environment,
            utils::adjust,
        },
        value::{
            core::Value,
            function::Function,
            table::{Table, TableKey},
        },
    },
};

/// A resolved assignment target.
enum Place {
    Variable(String),
    Field(Rc<RefCell<Table>>, TableKey),
}

impl Context {
    /// Executes a single statement.
    ///
    /// Returns how control leaves the statement: normally, through `break`, or
    /// through `return` with the returned values. `local` and
    /// `local function` replace `env` with a child scope holding the new
    /// names, which the following statements of the block run in.
    pub fn exec_statement(&mut self, statement: &Statement, env: &mut Rc<Environment>)
                          -> EvalResult<Flow> {
        match statement {
            Statement::Local { names, values, .. } => {
                let values = adjust(self.eval_list(values, env)?, names.len());
                let scope = Environment::with_parent(env);
                for (name, value) in names.iter().zip(values) {
                    scope.declare(name.as_str(), value);
                }
                *env = scope;
                Ok(Flow::Normal)
            },
            Statement::LocalFunction { name, body, .. } => {
                let scope = Environment::with_parent(env);
                scope.declare(name.as_str(), closure(body, &scope));
                *env = scope;
                Ok(Flow::Normal)
            },
            Statement::Assignment { targets,
                                    values,
                                    line, } => {
                self.exec_assignment(targets, values, *line, env)?;
                Ok(Flow::Normal)
            },
            Statement::If { branches,
                            else_block,
                            .. } => {
                for branch in branches {
                    if self.eval(&branch.condition, env)?.is_truthy() {
                        return self.exec_block(&branch.body, env);
                    }
                }
                match else_block {
                    Some(block) => self.exec_block(block, env),
                    None => Ok(Flow::Normal),
                }
            },
            Statement::While { condition, body, line } => {
                while self.eval(condition, env)?.is_truthy() {
                    self.tick(*line)?;
                    match self.exec_block(body, env)? {
                        Flow::Break => break,
                        Flow::Return(values) => return Ok(Flow::Return(values)),
                        Flow::Normal => {},
                    }
                }
                Ok(Flow::Normal)
            },
            Statement::Repeat { body, condition, line } => {
                loop {
                    self.tick(*line)?;
                    let scope = Environment::with_parent(env);
                    let (flow, scope) = self.exec_statements_in_scope(body, &scope)?;
                    match flow {
                        Flow::Break => break,
                        Flow::Return(values) => return Ok(Flow::Return(values)),
                        Flow::Normal => {},
                    }
                    if self.eval(condition, &scope)?.is_truthy() {
                        break;
                    }
                }
                Ok(Flow::Normal)
            },
            Statement::NumericFor { var,
                                    start,
                                    stop,
                                    step,
                                    body,
                                    line, } => {
                self.exec_numeric_for(var, start, stop, step.as_ref(), body, *line, env)
            },
            Statement::GenericFor { names,
                                    exprs,
                                    body,
                                    line, } => self.exec_generic_for(names, exprs, body, *line, env),
            Statement::FunctionDecl { path,
                                      method,
                                      body,
                                      line, } => {
                self.exec_function_declaration(path, method.as_deref(), body, *line, env)?;
                Ok(Flow::Normal)
            },
            Statement::Return { values, .. } => Ok(Flow::Return(self.eval_list(values, env)?)),
            Statement::Break { .. } => Ok(Flow::Break),
            Statement::Do { body, .. } => self.exec_block(body, env),
            Statement::Call { call, .. } => {
                self.eval_multi(call, env)?;
                Ok(Flow::Normal)
            },
        }
    }

    /// Performs a multiple assignment.
    ///
    /// Target tables and keys are resolved first, then every value is
    /// evaluated, and only then are the targets written, left to right.
    fn exec_assignment(&mut self,
                       targets: &[Expr],
                       values: &[Expr],
                       line: usize,
                       env: &Rc<Environment>)
                       -> EvalResult<()> {
        let mut places = Vec::with_capacity(targets.len());
        for target in targets {
            places.push(self.resolve_place(target, line, env)?);
        }

        let values = adjust(self.eval_list(values, env)?, places.len());

        for (place, value) in places.into_iter().zip(values) {
            match place {
                Place::Variable(name) => self.assign_variable(&name, value, env),
                Place::Field(table, key) => table.borrow_mut().set(key, value),
            }
        }
        Ok(())
    }

    fn resolve_place(&mut self, target: &Expr, line: usize, env: &Rc<Environment>)
                     -> EvalResult<Place> {
        match target {
            Expr::Index { table, key, line } => {
                let table = Rc::clone(self.eval(table, env)?.as_table(*line)?);
                let key = TableKey::for_write(&self.eval(key, env)?, *line)?;
                Ok(Place::Field(table, key))
            },
            Expr::Variable { name, .. } => Ok(Place::Variable(name.clone())),
            other => Err(RuntimeError::TypeMismatch { details: "cannot assign to this expression".to_string(),
                                                      line:    other.line().max(line), }),
        }
    }

    /// Binds a declared function: `function f()` assigns the variable `f`,
    /// `function a.b.c()` and `function a.b:m()` store into the table reached
    /// through the dotted path.
    fn exec_function_declaration(&mut self,
                                 path: &[String],
                                 method: Option<&str>,
                                 body: &Rc<FunctionBody>,
                                 line: usize,
                                 env: &Rc<Environment>)
                                 -> EvalResult<()> {
        let function = closure(body, env);

        let (field, prefix) = match (method, path.split_last()) {
            (Some(method), _) => (method, path),
            (None, Some((last, prefix))) if !prefix.is_empty() => (last.as_str(), prefix),
            _ => {
                if let Some(name) = path.first() {
                    self.assign_variable(name, function, env);
                }
                return Ok(());
            },
        };

        let mut target = match prefix.first() {
            Some(name) => self.eval(&Expr::Variable { name: name.clone(),
                                                      line },
                                    env)?,
            None => Value::Nil,
        };
        for segment in prefix.iter().skip(1) {
            let next = target.as_table(line)?.borrow().get(&Value::from(segment.as_str()));
            target = next;
        }

        target.as_table(line)?
              .borrow_mut()
              .set(TableKey::for_write(&Value::from(field), line)?, function);
        Ok(())
    }
}

fn closure(body: &Rc<FunctionBody>, env: &Rc<Environment>) -> Value {
    Value::from(Function::Closure { body: Rc::clone(body),
                                    env:  Rc::clone(env), })
}
