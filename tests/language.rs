use std::{
    cell::RefCell,
    fs::{self},
    io::Write,
    rc::Rc,
};

use moonwalk::{
    Context, Error, Options, RuntimeError, StepBudget, Value, error::RuntimeErrorKind, evaluate,
    parse, run, tokenize,
};
use walkdir::WalkDir;

#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "lua"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let mut context = Context::with_options(Options { chunk_name: path.display().to_string(),
                                                          ..Options::default() });
        context.set_output(std::io::sink());
        if let Err(e) = context.run(&content) {
            panic!("Script {path:?} failed:\n{e}");
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn assert_success(src: &str) {
    if let Err(e) = run(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) {
    if run(src).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{src}")
    }
}

fn assert_runtime_error(src: &str, kind: RuntimeErrorKind) {
    match run(src) {
        Err(Error::Runtime(e)) => assert_eq!(e.kind(), kind, "{e}"),
        other => panic!("expected a {kind:?} runtime error, got {other:?}"),
    }
}

fn value(src: &str) -> Value {
    run(src).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"))
}

/// An output sink that can be read back after the context wrote to it.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn printed(src: &str) -> String {
    let buffer = SharedBuffer::default();
    let mut context = Context::new();
    context.set_output(buffer.clone());
    context.run(src).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"));
    buffer.contents()
}

#[test]
fn basic_arithmetic() {
    assert_eq!(value("return 1 + 2 * 3"), Value::Number(7.0));
    assert_eq!(value("return (1 + 2) * 3"), Value::Number(9.0));
    assert_eq!(value("return 2 ^ 10"), Value::Number(1024.0));
    assert_eq!(value("return -2 ^ 2"), Value::Number(-4.0));
    assert_eq!(value("return 7 % -3"), Value::Number(-2.0));
    assert_eq!(value("return 1 / 0"), Value::Number(f64::INFINITY));
}

#[test]
fn locals_and_globals() {
    assert_eq!(value("local x = 10\nreturn x"), Value::Number(10.0));
    assert_success("x = 1\ndo local x = 2 assert(x == 2) end\nassert(x == 1)");
    assert_success("local x = 1\nlocal x = x + 1\nassert(x == 2)");
    assert_success("local a, b, c = 1, 2\nassert(a == 1 and b == 2 and c == nil)");
    assert_success("local function f() g = 5 end\nf()\nassert(g == 5)");
}

#[test]
fn later_locals_do_not_reach_earlier_closures() {
    let source = "local x = 1\nlocal f = function() return x end\nlocal x = 2\nreturn f()";
    assert_eq!(value(source), Value::Number(1.0));

    let source = "y = 1\nlocal function g() return y end\nlocal y = 2\nreturn g()";
    assert_eq!(value(source), Value::Number(1.0));

    // Assignments still reach the binding a closure captured.
    let source = "local n = 1\nlocal get = function() return n end\nn = 5\nreturn get()";
    assert_eq!(value(source), Value::Number(5.0));

    // A local declared after a function is not visible inside it.
    assert_runtime_error("local function a() return b() end\n\
                          local function b() return 1 end\n\
                          return a()",
                         RuntimeErrorKind::UndefinedVariable);
}

#[test]
fn many_locals_in_one_block() {
    let mut source = String::new();
    for i in 0..20_000 {
        source.push_str(&format!("local v{i} = {i}\n"));
    }
    source.push_str("return v0 + v19999");
    assert_eq!(value(&source), Value::Number(19_999.0));
}

#[test]
fn undefined_variables() {
    assert_runtime_error("return y + 1", RuntimeErrorKind::UndefinedVariable);

    let mut lenient = Context::with_options(Options { strict_globals: false,
                                                      ..Options::default() });
    assert_eq!(lenient.run("return y").unwrap(), vec![Value::Nil]);
}

#[test]
fn tables() {
    assert_eq!(value("local t = {1, 2, [5]=9}\nreturn t[2]"), Value::Number(2.0));
    assert_eq!(value("local t = {1, 2, [5]=9}\nreturn t[5]"), Value::Number(9.0));
    assert_eq!(value("local t = {1, 2, [5]=9}\nreturn t[3]"), Value::Nil);
    assert_eq!(value("local t = {[1]='a', 'b'}\nreturn t[1]"), Value::from("b"));
    assert_eq!(value("local t = {x = 1, 'p', y = 2, 'q'}\nreturn #t"), Value::Number(2.0));
    assert_success("local t = {}\nt.a = {}\nt.a.b = 3\nassert(t['a'].b == 3)");
    assert_runtime_error("local t = {}\nt[nil] = 1", RuntimeErrorKind::InvalidTableKey);
    assert_runtime_error("local t = {}\nt[0/0] = 1", RuntimeErrorKind::InvalidTableKey);
    assert_runtime_error("local x = 1\nreturn x.y", RuntimeErrorKind::IndexOnNonTable);
}

#[test]
fn recursion_and_closures() {
    let source = "
        local function fact(n)
            if n <= 1 then return 1 end
            return n * fact(n - 1)
        end
        return fact(5)
    ";
    assert_eq!(value(source), Value::Number(120.0));

    let counter = "
        local function counter()
            local n = 0
            return function() n = n + 1 return n end
        end
        local a, b = counter(), counter()
        a() a()
        return a() + b()
    ";
    assert_eq!(value(counter), Value::Number(4.0));
}

#[test]
fn closures_capture_each_loop_iteration() {
    let source = "
        local fs = {}
        for i = 1, 3 do fs[i] = function() return i end end
        return fs[1]() + fs[2]() * 10 + fs[3]() * 100
    ";
    assert_eq!(value(source), Value::Number(321.0));
}

#[test]
fn numeric_for() {
    assert_success("for i=1,3 do end");
    assert_runtime_error("for i=1,3,0 do end", RuntimeErrorKind::InvalidForStep);
    assert_runtime_error("for i=1,'x' do end", RuntimeErrorKind::TypeMismatch);
    assert_eq!(value("local s = 0 for i = 10, 1, -3 do s = s + i end return s"),
               Value::Number(22.0));
    assert_eq!(value("local n = 0 for i = 1, 0 do n = n + 1 end return n"), Value::Number(0.0));
    assert_eq!(value("local s = 0 for i = '1', '3' do s = s + i end return s"),
               Value::Number(6.0));
}

#[test]
fn break_leaves_one_loop() {
    let source = "
        local count = 0
        for i = 1, 3 do
            while true do
                count = count + 1
                break
            end
        end
        return count
    ";
    assert_eq!(value(source), Value::Number(3.0));
}

#[test]
fn multiple_results() {
    assert_eq!(run_all("local function f() return 1, 2, 3 end\nreturn f()"),
               numbers(&[1.0, 2.0, 3.0]));
    assert_eq!(run_all("local function f() return 1, 2, 3 end\nreturn f(), 10"),
               numbers(&[1.0, 10.0]));
    assert_eq!(run_all("local function f() return 1, 2, 3 end\nreturn (f())"),
               numbers(&[1.0]));
    assert_eq!(value("local function f() return 1, 2, 3 end\nreturn #{f()}"),
               Value::Number(3.0));
    assert_eq!(value("local function f() end\nlocal x = f()\nreturn x"), Value::Nil);
    assert_success("local a, b = 1\nassert(b == nil)\na, b = b, a\nassert(a == nil and b == 1)");
}

#[test]
fn varargs() {
    assert_eq!(value("local function n(...) return select('#', ...) end\nreturn n(1, nil, 3)"),
               Value::Number(3.0));
    assert_eq!(run_all("local function f(a, ...) return ... end\nreturn f(1, 2, 3)"),
               numbers(&[2.0, 3.0]));
    assert_eq!(run_all("local function f(...) local a, b = ... return b end\nreturn f(4, 5)"),
               numbers(&[5.0]));
}

#[test]
fn methods() {
    let source = "
        local account = {balance = 0}
        function account:deposit(n) self.balance = self.balance + n end
        account:deposit(5)
        account.deposit(account, 10)
        return account.balance
    ";
    assert_eq!(value(source), Value::Number(15.0));
    assert_runtime_error("local t = {}\nt:missing()", RuntimeErrorKind::NotCallable);
}

#[test]
fn comparison_and_equality() {
    assert_eq!(value("return 1 == '1'"), Value::Boolean(false));
    assert_eq!(value("return 'a' < 'b'"), Value::Boolean(true));
    assert_eq!(value("local t = {} return t == t, {} == {}"), Value::Boolean(true));
    assert_eq!(run_all("return {} == {}"), vec![Value::Boolean(false)]);
    assert_runtime_error("return 1 < '2'", RuntimeErrorKind::TypeMismatch);
    assert_runtime_error("return {} < {}", RuntimeErrorKind::TypeMismatch);
}

#[test]
fn coercions() {
    assert_eq!(value("return '10' + 5"), Value::Number(15.0));
    assert_eq!(value("return 1 .. 2"), Value::from("12"));
    assert_eq!(value("return 'n=' .. 0.1"), Value::from("n=0.1"));
    assert_eq!(value("return -'2'"), Value::Number(-2.0));
    assert_runtime_error("return 'a' + 1", RuntimeErrorKind::TypeMismatch);
    assert_runtime_error("return {} .. 'x'", RuntimeErrorKind::TypeMismatch);
    assert_runtime_error("return #5", RuntimeErrorKind::TypeMismatch);
    assert_runtime_error("return 5 % 0", RuntimeErrorKind::DivisionSemanticsViolation);
}

#[test]
fn short_circuit() {
    assert_eq!(value("return nil or 'default'"), Value::from("default"));
    assert_eq!(value("return false and undefined_name"), Value::Boolean(false));
    assert_eq!(value("return 1 and 2"), Value::Number(2.0));
    assert_eq!(value("return not nil"), Value::Boolean(true));
}

#[test]
fn repeat_sees_body_locals() {
    assert_eq!(value("local i = 0 repeat local done = i >= 3 i = i + 1 until done return i"),
               Value::Number(4.0));
}

#[test]
fn print_writes_to_the_output_sink() {
    assert_eq!(printed("print(1, 'two', nil, true)\nprint()"), "1\ttwo\tnil\ttrue\n\n");
    assert_eq!(printed("print(10 / 4, 2^53)"), "2.5\t9.007199254741e+15\n");
}

#[test]
fn iteration() {
    let source = "
        local t = {10, 20, 30, x = 'a'}
        local sum, keys = 0, 0
        for i, v in ipairs(t) do sum = sum + i * v end
        for k in pairs(t) do keys = keys + 1 end
        return sum, keys
    ";
    assert_eq!(run_all(source), numbers(&[140.0, 4.0]));
    assert_eq!(printed("for k, v in pairs({'a', 'b', z = 1}) do print(k, v) end"),
               "1\ta\n2\tb\nz\t1\n");
}

#[test]
fn protected_calls() {
    assert_eq!(run_all("return pcall(function() return 1, 2 end)"),
               vec![Value::Boolean(true), Value::Number(1.0), Value::Number(2.0)]);
    assert_eq!(run_all("return pcall(error, 'plain', 0)"),
               vec![Value::Boolean(false), Value::from("plain")]);
    assert_eq!(run_all("return pcall(function()\n error('boom')\nend)"),
               vec![Value::Boolean(false), Value::from("input:2: boom")]);
    assert_success("local ok, e = pcall(function() return nil + 1 end)\n\
                    assert(not ok)\n\
                    assert(type(e) == 'string')");
    assert_runtime_error("error({})", RuntimeErrorKind::Raised);
    assert_runtime_error("assert(false, 'nope')", RuntimeErrorKind::Raised);
}

#[test]
fn raised_messages_are_reported_as_is() {
    let err = run("assert(1 == 2, 'numbers differ')").unwrap_err();
    assert_eq!(err.to_string(), "Error on line 1: numbers differ");
}

#[test]
fn call_depth_is_limited() {
    let mut context = Context::with_options(Options { max_call_depth: 40,
                                                      ..Options::default() });
    let err = context.run("local function f(n) return f(n + 1) + 1 end\nreturn f(1)")
                     .unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::StackOverflow { line: 1 })), "{err}");

    let values = context.run("local function f() return f() end\nreturn pcall(f)").unwrap();
    assert_eq!(values[0], Value::Boolean(false));

    assert_eq!(context.run("local function f(n) if n == 0 then return 0 end return f(n - 1) end\n\
                            return f(30)")
                      .unwrap(),
               vec![Value::Number(0.0)]);
}

#[test]
fn interrupt_hook_aborts_infinite_loops() {
    let mut context = Context::new();
    context.set_interrupt_hook(StepBudget::new(10_000));
    let err = context.run("while true do end").unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::ExecutionAborted { .. })));

    let mut context = Context::new();
    context.set_interrupt_hook(StepBudget::new(10_000));
    let err = context.run("pcall(function() while true do end end)").unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::ExecutionAborted { .. })));

    let mut calls = 0;
    let mut context = Context::new();
    context.set_interrupt_hook(move |_| {
                                   calls += 1;
                                   calls > 3
                               });
    assert!(context.run("for i = 1, 1000 do end").is_err());
}

#[test]
fn step_budget_applies_to_each_run() {
    let mut context = Context::with_options(Options { check_interval: 1,
                                                      ..Options::default() });
    context.set_interrupt_hook(StepBudget::new(100));

    for _ in 0..200 {
        let values = context.run("local s = 0 for i = 1, 20 do s = s + i end return s").unwrap();
        assert_eq!(values, numbers(&[210.0]));
    }
    let err = context.run("while true do end").unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::ExecutionAborted { .. })));
    assert_eq!(context.run("return 1").unwrap(), numbers(&[1.0]));
}

#[test]
fn globals_persist_across_runs() {
    let mut context = Context::new();
    context.run("counter = 1\nlocal hidden = 2").unwrap();
    context.run("counter = counter + 1").unwrap();
    assert_eq!(context.run("return counter").unwrap(), numbers(&[2.0]));
    assert!(context.run("return hidden").is_err());
}

#[test]
fn evaluate_is_repeatable_on_fresh_globals() {
    let tokens: Vec<_> = tokenize("local t = {} for i = 1, 4 do t[i] = i * i end return t[4]")
        .collect::<Result<_, _>>()
        .unwrap();
    let chunk = parse(&tokens).unwrap();
    assert_eq!(evaluate(&chunk, None).unwrap(), Value::Number(16.0));
    assert_eq!(evaluate(&chunk, None).unwrap(), Value::Number(16.0));
}

#[test]
fn appending_and_draining_large_tables() {
    let source = "
        local t = {}
        for i = 1, 50000 do t[#t + 1] = i end
        local size = #t
        for i = 1, 50000 do t[i] = nil end
        return size, #t, next(t)
    ";
    assert_eq!(run_all(source), vec![Value::Number(50_000.0), Value::Number(0.0), Value::Nil]);

    let queue = "
        local q, head, tail = {}, 1, 0
        for i = 1, 50000 do
            tail = tail + 1
            q[tail] = i
            if tail - head >= 4 then
                q[head] = nil
                head = head + 1
            end
        end
        local live = 0
        for _ in pairs(q) do live = live + 1 end
        return live, q[tail]
    ";
    assert_eq!(run_all(queue), numbers(&[4.0, 50_000.0]));
}

#[test]
fn malformed_programs_fail() {
    assert_failure("local = 1");
    assert_failure("x = 1 +");
    assert_failure("return 'unterminated");
    assert_failure("f(");
    assert_failure("nil()");
}

fn run_all(src: &str) -> Vec<Value> {
    Context::new().run(src).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"))
}

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().copied().map(Value::Number).collect()
}
