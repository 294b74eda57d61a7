use crate::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use stride_surface::parse_source;
use stride_syntax::*;
use unindent::unindent;

/// Imports served from memory.
#[derive(Default)]
struct Files(HashMap<String, String>);

impl Files {
    fn with(mut self, path: &str, source: &str) -> Self {
        self.0.insert(path.to_string(), source.to_string());
        self
    }
}

impl Loader for Files {
    fn load(&self, path: &str) -> Result<Term> {
        let import_err = |reason: String| EvalError::Import { path: path.to_string(), reason };
        let source = self.0.get(path).ok_or_else(|| import_err("no such file".to_string()))?;
        parse_source(source, None).map_err(|e| import_err(e.to_string()))
    }
}

struct Outcome {
    result: Result<Term>,
    stdout: String,
    trace: String,
    globals: Bindings,
    depth: usize,
}

impl Outcome {
    fn get(&self, name: &str) -> Term {
        self.globals.get(&VarName::from(name)).cloned().unwrap_or_else(|| panic!("{name} unbound"))
    }
}

fn run_term(program: Term, stdin: &str, files: &Files, options: Options) -> Outcome {
    let mut input = stdin.as_bytes();
    let mut output = Vec::new();
    let mut trace = Vec::new();
    let mut rt =
        Runtime::new(&mut input, &mut output, files).with_trace(&mut trace).with_options(options);
    let result = rt.run(program);
    let globals = rt.env.flatten();
    let depth = rt.env.depth();
    Outcome {
        result,
        stdout: String::from_utf8(output).unwrap(),
        trace: String::from_utf8(trace).unwrap(),
        globals,
        depth,
    }
}

fn run_with(source: &str, stdin: &str, files: &Files, options: Options) -> Outcome {
    let program = parse_source(&unindent(source), None).unwrap();
    run_term(program, stdin, files, options)
}

fn run(source: &str) -> Outcome {
    run_with(source, "", &Files::default(), Options::default())
}

fn run_ok(source: &str) -> Outcome {
    let outcome = run(source);
    if let Err(e) = &outcome.result {
        panic!("run failed: {e}");
    }
    outcome
}

#[test]
fn assignments_reach_normal_form() {
    let program = Term::seq(
        Term::assign("x", Term::Number(5)),
        Term::assign("y", Term::op(Term::var("x"), ArithOp::Add, Term::Number(1))),
    );
    let outcome = run_term(program, "", &Files::default(), Options::default());
    assert_eq!(outcome.result.unwrap(), Term::do_nothing());
    assert_eq!(EnvDisplay(&outcome.globals).to_string(), "[x:5, y:6]");
}

#[test]
fn every_step_is_traced_plus_the_halted_state() {
    let program = Term::seq(
        Term::assign("x", Term::Number(5)),
        Term::assign("y", Term::op(Term::var("x"), ArithOp::Add, Term::Number(1))),
    );
    let outcome = run_term(program, "", &Files::default(), Options::default());
    let expected = unindent(
        "
        x=5; y=x+1; []
        do_nothing; y=x+1; [x:5]
        y=x+1; [x:5]
        y=5+1; [x:5]
        y=6; [x:5]
        do_nothing; [x:5, y:6]
        ",
    );
    assert_eq!(outcome.trace, expected);
}

#[test]
fn nested_runs_trace_their_own_halted_state() {
    let outcome = run_with(
        "f = function(a){ return a; }; x = f(1);",
        "",
        &Files::default(),
        Options::default(),
    );
    assert!(outcome.result.is_ok());
    let expected = unindent(
        "
        f=function(a){return a;}; x=f(1); []
        f=function(a){return a;}; x=f(1); []
        do_nothing; x=f(1); [f:function(a){return a;}]
        x=f(1); [f:function(a){return a;}]
        return a; [a:1, f:function(a){return a;}]
        return 1; [a:1, f:function(a){return a;}]
        do_nothing; [a:1, f:function(a){return a;}]
        x=1; [f:function(a){return a;}]
        do_nothing; [f:function(a){return a;}, x:1]
        ",
    );
    assert_eq!(outcome.trace, expected);
}

#[test]
fn operands_are_evaluated_left_to_right() {
    let outcome = run_ok(
        r#"
        f = function() { print("f"); return 1; };
        g = function() { print("g"); return 2; };
        x = f() + g();
        "#,
    );
    assert_eq!(outcome.stdout, "f\ng\n");
    assert_eq!(outcome.get("x"), Term::Number(3));
}

#[test]
fn closures_are_snapshots() {
    let outcome = run_ok(
        r#"
        x = 1;
        f = function() { return x; };
        x = 2;
        y = f();
        "#,
    );
    assert_eq!(outcome.get("y"), Term::Number(1));
    assert_eq!(outcome.get("x"), Term::Number(2));
}

#[test]
fn loops_reenter_an_unchanged_body() {
    let outcome = run_ok(
        r#"
        i = 0;
        while i < 3 { i = i + 1; }
        "#,
    );
    assert_eq!(outcome.get("i"), Term::Number(3));

    let outcome = run_ok(
        r#"
        i = 0;
        n = 0;
        while i < 6 {
            if (i % 2) == 0 then { n = n + 1; }
            i = i + 1;
        }
        "#,
    );
    assert_eq!(outcome.get("n"), Term::Number(3));
    assert_eq!(outcome.get("i"), Term::Number(6));
}

#[test]
fn recursion_finds_the_global_binding() {
    let outcome = run_ok(
        r#"
        fact = function(n) {
            if n <= 1 then { return 1; }
            return n * fact(n - 1);
        };
        x = fact(5);
        "#,
    );
    assert_eq!(outcome.get("x"), Term::Number(120));
    assert_eq!(outcome.depth, 1);
}

#[test]
fn pair_builtins_do_not_mutate() {
    let outcome = run_ok(
        r#"
        p = (1, 2);
        q = setcar(p, 9);
        r = setcdr(p, 8);
        a = car(p);
        b = car(q);
        c = cdr(r);
        "#,
    );
    assert_eq!(outcome.get("p"), Term::pair(Term::Number(1), Term::Number(2)));
    assert_eq!(outcome.get("a"), Term::Number(1));
    assert_eq!(outcome.get("b"), Term::Number(9));
    assert_eq!(outcome.get("c"), Term::Number(8));
}

#[test]
fn list_builtins_do_not_mutate() {
    let outcome = run_ok(
        r#"
        l = [1, 2, 3];
        a = elem(l, 1);
        m = setelem(l, 0, 9);
        "#,
    );
    assert_eq!(outcome.get("a"), Term::Number(2));
    assert_eq!(outcome.get("l").to_string(), "[1, 2, 3]");
    assert_eq!(outcome.get("m").to_string(), "[9, 2, 3]");

    let outcome = run("l = [1, 2, 3]; a = elem(l, 3);");
    assert!(matches!(outcome.result, Err(EvalError::IndexOutOfRange { index: 3, len: 3 })));
    let outcome = run("l = [1]; a = elem(l, 0 - 1);");
    assert!(matches!(outcome.result, Err(EvalError::IndexOutOfRange { index: -1, len: 1 })));
}

#[test]
fn curry_chains_single_parameter_functions() {
    let outcome = run_ok(
        r#"
        add = function(a, b) { return a + b; };
        x = curry(add)(1)(2);
        y = add(1, 2);
        c = curry(function(a, b, c) { return a + b + c; });
        z = c(1)(2)(3);
        "#,
    );
    assert_eq!(outcome.get("x"), Term::Number(3));
    assert_eq!(outcome.get("x"), outcome.get("y"));
    assert_eq!(
        outcome.get("c").to_string(),
        "function(a){return function(b){return function(c){return a+b+c;};};}"
    );
    assert_eq!(outcome.get("z"), Term::Number(6));
}

#[test]
fn return_short_circuits_the_body() {
    let outcome = run_ok(
        r#"
        r = function() {
            if true then { return 1; } else { return 2; }
            print("unreachable");
            return 3;
        }();
        "#,
    );
    assert_eq!(outcome.get("r"), Term::Number(1));
    assert_eq!(outcome.stdout, "");
}

#[test]
fn return_inside_a_loop_leaves_the_call() {
    let outcome = run_ok(
        r#"
        find = function(l, v) {
            i = 0;
            while true {
                if elem(l, i) == v then { return i; }
                i = i + 1;
            }
        };
        x = find([4, 5, 6], 6);
        "#,
    );
    assert_eq!(outcome.get("x"), Term::Number(2));
}

#[test]
fn calls_without_return_yield_null() {
    let outcome = run_ok(
        r#"
        f = function() { do_nothing; };
        x = f();
        "#,
    );
    assert_eq!(outcome.get("x"), Term::null());
}

#[test]
fn top_level_return_halts_the_program() {
    let outcome = run_ok("x = 1; return x; x = 2;");
    assert_eq!(outcome.get("x"), Term::Number(1));
}

#[test]
fn strings_absorb_the_other_operand() {
    let outcome = run_ok(
        r#"
        a = "x" + 1;
        b = 1 + "x";
        c = "a" + "b";
        d = "n" + True;
        "#,
    );
    assert_eq!(outcome.get("a"), Term::str("x1"));
    assert_eq!(outcome.get("b"), Term::str("1x"));
    assert_eq!(outcome.get("c"), Term::str("ab"));
    assert_eq!(outcome.get("d"), Term::str("nTrue"));

    let outcome = run(r#"x = "a" * 2;"#);
    assert!(matches!(outcome.result, Err(EvalError::TypeMismatch { .. })));
    let outcome = run("x = True + 1;");
    assert!(matches!(outcome.result, Err(EvalError::TypeMismatch { .. })));
}

#[test]
fn division_rounds_toward_negative_infinity() {
    let outcome = run_ok(
        r#"
        a = (0 - 7) / 2;
        b = (0 - 7) % 2;
        c = 7 % (0 - 2);
        d = 7 / 2;
        e = 6 / (0 - 3);
        "#,
    );
    assert_eq!(outcome.get("a"), Term::Number(-4));
    assert_eq!(outcome.get("b"), Term::Number(1));
    assert_eq!(outcome.get("c"), Term::Number(-1));
    assert_eq!(outcome.get("d"), Term::Number(3));
    assert_eq!(outcome.get("e"), Term::Number(-2));
}

#[test]
fn arithmetic_faults_are_errors() {
    assert!(matches!(run("x = 1 / 0;").result, Err(EvalError::DivisionByZero)));
    assert!(matches!(run("x = 1 % 0;").result, Err(EvalError::DivisionByZero)));
    assert!(matches!(
        run("x = 9223372036854775807 + 1;").result,
        Err(EvalError::Overflow("+"))
    ));
}

#[test]
fn remainder_of_the_minimum_by_minus_one_is_zero() {
    let outcome = run_ok("m = (0 - 9223372036854775807) - 1; x = m % (0 - 1);");
    assert_eq!(outcome.get("m"), Term::Number(i64::MIN));
    assert_eq!(outcome.get("x"), Term::Number(0));
    assert!(matches!(
        run("m = (0 - 9223372036854775807) - 1; x = m / (0 - 1);").result,
        Err(EvalError::Overflow("/"))
    ));
}

#[test]
fn comparisons() {
    let outcome = run_ok(
        r#"
        a = "abc" < "abd";
        b = (1, 2) == (1, 2);
        c = 1 == "1";
        d = 2 >= 2;
        e = [1] != [1];
        "#,
    );
    assert_eq!(outcome.get("a"), Term::Boolean(true));
    assert_eq!(outcome.get("b"), Term::Boolean(true));
    assert_eq!(outcome.get("c"), Term::Boolean(false));
    assert_eq!(outcome.get("d"), Term::Boolean(true));
    assert_eq!(outcome.get("e"), Term::Boolean(false));
    assert!(matches!(run(r#"x = 1 < "a";"#).result, Err(EvalError::TypeMismatch { .. })));
}

#[test]
fn truthiness_of_non_booleans() {
    let outcome = run_ok(
        r#"
        if "" then { a = 1; } else { a = 2; }
        if [0] then { b = 1; } else { b = 2; }
        if 0 then { c = 1; } else { c = 2; }
        if (0, 0) then { d = 1; } else { d = 2; }
        "#,
    );
    assert_eq!(outcome.get("a"), Term::Number(2));
    assert_eq!(outcome.get("b"), Term::Number(1));
    assert_eq!(outcome.get("c"), Term::Number(2));
    assert_eq!(outcome.get("d"), Term::Number(1));
}

#[test]
fn arity_is_checked_both_ways() {
    let outcome = run("f = function(a, b) { return a; }; x = f(1);");
    match outcome.result {
        | Err(EvalError::ArityMismatch { callee, expected, found }) => {
            assert_eq!((callee.as_str(), expected, found), ("f", 2, 1));
        }
        | other => panic!("unexpected {other:?}"),
    }
    let outcome = run("f = function(a) { return a; }; x = f(1, 2);");
    assert!(matches!(outcome.result, Err(EvalError::ArityMismatch { expected: 1, found: 2, .. })));
    let outcome = run("x = car((1, 2), 3);");
    assert!(matches!(outcome.result, Err(EvalError::ArityMismatch { expected: 1, found: 2, .. })));
}

#[test]
fn failed_calls_pop_their_frame() {
    let outcome = run("f = function(a) { return a / 0; }; x = f(1);");
    assert!(matches!(outcome.result, Err(EvalError::DivisionByZero)));
    assert_eq!(outcome.depth, 1);
    assert!(outcome.globals.get(&VarName::from("a")).is_none());
}

#[test]
fn unbound_names_fail_by_default() {
    let outcome = run("x = y;");
    assert!(matches!(outcome.result, Err(EvalError::UnboundName(ref name)) if name.as_str() == "y"));
    let outcome = run("nope(1);");
    assert!(matches!(outcome.result, Err(EvalError::UnboundName(_))));
    let outcome = run("x = 1; x(2);");
    assert!(matches!(outcome.result, Err(EvalError::NotCallable { kind: "number", .. })));
}

#[test]
fn unbound_names_are_null_when_permissive() {
    let options = Options { unbound: UnboundPolicy::Permissive };
    let outcome = run_with("x = y; z = nope(1);", "", &Files::default(), options);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.get("x"), Term::null());
    assert_eq!(outcome.get("z"), Term::null());
}

#[test]
fn return_slot_cannot_be_bound() {
    let outcome = run("_return_ = 1;");
    assert!(matches!(outcome.result, Err(EvalError::ReservedName(_))));
    let outcome = run("f = function(_return_) { return 1; };");
    assert!(matches!(outcome.result, Err(EvalError::ReservedName(_))));
}

#[test]
fn print_and_input_use_plain_rendering() {
    let outcome = run_with(
        r#"
        name = input("name? ");
        print("hi " + name);
        print((1, "a"));
        "#,
        "Ada\r\n",
        &Files::default(),
        Options::default(),
    );
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.stdout, "name? hi Ada\n(1, \"a\")\n");
    assert_eq!(outcome.get("name"), Term::str("Ada"));
}

#[test]
fn imports_splice_global_bindings() {
    let files = Files::default().with(
        "lib.sd",
        r#"
        double = function(n) { return n * 2; };
        base = 10;
        print("loaded");
        "#,
    );
    let outcome = run_with(
        r#"
        base = 1;
        import "lib.sd";
        x = double(base);
        "#,
        "",
        &files,
        Options::default(),
    );
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.stdout, "loaded\n");
    assert_eq!(outcome.get("base"), Term::Number(10));
    assert_eq!(outcome.get("x"), Term::Number(20));
}

#[test]
fn import_cycles_and_missing_files_are_errors() {
    let files = Files::default().with("a.sd", r#"import "b.sd";"#).with("b.sd", r#"import "a.sd";"#);
    let outcome = run_with(r#"import "a.sd";"#, "", &files, Options::default());
    assert!(matches!(outcome.result, Err(EvalError::ImportCycle(ref path)) if path == "a.sd"));
    let outcome = run(r#"import "missing.sd";"#);
    assert!(matches!(outcome.result, Err(EvalError::Import { ref path, .. }) if path == "missing.sd"));
}

#[test]
fn scopes_shadow_and_the_global_scope_stays() {
    let mut env = Environment::new();
    env.put(VarName::from("x"), Term::Number(1));
    env.put(VarName::from("y"), Term::Number(2));
    env.push_scope(Scope::default());
    env.put(VarName::from("x"), Term::Number(3));
    assert_eq!(env.get(&VarName::from("x")), Some(&Term::Number(3)));
    assert!(env.contains(&VarName::from("y")));
    assert_eq!(EnvDisplay(&env.flatten()).to_string(), "[x:3, y:2]");
    assert!(env.pop_scope().is_some());
    assert_eq!(env.get(&VarName::from("x")), Some(&Term::Number(1)));
    assert!(env.pop_scope().is_none());
    assert_eq!(env.depth(), 1);
}

fn long_program(prefix: &str, len: usize) -> String {
    let mut source = prefix.to_string();
    for i in 0..len {
        source.push_str(&format!("x{} = {};\n", i % 10, i));
    }
    source
}

fn run_untraced(program: Term) -> (Result<Term>, Bindings) {
    let mut input = "".as_bytes();
    let mut output = Vec::new();
    let files = Files::default();
    let mut rt = Runtime::new(&mut input, &mut output, &files);
    let result = rt.run(program);
    (result, rt.env.flatten())
}

#[test]
fn long_programs_parse_render_and_run() {
    let program = parse_source(&long_program("", 10_000), None).unwrap();
    let rendered = program.to_string();
    assert!(rendered.starts_with("x0=0; x1=1; "));
    assert!(rendered.ends_with("x9=9999;"));
    let (result, globals) = run_untraced(program);
    assert_eq!(result.unwrap(), Term::do_nothing());
    assert_eq!(globals.get(&VarName::from("x0")), Some(&Term::Number(9990)));
    assert_eq!(globals.get(&VarName::from("x9")), Some(&Term::Number(9999)));
}

#[test]
fn long_programs_unwind_after_an_early_fault() {
    let program = parse_source(&long_program("x = 1 / 0;\n", 10_000), None).unwrap();
    let (result, _) = run_untraced(program);
    assert!(matches!(result, Err(EvalError::DivisionByZero)));
    let program = parse_source(&long_program("return 7;\n", 10_000), None).unwrap();
    let (result, _) = run_untraced(program);
    assert!(result.is_ok());
}
