use std::sync::{Arc, Mutex};

use hookline::{Arg, Callback, ClassDef, HookError, HookKind, HookObject, Hooks, TagSpec, Value};

fn num(v: &Value) -> f64 {
    v.as_float().unwrap_or(0.0)
}

fn fsum(a: &[Value]) -> Value {
    Value::from(num(&a[0]) + 15.0)
}

fn fsub(a: &[Value]) -> Value {
    Value::from(num(&a[0]) - 10.0)
}

fn fmul(a: &[Value]) -> Value {
    Value::from(num(&a[0]) * 3.0)
}

fn fdiv(a: &[Value]) -> Value {
    Value::from(num(&a[0]) / 2.0)
}

fn fpow(a: &[Value]) -> Value {
    match a.get(1).and_then(Value::as_float) {
        Some(exp) => Value::from(num(&a[0]).powf(exp)),
        None => a[0].clone(),
    }
}

/// Records every intermediate result, like a stateful service object.
#[derive(Default)]
struct Operations {
    operations: Mutex<Vec<f64>>,
}

impl HookObject for Operations {
    fn class_name(&self) -> &str {
        "Operations"
    }

    fn has_method(&self, method: &str) -> bool {
        matches!(method, "fsum" | "fsub" | "fmul" | "fdiv" | "fpow")
    }

    fn call_method(&self, method: &str, args: &[Value]) -> Value {
        let out = match method {
            "fsum" => fsum(args),
            "fsub" => fsub(args),
            "fmul" => fmul(args),
            "fdiv" => fdiv(args),
            "fpow" => fpow(args),
            _ => Value::Null,
        };
        self.operations.lock().unwrap().push(num(&out));
        out
    }
}

/// Runs the reference calculator scenario against whatever targets `bind`
/// produces for each operation name.
fn run_calculator_scenario(hooks: &Hooks, bind: impl Fn(&str) -> Vec<Arg>) {
    hooks.filter("calculate.sum", bind("fsum")).unwrap();
    hooks.filter("calculate.sub", bind("fsub")).unwrap();
    hooks.filter("calculate.mul", bind("fmul")).unwrap();
    hooks.filter("calculate.div", bind("fdiv")).unwrap();

    // (((10+15)-10)*3)/2
    assert_eq!(hooks.apply("calculate", 10, &[]), Value::Float(22.5));

    assert!(hooks.remove_filter("calculate.sub").unwrap());
    // ((10+15)*3)/2
    assert_eq!(hooks.apply("calculate", 10, &[]), Value::Float(37.5));

    hooks.filter("calculate.pow?2::1", bind("fpow")).unwrap();
    // (((10^2)+15)*3)/2
    assert_eq!(hooks.apply("calculate", 10, &[Value::Int(2)]), Value::Float(172.5));

    assert_eq!(hooks.apply_by_name("calculate", "sum", 10, &[]), Value::Float(25.0));

    assert_eq!(hooks.apply_once("calculate", 10, &[Value::Int(2)]), Value::Float(172.5));
    assert_eq!(hooks.apply("calculate", 10, &[]), Value::Int(10));
}

#[test]
fn calculator_with_closures() {
    let hooks = Hooks::default();
    run_calculator_scenario(&hooks, |op| {
        let f = match op {
            "fsum" => fsum,
            "fsub" => fsub,
            "fmul" => fmul,
            "fdiv" => fdiv,
            _ => fpow,
        };
        vec![Arg::closure(f)]
    });
}

#[test]
fn calculator_with_functions() {
    let hooks = Hooks::default();
    hooks.define_function("fsum", Callback::new(fsum));
    hooks.define_function("fsub", Callback::new(fsub));
    hooks.define_function("fmul", Callback::new(fmul));
    hooks.define_function("fdiv", Callback::new(fdiv));
    hooks.define_function("fpow", Callback::new(fpow));

    run_calculator_scenario(&hooks, |op| vec![Arg::from(op)]);
}

#[test]
fn calculator_with_static_class() {
    let hooks = Hooks::default();
    hooks.define_class(
        ClassDef::new("StaticOperations")
            .method("fsum", Callback::new(fsum))
            .method("fsub", Callback::new(fsub))
            .method("fmul", Callback::new(fmul))
            .method("fdiv", Callback::new(fdiv))
            .method("fpow", Callback::new(fpow)),
    );

    run_calculator_scenario(&hooks, |op| vec![Arg::from("StaticOperations"), Arg::from(op)]);
}

#[test]
fn calculator_with_object_instance() {
    let hooks = Hooks::default();
    let ops = Arc::new(Operations::default());

    let shared = Arc::clone(&ops);
    run_calculator_scenario(&hooks, move |op| {
        vec![Arg::object(Arc::clone(&shared)), Arg::from(op)]
    });

    // the instance is shared with the registry, so its state is visible here
    let recorded = ops.operations.lock().unwrap().clone();
    assert_eq!(recorded.first(), Some(&25.0));
    assert_eq!(recorded.last(), Some(&172.5));
}

#[test]
fn invalid_targets_fail_at_registration() {
    let hooks = Hooks::default();
    hooks.define_class(ClassDef::new("StaticOperations").method("fsum", Callback::new(fsum)));

    let err = hooks.filter("calculate.sum", [Arg::from("notfound")]).unwrap_err();
    assert!(err.is_target_not_resolvable());

    let err = hooks
        .filter("calculate.sum", [Arg::from("StaticOperations"), Arg::from("notfound")])
        .unwrap_err();
    assert!(matches!(
        err,
        HookError::MethodNotFound { ref method, ref target }
            if method == "notfound" && target == "StaticOperations"
    ));

    let err = hooks.filter("calculate.sum", [Arg::from("StaticOperations")]).unwrap_err();
    assert!(matches!(err, HookError::MethodNotFound { ref method, .. } if method == "(not set)"));

    let err = hooks.filter("calculate::many", [Arg::closure(fsum)]).unwrap_err();
    assert!(err.is_malformed_syntax());

    assert!(!hooks.has_filter("calculate"));
}

#[test]
fn duplicate_filter_name_keeps_original() {
    let hooks = Hooks::default();
    hooks.filter("calculate.sum", [Arg::closure(fsum)]).unwrap();

    let err = hooks.filter("calculate.sum::1", [Arg::closure(fmul)]).unwrap_err();
    assert!(err.is_duplicate_name());

    assert_eq!(hooks.count(HookKind::Filter, "calculate"), 1);
    assert_eq!(hooks.apply("calculate", 10, &[]), Value::Float(25.0));
}

#[test]
fn structured_tag_spec_binds_like_syntax() {
    let hooks = Hooks::default();
    hooks.filter(TagSpec::new("calculate").with_name("sum"), [Arg::closure(fsum)]).unwrap();

    let json = r#"{"tag": "calculate", "name": "pow", "args": 2, "priority": 1}"#;
    let spec: TagSpec = serde_json::from_str(json).unwrap();
    let pow = hooks.filter(&spec, [Arg::closure(fpow)]).unwrap();
    assert_eq!(pow.priority(), 1);
    assert_eq!(pow.accepted_args(), 2);

    // (10^3)+15
    assert_eq!(hooks.apply("calculate", 10, &[Value::Int(3)]), Value::Float(1015.0));
}

#[test]
fn filter_sees_only_accepted_trailing_args() {
    let hooks = Hooks::default();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    hooks
        .filter(
            "collect?2",
            [Arg::closure(move |a| {
                sink.lock().unwrap().push(a.len());
                a[0].clone()
            })],
        )
        .unwrap();

    let out = hooks.apply("collect", "v", &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(out, Value::from("v"));
    assert_eq!(seen.lock().unwrap().as_slice(), [2]);
}
