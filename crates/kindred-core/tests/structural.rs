//! Clone, merge and the standard members built on them.

use kindred_core::{NativeKind, Registry, RuntimeError, TypeObject, Value};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn nums(ns: &[i32]) -> Value {
    Value::list(ns.iter().map(|&n| Value::from(n)).collect())
}

fn field(v: &Value, key: &str) -> Value {
    v.field(key).unwrap_or(Value::Null)
}

fn object_static(r: &Registry, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    r.call_static(r.native(NativeKind::Object), name, args)
}

// ─── clone_value ─────────────────────────────────────────────────────────────

#[test]
fn clone_is_deep_for_arrays_and_objects() {
    let r = Registry::standard();
    let inner = Value::record([("n", Value::from(1))]);
    let source = Value::record([
        ("inner", inner.clone()),
        ("list", Value::list(vec![nums(&[1, 2]), Value::from("x")])),
    ]);

    let copy = r.clone_value(&source);
    assert_eq!(copy, source);
    assert!(!copy.same(&source));
    assert!(!field(&copy, "inner").same(&inner));

    inner.set_field("n", Value::from(99));
    assert_eq!(field(&field(&copy, "inner"), "n"), Value::from(1));

    if let Value::List(items) = field(&source, "list") {
        items.borrow_mut().push(Value::from(3));
    }
    assert_eq!(r.call_method(&field(&copy, "list"), "join", &[]), Ok(Value::from("1,2,x")));
}

#[test]
fn clone_returns_other_tags_by_reference() {
    let r = Registry::standard();
    let f = Value::function("f", |_, _, _| Ok(Value::Null));
    assert!(r.clone_value(&f).same(&f));

    let w = TypeObject::new("Widget");
    r.define_type(Some("Widget"), Some(&w));
    let item = Value::instance(&w, [("size", Value::from(3))]);
    assert!(r.clone_value(&item).same(&item));

    assert_eq!(r.clone_value(&Value::from("s")), Value::from("s"));
    assert_eq!(r.clone_value(&Value::Null), Value::Null);
}

#[test]
fn untagged_instances_clone_like_objects() {
    let r = Registry::standard();
    let plain = TypeObject::new("Plain");
    let item = Value::instance(&plain, [("v", Value::list(vec![Value::from(1)]))]);
    let copy = r.clone_value(&item);
    assert!(!copy.same(&item));
    assert!(r.is_instance(&copy, &plain));
    assert!(!field(&copy, "v").same(&field(&item, "v")));
}

// ─── merge ───────────────────────────────────────────────────────────────────

#[test]
fn merge_combines_nested_objects_in_place() {
    let r = Registry::standard();
    let nested = Value::record([("a", Value::from(1)), ("b", Value::from(2))]);
    let dest = Value::record([("cfg", nested.clone()), ("keep", Value::from(true))]);
    let src = Value::record([("cfg", Value::record([("b", Value::from(3)), ("c", Value::from(4))]))]);

    let out = r.merge(&dest, &[src]);
    assert!(out.same(&dest));
    assert!(field(&dest, "cfg").same(&nested));
    assert_eq!(
        nested,
        Value::record([("a", Value::from(1)), ("b", Value::from(3)), ("c", Value::from(4))])
    );
    assert_eq!(field(&dest, "keep"), Value::from(true));
}

#[test]
fn merge_clones_incoming_objects_and_arrays() {
    let r = Registry::standard();
    let list = nums(&[1, 2]);
    let obj = Value::record([("x", Value::from(1))]);
    let dest = Value::record([("list", Value::from("old")), ("obj", Value::from(0))]);
    r.merge(&dest, &[Value::record([("list", list.clone()), ("obj", obj.clone())])]);

    assert_eq!(field(&dest, "list"), list);
    assert!(!field(&dest, "list").same(&list));
    assert_eq!(field(&dest, "obj"), obj);
    assert!(!field(&dest, "obj").same(&obj));
}

#[test]
fn merge_overwrites_with_other_values() {
    let r = Registry::standard();
    let dest = Value::record([("a", Value::record([("deep", Value::from(1))]))]);
    r.merge(&dest, &[Value::record([("a", Value::from("flat"))])]);
    assert_eq!(field(&dest, "a"), Value::from("flat"));
}

#[test]
fn later_sources_win() {
    let r = Registry::standard();
    let dest = Value::empty_record();
    let a = Value::record([("k", Value::from(1)), ("only_a", Value::from(true))]);
    let b = Value::record([("k", Value::from(2))]);
    r.merge(&dest, &[a, b]);
    assert_eq!(field(&dest, "k"), Value::from(2));
    assert_eq!(field(&dest, "only_a"), Value::from(true));
}

#[test]
fn merge_key_sets_a_single_slot() {
    let r = Registry::standard();
    let dest = Value::record([("opts", Value::record([("a", Value::from(1))]))]);
    r.merge_key(&dest, "opts", &Value::record([("b", Value::from(2))]));
    r.merge_key(&dest, "name", &Value::from("n"));
    assert_eq!(
        dest,
        Value::record([
            ("opts", Value::record([("a", Value::from(1)), ("b", Value::from(2))])),
            ("name", Value::from("n")),
        ])
    );
}

#[test]
fn instances_are_merged_into_when_untagged() {
    let r = Registry::standard();
    let plain = TypeObject::new("Plain");
    let target = Value::instance(&plain, [("a", Value::from(1))]);
    let dest = Value::record([("target", target.clone())]);
    r.merge(&dest, &[Value::record([("target", Value::record([("b", Value::from(2))]))])]);
    assert!(field(&dest, "target").same(&target));
    assert_eq!(field(&target, "b"), Value::from(2));
}

// ─── Object statics ──────────────────────────────────────────────────────────

#[test]
fn object_statics_dispatch_both_merge_forms() {
    let r = Registry::standard();
    let dest = Value::empty_record();
    object_static(&r, "merge", &[dest.clone(), Value::record([("a", Value::from(1))])]).unwrap();
    object_static(&r, "merge", &[dest.clone(), Value::from("b"), Value::from(2)]).unwrap();
    assert_eq!(dest, Value::record([("a", Value::from(1)), ("b", Value::from(2))]));

    let copy = object_static(&r, "clone", &[dest.clone()]).unwrap();
    assert_eq!(copy, dest);
    assert!(!copy.same(&dest));
}

#[test]
fn object_each_visits_entries_in_order() {
    let r = Registry::standard();
    let seen = Value::list(vec![]);
    let sink = seen.clone();
    let visit = Value::function("visit", move |reg, _, args| {
        let pair = format!("{}={}", args[1], args[0]);
        reg.call_method(&sink, "push", &[Value::from(pair)])
    });
    let obj = Value::record([("b", Value::from(2)), ("a", Value::from(1))]);
    object_static(&r, "each", &[obj, visit]).unwrap();
    assert_eq!(r.call_method(&seen, "join", &[Value::from(";")]), Ok(Value::from("b=2;a=1")));
}

// ─── Standard members ────────────────────────────────────────────────────────

#[test]
fn array_members_follow_host_semantics() {
    let r = Registry::standard();
    let list = nums(&[1, 2, 3, 4]);
    let double = Value::function("double", |_, _, args| {
        Ok(Value::from(args[0].as_number().unwrap_or(0.0) * 2.0))
    });
    let even = Value::function("even", |_, _, args| {
        Ok(Value::from(args[0].as_number().is_some_and(|n| n % 2.0 == 0.0)))
    });
    let add = Value::function("add", |_, _, args| {
        Ok(Value::from(args[0].as_number().unwrap_or(0.0) + args[1].as_number().unwrap_or(0.0)))
    });

    assert_eq!(r.call_method(&list, "map", &[double]), Ok(nums(&[2, 4, 6, 8])));
    assert_eq!(r.call_method(&list, "filter", &[even.clone()]), Ok(nums(&[2, 4])));
    assert_eq!(r.call_method(&list, "some", &[even.clone()]), Ok(Value::from(true)));
    assert_eq!(r.call_method(&list, "every", &[even]), Ok(Value::from(false)));
    assert_eq!(r.call_method(&list, "reduce", &[add.clone()]), Ok(Value::from(10)));
    assert_eq!(r.call_method(&nums(&[]), "reduce", &[add.clone(), Value::from(7)]), Ok(Value::from(7)));
    assert!(r.call_method(&nums(&[]), "reduce", &[add]).is_err());
    assert_eq!(r.call_method(&list, "slice", &[Value::from(-2)]), Ok(nums(&[3, 4])));
    assert_eq!(r.call_method(&list, "index_of", &[Value::from(3)]), Ok(Value::from(2)));
    assert_eq!(r.call_method(&list, "index_of", &[Value::from(9)]), Ok(Value::from(-1)));

    assert_eq!(r.call_method(&list, "push", &[Value::from(5)]), Ok(Value::from(5)));
    assert_eq!(r.call_method(&list, "shift", &[]), Ok(Value::from(1)));
    assert_eq!(r.call_method(&list, "join", &[Value::from("-")]), Ok(Value::from("2-3-4-5")));
}

#[test]
fn array_each_returns_the_receiver() {
    let r = Registry::standard();
    let list = nums(&[1, 2]);
    let total = Value::list(vec![]);
    let sink = total.clone();
    let collect = Value::function("collect", move |reg, _, args| {
        reg.call_method(&sink, "push", &[args[1].clone()])
    });
    let out = r.call_method(&list, "each", &[collect]).unwrap();
    assert!(out.same(&list));
    assert_eq!(total, nums(&[0, 1]));
}

#[test]
fn array_clone_member_is_deep() {
    let r = Registry::standard();
    let inner = nums(&[1]);
    let list = Value::list(vec![inner.clone()]);
    let copy = r.call_method(&list, "clone", &[]).unwrap();
    assert_eq!(copy, list);
    if let Value::List(items) = &copy {
        assert!(!items.borrow()[0].same(&inner));
    }
}

#[test]
fn string_members_count_characters() {
    let r = Registry::standard();
    let s = Value::from("héllo wörld");
    assert_eq!(r.call_method(&s, "index_of", &[Value::from("w")]), Ok(Value::from(6)));
    assert_eq!(r.call_method(&s, "slice", &[Value::from(1), Value::from(4)]), Ok(Value::from("éll")));
    assert_eq!(r.call_method(&s, "char_at", &[Value::from(7)]), Ok(Value::from("ö")));
    assert_eq!(
        r.call_method(&Value::from("a,b"), "split", &[Value::from(",")]),
        Ok(Value::list(vec![Value::from("a"), Value::from("b")]))
    );
    assert_eq!(r.call_method(&Value::from("  x "), "trim", &[]), Ok(Value::from("x")));
}

#[test]
fn function_call_and_apply_bind_the_receiver() {
    let r = Registry::standard();
    let show = Value::function("show", |_, this, args| {
        Ok(Value::from(format!("{this}:{}", args.len())))
    });
    assert_eq!(
        r.call_method(&show, "call", &[Value::from("me"), Value::from(1), Value::from(2)]),
        Ok(Value::from("me:2"))
    );
    assert_eq!(
        r.call_method(&show, "apply", &[Value::from("you"), nums(&[1, 2, 3])]),
        Ok(Value::from("you:3"))
    );
}

#[test]
fn wrong_receiver_is_a_bad_argument() {
    let r = Registry::standard();
    let array = r.native(NativeKind::Array).clone();
    let err = r.call_static(&array, "push", &[Value::from("not a list")]).unwrap_err();
    assert!(matches!(err, RuntimeError::BadArgument { .. }));
}

// ─── Conversions ─────────────────────────────────────────────────────────────

#[test]
fn from_statics_convert_between_kinds() {
    let r = Registry::standard();
    let array = r.native(NativeKind::Array).clone();
    let number = r.native(NativeKind::Number).clone();
    let string = r.native(NativeKind::String).clone();
    let function = r.native(NativeKind::Function).clone();

    assert_eq!(r.call_static(&array, "from", &[Value::Null]), Ok(nums(&[])));
    assert_eq!(r.call_static(&array, "from", &[Value::from(1)]), Ok(nums(&[1])));
    let like = Value::record([("0", Value::from("a")), ("1", Value::from("b")), ("length", Value::from(2))]);
    assert_eq!(
        r.call_static(&array, "from", &[like]),
        Ok(Value::list(vec![Value::from("a"), Value::from("b")]))
    );

    assert_eq!(r.call_static(&number, "from", &[Value::from("12.5px")]), Ok(Value::from(12.5)));
    assert_eq!(r.call_static(&number, "from", &[Value::from("px")]), Ok(Value::Null));
    assert_eq!(r.call_static(&string, "from", &[nums(&[1, 2])]), Ok(Value::from("1,2")));

    let constant = r.call_static(&function, "from", &[Value::from(4)]).unwrap();
    assert_eq!(r.call_method(&constant, "call", &[Value::Null]), Ok(Value::from(4)));
}

#[test]
fn array_from_bounds_oversized_lengths() {
    let r = Registry::standard();
    let array = r.native(NativeKind::Array).clone();
    let sparse = Value::record([("0", Value::from("a")), ("length", Value::from(1e9))]);
    assert_eq!(
        r.call_static(&array, "from", &[sparse]),
        Ok(Value::list(vec![Value::from("a"), Value::Null]))
    );

    let beyond = Value::record([("length", Value::from(1e10))]);
    assert_eq!(r.call_static(&array, "from", &[beyond.clone()]), Ok(Value::list(vec![beyond])));
}

#[test]
fn large_integers_stringify_exactly() {
    let r = Registry::standard();
    let string = r.native(NativeKind::String).clone();
    assert_eq!(r.call_static(&string, "from", &[Value::from(1e20)]), Ok(Value::from("100000000000000000000")));
    assert_eq!(
        r.call_method(&Value::list(vec![Value::from(1e20), Value::from(2)]), "join", &[]),
        Ok(Value::from("100000000000000000000,2"))
    );
}

// ─── Remaining natives ───────────────────────────────────────────────────────

#[test]
fn array_sort_splice_and_reduce_right() {
    let r = Registry::standard();
    let list = Value::list(vec![Value::from(10), Value::Null, Value::from(9), Value::from(1)]);
    assert!(r.call_method(&list, "sort", &[]).unwrap().same(&list));
    assert_eq!(list, Value::list(vec![Value::from(1), Value::from(10), Value::from(9), Value::Null]));

    let numeric = nums(&[10, 9, 1]);
    let ascending = Value::function("ascending", |_, _, args| {
        Ok(Value::from(args[0].as_number().unwrap_or(0.0) - args[1].as_number().unwrap_or(0.0)))
    });
    r.call_method(&numeric, "sort", &[ascending]).unwrap();
    assert_eq!(numeric, nums(&[1, 9, 10]));

    let letters = Value::list(vec![Value::from("a"), Value::from("b"), Value::from("c"), Value::from("d")]);
    let removed = r.call_method(&letters, "splice", &[Value::from(1), Value::from(2), Value::from("x")]);
    assert_eq!(removed, Ok(Value::list(vec![Value::from("b"), Value::from("c")])));
    assert_eq!(letters, Value::list(vec![Value::from("a"), Value::from("x"), Value::from("d")]));
    assert_eq!(r.call_method(&letters, "splice", &[Value::from(-1)]), Ok(Value::list(vec![Value::from("d")])));

    let concat = Value::function("concat", |_, _, args| Ok(Value::from(format!("{}{}", args[0], args[1]))));
    assert_eq!(r.call_method(&nums(&[1, 2, 3]), "reduce_right", &[concat]), Ok(Value::from("321")));
}

#[test]
fn sort_comparator_errors_propagate() {
    let r = Registry::standard();
    let list = nums(&[2, 1]);
    let broken = Value::function("broken", |_, _, _| Err(RuntimeError::NotCallable("x".into())));
    assert!(r.call_method(&list, "sort", &[broken]).is_err());
    assert_eq!(list, nums(&[2, 1]));
}

#[test]
fn string_search_and_substrings() {
    let r = Registry::standard();
    let s = Value::from("héllo");
    assert_eq!(r.call_method(&s, "char_code_at", &[Value::from(1)]), Ok(Value::from(233)));
    let missing = r.call_method(&s, "char_code_at", &[Value::from(9)]).unwrap();
    assert!(missing.as_number().is_some_and(f64::is_nan));
    assert_eq!(r.call_method(&s, "search", &[Value::from("ll")]), Ok(Value::from(2)));
    assert_eq!(r.call_method(&s, "substr", &[Value::from(-3), Value::from(2)]), Ok(Value::from("ll")));
    assert_eq!(r.call_method(&s, "substring", &[Value::from(4), Value::from(1)]), Ok(Value::from("éll")));
    assert_eq!(r.call_method(&s, "substring", &[Value::from(-2)]), Ok(Value::from("héllo")));

    let ab = Value::from("a-b-a");
    assert_eq!(r.call_method(&ab, "replace", &[Value::from("a"), Value::from("z")]), Ok(Value::from("z-b-a")));
    let shout = Value::function("shout", |_, _, args| Ok(Value::from(args[0].to_string().to_uppercase())));
    assert_eq!(r.call_method(&ab, "replace", &[Value::from("b"), shout]), Ok(Value::from("a-B-a")));
}

#[test]
fn number_exponent_and_locale() {
    let r = Registry::standard();
    let n = Value::from(1234.5);
    assert_eq!(r.call_method(&n, "to_exponential", &[Value::from(2)]), Ok(Value::from("1.23e+3")));
    assert_eq!(r.call_method(&n, "to_exponential", &[]), Ok(Value::from("1.2345e+3")));
    assert_eq!(r.call_method(&n, "to_locale_string", &[]), Ok(Value::from("1,234.5")));
}

#[test]
fn added_natives_are_protected_with_generics() {
    let r = Registry::standard();
    let string = r.native(NativeKind::String).clone();
    for name in ["char_code_at", "replace", "search", "substr", "substring"] {
        assert!(string.instance_member(name).is_some_and(|m| m.protected), "{name}");
        assert!(string.static_member(name).is_some_and(|m| m.protected), "{name}");
    }
    assert_eq!(
        r.call_static(&string, "substring", &[Value::from("kindred"), Value::from(0), Value::from(4)]),
        Ok(Value::from("kind"))
    );
}

#[test]
fn date_now_reports_epoch_milliseconds() {
    let r = Registry::standard();
    let date = r.type_of_tag("Date").expect("Date registered");
    let now = r.call_static(&date, "now", &[]).unwrap();
    assert!(now.as_number().is_some_and(|ms| ms > 1.5e12));
}
