use test_log::test;

use crate::core::{
    generate_assignments, generate_index_assignments, Assignment, DomainError, FactorError, Value,
    Variable,
};

#[test]
fn assignment_context() {
    let a = Variable::new("A", ["a", "-a"]).unwrap();
    let b = Variable::new("B", [1, 2, 3]).unwrap();
    let mut context = Assignment::new();
    assert!(context.is_empty());
    context.set(&a, "-a").unwrap();
    context.set_index(&b, 2).unwrap();
    assert_eq!(context.len(), 2);
    assert_eq!(context.get(&a), Some(&Value::from("-a")));
    assert_eq!(context.get(&b), Some(&Value::from(3)));
    assert_eq!(context.get_index(&a), Some(1));
    // overwrite
    context.set(&b, 1).unwrap();
    assert_eq!(context.get_index(&b), Some(0));
    assert!(matches!(
        context.set_index(&b, 3),
        Err(DomainError::IndexOutOfRange { index: 3, size: 3, .. })
    ));
    assert!(context.set(&a, "b").is_err());
    assert_eq!(context.get(&a), Some(&Value::from("-a")));
    assert_eq!(context.remove(&a), Some(1));
    assert!(!context.contains(&a));
    assert!(context.contains_id(b.id()));
    context.clear();
    assert!(context.is_empty());
}

#[test]
fn assigned_variables_are_named() {
    let a = Variable::new("Anorexic", [true, false]).unwrap();
    let b = Variable::new("Blood", ["Optimal", "Imbalanced"]).unwrap();
    let mut context = Assignment::new().with(&a, true).unwrap();
    context.set_index(&b, 1).unwrap();
    assert_eq!(context.name(a.id()), Some("Anorexic"));
    assert_eq!(context.name(b.id()), Some("Blood"));
    context.remove(&a);
    assert_eq!(context.name(a.id()), None);
    context.clear();
    assert_eq!(context.name(b.id()), None);
}

#[test]
fn evidence_and_scratch_contexts_are_independent() {
    let a = Variable::new("A", ["a", "-a"]).unwrap();
    let evidence = Assignment::new().with(&a, "a").unwrap();
    let scratch = Assignment::new().with(&a, "-a").unwrap();
    assert_eq!(evidence.get(&a), Some(&Value::from("a")));
    assert_eq!(scratch.get(&a), Some(&Value::from("-a")));
}

#[test]
fn full_cartesian_product_last_varies_fastest() {
    let a = Variable::new("A", [1, 2, 3]).unwrap();
    let b = Variable::new("B", ["a", "b"]).unwrap();
    let c = Variable::new("C", ["heavy", "light"]).unwrap();
    let scope = [a, b, c];
    let assignments = generate_index_assignments(&scope, &[], &Assignment::new()).unwrap();
    assert_eq!(assignments.len(), 12);
    assert_eq!(assignments[0], vec![0, 0, 0]);
    assert_eq!(assignments[1], vec![0, 0, 1]);
    assert_eq!(assignments[2], vec![0, 1, 0]);
    assert_eq!(assignments[11], vec![2, 1, 1]);
    let values = generate_assignments(&scope, &[], &Assignment::new()).unwrap();
    // 1 * (2 * 2) + 1 * 2 + 1
    assert_eq!(
        values[7],
        vec![Value::from(2), Value::from("b"), Value::from("light")]
    );
    assert_eq!(
        values[5],
        vec![Value::from(2), Value::from("a"), Value::from("light")]
    );
}

#[test]
fn pinned_variables_take_one_value() {
    let a = Variable::new("A", ["a", "-a"]).unwrap();
    let b = Variable::new("B", ["b", "-b"]).unwrap();
    let h = Variable::new("H", ["h", "-h"]).unwrap();
    let outside = Variable::new("X", ["x", "-x"]).unwrap();
    let source = Assignment::new()
        .with(&a, "-a")
        .unwrap()
        .with(&outside, "x")
        .unwrap();
    let scope = [b.clone(), a.clone(), h.clone()];
    let assignments = generate_assignments(&scope, &[a, outside], &source).unwrap();
    let expected: Vec<Vec<Value>> = [
        ["b", "-a", "h"],
        ["b", "-a", "-h"],
        ["-b", "-a", "h"],
        ["-b", "-a", "-h"],
    ]
    .iter()
    .map(|t| t.iter().map(|v| Value::from(*v)).collect())
    .collect();
    assert_eq!(assignments, expected);
}

#[test]
fn empty_scope_has_one_assignment() {
    let assignments = generate_index_assignments(&[], &[], &Assignment::new()).unwrap();
    assert_eq!(assignments, vec![Vec::<usize>::new()]);
}

#[test]
fn pinned_variable_without_value() {
    let a = Variable::new("A", ["a", "-a"]).unwrap();
    let result = generate_index_assignments(&[a.clone()], &[a], &Assignment::new());
    assert_eq!(result, Err(FactorError::Unassigned("A".to_owned())));
}

#[test]
fn regeneration_is_repeatable() {
    let a = Variable::new("A", [0, 1, 2]).unwrap();
    let b = Variable::new("B", [0, 1]).unwrap();
    let scope = [a, b];
    let first = generate_assignments(&scope, &[], &Assignment::new()).unwrap();
    let second = generate_assignments(&scope, &[], &Assignment::new()).unwrap();
    assert_eq!(first, second);
}
