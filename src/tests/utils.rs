use crate::core::{generate_assignments, Assignment, BayesNet, Factor, Value, Variable};

// Helpers --------------------------------------------------------------------------------

pub(super) fn binary(name: &str, positive: &str) -> Variable {
    Variable::new(name, [positive.to_owned(), format!("-{}", positive)]).unwrap()
}

/// Builds a factor from its table listed in row-major order of the scope
pub(super) fn cpt(name: &str, scope: &[Variable], table: &[f64]) -> Factor {
    let mut factor = Factor::new(name, scope).unwrap();
    let assignments = generate_assignments(scope, &[], &Assignment::new()).unwrap();
    assert_eq!(assignments.len(), table.len());
    factor
        .add_values(assignments.into_iter().zip(table.iter().copied()))
        .unwrap();
    factor
}

pub(super) fn var(net: &BayesNet, name: &str) -> Variable {
    net.variable(name).unwrap().clone()
}

pub(super) fn evidence(net: &BayesNet, observed: &[(&str, &str)]) -> Assignment {
    let mut evidence = Assignment::new();
    for (name, value) in observed {
        evidence.set(&var(net, name), Value::from(*value)).unwrap();
    }
    evidence
}

pub(super) fn assert_close(found: &[f64], expected: &[f64], error: f64) {
    assert_eq!(found.len(), expected.len());
    for (f, e) in found.iter().zip(expected) {
        assert!((f - e).abs() < error, "found {:?}, expected {:?}", found, expected);
    }
}

// Sample networks ------------------------------------------------------------------------

/// A -> B, P(A = a) = 0.3, P(B = b | a) = 0.8, P(B = b | -a) = 0.1
pub(super) fn chain() -> BayesNet {
    let a = binary("A", "a");
    let b = binary("B", "b");
    let fa = cpt("P(A)", &[a.clone()], &[0.3, 0.7]);
    let fb = cpt("P(B|A)", &[b.clone(), a.clone()], &[0.8, 0.1, 0.2, 0.9]);
    BayesNet::new("chain", [a, b], [fa, fb]).unwrap()
}

/// Nine binary variables, A and H feed B, B and G feed C, C and F feed D, C feeds E, B feeds I
pub(super) fn nine_node() -> BayesNet {
    let [a, b, c, d, e, f, g, h, i] =
        ["a", "b", "c", "d", "e", "f", "g", "h", "i"].map(|x| binary(&x.to_uppercase(), x));
    let factors = [
        cpt("P(A)", &[a.clone()], &[0.9, 0.1]),
        cpt(
            "P(B|A,H)",
            &[b.clone(), a.clone(), h.clone()],
            &[1., 0., 0.5, 0.6, 0., 1., 0.5, 0.4],
        ),
        cpt(
            "P(C|B,G)",
            &[c.clone(), b.clone(), g.clone()],
            &[0.9, 0.9, 0.1, 1., 0.1, 0.1, 0.9, 0.],
        ),
        cpt(
            "P(D|C,F)",
            &[d.clone(), c.clone(), f.clone()],
            &[0., 1., 0.7, 0.2, 1., 0., 0.3, 0.8],
        ),
        cpt("P(E|C)", &[e.clone(), c.clone()], &[0.2, 0.4, 0.8, 0.6]),
        cpt("P(F)", &[f.clone()], &[0.1, 0.9]),
        cpt("P(G)", &[g.clone()], &[1., 0.]),
        cpt("P(H)", &[h.clone()], &[0.5, 0.5]),
        cpt("P(I|B)", &[i.clone(), b.clone()], &[0.3, 0.9, 0.7, 0.1]),
    ];
    BayesNet::new("nine node", [a, b, c, d, e, f, g, h, i], factors).unwrap()
}

/// A -> C -> E, (A, B) -> D
pub(super) fn five_node() -> BayesNet {
    let [a, b, c, d, e] = ["a", "b", "c", "d", "e"].map(|x| binary(&x.to_uppercase(), x));
    let factors = [
        cpt("P(A)", &[a.clone()], &[0.3, 0.7]),
        cpt("P(B)", &[b.clone()], &[0.6, 0.4]),
        cpt("P(C|A)", &[c.clone(), a.clone()], &[0.8, 0.4, 0.2, 0.6]),
        cpt(
            "P(D|A,B)",
            &[d.clone(), a.clone(), b.clone()],
            &[0.7, 0.8, 0.1, 0.2, 0.3, 0.2, 0.9, 0.8],
        ),
        cpt("P(E|C)", &[e.clone(), c.clone()], &[0.7, 0.2, 0.3, 0.8]),
    ];
    BayesNet::new("five node", [a, b, c, d, e], factors).unwrap()
}

/// The chest clinic network
pub(super) fn asia() -> BayesNet {
    let visit = Variable::new("Visit_To_Asia", ["visit", "no-visit"]).unwrap();
    let smoking = Variable::new("Smoking", ["smoker", "non-smoker"]).unwrap();
    let tuberculosis = Variable::new("Tuberculosis", ["present", "absent"]).unwrap();
    let cancer = Variable::new("Lung Cancer", ["present", "absent"]).unwrap();
    let bronchitis = Variable::new("Bronchitis", ["present", "absent"]).unwrap();
    let either = Variable::new("Tuberculosis or Lung Cancer", ["true", "false"]).unwrap();
    let dyspnea = Variable::new("Dyspnea", ["present", "absent"]).unwrap();
    let xray = Variable::new("XRay Result", ["abnormal", "normal"]).unwrap();
    let factors = [
        cpt("F1", &[visit.clone()], &[0.01, 0.99]),
        cpt("F2", &[smoking.clone()], &[0.5, 0.5]),
        cpt(
            "F3",
            &[tuberculosis.clone(), visit.clone()],
            &[0.05, 0.01, 0.95, 0.99],
        ),
        cpt("F4", &[cancer.clone(), smoking.clone()], &[0.1, 0.01, 0.9, 0.99]),
        cpt(
            "F5",
            &[bronchitis.clone(), smoking.clone()],
            &[0.6, 0.3, 0.4, 0.7],
        ),
        cpt(
            "F6",
            &[either.clone(), tuberculosis.clone(), cancer.clone()],
            &[1., 1., 1., 0., 0., 0., 0., 1.],
        ),
        cpt(
            "F7",
            &[dyspnea.clone(), either.clone(), bronchitis.clone()],
            &[0.9, 0.7, 0.8, 0.1, 0.1, 0.3, 0.2, 0.9],
        ),
        cpt("F8", &[xray.clone(), either.clone()], &[0.98, 0.05, 0.02, 0.95]),
    ];
    BayesNet::new(
        "Asia",
        [
            visit,
            smoking,
            tuberculosis,
            cancer,
            bronchitis,
            either,
            dyspnea,
            xray,
        ],
        factors,
    )
    .unwrap()
}

/// E and B cause S, S causes G and W
pub(super) fn alarm() -> BayesNet {
    let [e, b, s, g, w] = ["e", "b", "s", "g", "w"].map(|x| binary(&x.to_uppercase(), x));
    let factors = [
        cpt("P(E)", &[e.clone()], &[0.1, 0.9]),
        cpt("P(B)", &[b.clone()], &[0.1, 0.9]),
        cpt(
            "P(S|E,B)",
            &[s.clone(), e.clone(), b.clone()],
            &[0.9, 0.2, 0.8, 0., 0.1, 0.8, 0.2, 1.],
        ),
        cpt("P(G|S)", &[g.clone(), s.clone()], &[0.5, 0., 0.5, 1.]),
        cpt("P(W|S)", &[w.clone(), s.clone()], &[0.8, 0.2, 0.2, 0.8]),
    ];
    BayesNet::new("alarm", [e, b, s, g, w], factors).unwrap()
}
