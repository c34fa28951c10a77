use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::Uniform;
use test_log::test;

use super::utils::assert_close;
use crate::{
    core::{generate_index_assignments, Assignment, BayesNet, Factor, Variable},
    elimination::{fixed_ordering, min_fill_ordering, variable_elimination},
};

// A random DAG where every node has up to `max_parents` parents among the previous nodes
fn gen_random_network(rng: &mut impl Rng, nodes_number: usize, max_parents: usize) -> BayesNet {
    let weights = Uniform::new(0.05f64, 1f64);
    let mut variables: Vec<Variable> = Vec::with_capacity(nodes_number);
    let mut factors = Vec::with_capacity(nodes_number);
    for node in 0..nodes_number {
        let domain_size: i64 = rng.gen_range(2..=3);
        let variable = Variable::new(format!("X{}", node), 0..domain_size).unwrap();
        let parents_number = rng.gen_range(0..=max_parents.min(node));
        let mut scope = vec![variable.clone()];
        scope.extend(variables.choose_multiple(rng, parents_number).cloned());
        let mut factor = Factor::new(format!("P(X{})", node), &scope).unwrap();
        // rows of a CPT are normalized over the child for every parents configuration
        let parents = &scope[1..];
        let parents_assignments =
            generate_index_assignments(parents, &[], &Assignment::new()).unwrap();
        for parents_assignment in parents_assignments {
            let column: Vec<f64> = (0..domain_size).map(|_| rng.sample(weights)).collect();
            let total: f64 = column.iter().sum();
            let mut context = Assignment::new();
            for (parent, index) in parents.iter().zip(&parents_assignment) {
                context.set_index(parent, *index).unwrap();
            }
            for (index, weight) in column.iter().enumerate() {
                context.set_index(&variable, index).unwrap();
                factor
                    .add_value_at_current_assignment(&context, weight / total)
                    .unwrap();
            }
        }
        variables.push(variable);
        factors.push(factor);
    }
    BayesNet::new("random", variables, factors).unwrap()
}

// Posterior by summing the full joint distribution
fn brute_force(net: &BayesNet, query: &Variable, evidence: &Assignment) -> Vec<f64> {
    let variables = net.variables();
    let query_position = variables.iter().position(|v| v == query).unwrap();
    let mut distribution = vec![0f64; query.domain_size()];
    for joint in generate_index_assignments(variables, &[], &Assignment::new()).unwrap() {
        let consistent = variables
            .iter()
            .zip(&joint)
            .all(|(v, i)| evidence.get_index(v).map_or(true, |e| e == *i));
        if !consistent {
            continue;
        }
        let mut context = Assignment::new();
        for (variable, index) in variables.iter().zip(&joint) {
            context.set_index(variable, *index).unwrap();
        }
        let probability: f64 = net
            .factors()
            .iter()
            .map(|f| f.get_value_at_current_assignments(&context).unwrap())
            .product();
        distribution[joint[query_position]] += probability;
    }
    let total: f64 = distribution.iter().sum();
    distribution.iter().map(|p| p / total).collect()
}

#[test]
fn random_networks_against_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let net = gen_random_network(&mut rng, 7, 3);
        for query in net.variables() {
            let mut evidence = Assignment::new();
            for other in net.variables().iter().filter(|v| *v != query) {
                if rng.gen_bool(0.3) {
                    let index = rng.gen_range(0..other.domain_size());
                    evidence.set_index(other, index).unwrap();
                }
            }
            let exact = brute_force(&net, query, &evidence);
            let answer = variable_elimination(&net, query, &evidence, &min_fill_ordering).unwrap();
            assert_eq!(answer.len(), query.domain_size());
            assert!((answer.iter().sum::<f64>() - 1f64).abs() < 1e-9);
            assert_close(&answer, &exact, 1e-9);
        }
    }
}

#[test]
fn random_orderings_give_the_same_answer() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let net = gen_random_network(&mut rng, 8, 2);
        let query = net.variables().choose(&mut rng).unwrap().clone();
        let reference =
            variable_elimination(&net, &query, &Assignment::new(), &min_fill_ordering).unwrap();
        for _ in 0..5 {
            let mut order = net.variables().to_vec();
            order.shuffle(&mut rng);
            let answer =
                variable_elimination(&net, &query, &Assignment::new(), &fixed_ordering(order))
                    .unwrap();
            assert_close(&answer, &reference, 1e-9);
        }
    }
}
