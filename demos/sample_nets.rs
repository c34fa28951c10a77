//! Prior marginals of every variable of two classic networks, answered in parallel.

use bnve::core::{generate_assignments, Assignment, BayesNet, BayesNetBuilder, Factor, Variable};
use bnve::elimination::{min_fill_ordering, run_queries_parallel, Distribution, Query};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(about = "Marginals of the Asia and alarm networks")]
struct Args {
    /// Observations written as `Variable=value`, ignored for networks without that variable
    #[arg(long = "observe", value_parser = parse_observation)]
    observations: Vec<(String, String)>,

    /// Print results as yaml
    #[arg(long)]
    yaml: bool,
}

fn parse_observation(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected Variable=value, found {}", s))
}

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

// A factor whose table is listed in row-major order of its scope
fn cpt(name: &str, scope: &[&Variable], table: &[f64]) -> DemoResult<Factor> {
    let scope: Vec<Variable> = scope.iter().map(|v| (*v).clone()).collect();
    let mut factor = Factor::new(name, &scope)?;
    let rows = generate_assignments(&scope, &[], &Assignment::new())?;
    factor.add_values(rows.into_iter().zip(table.iter().copied()))?;
    Ok(factor)
}

fn asia() -> DemoResult<BayesNet> {
    let visit = Variable::new("Visit_To_Asia", ["visit", "no-visit"])?;
    let smoking = Variable::new("Smoking", ["smoker", "non-smoker"])?;
    let tuberculosis = Variable::new("Tuberculosis", ["present", "absent"])?;
    let cancer = Variable::new("Lung Cancer", ["present", "absent"])?;
    let bronchitis = Variable::new("Bronchitis", ["present", "absent"])?;
    let either = Variable::new("Tuberculosis or Lung Cancer", ["true", "false"])?;
    let dyspnea = Variable::new("Dyspnea", ["present", "absent"])?;
    let xray = Variable::new("XRay Result", ["abnormal", "normal"])?;

    let mut builder = BayesNetBuilder::with_capacity("Asia", 8, 8);
    let variables = [
        &visit,
        &smoking,
        &tuberculosis,
        &cancer,
        &bronchitis,
        &either,
        &dyspnea,
        &xray,
    ];
    for variable in variables {
        builder.add_variable(variable.clone())?;
    }
    builder
        .add_factor(cpt("F1", &[&visit], &[0.01, 0.99])?)?
        .add_factor(cpt("F2", &[&smoking], &[0.5, 0.5])?)?
        .add_factor(cpt("F3", &[&tuberculosis, &visit], &[0.05, 0.01, 0.95, 0.99])?)?
        .add_factor(cpt("F4", &[&cancer, &smoking], &[0.1, 0.01, 0.9, 0.99])?)?
        .add_factor(cpt("F5", &[&bronchitis, &smoking], &[0.6, 0.3, 0.4, 0.7])?)?
        .add_factor(cpt(
            "F6",
            &[&either, &tuberculosis, &cancer],
            &[1., 1., 1., 0., 0., 0., 0., 1.],
        )?)?
        .add_factor(cpt(
            "F7",
            &[&dyspnea, &either, &bronchitis],
            &[0.9, 0.7, 0.8, 0.1, 0.1, 0.3, 0.2, 0.9],
        )?)?
        .add_factor(cpt("F8", &[&xray, &either], &[0.98, 0.05, 0.02, 0.95])?)?;
    Ok(builder.build())
}

fn alarm() -> DemoResult<BayesNet> {
    let [e, b, s, g, w] = ["E", "B", "S", "G", "W"].map(|name| {
        let positive = name.to_lowercase();
        Variable::new(name, [positive.clone(), format!("-{}", positive)])
    });
    let (e, b, s, g, w) = (e?, b?, s?, g?, w?);
    let factors = [
        cpt("P(E)", &[&e], &[0.1, 0.9])?,
        cpt("P(B)", &[&b], &[0.1, 0.9])?,
        cpt("P(S|E,B)", &[&s, &e, &b], &[0.9, 0.2, 0.8, 0., 0.1, 0.8, 0.2, 1.])?,
        cpt("P(G|S)", &[&g, &s], &[0.5, 0., 0.5, 1.])?,
        cpt("P(W|S)", &[&w, &s], &[0.8, 0.2, 0.2, 0.8])?,
    ];
    Ok(BayesNet::new("alarm", [e, b, s, g, w], factors)?)
}

fn main() -> DemoResult<()> {
    env_logger::init();
    let args = Args::parse();
    for net in [asia()?, alarm()?] {
        let mut evidence = Assignment::new();
        for (name, value) in &args.observations {
            if let Some(variable) = net.variable(name) {
                evidence.set(variable, value.as_str())?;
            }
        }
        info!("{}: {} observed variables", net.name(), evidence.len());
        let queries: Vec<Query> = net
            .variables()
            .iter()
            .map(|v| Query::new(v, evidence.clone()))
            .collect();
        let answers = run_queries_parallel(&net, &queries, &min_fill_ordering);
        let mut distributions = Vec::with_capacity(answers.len());
        for (query, answer) in queries.iter().zip(answers) {
            distributions.push(Distribution::new(&query.variable, answer?));
        }
        if args.yaml {
            println!("# {}", net.name());
            print!("{}", serde_yaml::to_string(&distributions)?);
        } else {
            println!("{}", net.name());
            for distribution in &distributions {
                println!("  {}", distribution);
            }
        }
    }
    Ok(())
}
