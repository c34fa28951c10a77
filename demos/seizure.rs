//! Diagnosis of a grand mal seizure with a 13 variable Bayes net.
//!
//! Run with `cargo run --example seizure -- --format yaml` and
//! `RUST_LOG=debug` to see the elimination steps.

use bnve::core::{Assignment, BayesNet, Factor, Value, Variable};
use bnve::elimination::{fixed_ordering, min_fill_ordering, posterior, Distribution, VEResult};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Ordering {
    /// Min-fill heuristic
    MinFill,
    /// Variables in order of declaration
    Declaration,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(about = "Sample diagnosis queries on a seizure detection network")]
struct Args {
    /// Elimination ordering
    #[arg(long, value_enum, default_value_t = Ordering::MinFill)]
    ordering: Ordering,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn v(value: impl Into<Value>) -> Value {
    value.into()
}

struct Seizure {
    net: BayesNet,
    gb: Variable,
    an: Variable,
    md: Variable,
    tr: Variable,
    er: Variable,
    ns: Variable,
    tm: Variable,
    bq: Variable,
    eeg_amp: Variable,
    eeg_sig: Variable,
    emg: Variable,
    se: Variable,
}

fn build() -> Result<Seizure, Box<dyn std::error::Error>> {
    // variables -----------------------------------------------------------------------------
    // genetic bias towards the disease
    let gb = Variable::new("Genetic_Bias", ["Present", "Absent"])?;
    let an = Variable::new("Anorexic", [true, false])?;
    // medicine causing chemical imbalance in blood
    let md = Variable::new("Medicine", ["Present", "Absent"])?;
    let bv = Variable::new("BV_Malformation", ["Present", "Absent"])?;
    // electrolyte and glucose balance
    let bq = Variable::new("Blood", ["Optimal", "Imbalanced"])?;
    let tm = Variable::new("Tumors", [true, false])?;
    // previous brain trauma
    let tr = Variable::new("Trauma", [true, false])?;
    let er = Variable::new("Error_EMG", ["10%", "25%+"])?;
    let ns = Variable::new("Error_EEG", ["10%", "25%+"])?;
    let se = Variable::new("Seizure", [true, false])?;
    let eeg_amp = Variable::new("EEG_Amp", ["~150", "1000+"])?;
    let eeg_sig = Variable::new("EEG_Period", ["Periodic", "Aperiodic"])?;
    let mut emg = Variable::new("EMG", ["Periodic_convulsion", "Normal"])?;
    emg.add_domain_values(["Sustained_contraction"])?;

    // priors --------------------------------------------------------------------------------
    let mut fgb = Factor::new("P(GB)", &[gb.clone()])?;
    fgb.add_values([([v("Present")], 0.1), ([v("Absent")], 0.9)])?;
    let mut fan = Factor::new("P(AN)", &[an.clone()])?;
    fan.add_values([([v(true)], 0.1), ([v(false)], 0.9)])?;
    let mut fmd = Factor::new("P(MD)", &[md.clone()])?;
    fmd.add_values([([v("Present")], 0.2), ([v("Absent")], 0.8)])?;
    let mut ftr = Factor::new("P(TR)", &[tr.clone()])?;
    ftr.add_values([([v(true)], 0.1), ([v(false)], 0.9)])?;
    let mut fer = Factor::new("P(ER)", &[er.clone()])?;
    fer.add_values([([v("10%")], 0.8), ([v("25%+")], 0.2)])?;
    let mut fns = Factor::new("P(NS)", &[ns.clone()])?;
    fns.add_values([([v("10%")], 0.8), ([v("25%+")], 0.2)])?;

    // conditional probability tables --------------------------------------------------------
    let mut fbv = Factor::new("P(BV|GB)", &[bv.clone(), gb.clone()])?;
    fbv.add_values([
        ([v("Present"), v("Present")], 0.6),
        ([v("Present"), v("Absent")], 0.5),
        ([v("Absent"), v("Present")], 0.4),
        ([v("Absent"), v("Absent")], 0.5),
    ])?;
    let mut ftm = Factor::new("P(TM|GB,BV)", &[tm.clone(), bv.clone(), gb.clone()])?;
    ftm.add_values([
        ([v(true), v("Present"), v("Present")], 0.7),
        ([v(true), v("Present"), v("Absent")], 0.6),
        ([v(true), v("Absent"), v("Present")], 0.7),
        ([v(true), v("Absent"), v("Absent")], 0.4),
        ([v(false), v("Present"), v("Present")], 0.3),
        ([v(false), v("Present"), v("Absent")], 0.4),
        ([v(false), v("Absent"), v("Present")], 0.3),
        ([v(false), v("Absent"), v("Absent")], 0.6),
    ])?;
    let mut fbq = Factor::new("P(BQ|AN,MD)", &[bq.clone(), an.clone(), md.clone()])?;
    fbq.add_values([
        ([v("Optimal"), v(true), v("Present")], 0.1),
        ([v("Optimal"), v(true), v("Absent")], 0.3),
        ([v("Optimal"), v(false), v("Present")], 0.3),
        ([v("Optimal"), v(false), v("Absent")], 0.8),
        ([v("Imbalanced"), v(true), v("Present")], 0.9),
        ([v("Imbalanced"), v(true), v("Absent")], 0.7),
        ([v("Imbalanced"), v(false), v("Present")], 0.7),
        ([v("Imbalanced"), v(false), v("Absent")], 0.2),
    ])?;
    let mut famp = Factor::new("P(EEG_AMP|SE,NS)", &[eeg_amp.clone(), se.clone(), ns.clone()])?;
    famp.add_values([
        ([v("~150"), v(true), v("10%")], 0.),
        ([v("~150"), v(true), v("25%+")], 0.1),
        ([v("~150"), v(false), v("10%")], 1.),
        ([v("~150"), v(false), v("25%+")], 0.7),
        ([v("1000+"), v(true), v("10%")], 1.),
        ([v("1000+"), v(true), v("25%+")], 0.9),
        ([v("1000+"), v(false), v("10%")], 0.),
        ([v("1000+"), v(false), v("25%+")], 0.3),
    ])?;
    let mut fsig = Factor::new("P(EEG_SIG|SE,NS)", &[eeg_sig.clone(), se.clone(), ns.clone()])?;
    fsig.add_values([
        ([v("Periodic"), v(true), v("10%")], 0.),
        ([v("Periodic"), v(true), v("25%+")], 0.3),
        ([v("Periodic"), v(false), v("10%")], 0.9),
        ([v("Periodic"), v(false), v("25%+")], 0.1),
        ([v("Aperiodic"), v(true), v("10%")], 1.),
        ([v("Aperiodic"), v(true), v("25%+")], 0.7),
        ([v("Aperiodic"), v(false), v("10%")], 0.1),
        ([v("Aperiodic"), v(false), v("25%+")], 0.9),
    ])?;
    // filled one entry at a time through an assignment context
    let mut femg = Factor::new("P(EMG|SE,ER)", &[emg.clone(), se.clone(), er.clone()])?;
    let emg_table = [
        ("Periodic_convulsion", [0.6, 0.5, 0.2, 0.3]),
        ("Normal", [0., 0.1, 0.6, 0.5]),
        ("Sustained_contraction", [0.4, 0.4, 0.2, 0.2]),
    ];
    let mut context = Assignment::new();
    for (signal, column) in emg_table {
        context.set(&emg, signal)?;
        for (i, p) in column.into_iter().enumerate() {
            context.set(&se, i < 2)?;
            context.set(&er, if i % 2 == 0 { "10%" } else { "25%+" })?;
            femg.add_value_at_current_assignment(&context, p)?;
        }
    }
    let mut fse = Factor::new("P(SE|TM,TR,BQ)", &[se.clone(), tm.clone(), tr.clone(), bq.clone()])?;
    fse.add_values([
        ([v(true), v(true), v(true), v("Optimal")], 0.7),
        ([v(true), v(true), v(false), v("Optimal")], 0.5),
        ([v(true), v(false), v(true), v("Optimal")], 0.5),
        ([v(true), v(false), v(false), v("Optimal")], 0.3),
        ([v(true), v(true), v(true), v("Imbalanced")], 0.85),
        ([v(true), v(true), v(false), v("Imbalanced")], 0.7),
        ([v(true), v(false), v(true), v("Imbalanced")], 0.8),
        ([v(true), v(false), v(false), v("Imbalanced")], 0.7),
        ([v(false), v(true), v(true), v("Optimal")], 0.3),
        ([v(false), v(true), v(false), v("Optimal")], 0.5),
        ([v(false), v(false), v(true), v("Optimal")], 0.5),
        ([v(false), v(false), v(false), v("Optimal")], 0.7),
        ([v(false), v(true), v(true), v("Imbalanced")], 0.15),
        ([v(false), v(true), v(false), v("Imbalanced")], 0.3),
        ([v(false), v(false), v(true), v("Imbalanced")], 0.2),
        ([v(false), v(false), v(false), v("Imbalanced")], 0.3),
    ])?;

    let net = BayesNet::new(
        "seizure",
        [
            gb.clone(),
            an.clone(),
            md.clone(),
            tr.clone(),
            er.clone(),
            ns.clone(),
            bv,
            tm.clone(),
            bq.clone(),
            eeg_amp.clone(),
            eeg_sig.clone(),
            emg.clone(),
            se.clone(),
        ],
        [fgb, fan, fmd, ftr, fer, fns, fbv, ftm, fbq, famp, fsig, femg, fse],
    )?;
    Ok(Seizure {
        net,
        gb,
        an,
        md,
        tr,
        er,
        ns,
        tm,
        bq,
        eeg_amp,
        eeg_sig,
        emg,
        se,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let s = build()?;
    let declaration = fixed_ordering(s.net.variables().to_vec());
    let ask = |query: &Variable, evidence: &Assignment| -> VEResult<Distribution> {
        match args.ordering {
            Ordering::MinFill => posterior(&s.net, query, evidence, &min_fill_ordering),
            Ordering::Declaration => posterior(&s.net, query, evidence, &declaration),
        }
    };

    let mut report: Vec<(&str, Distribution)> = Vec::new();
    let ev = Assignment::new;

    // does knowing blood quality make seizure independent of anorexia?
    let optimal = ev().with(&s.bq, "Optimal")?;
    report.push((
        "SE | optimal blood, anorexic",
        ask(&s.se, &optimal.clone().with(&s.an, true)?)?,
    ));
    report.push((
        "SE | optimal blood, not anorexic",
        ask(&s.se, &optimal.with(&s.an, false)?)?,
    ));
    report.push(("SE | anorexic", ask(&s.se, &ev().with(&s.an, true)?)?));
    report.push(("SE | not anorexic", ask(&s.se, &ev().with(&s.an, false)?)?));

    // does knowing about a seizure make EEG amplitude independent of tumors and trauma?
    let tumor_trauma = |tm: bool, tr: bool| ev().with(&s.tm, tm).and_then(|e| e.with(&s.tr, tr));
    report.push((
        "EEG_AMP | tumor, trauma, seizure",
        ask(&s.eeg_amp, &tumor_trauma(true, true)?.with(&s.se, true)?)?,
    ));
    report.push((
        "EEG_AMP | no tumor, trauma, seizure",
        ask(&s.eeg_amp, &tumor_trauma(false, true)?.with(&s.se, true)?)?,
    ));
    report.push((
        "EEG_AMP | tumor, trauma",
        ask(&s.eeg_amp, &tumor_trauma(true, true)?)?,
    ));
    report.push((
        "EEG_AMP | no tumor, trauma",
        ask(&s.eeg_amp, &tumor_trauma(false, true)?)?,
    ));

    // given a seizure, does blood quality explain tumors away?
    let seizure = ev().with(&s.se, true)?;
    report.push((
        "TM | seizure, optimal blood",
        ask(&s.tm, &seizure.clone().with(&s.bq, "Optimal")?)?,
    ));
    report.push((
        "TM | seizure, imbalanced blood",
        ask(&s.tm, &seizure.with(&s.bq, "Imbalanced")?)?,
    ));

    // given blood quality, does medicine explain anorexia away?
    let imbalanced = ev().with(&s.bq, "Imbalanced")?;
    report.push((
        "AN | imbalanced blood, medicine",
        ask(&s.an, &imbalanced.clone().with(&s.md, "Present")?)?,
    ));
    report.push((
        "AN | imbalanced blood, no medicine",
        ask(&s.an, &imbalanced.with(&s.md, "Absent")?)?,
    ));
    report.push(("AN", ask(&s.an, &ev())?));

    // patient history only
    let history = ev()
        .with(&s.an, false)?
        .with(&s.md, "Present")?
        .with(&s.tr, true)?
        .with(&s.gb, "Absent")?;
    report.push(("SE | patient history", ask(&s.se, &history)?));

    // noisy measurements only
    let measurements = ev()
        .with(&s.eeg_sig, "Periodic")?
        .with(&s.emg, "Periodic_convulsion")?
        .with(&s.ns, "25%+")?
        .with(&s.er, "25%+")?;
    report.push(("SE | measurements", ask(&s.se, &measurements)?));

    match args.format {
        Format::Text => {
            for (question, distribution) in &report {
                println!("{}: {}", question, distribution);
            }
        }
        Format::Yaml => print!("{}", serde_yaml::to_string(&report)?),
    }
    Ok(())
}
