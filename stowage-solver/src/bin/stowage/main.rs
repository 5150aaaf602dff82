mod os_signal_termination;
mod result;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use fnv::FnvHashSet;
use log::LevelFilter;
use log::error;
use log::info;
use log::warn;
use os_signal_termination::OsSignal;
use result::StowageError;
use result::StowageResult;
use stowage_cp::termination::Combinator;
use stowage_cp::termination::TerminationCondition;
use stowage_cp::termination::TimeBudget;
use stowage_loading::ContainerLoadingParams;
use stowage_loading::LoadingChecker;
use stowage_loading::LoadingStatus;
use stowage_loading::PackingType;
use stowage_loading::ProblemVariant;
use stowage_solver::BranchAndCutParams;
use stowage_solver::callback::RouteCallback;
use stowage_solver::callback::create_route_callback;
use stowage_solver::cuts::Cut;
use stowage_solver::instance::Instance;
use stowage_solver::preprocessing::determine_extended_infeasible_paths;
use stowage_solver::preprocessing::determine_infeasible_paths;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The instance to check. The file starts with a `vehicle <dx> <dy> <dz> <weight limit>` line,
    /// followed by `node <id> <weight>` lines, each followed by the
    /// `item <dx> <dy> <dz> <weight> <fragile> <rotate>` lines of that node. The first node is
    /// the depot.
    #[clap(verbatim_doc_comment)]
    instance_path: PathBuf,

    /// The loading constraints which are enforced.
    ///
    /// Possible values: AllConstraints, NoFragility, NoSupport, NoLifo, LoadingOnly,
    /// VolumeWeightApproximation, Volume, Weight
    #[arg(long, default_value = "AllConstraints", verbatim_doc_comment)]
    variant: ProblemVariant,

    /// The route to check, as a comma-separated list of node ids without the depot.
    ///
    /// Without a route, only the infeasible arcs of the instance are determined.
    #[arg(long, value_delimiter = ',', verbatim_doc_comment)]
    route: Vec<usize>,

    /// The number of threads used by the packing model.
    #[arg(long, default_value_t = 8)]
    threads: usize,

    /// The seed from which the item orders of the packing threads are derived.
    #[arg(short = 'r', long = "random-seed", alias = "seed", default_value_t = 0)]
    seed: u64,

    /// The time budget for the whole run, given in milliseconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// Do not propagate the packing model once before the threads are started.
    #[arg(long = "no-presolve")]
    no_presolve: bool,

    /// Check the route with a single exact packing model and without lifting. Only available for
    /// the AllConstraints variant.
    #[arg(long = "simple-version")]
    simple_version: bool,

    /// Enables log message output from the solver.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> StowageResult<()> {
    let args = Args::parse();
    configure_logging(args.verbose);

    let instance: Instance = std::fs::read_to_string(&args.instance_path)?.parse()?;
    info!(
        "read {} nodes from {}",
        instance.nodes.len(),
        args.instance_path.display()
    );

    let signal = OsSignal::install();
    let time_limit = args.time_limit.map(Duration::from_millis);
    let mut termination = Combinator::new(signal.clone(), time_limit.map(TimeBudget::starting_now));

    let mut loading_params = ContainerLoadingParams::new(args.variant)?;
    loading_params.cp_solver.threads = args.threads;
    loading_params.cp_solver.seed = args.seed;
    loading_params.cp_solver.presolve = !args.no_presolve;
    loading_params.cp_solver.log_flag = args.verbose;

    let mut params = BranchAndCutParams {
        simple_version: args.simple_version,
        ..Default::default()
    };
    if let Some(time_limit) = time_limit {
        params.time_limit = time_limit;
    }

    let strategy = create_route_callback(args.variant, &params)?;

    let mut checker = LoadingChecker::new(loading_params);
    checker.set_interrupt(signal.flag());
    // One vehicle per customer always suffices.
    let fleet = vec![instance.container.clone(); instance.nodes.len().saturating_sub(1)];
    checker.set_bin_packing_model(&instance.nodes, fleet);

    let mut paths =
        determine_infeasible_paths(&mut checker, &instance.nodes, &instance.container, &params)?;
    determine_extended_infeasible_paths(
        &mut checker,
        &instance.nodes,
        &instance.container,
        &params,
        &mut paths,
    )?;

    println!("infeasible arcs: {}", format_pairs(&instance, &paths.arcs));
    println!(
        "infeasible tail paths: {}",
        format_pairs(&instance, &paths.tail_paths)
    );

    if args.route.is_empty() {
        return Ok(());
    }

    if termination.should_stop() {
        warn!("stopped before the route was checked");
        println!("status: {}", LoadingStatus::Unknown);
        return Ok(());
    }

    let route = intern_route(&instance, &args.route)?;
    let x_values = route_solution(instance.nodes.len(), &route);

    let mut cuts: Vec<Cut> = Vec::new();
    let (feasible, aborted) = {
        let mut callback = RouteCallback::new(
            strategy,
            &instance.nodes,
            &instance.container,
            params,
            &mut checker,
        );
        let feasible = callback.check_solution(&x_values, &mut cuts)?;
        callback.log_statistics();
        (feasible, callback.aborted())
    };

    let status = if aborted || termination.should_stop() {
        LoadingStatus::Unknown
    } else if feasible {
        LoadingStatus::FeasOpt
    } else {
        LoadingStatus::Infeasible
    };
    println!("status: {status}");
    info!("{} packing models solved", checker.number_of_solver_calls());

    match status {
        LoadingStatus::FeasOpt
            if checker
                .params
                .loading_problem
                .enable_three_dimensional_loading =>
        {
            let mut items = checker.select_items(&route, &instance.nodes, false);
            let packing_status = checker.constraint_programming_solver_get_packing(
                PackingType::Complete,
                &instance.container,
                &route,
                &mut items,
                f64::MAX,
            )?;
            if packing_status == LoadingStatus::FeasOpt {
                for item in &items {
                    println!(
                        "item {} at ({}, {}, {}) size {}x{}x{} {:?}",
                        item.id, item.x, item.y, item.z, item.dx, item.dy, item.dz, item.rotation
                    );
                }
            }
        }
        LoadingStatus::Infeasible => {
            for cut in &cuts {
                let terms = cut
                    .arcs
                    .iter()
                    .map(|arc| format!("{:+} x[{},{}]", arc.coefficient, arc.tail, arc.head))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("cut {:?}: {terms} >= {}", cut.cut_type, cut.rhs);
            }
        }
        _ => {}
    }

    Ok(())
}

/// Translates node ids of the instance into internal ids.
fn intern_route(instance: &Instance, route: &[usize]) -> StowageResult<Vec<usize>> {
    let mut seen = FnvHashSet::default();

    route
        .iter()
        .map(|&external_id| {
            let intern_id = instance
                .intern_id(external_id)
                .ok_or(StowageError::UnknownCustomer(external_id))?;
            if intern_id == 0 || !seen.insert(intern_id) {
                return Err(StowageError::RepeatedStop(external_id));
            }
            Ok(intern_id)
        })
        .collect()
}

/// The arc values of a solution with the single route `depot, route..., depot`.
fn route_solution(number_of_nodes: usize, route: &[usize]) -> Vec<Vec<f64>> {
    let mut x_values = vec![vec![0.0; number_of_nodes]; number_of_nodes];

    let mut previous = 0;
    for &node in route {
        x_values[previous][node] = 1.0;
        previous = node;
    }
    x_values[previous][0] = 1.0;

    x_values
}

fn format_pairs(instance: &Instance, pairs: &[(usize, usize)]) -> String {
    let formatted = pairs
        .iter()
        .map(|&(tail, head)| {
            format!(
                "({},{})",
                instance.nodes[tail].external_id, instance.nodes[head].external_id
            )
        })
        .collect::<Vec<_>>();

    if formatted.is_empty() {
        "-".to_owned()
    } else {
        formatted.join(" ")
    }
}
