//! divm demo: proves `!append(X, Y, Z)` and walks its retry queue.
//!
//! Usage: `divm [RETRY_LIMIT]` (default 5). Set `RUST_LOG=debug` with the
//! `tracing` feature to watch choice points being discovered.

use divm::goal::Weakenings;
use divm::lists::append_program;
use divm::render::{format_coroutines, format_log, format_term, Labels};
use divm::retry::RetryQueue;
use divm::solve::{solve, solve_next, Outcome, SolveCtx};
use divm::symbol::AtomTable;
use divm::term::{Side, TermId, TermStore};
use divm::trace::{info, init_subscriber};
use divm::undo::Logs;
use divm::EngineError;
use smallvec::smallvec;

const DEFAULT_RETRY_LIMIT: usize = 5;

fn main() {
    init_subscriber();

    let limit = match std::env::args().nth(1) {
        None => DEFAULT_RETRY_LIMIT,
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: retry limit must be a number, got {:?}", arg);
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = run(limit) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(limit: usize) -> Result<(), EngineError> {
    let mut atoms = AtomTable::new();
    let mut terms = TermStore::new();
    let (list, program) = append_program(&mut atoms, &mut terms)?;

    let vars = [(); 3].map(|_| terms.var(0));
    let [x, y, z] = vars;
    let goal = terms.app(list.not_append, smallvec![x, y, z])?;
    let mut labels = Labels::with_names([(x, "X"), (y, "Y"), (z, "Z")]);

    let mut logs = Logs::new();
    let mut queue = RetryQueue::new();
    let mut ctx = SolveCtx {
        atoms: &atoms,
        program: &program,
        terms: &mut terms,
    };

    println!("solve {}", format_term(ctx.terms, &atoms, &mut labels, goal));
    let result = solve(goal, &mut logs, Weakenings::new(), &mut queue, &mut ctx)?;
    report(ctx.terms, &atoms, &mut labels, &vars, result, &logs, &queue);

    let mut retries = 0;
    while retries < limit {
        let Some(result) = solve_next(&mut logs, &mut queue, &mut ctx)? else {
            break;
        };
        retries += 1;
        info!(retries, remaining = queue.len(), "retry");
        report(ctx.terms, &atoms, &mut labels, &vars, result, &logs, &queue);
    }
    if !queue.is_empty() {
        println!("stopped after {} retries, {} pending", retries, queue.len());
    }
    Ok(())
}

fn report(
    terms: &TermStore,
    atoms: &AtomTable,
    labels: &mut Labels,
    vars: &[TermId; 3],
    result: Outcome,
    logs: &Logs,
    queue: &RetryQueue,
) {
    println!(
        "choice points: {} positive, {} negative",
        queue.count(Side::Pos),
        queue.count(Side::Neg)
    );
    for (name, &var) in ["X", "Y", "Z"].iter().zip(vars) {
        println!(
            "{} = {}  {}",
            name,
            format_term(terms, atoms, labels, var),
            format_coroutines(terms, atoms, labels, var)
        );
    }
    println!("{:?}", result);
    for cp in queue.iter() {
        println!("choicepoint {}", format_term(terms, atoms, labels, cp.goal));
    }
    println!("{}", format_log(terms, atoms, labels, logs));
}
