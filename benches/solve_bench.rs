//! Solver benchmarks using Criterion.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use divm::goal::Weakenings;
use divm::lists::append_program;
use divm::retry::RetryQueue;
use divm::solve::{solve, solve_next, SolveCtx};
use divm::symbol::{Atom, AtomTable};
use divm::term::{Side, TermId, TermStore};
use divm::undo::{Logs, SplitPoint};
use divm::unify::unify;
use smallvec::smallvec;

/// cons(nil, cons(nil, ... nil)) with `n` elements.
fn build_list(n: usize, cons: Atom, nil: Atom, terms: &mut TermStore) -> TermId {
    let empty = terms.app0(nil).unwrap();
    let mut list = empty;
    for _ in 0..n {
        list = terms.app2(cons, empty, list).unwrap();
    }
    list
}

/// First answer of `append(L, [], Z)` for a ground list of length n.
fn bench_append_ground(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_ground");

    for n in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("len", n), &n, |b, &n| {
            b.iter(|| {
                let mut atoms = AtomTable::new();
                let mut terms = TermStore::new();
                let (list, program) = append_program(&mut atoms, &mut terms).unwrap();
                let input = build_list(n, list.cons, list.nil, &mut terms);
                let empty = terms.app0(list.nil).unwrap();
                let z = terms.var(0);
                let goal = terms.app(list.append, smallvec![input, empty, z]).unwrap();

                let mut logs = Logs::new();
                let mut queue = RetryQueue::new();
                let mut ctx = SolveCtx {
                    atoms: &atoms,
                    program: &program,
                    terms: &mut terms,
                };
                let outcome = solve(goal, &mut logs, Weakenings::new(), &mut queue, &mut ctx);
                black_box((outcome, queue.len()))
            });
        });
    }

    group.finish();
}

/// Walking the retry queue of `!append(X, Y, Z)`.
fn bench_not_append_retries(c: &mut Criterion) {
    let mut group = c.benchmark_group("not_append_retries");

    for retries in [8, 32] {
        group.bench_with_input(BenchmarkId::new("retries", retries), &retries, |b, &retries| {
            b.iter(|| {
                let mut atoms = AtomTable::new();
                let mut terms = TermStore::new();
                let (list, program) = append_program(&mut atoms, &mut terms).unwrap();
                let [x, y, z] = [(); 3].map(|_| terms.var(0));
                let goal = terms.app(list.not_append, smallvec![x, y, z]).unwrap();

                let mut logs = Logs::new();
                let mut queue = RetryQueue::new();
                let mut ctx = SolveCtx {
                    atoms: &atoms,
                    program: &program,
                    terms: &mut terms,
                };
                solve(goal, &mut logs, Weakenings::new(), &mut queue, &mut ctx).unwrap();
                for _ in 0..retries {
                    if solve_next(&mut logs, &mut queue, &mut ctx).unwrap().is_none() {
                        break;
                    }
                }
                black_box(queue.len())
            });
        });
    }

    group.finish();
}

/// Unify-then-rewind on nested lists.
fn bench_unify_rewind(c: &mut Criterion) {
    let mut atoms = AtomTable::new();
    let cons = atoms.register("cons", 2);
    let nil = atoms.register("nil", 0);
    let mut terms = TermStore::new();
    let left = build_list(32, cons, nil, &mut terms);
    let x = terms.var(0);
    let tail = build_list(31, cons, nil, &mut terms);
    let right = terms.app2(cons, x, tail).unwrap();

    c.bench_function("unify_rewind", |b| {
        b.iter(|| {
            let mut logs = Logs::new();
            let residue = unify(
                &mut terms,
                &mut logs,
                &Weakenings::new(),
                black_box(left),
                black_box(right),
                Side::Pos,
            );
            logs.rewind(&mut terms, SplitPoint::default());
            black_box(residue)
        });
    });
}

criterion_group!(
    benches,
    bench_append_ground,
    bench_not_append_retries,
    bench_unify_rewind
);
criterion_main!(benches);
