//! Canonical programs
//!
//! Small programs used by the command-line driver, the benches and the tests.

use crate::backend::machine::MachineResult;
use crate::backend::term::{TermArena, TermHandle, VarId};

/// Counter variable of the canonical programs
pub const COUNTER: VarId = VarId(0);
/// Accumulator variable of the canonical programs
pub const ACCUMULATOR: VarId = VarId(1);

/// Sum `1..=n` into `x1`, counting `x0` down from `n`:
///
/// ```text
/// x0 := n; x1 := 0;
/// while not (x0 <= 0) do
///     x1 := x1 + x0;
///     x0 := x0 + -1
/// ```
pub fn load_sum(arena: &mut TermArena, n: i64) -> MachineResult<TermHandle> {
    let vars = arena.var_list(&[COUNTER, ACCUMULATOR])?;

    let n = arena.con(n)?;
    let init_counter = arena.assign(n, COUNTER)?;
    let zero = arena.con(0)?;
    let init_acc = arena.assign(zero, ACCUMULATOR)?;

    let x0 = arena.var(COUNTER)?;
    let zero = arena.con(0)?;
    let done = arena.le(x0, zero)?;
    let cond = arena.not(done)?;

    let x1 = arena.var(ACCUMULATOR)?;
    let x0 = arena.var(COUNTER)?;
    let acc = arena.add(x1, x0)?;
    let step_acc = arena.assign(acc, ACCUMULATOR)?;
    let x0 = arena.var(COUNTER)?;
    let minus_one = arena.con(-1)?;
    let dec = arena.add(x0, minus_one)?;
    let step_counter = arena.assign(dec, COUNTER)?;
    let loop_body = arena.seq(step_acc, step_counter)?;
    let lp = arena.while_do(cond, loop_body)?;

    let body = arena.seq_all(&[init_counter, init_acc, lp])?;
    arena.program(vars, body)
}

/// Two straight-line assignments: `x0 := n; x1 := 0`
pub fn load_test(arena: &mut TermArena, n: i64) -> MachineResult<TermHandle> {
    let vars = arena.var_list(&[COUNTER, ACCUMULATOR])?;
    let n = arena.con(n)?;
    let first = arena.assign(n, COUNTER)?;
    let zero = arena.con(0)?;
    let second = arena.assign(zero, ACCUMULATOR)?;
    let body = arena.seq(first, second)?;
    arena.program(vars, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::term::Term;

    #[test]
    fn test_sum_program_shape() {
        let mut arena = TermArena::with_capacity(64);
        let program = load_sum(&mut arena, 5).unwrap();

        let Term::Pgm { body, .. } = arena.term_at(program) else {
            panic!("expected Pgm");
        };
        let Term::Seq(init, rest) = arena.term_at(body) else {
            panic!("expected Seq");
        };
        assert!(matches!(arena.term_at(init), Term::Assign { var: COUNTER, .. }));
        let Term::Seq(_, lp) = arena.term_at(rest) else {
            panic!("expected Seq");
        };
        assert!(matches!(arena.term_at(lp), Term::While { .. }));
    }

    #[test]
    fn test_sum_program_fits_default_arena() {
        let mut arena = TermArena::with_capacity(crate::config::DEFAULT_ARENA_CAPACITY);
        load_sum(&mut arena, 100).unwrap();
        assert!(arena.len() < 32);
    }
}
