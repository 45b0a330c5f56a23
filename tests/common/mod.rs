//! Shared helpers for the integration tests
//!
//! Programs are generated as a small owned syntax tree (`AExp`, `BExp`,
//! `Stmt`) and lowered into a `TermArena`. Loops are always bounded: a
//! `Repeat` lowers to a `while` over its own counter variable, which the
//! generated body never assigns, and a generated `While` always has a
//! constant `false` condition.

#![allow(dead_code)]

use imp_machine::backend::reference::ReferenceEvaluator;
use imp_machine::backend::{
    Machine, MachineResult, RunOutcome, TermArena, TermHandle, VarId, VariableStore,
};
use imp_machine::MachineConfig;
use proptest::prelude::*;

/// Variables the generated statements read and assign
pub const DATA_VARS: u32 = 3;
/// One loop counter per nesting level
pub const LOOP_COUNTERS: u32 = 8;
/// Never declared by a generated program
pub const UNDECLARED: VarId = VarId(15);
pub const VARIABLE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub enum AExp {
    Con(i64),
    Var(VarId),
    Add(Box<AExp>, Box<AExp>),
    Div(Box<AExp>, Box<AExp>),
}

#[derive(Debug, Clone)]
pub enum BExp {
    Con(bool),
    Le(AExp, AExp),
    Not(Box<BExp>),
    And(Box<BExp>, Box<BExp>),
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Skip,
    Assign(VarId, AExp),
    Seq(Box<Stmt>, Box<Stmt>),
    If(BExp, Box<Stmt>, Box<Stmt>),
    /// Run the body a fixed number of times
    Repeat(i64, Box<Stmt>),
    While(BExp, Box<Stmt>),
}

impl AExp {
    pub fn lower(&self, arena: &mut TermArena) -> MachineResult<TermHandle> {
        match self {
            AExp::Con(n) => arena.con(*n),
            AExp::Var(id) => arena.var(*id),
            AExp::Add(l, r) => {
                let (l, r) = (l.lower(arena)?, r.lower(arena)?);
                arena.add(l, r)
            }
            AExp::Div(l, r) => {
                let (l, r) = (l.lower(arena)?, r.lower(arena)?);
                arena.div(l, r)
            }
        }
    }
}

impl BExp {
    pub fn lower(&self, arena: &mut TermArena) -> MachineResult<TermHandle> {
        match self {
            BExp::Con(b) => arena.boolean(*b),
            BExp::Le(l, r) => {
                let (l, r) = (l.lower(arena)?, r.lower(arena)?);
                arena.le(l, r)
            }
            BExp::Not(b) => {
                let b = b.lower(arena)?;
                arena.not(b)
            }
            BExp::And(l, r) => {
                let (l, r) = (l.lower(arena)?, r.lower(arena)?);
                arena.and(l, r)
            }
        }
    }
}

impl Stmt {
    pub fn lower(&self, arena: &mut TermArena, depth: u32) -> MachineResult<TermHandle> {
        match self {
            Stmt::Skip => arena.skip(),
            Stmt::Assign(var, expr) => {
                let expr = expr.lower(arena)?;
                arena.assign(expr, *var)
            }
            Stmt::Seq(first, second) => {
                let (first, second) = (first.lower(arena, depth)?, second.lower(arena, depth)?);
                arena.seq(first, second)
            }
            Stmt::If(cond, then, otherwise) => {
                let cond = cond.lower(arena)?;
                let then = then.lower(arena, depth)?;
                let otherwise = otherwise.lower(arena, depth)?;
                arena.if_then_else(cond, then, otherwise)
            }
            Stmt::Repeat(times, body) => {
                let counter = VarId(DATA_VARS + depth);

                let times = arena.con(*times)?;
                let init = arena.assign(times, counter)?;

                let c = arena.var(counter)?;
                let zero = arena.con(0)?;
                let done = arena.le(c, zero)?;
                let cond = arena.not(done)?;

                let body = body.lower(arena, depth + 1)?;
                let c = arena.var(counter)?;
                let minus_one = arena.con(-1)?;
                let dec = arena.add(c, minus_one)?;
                let dec = arena.assign(dec, counter)?;
                let body = arena.seq(body, dec)?;

                let lp = arena.while_do(cond, body)?;
                arena.seq(init, lp)
            }
            Stmt::While(cond, body) => {
                let cond = cond.lower(arena)?;
                let body = body.lower(arena, depth)?;
                arena.while_do(cond, body)
            }
        }
    }
}

/// Wrap `stmt` in a program declaring every data variable and loop counter
pub fn lower_program(stmt: &Stmt, arena: &mut TermArena) -> MachineResult<TermHandle> {
    let ids: Vec<VarId> = (0..DATA_VARS + LOOP_COUNTERS).map(VarId).collect();
    let vars = arena.var_list(&ids)?;
    let body = stmt.lower(arena, 0)?;
    arena.program(vars, body)
}

pub fn test_config() -> MachineConfig {
    MachineConfig::default()
        .with_arena_capacity(1 << 16)
        .with_stack_capacity(1 << 12)
        .with_variable_capacity(VARIABLE_CAPACITY)
}

/// Run on the engine, checking the stack is balanced after completion
pub fn run_engine(arena: &TermArena, program: TermHandle) -> (RunOutcome, VariableStore) {
    let mut machine = Machine::with_config(arena, test_config());
    let outcome = machine.run(program);
    if outcome.is_completed() {
        assert!(machine.stack().is_empty(), "frames left behind: {}", machine.stack());
    }
    (outcome, machine.into_store())
}

pub fn run_reference(arena: &TermArena, program: TermHandle) -> (RunOutcome, VariableStore) {
    let mut evaluator = ReferenceEvaluator::new(arena, VARIABLE_CAPACITY);
    let outcome = evaluator.run(program);
    (outcome, evaluator.into_store())
}

// === Strategies ===

pub fn aexp(undeclared: bool) -> BoxedStrategy<AExp> {
    let var = if undeclared {
        prop_oneof![6 => (0..DATA_VARS).prop_map(VarId), 1 => Just(UNDECLARED)].boxed()
    } else {
        (0..DATA_VARS).prop_map(VarId).boxed()
    };
    let leaf = prop_oneof![
        6 => (-20i64..20).prop_map(AExp::Con),
        1 => prop_oneof![Just(i64::MIN), Just(i64::MAX)].prop_map(AExp::Con),
        6 => var.prop_map(AExp::Var),
    ];

    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            3 => (inner.clone(), inner.clone())
                .prop_map(|(l, r)| AExp::Add(Box::new(l), Box::new(r))),
            1 => (inner.clone(), inner).prop_map(|(l, r)| AExp::Div(Box::new(l), Box::new(r))),
        ]
    })
    .boxed()
}

pub fn bexp(undeclared: bool) -> BoxedStrategy<BExp> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(BExp::Con),
        (aexp(undeclared), aexp(undeclared)).prop_map(|(l, r)| BExp::Le(l, r)),
    ];

    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|b| BExp::Not(Box::new(b))),
            (inner.clone(), inner).prop_map(|(l, r)| BExp::And(Box::new(l), Box::new(r))),
        ]
    })
    .boxed()
}

pub fn stmt(undeclared: bool) -> BoxedStrategy<Stmt> {
    let leaf = prop_oneof![
        1 => Just(Stmt::Skip),
        4 => (0..DATA_VARS, aexp(undeclared)).prop_map(|(v, e)| Stmt::Assign(VarId(v), e)),
    ];

    leaf.prop_recursive(4, 24, 3, move |inner| {
        prop_oneof![
            3 => (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Stmt::Seq(Box::new(a), Box::new(b))),
            2 => (bexp(undeclared), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| Stmt::If(c, Box::new(t), Box::new(e))),
            1 => (0i64..4, inner.clone()).prop_map(|(n, body)| Stmt::Repeat(n, Box::new(body))),
            1 => inner.prop_map(|body| Stmt::While(BExp::Con(false), Box::new(body))),
        ]
    })
    .boxed()
}
