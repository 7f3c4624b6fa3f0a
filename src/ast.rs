//! # Abstract Syntax Tree (AST)
//!
//! Defines the data structures representing parsed Tiny BASIC statements and
//! expressions, their evaluation against a variable/array environment, and
//! their canonical (pretty-printed) rendering.
//!
//! ## Design Philosophy
//!
//! Expressions are stored exactly as the grammar in the spec recurses —
//! right-recursively — but [`Term::eval`] and [`UnsignedExpression::eval`]
//! walk that spine left-associatively with an accumulator, because `10 - 3 -
//! 2` must evaluate to `5`, not `9`. Storage shape and evaluation order are
//! two different things; conflating them is the single easiest mistake to
//! make in this component.
//!
//! `Statement::If` nests a whole `Statement` in its *then*-arm, so
//! `Statement` and `Expression` are mutually self-referential sum types.
//! Every node has exactly one owner (its parent, or the program's line
//! vector), so boxing the recursive arms is all the indirection needed —
//! no shared ownership anywhere in this tree.

use std::fmt;

/// Callback surface the evaluator needs from whatever owns variable/array
/// storage and the random source. The engine implements this for its own
/// state; tests can implement it for a bare `HashMap`.
pub trait Evaluator {
    fn variable(&self, name: char) -> i32;
    fn array_element(&self, index: i32) -> i32;
    /// Uniformly sampled integer in `[0, bound)`; `bound <= 0` returns 0.
    fn rnd(&mut self, bound: i32) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulOp {
    Mul,
    Div,
}

impl fmt::Display for MulOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MulOp::Mul => "*",
            MulOp::Div => "/",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOp {
    Add,
    Sub,
}

impl fmt::Display for AddOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddOp::Add => "+",
            AddOp::Sub => "-",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Gt,
    Eq,
    Le,
    Ge,
    Ne,
}

impl RelOp {
    pub fn apply(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            RelOp::Lt => lhs < rhs,
            RelOp::Gt => lhs > rhs,
            RelOp::Eq => lhs == rhs,
            RelOp::Le => lhs <= rhs,
            RelOp::Ge => lhs >= rhs,
            RelOp::Ne => lhs != rhs,
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Eq => "=",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
            RelOp::Ne => "<>",
        })
    }
}

/// `Factor = Number | Variable(name) | ArrayElement(Expression) |
/// ParenExpr(Expression) | Rnd(Expression)`
#[derive(Debug, Clone, PartialEq)]
pub enum Factor {
    Number(i32),
    Variable(char),
    ArrayElement(Box<Expression>),
    Paren(Box<Expression>),
    Rnd(Box<Expression>),
}

impl Factor {
    pub fn eval(&self, env: &mut dyn Evaluator) -> i32 {
        match self {
            Factor::Number(n) => *n,
            Factor::Variable(name) => env.variable(*name),
            Factor::ArrayElement(index) => env.array_element(index.eval(env)),
            Factor::Paren(inner) => inner.eval(env),
            Factor::Rnd(bound) => {
                let bound = bound.eval(env);
                env.rnd(bound)
            }
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Number(n) => write!(f, "{n}"),
            Factor::Variable(name) => write!(f, "{name}"),
            Factor::ArrayElement(expr) => write!(f, "@({expr})"),
            Factor::Paren(expr) => write!(f, "({expr})"),
            Factor::Rnd(expr) => write!(f, "RND({expr})"),
        }
    }
}

/// `Term = Value(Factor) | Compound(Factor, MulOp, Term)` — storage is
/// right-recursive; see the module docs for why evaluation is not.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Value(Factor),
    Compound(Factor, MulOp, Box<Term>),
}

impl Term {
    pub fn eval(&self, env: &mut dyn Evaluator) -> i32 {
        match self {
            Term::Value(f) => f.eval(env),
            Term::Compound(f, op, rest) => {
                let mut acc = f.eval(env);
                let mut op = *op;
                let mut cur = rest.as_ref();
                loop {
                    match cur {
                        Term::Value(f) => break apply_mul(op, acc, f.eval(env)),
                        Term::Compound(f, next_op, next) => {
                            acc = apply_mul(op, acc, f.eval(env));
                            op = *next_op;
                            cur = next.as_ref();
                        }
                    }
                }
            }
        }
    }
}

fn apply_mul(op: MulOp, lhs: i32, rhs: i32) -> i32 {
    match op {
        MulOp::Mul => lhs.wrapping_mul(rhs),
        MulOp::Div => {
            if rhs == 0 {
                0
            } else {
                lhs.wrapping_div(rhs)
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Value(factor) => write!(f, "{factor}"),
            Term::Compound(factor, op, rest) => write!(f, "{factor} {op} {rest}"),
        }
    }
}

/// `UnsignedExpression = Value(Term) | Compound(Term, AddOp,
/// UnsignedExpression)` — same right-recursive-storage,
/// left-associative-evaluation shape as [`Term`].
#[derive(Debug, Clone, PartialEq)]
pub enum UnsignedExpression {
    Value(Term),
    Compound(Term, AddOp, Box<UnsignedExpression>),
}

impl UnsignedExpression {
    pub fn eval(&self, env: &mut dyn Evaluator) -> i32 {
        match self {
            UnsignedExpression::Value(t) => t.eval(env),
            UnsignedExpression::Compound(t, op, rest) => {
                Self::walk_spine(t.eval(env), *op, rest.as_ref(), env)
            }
        }
    }

    /// The first term of this unsigned expression — the operand that a
    /// leading unary minus negates (§4.3) — with the remainder of the spine
    /// left untouched.
    fn negate_first_term(&self, env: &mut dyn Evaluator) -> i32 {
        match self {
            UnsignedExpression::Value(t) => t.eval(env).wrapping_neg(),
            UnsignedExpression::Compound(t, op, rest) => {
                Self::walk_spine(t.eval(env).wrapping_neg(), *op, rest.as_ref(), env)
            }
        }
    }

    /// Walk the right-recursive `Compound` spine left-associatively,
    /// starting from an already-computed accumulator and the operator that
    /// joins it to `rest`.
    fn walk_spine(
        mut acc: i32,
        mut op: AddOp,
        mut cur: &UnsignedExpression,
        env: &mut dyn Evaluator,
    ) -> i32 {
        loop {
            match cur {
                UnsignedExpression::Value(t) => break apply_add(op, acc, t.eval(env)),
                UnsignedExpression::Compound(t, next_op, next) => {
                    acc = apply_add(op, acc, t.eval(env));
                    op = *next_op;
                    cur = next.as_ref();
                }
            }
        }
    }
}

fn apply_add(op: AddOp, lhs: i32, rhs: i32) -> i32 {
    match op {
        AddOp::Add => lhs.wrapping_add(rhs),
        AddOp::Sub => lhs.wrapping_sub(rhs),
    }
}

impl fmt::Display for UnsignedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsignedExpression::Value(term) => write!(f, "{term}"),
            UnsignedExpression::Compound(term, op, rest) => write!(f, "{term} {op} {rest}"),
        }
    }
}

/// `Expression = Unsigned(UnsignedExpression) | Plus(UnsignedExpression) |
/// Minus(UnsignedExpression)`
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Unsigned(UnsignedExpression),
    Plus(UnsignedExpression),
    Minus(UnsignedExpression),
}

impl Expression {
    pub fn eval(&self, env: &mut dyn Evaluator) -> i32 {
        match self {
            Expression::Unsigned(u) => u.eval(env),
            Expression::Plus(u) => u.eval(env),
            Expression::Minus(u) => u.negate_first_term(env),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Unsigned(u) => write!(f, "{u}"),
            Expression::Plus(u) => write!(f, "+{u}"),
            Expression::Minus(u) => write!(f, "-{u}"),
        }
    }
}

/// An assignment target: `Variable(name) | ArrayElement(Expression)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lvalue {
    Variable(char),
    ArrayElement(Expression),
}

impl fmt::Display for Lvalue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lvalue::Variable(name) => write!(f, "{name}"),
            Lvalue::ArrayElement(expr) => write!(f, "@({expr})"),
        }
    }
}

/// The separator between two print-list items, or trailing after the last
/// one. `Comma` renders as a tab at print time, `Semicolon` as nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintSeparator {
    Comma,
    Semicolon,
}

impl fmt::Display for PrintSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrintSeparator::Comma => ",",
            PrintSeparator::Semicolon => ";",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrintItem {
    Expr(Expression),
    Str(String),
}

impl fmt::Display for PrintItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintItem::Expr(expr) => write!(f, "{expr}"),
            PrintItem::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

/// One print-list entry: an item plus whatever separator immediately
/// follows it, or `None` if this is the list's final item with no trailing
/// separator (which means "print a newline here").
#[derive(Debug, Clone, PartialEq)]
pub struct PrintEntry {
    pub item: PrintItem,
    pub separator: Option<PrintSeparator>,
}

/// A non-empty alternating sequence of print-items and separators,
/// optionally ending in a trailing separator (§4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct PrintList {
    pub entries: Vec<PrintEntry>,
}

impl fmt::Display for PrintList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{}", entry.item)?;
            if let Some(sep) = entry.separator {
                write!(f, "{sep}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListRange {
    All,
    Single(Expression),
    Range(Expression, Expression),
}

impl fmt::Display for ListRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRange::All => Ok(()),
            ListRange::Single(n) => write!(f, " {n}"),
            ListRange::Range(lo, hi) => write!(f, " {lo}, {hi}"),
        }
    }
}

/// A statement. `If`'s *then*-arm is a full, boxed `Statement`, so `IF`
/// nested inside `IF` (one level of `THEN`-chaining per `IF`) is accepted
/// structurally for free.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Print(PrintList),
    PrintNewline,
    Input(Vec<Lvalue>),
    Let(Lvalue, Expression),
    DimArray(Expression),
    Goto(Expression),
    Gosub(Expression),
    Return,
    If(Expression, RelOp, Expression, Box<Statement>),
    Rem(String),
    Clear,
    Run,
    End,
    List(ListRange),
    Save(String),
    Load(String),
    Files,
    ClipSave,
    ClipLoad,
    Tron,
    Troff,
    Bye,
    Help,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Print(list) => write!(f, "PRINT {list}"),
            Statement::PrintNewline => write!(f, "PRINT"),
            Statement::Input(lvalues) => {
                let items: Vec<String> = lvalues.iter().map(|lv| lv.to_string()).collect();
                write!(f, "INPUT {}", items.join(", "))
            }
            Statement::Let(lv, expr) => write!(f, "LET {lv} = {expr}"),
            Statement::DimArray(expr) => write!(f, "DIM @({expr})"),
            Statement::Goto(expr) => write!(f, "GOTO {expr}"),
            Statement::Gosub(expr) => write!(f, "GOSUB {expr}"),
            Statement::Return => write!(f, "RETURN"),
            Statement::If(lhs, op, rhs, stmt) => {
                write!(f, "IF {lhs} {op} {rhs} THEN {stmt}")
            }
            Statement::Rem(text) => write!(f, "REM{text}"),
            Statement::Clear => write!(f, "CLEAR"),
            Statement::Run => write!(f, "RUN"),
            Statement::End => write!(f, "END"),
            Statement::List(range) => write!(f, "LIST{range}"),
            Statement::Save(path) => write!(f, "SAVE \"{path}\""),
            Statement::Load(path) => write!(f, "LOAD \"{path}\""),
            Statement::Files => write!(f, "FILES"),
            Statement::ClipSave => write!(f, "CLIPSAVE"),
            Statement::ClipLoad => write!(f, "CLIPLOAD"),
            Statement::Tron => write!(f, "TRON"),
            Statement::Troff => write!(f, "TROFF"),
            Statement::Bye => write!(f, "BYE"),
            Statement::Help => write!(f, "HELP"),
        }
    }
}
