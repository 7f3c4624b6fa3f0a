//! # Parser
//!
//! Turns one line of source text into a [`ParsedLine`] by walking a
//! [`Cursor`] directly — there is no separate tokenizing pass. Keywords and
//! their abbreviations (`PRINT`/`PR`/`?`, `GOTO`/`GT`, ...) are tried longest
//! first wherever one is a prefix of another, so `INPUT` is never swallowed
//! as `IN` followed by garbage.
//!
//! `LET` is optional, so it is tried last in [`parse_statement`]: if nothing
//! else matches, the line is re-parsed from the start as a bare
//! `lvalue = expression`.
//!
//! [`parse_input_values`] is a second, much smaller grammar used only while
//! the engine is in `ReadingInput`: a comma-separated list of signed numbers
//! or variable references, evaluated immediately against the caller's
//! environment rather than built into an AST node.

#[cfg(test)]
mod tests;

use crate::ast::{
    AddOp, Evaluator, Expression, Factor, ListRange, Lvalue, MulOp, PrintEntry, PrintItem,
    PrintList, PrintSeparator, RelOp, Statement, Term, UnsignedExpression,
};
use crate::cursor::Cursor;

/// The result of parsing one line of source text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Blank or all-spaces.
    Empty,
    /// A bare line number with nothing after it — deletes that program line.
    EmptyNumbered(i32),
    /// A line number followed by a statement — stores or replaces that
    /// program line.
    Numbered(i32, Statement),
    /// A statement with no leading line number — runs immediately.
    Unnumbered(Statement),
    /// The line failed to parse; the message is host-displayable as-is.
    Error(String),
}

pub fn parse_line(line: &str) -> ParsedLine {
    let c = Cursor::new(line).skip_spaces();
    if c.is_at_end() {
        return ParsedLine::Empty;
    }
    if let Some((n, after_num)) = c.number_literal() {
        let rest = after_num.skip_spaces();
        if rest.is_at_end() {
            return ParsedLine::EmptyNumbered(n);
        }
        return match parse_statement(rest) {
            Some((stmt, after)) if after.skip_spaces().is_at_end() => {
                ParsedLine::Numbered(n, stmt)
            }
            Some(_) => ParsedLine::Error(format!("unexpected characters after line {n}")),
            None => ParsedLine::Error(format!("unrecognized statement on line {n}")),
        };
    }
    match parse_statement(c) {
        Some((stmt, after)) if after.skip_spaces().is_at_end() => ParsedLine::Unnumbered(stmt),
        Some(_) => ParsedLine::Error("unexpected characters after statement".to_string()),
        None => ParsedLine::Error("unrecognized statement".to_string()),
    }
}

/// Parse a single statement starting at `c`. Returns `None` if nothing at
/// `c` matches any statement grammar. Does not require the rest of the line
/// to be empty — callers that embed a statement (`IF ... THEN <stmt>`) rely
/// on that.
pub fn parse_statement(c: Cursor) -> Option<(Statement, Cursor)> {
    if let Some((_, after)) = c.one_of_literals(&["PRINT", "PR", "?"]) {
        return parse_print_rest(after);
    }
    if let Some((_, after)) = c.one_of_literals(&["INPUT", "IN"]) {
        return parse_input_rest(after);
    }
    if let Some(after) = c.literal("IF") {
        return parse_if_rest(after);
    }
    if let Some((_, after)) = c.one_of_literals(&["GOTO", "GT"]) {
        let (expr, after) = parse_expression(after)?;
        return Some((Statement::Goto(expr), after));
    }
    if let Some((_, after)) = c.one_of_literals(&["GOSUB", "GS"]) {
        let (expr, after) = parse_expression(after)?;
        return Some((Statement::Gosub(expr), after));
    }
    if let Some((_, after)) = c.one_of_literals(&["RETURN", "RT"]) {
        return Some((Statement::Return, after));
    }
    if let Some((_, after)) = c.one_of_literals(&["LIST", "LS"]) {
        let (range, after) = parse_list_range(after)?;
        return Some((Statement::List(range), after));
    }
    if let Some((_, after)) = c.one_of_literals(&["SAVE", "SV"]) {
        let (path, after) = after.string_literal()?;
        return Some((Statement::Save(path), after));
    }
    if let Some((_, after)) = c.one_of_literals(&["LOAD", "LD"]) {
        let (path, after) = after.string_literal()?;
        return Some((Statement::Load(path), after));
    }
    if let Some(result) = parse_rem(c) {
        return Some(result);
    }
    if let Some(after) = c.literal("RUN") {
        return Some((Statement::Run, after));
    }
    if let Some(after) = c.literal("END") {
        return Some((Statement::End, after));
    }
    if let Some(after) = c.literal("CLEAR") {
        return Some((Statement::Clear, after));
    }
    if let Some(after) = c.literal("BYE") {
        return Some((Statement::Bye, after));
    }
    if let Some((_, after)) = c.one_of_literals(&["FILES", "FL"]) {
        return Some((Statement::Files, after));
    }
    if let Some(after) = c.literal("CLIPSAVE") {
        return Some((Statement::ClipSave, after));
    }
    if let Some(after) = c.literal("CLIPLOAD") {
        return Some((Statement::ClipLoad, after));
    }
    if let Some(after) = c.literal("TRON") {
        return Some((Statement::Tron, after));
    }
    if let Some(after) = c.literal("TROFF") {
        return Some((Statement::Troff, after));
    }
    if let Some(after) = c.literal("HELP") {
        return Some((Statement::Help, after));
    }
    if let Some(result) = parse_dim(c) {
        return Some(result);
    }
    // LET's keyword is optional, so it must be tried last: a bare
    // `lvalue = expr` with none of the keywords above is still a LET.
    parse_let(c)
}

fn parse_print_rest(after_kw: Cursor) -> Option<(Statement, Cursor)> {
    let probe = after_kw.skip_spaces();
    if probe.is_at_end() {
        return Some((Statement::PrintNewline, probe));
    }
    let (list, after) = parse_print_list(after_kw)?;
    Some((Statement::Print(list), after))
}

fn parse_print_list(c: Cursor) -> Option<(PrintList, Cursor)> {
    let mut entries = Vec::new();
    let mut cur = c;
    loop {
        let (item, after_item) = parse_print_item(cur)?;
        cur = after_item;
        let sep = if let Some(after_sep) = cur.literal(",") {
            cur = after_sep;
            Some(PrintSeparator::Comma)
        } else if let Some(after_sep) = cur.literal(";") {
            cur = after_sep;
            Some(PrintSeparator::Semicolon)
        } else {
            None
        };
        let more_follows = sep.is_some() && parse_print_item(cur).is_some();
        entries.push(PrintEntry { item, separator: sep });
        if !more_follows {
            break;
        }
    }
    Some((PrintList { entries }, cur))
}

fn parse_print_item(c: Cursor) -> Option<(PrintItem, Cursor)> {
    if let Some((s, after)) = c.string_literal() {
        return Some((PrintItem::Str(s), after));
    }
    let (expr, after) = parse_expression(c)?;
    Some((PrintItem::Expr(expr), after))
}

fn parse_input_rest(after_kw: Cursor) -> Option<(Statement, Cursor)> {
    let (first, mut cur) = parse_lvalue(after_kw)?;
    let mut lvalues = vec![first];
    while let Some(after_comma) = cur.literal(",") {
        let (lv, after_lv) = parse_lvalue(after_comma)?;
        lvalues.push(lv);
        cur = after_lv;
    }
    Some((Statement::Input(lvalues), cur))
}

fn parse_lvalue(c: Cursor) -> Option<(Lvalue, Cursor)> {
    if let Some(after) = c.literal("@(") {
        let (expr, after) = parse_expression(after)?;
        let after = after.literal(")")?;
        return Some((Lvalue::ArrayElement(expr), after));
    }
    let (name, after) = c.variable_name()?;
    Some((Lvalue::Variable(name), after))
}

fn parse_let(c: Cursor) -> Option<(Statement, Cursor)> {
    let after_kw = c.optional_literal("LET");
    let (lv, after_lv) = parse_lvalue(after_kw)?;
    let after_eq = after_lv.literal("=")?;
    let (expr, after_expr) = parse_expression(after_eq)?;
    Some((Statement::Let(lv, expr), after_expr))
}

fn parse_dim(c: Cursor) -> Option<(Statement, Cursor)> {
    let after = c.literal("DIM")?;
    let after = after.literal("@(")?;
    let (expr, after) = parse_expression(after)?;
    let after = after.literal(")")?;
    Some((Statement::DimArray(expr), after))
}

fn parse_if_rest(after_if: Cursor) -> Option<(Statement, Cursor)> {
    let (lhs, after) = parse_expression(after_if)?;
    let (op, after) = parse_relop(after)?;
    let (rhs, after) = parse_expression(after)?;
    let after = after.optional_literal("THEN");
    let (stmt, after) = parse_statement(after)?;
    Some((Statement::If(lhs, op, rhs, Box::new(stmt)), after))
}

fn parse_relop(c: Cursor) -> Option<(RelOp, Cursor)> {
    let (sym, after) = c.one_of_literals(&["<=", ">=", "<>", "><", "<", ">", "="])?;
    let op = match sym.as_str() {
        "<=" => RelOp::Le,
        ">=" => RelOp::Ge,
        "<>" | "><" => RelOp::Ne,
        "<" => RelOp::Lt,
        ">" => RelOp::Gt,
        "=" => RelOp::Eq,
        _ => unreachable!("one_of_literals only returns one of the options given"),
    };
    Some((op, after))
}

fn parse_list_range(c: Cursor) -> Option<(ListRange, Cursor)> {
    if c.skip_spaces().is_at_end() {
        return Some((ListRange::All, c));
    }
    let (lo, after) = parse_expression(c)?;
    if let Some(after_comma) = after.literal(",") {
        let (hi, after) = parse_expression(after_comma)?;
        return Some((ListRange::Range(lo, hi), after));
    }
    Some((ListRange::Single(lo), after))
}

fn parse_rem(c: Cursor) -> Option<(Statement, Cursor)> {
    let after = c.literal("REM").or_else(|| c.literal("'"))?;
    let text = after.rest();
    Some((Statement::Rem(text), after.to_end()))
}

/// `Expression = ["+" | "-"] UnsignedExpression`
fn parse_expression(c: Cursor) -> Option<(Expression, Cursor)> {
    if let Some(after) = c.literal("-") {
        let (u, after) = parse_unsigned_expression(after)?;
        return Some((Expression::Minus(u), after));
    }
    if let Some(after) = c.literal("+") {
        let (u, after) = parse_unsigned_expression(after)?;
        return Some((Expression::Plus(u), after));
    }
    let (u, after) = parse_unsigned_expression(c)?;
    Some((Expression::Unsigned(u), after))
}

fn parse_unsigned_expression(c: Cursor) -> Option<(UnsignedExpression, Cursor)> {
    let (term, after) = parse_term(c)?;
    if let Some(after_op) = after.literal("+") {
        let (rest, after) = parse_unsigned_expression(after_op)?;
        return Some((
            UnsignedExpression::Compound(term, AddOp::Add, Box::new(rest)),
            after,
        ));
    }
    if let Some(after_op) = after.literal("-") {
        let (rest, after) = parse_unsigned_expression(after_op)?;
        return Some((
            UnsignedExpression::Compound(term, AddOp::Sub, Box::new(rest)),
            after,
        ));
    }
    Some((UnsignedExpression::Value(term), after))
}

fn parse_term(c: Cursor) -> Option<(Term, Cursor)> {
    let (factor, after) = parse_factor(c)?;
    if let Some(after_op) = after.literal("*") {
        let (rest, after) = parse_term(after_op)?;
        return Some((Term::Compound(factor, MulOp::Mul, Box::new(rest)), after));
    }
    if let Some(after_op) = after.literal("/") {
        let (rest, after) = parse_term(after_op)?;
        return Some((Term::Compound(factor, MulOp::Div, Box::new(rest)), after));
    }
    Some((Term::Value(factor), after))
}

fn parse_factor(c: Cursor) -> Option<(Factor, Cursor)> {
    if let Some((n, after)) = c.number_literal() {
        return Some((Factor::Number(n), after));
    }
    if let Some(after) = c.literal("RND(") {
        let (expr, after) = parse_expression(after)?;
        let after = after.literal(")")?;
        return Some((Factor::Rnd(Box::new(expr)), after));
    }
    if let Some(after) = c.literal("@(") {
        let (expr, after) = parse_expression(after)?;
        let after = after.literal(")")?;
        return Some((Factor::ArrayElement(Box::new(expr)), after));
    }
    if let Some(after) = c.literal("(") {
        let (expr, after) = parse_expression(after)?;
        let after = after.literal(")")?;
        return Some((Factor::Paren(Box::new(expr)), after));
    }
    let (name, after) = c.variable_name()?;
    Some((Factor::Variable(name), after))
}

/// Parse exactly `expected` comma-separated input-expressions from a line
/// the user typed in response to `INPUT`. Each one is a number (optionally
/// signed) or a variable name, whose *current* value in `env` is substituted
/// immediately — this grammar never builds an AST node. Returns `None` on a
/// count mismatch, a malformed expression, or trailing characters.
pub fn parse_input_values(line: &str, expected: usize, env: &dyn Evaluator) -> Option<Vec<i32>> {
    let c = Cursor::new(line).skip_spaces();
    if expected == 0 {
        return if c.is_at_end() { Some(Vec::new()) } else { None };
    }
    let mut values = Vec::with_capacity(expected);
    let mut cur = c;
    loop {
        let (value, after) = parse_input_value(cur, env)?;
        values.push(value);
        cur = after;
        if values.len() == expected {
            break;
        }
        cur = cur.literal(",")?;
    }
    if cur.skip_spaces().is_at_end() {
        Some(values)
    } else {
        None
    }
}

fn parse_input_value(c: Cursor, env: &dyn Evaluator) -> Option<(i32, Cursor)> {
    let (negative, c) = if let Some(after) = c.literal("-") {
        (true, after)
    } else if let Some(after) = c.literal("+") {
        (false, after)
    } else {
        (false, c)
    };
    if let Some((n, after)) = c.number_literal() {
        return Some((if negative { n.wrapping_neg() } else { n }, after));
    }
    let (name, after) = c.variable_name()?;
    let v = env.variable(name);
    Some((if negative { v.wrapping_neg() } else { v }, after))
}
