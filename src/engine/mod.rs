//! # Execution engine
//!
//! A single-threaded, host-driven state machine (§4.4). The engine owns all
//! interpreter state — variables, the array, the stored program, the return
//! stack — and exposes exactly one operation, [`Engine::step`], which the
//! host calls repeatedly from its own loop. The engine never blocks: every
//! character read crosses [`io::IoHost`], which can answer `Waiting` to make
//! `step` return without progress.
//!
//! Mirrors the teacher's `first_pass` module in spirit — an explicit state
//! enum driving a single dispatch function — generalized from a one-shot
//! assembly pass to a resumable, host-driven loop.

pub mod io;
pub mod program;
pub mod random;

use std::path::PathBuf;

use rand::RngCore;

use crate::ast::{Evaluator, ListRange, Lvalue, PrintItem, PrintList, PrintSeparator, Statement};
use crate::error::BasicError;
use crate::parser::{self, ParsedLine};
use io::{HostCommand, InputEvent, IoHost};
use program::Program;

/// Default array length, per §3.
pub const DEFAULT_ARRAY_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    ReadingStatement,
    Running,
    ReadingInput,
    /// `BYE` or end-of-stream was observed; the host should stop calling
    /// `step`. Calling it anyway is a harmless no-op.
    Terminated,
}

enum LineRead {
    Complete(String),
    EndOfStream,
    Waiting,
}

pub struct Engine {
    state: State,
    program: Program,
    program_index: usize,
    variables: [i32; 26],
    array: Vec<i32>,
    return_stack: Vec<usize>,
    trace_on: bool,
    pending_input: Option<(Vec<Lvalue>, State)>,
    line_buffer: String,
    rng: Box<dyn RngCore + Send>,
}

impl Engine {
    pub fn new(array_size: usize) -> Self {
        Self::with_rng(array_size, random::entropy_source())
    }

    /// Construct with an explicit random source — tests use a fixed seed so
    /// `RND` sequences are reproducible (§4.3a).
    pub fn with_rng(array_size: usize, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            state: State::Idle,
            program: Program::new(),
            program_index: 0,
            variables: [0; 26],
            array: vec![0; array_size],
            return_stack: Vec::new(),
            trace_on: false,
            pending_input: None,
            line_buffer: String::new(),
            rng,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn trace_on(&self) -> bool {
        self.trace_on
    }

    pub fn set_trace_on(&mut self, value: bool) {
        self.trace_on = value;
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Advance the engine by one unit of work. Never blocks: a host with no
    /// input ready simply returns [`InputEvent::Waiting`] from
    /// `get_input_char` and this call returns without changing state.
    pub fn step(&mut self, io: &mut dyn IoHost) {
        match self.state {
            State::Terminated => {}
            State::Idle => {
                io.show_command_prompt();
                self.state = State::ReadingStatement;
            }
            State::ReadingStatement => match self.read_line(io) {
                LineRead::Waiting => {}
                LineRead::EndOfStream => self.state = State::Terminated,
                LineRead::Complete(line) => {
                    let state_before = self.state;
                    self.process_line(&line, io);
                    if self.state == state_before {
                        self.state = State::Idle;
                    }
                }
            },
            State::Running => self.step_running(io),
            State::ReadingInput => self.step_reading_input(io),
        }
    }

    fn step_running(&mut self, io: &mut dyn IoHost) {
        if self.program_index >= self.program.len() {
            self.abort_run("program does not terminate with END", io);
            return;
        }
        let (line_number, stmt) = self.program.at(self.program_index).cloned().unwrap();
        self.program_index += 1;
        if self.trace_on {
            io.show_debug_trace(&format!("[{line_number}]"));
        }
        tracing::debug!(line_number, statement = %stmt, "dispatch");
        self.execute_statement(&stmt, io);
    }

    fn step_reading_input(&mut self, io: &mut dyn IoHost) {
        match self.read_line(io) {
            LineRead::Waiting => {}
            LineRead::EndOfStream => {
                self.pending_input = None;
                self.abort_run("end of input while waiting for INPUT", io);
            }
            LineRead::Complete(line) => {
                let (lvalues, resume_state) = self
                    .pending_input
                    .take()
                    .expect("ReadingInput implies pending_input is set");
                match parser::parse_input_values(&line, lvalues.len(), &*self) {
                    Some(values) => {
                        for (lv, value) in lvalues.iter().zip(values) {
                            self.assign(lv, value);
                        }
                        self.state = resume_state;
                    }
                    None => {
                        self.pending_input = Some((lvalues, resume_state));
                        io.show_error("?? Redo from start");
                        io.show_input_prompt();
                    }
                }
            }
        }
    }

    /// Read characters off the host until a complete line, end-of-stream, or
    /// a suspension. Embedded state (`line_buffer`) survives across calls so
    /// a `Waiting` mid-line resumes correctly on the next `step`.
    fn read_line(&mut self, io: &mut dyn IoHost) -> LineRead {
        loop {
            match io.get_input_char() {
                InputEvent::Waiting => return LineRead::Waiting,
                InputEvent::EndOfStream => return LineRead::EndOfStream,
                InputEvent::Value(b'\n') => {
                    return LineRead::Complete(std::mem::take(&mut self.line_buffer));
                }
                InputEvent::Value(b'\t') => self.line_buffer.push(' '),
                InputEvent::Value(b) if (0x20..=0x7E).contains(&b) => {
                    self.line_buffer.push(b as char);
                }
                InputEvent::Value(_) => {}
            }
        }
    }

    /// Parse and immediately dispatch one line: store/delete a numbered
    /// line, execute an unnumbered statement, or report a parse error.
    /// Shared by the interactive `step` loop and `load_from_file`, and the
    /// natural entry point for tests that want to drive the engine without
    /// going through the `IoHost` character protocol line by line.
    pub fn process_line(&mut self, line: &str, io: &mut dyn IoHost) {
        match parser::parse_line(line) {
            ParsedLine::Empty => {}
            ParsedLine::EmptyNumbered(n) => self.program.delete(n),
            ParsedLine::Numbered(n, stmt) => self.program.insert_or_replace(n, stmt),
            ParsedLine::Unnumbered(stmt) => self.execute_statement(&stmt, io),
            ParsedLine::Error(message) => io.show_error(&message),
        }
    }

    fn execute_statement(&mut self, stmt: &Statement, io: &mut dyn IoHost) {
        match stmt {
            Statement::Print(list) => self.exec_print(list, io),
            Statement::PrintNewline => io.put_output_char(b'\n'),
            Statement::Input(lvalues) => {
                self.pending_input = Some((lvalues.clone(), self.state));
                self.state = State::ReadingInput;
                io.show_input_prompt();
            }
            Statement::Let(lv, expr) => {
                let value = expr.eval(self);
                self.assign(lv, value);
            }
            Statement::DimArray(expr) => {
                let n = expr.eval(self);
                if n < 0 {
                    self.abort_run("DIM requires a non-negative size", io);
                } else {
                    self.array = vec![0; n as usize];
                }
            }
            Statement::Goto(expr) => {
                let target = expr.eval(self);
                match self.program.index_of_line(target) {
                    Some(idx) => {
                        self.program_index = idx;
                        self.state = State::Running;
                    }
                    None => self.abort_run(&format!("GOTO undefined line {target}"), io),
                }
            }
            Statement::Gosub(expr) => {
                let target = expr.eval(self);
                match self.program.index_of_line(target) {
                    Some(idx) => {
                        self.return_stack.push(self.program_index);
                        self.program_index = idx;
                        self.state = State::Running;
                    }
                    None => self.abort_run(&format!("GOSUB undefined line {target}"), io),
                }
            }
            Statement::Return => match self.return_stack.pop() {
                Some(idx) => self.program_index = idx,
                None => self.abort_run("RETURN without matching GOSUB", io),
            },
            Statement::If(lhs, op, rhs, inner) => {
                let l = lhs.eval(self);
                let r = rhs.eval(self);
                if op.apply(l, r) {
                    self.execute_statement(inner, io);
                }
            }
            Statement::Rem(_) => {}
            Statement::Clear => {
                self.program.clear();
                self.variables = [0; 26];
                for cell in self.array.iter_mut() {
                    *cell = 0;
                }
                self.return_stack.clear();
                self.program_index = 0;
                self.state = State::Idle;
            }
            Statement::Run => {
                if self.program.is_empty() {
                    io.show_error("no program to run");
                } else {
                    self.variables = [0; 26];
                    for cell in self.array.iter_mut() {
                        *cell = 0;
                    }
                    self.return_stack.clear();
                    self.program_index = 0;
                    self.state = State::Running;
                }
            }
            Statement::End => self.state = State::Idle,
            Statement::List(range) => self.exec_list(range, io),
            Statement::Save(path) => self.exec_save(path, io),
            Statement::Load(path) => self.exec_load(path, io),
            Statement::Files => io.host_command(HostCommand::Files),
            Statement::ClipSave => io.host_command(HostCommand::ClipSave),
            Statement::ClipLoad => io.host_command(HostCommand::ClipLoad),
            Statement::Tron => self.trace_on = true,
            Statement::Troff => self.trace_on = false,
            Statement::Bye => {
                io.bye();
                self.state = State::Terminated;
            }
            Statement::Help => io.host_command(HostCommand::Help),
        }
    }

    fn exec_print(&mut self, list: &PrintList, io: &mut dyn IoHost) {
        for entry in &list.entries {
            let text = match &entry.item {
                PrintItem::Expr(expr) => expr.eval(self).to_string(),
                PrintItem::Str(s) => s.clone(),
            };
            io.put_output_str(&text);
            match entry.separator {
                Some(PrintSeparator::Comma) => io.put_output_char(b'\t'),
                Some(PrintSeparator::Semicolon) => {}
                None => io.put_output_char(b'\n'),
            }
        }
    }

    fn exec_list(&mut self, range: &ListRange, io: &mut dyn IoHost) {
        let (lo, hi) = match range {
            ListRange::All => (i32::MIN, i32::MAX),
            ListRange::Single(n) => {
                let v = n.eval(self);
                (v, v)
            }
            ListRange::Range(lo, hi) => (lo.eval(self), hi.eval(self)),
        };
        let rendered: Vec<String> = self
            .program
            .in_range(lo, hi)
            .map(|(n, stmt)| format!("{n} {stmt}\n"))
            .collect();
        for line in rendered {
            io.put_output_str(&line);
        }
    }

    fn exec_save(&mut self, path: &str, io: &mut dyn IoHost) {
        match self.save_to_file(path) {
            Ok(()) => tracing::info!(path, "program saved"),
            Err(err) => io.show_error(&err.to_string()),
        }
    }

    fn exec_load(&mut self, path: &str, io: &mut dyn IoHost) {
        match self.load_from_file(path, io) {
            Ok(()) => tracing::info!(path, "program loaded"),
            Err(err) => io.show_error(&err.to_string()),
        }
    }

    /// Writes the same text `LIST` would emit. Part of the engine's public
    /// API — also used by the batch host to pre-load a program file named
    /// on the command line (§6a).
    pub fn save_to_file(&self, path: &str) -> Result<(), BasicError> {
        let mut text = String::new();
        for (n, stmt) in self.program.iter() {
            text.push_str(&format!("{n} {stmt}\n"));
        }
        std::fs::write(path, text).map_err(|source| BasicError::SaveFile {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Feeds a file's lines through the same line processor interactive
    /// input uses, so `RUN`/`GOTO`/`INPUT` embedded mid-file behave exactly
    /// as typing them would (§9 open questions). Does *not* clear the
    /// existing program first.
    pub fn load_from_file(&mut self, path: &str, io: &mut dyn IoHost) -> Result<(), BasicError> {
        let text = std::fs::read_to_string(path).map_err(|source| BasicError::LoadFile {
            path: PathBuf::from(path),
            source,
        })?;
        for line in text.lines() {
            self.process_line(line, io);
        }
        Ok(())
    }

    fn assign(&mut self, lv: &Lvalue, value: i32) {
        match lv {
            Lvalue::Variable(name) => self.variables[(*name as u8 - b'A') as usize] = value,
            Lvalue::ArrayElement(expr) => {
                let index = expr.eval(self);
                if !self.array.is_empty() {
                    let idx = array_index(index, self.array.len());
                    self.array[idx] = value;
                }
            }
        }
    }

    fn abort_run(&mut self, message: &str, io: &mut dyn IoHost) {
        tracing::warn!(message, "run aborted");
        io.show_error(&format!("{message}; abort: program terminated"));
        self.state = State::Idle;
    }
}

/// Array index mapping from §3: non-negative wraps modulo `len`; negative
/// addresses from the end. `i.rem_euclid(len)` implements both branches in
/// one expression (Rust's Euclidean remainder is always non-negative).
fn array_index(i: i32, len: usize) -> usize {
    i.rem_euclid(len as i32) as usize
}

impl Evaluator for Engine {
    fn variable(&self, name: char) -> i32 {
        self.variables[(name as u8 - b'A') as usize]
    }

    fn array_element(&self, index: i32) -> i32 {
        if self.array.is_empty() {
            return 0;
        }
        self.array[array_index(index, self.array.len())]
    }

    fn rnd(&mut self, bound: i32) -> i32 {
        random::bounded(&mut *self.rng, bound)
    }
}
