use std::collections::VecDeque;

use tiny_basic::engine::io::{HostCommand, InputEvent, IoHost};
use tiny_basic::engine::random::fixed_source;
use tiny_basic::engine::{Engine, State};

struct FakeHost {
    input: VecDeque<u8>,
    output: Vec<u8>,
    errors: Vec<String>,
}

impl FakeHost {
    fn with_input(s: &str) -> Self {
        Self {
            input: s.bytes().collect(),
            output: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn output_string(&self) -> String {
        String::from_utf8(self.output.clone()).expect("output is ASCII")
    }
}

impl IoHost for FakeHost {
    fn get_input_char(&mut self) -> InputEvent {
        match self.input.pop_front() {
            Some(b) => InputEvent::Value(b),
            None => InputEvent::EndOfStream,
        }
    }

    fn put_output_char(&mut self, b: u8) {
        self.output.push(b);
    }

    fn show_command_prompt(&mut self) {}
    fn show_input_prompt(&mut self) {}

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_debug_trace(&mut self, _message: &str) {}

    fn bye(&mut self) {}

    fn host_command(&mut self, _command: HostCommand) {}
}

fn run_program(source: &str) -> FakeHost {
    let mut engine = Engine::with_rng(8, fixed_source(1));
    let mut host = FakeHost::with_input(source);
    for _ in 0..10_000 {
        if engine.state() == State::Terminated {
            return host;
        }
        engine.step(&mut host);
    }
    panic!("engine did not settle within step budget");
}

#[test]
fn fibonacci_like_loop_prints_running_total() {
    let mut host = run_program(
        "10 LET A=0\n20 LET B=1\n30 LET C=A+B\n40 PRINT C\n50 LET A=B\n60 LET B=C\n\
         70 IF C<50 THEN GOTO 30\n80 END\nRUN\nBYE\n",
    );
    let lines: Vec<&str> = host.output_string().lines().collect();
    assert_eq!(lines, vec!["1", "2", "3", "5", "8", "13", "21", "34", "55"]);
    assert!(host.errors.is_empty());
}

#[test]
fn nested_if_then_chains() {
    let host = run_program(
        "10 LET X=5\n20 IF X>0 THEN IF X<10 THEN PRINT \"mid\"\n30 END\nRUN\nBYE\n",
    );
    assert_eq!(host.output_string(), "mid\n");
}

#[test]
fn input_drives_a_computed_print() {
    let host = run_program("10 INPUT N\n20 PRINT N*N\n30 END\nRUN\n7\nBYE\n");
    assert_eq!(host.output_string(), "49\n");
}

#[test]
fn list_renders_canonical_source_and_is_reparsable() {
    let host = run_program(
        "10 LET A = 1 + 2 * 3\n20 IF A   >   0 THEN PRINT A\n30 END\nLIST\nBYE\n",
    );
    assert_eq!(
        host.output_string(),
        "10 LET A = 1 + 2 * 3\n20 IF A > 0 THEN PRINT A\n30 END\n"
    );
}

#[test]
fn clear_resets_program_and_variables() {
    let host = run_program("10 LET A=1\nCLEAR\nLIST\nPRINT A\nBYE\n");
    assert_eq!(host.output_string(), "0\n");
}

#[test]
fn redo_from_start_on_wrong_input_count_then_recovers() {
    let host = run_program("10 INPUT A,B\n20 PRINT A+B\n30 END\nRUN\n1\n1,2\nBYE\n");
    assert!(host.errors.iter().any(|e| e.contains("Redo from start")));
    assert_eq!(host.output_string(), "3\n");
}

#[test]
fn save_and_load_round_trip_through_a_real_file() {
    let mut engine = Engine::with_rng(8, fixed_source(1));
    let mut host = FakeHost::with_input("");
    engine.process_line("10 LET A=1", &mut host);
    engine.process_line("20 PRINT A", &mut host);
    engine.process_line("30 END", &mut host);

    let file = tempfile::NamedTempFile::new().expect("create temp file");
    let path = file.path().to_str().expect("utf-8 path");
    engine.save_to_file(path).expect("save succeeds");

    let mut loaded = Engine::with_rng(8, fixed_source(1));
    let mut load_host = FakeHost::with_input("");
    loaded
        .load_from_file(path, &mut load_host)
        .expect("load succeeds");

    assert_eq!(loaded.program().len(), 3);

    let mut run_host = FakeHost::with_input("RUN\nBYE\n");
    for _ in 0..10_000 {
        if loaded.state() == State::Terminated {
            break;
        }
        loaded.step(&mut run_host);
    }
    assert_eq!(run_host.output_string(), "1\n");
}
