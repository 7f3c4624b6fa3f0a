//! Batch CLI host: runs the engine against stdin/stdout until `BYE` or
//! end-of-input, optionally pre-loading a program file named on the command
//! line (§6a).

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;

use tiny_basic::engine::io::{HostCommand, InputEvent, IoHost};
use tiny_basic::engine::{Engine, DEFAULT_ARRAY_SIZE};

/// A Tiny BASIC interpreter.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// A program file to load before entering the interactive loop.
    program: Option<PathBuf>,

    /// Enable TRON-style per-line execution tracing from startup.
    #[arg(long)]
    trace: bool,

    /// Numeric array size reserved by the engine on startup (§3).
    #[arg(long, default_value_t = DEFAULT_ARRAY_SIZE)]
    array_size: usize,
}

/// Reads stdin a byte at a time and writes to stdout; `HELP` prints a usage
/// banner, the clipboard/file-browser commands are not meaningful in a batch
/// process and are reported as unsupported.
struct StdioHost {
    stdin: std::io::Stdin,
    stdout: std::io::Stdout,
}

impl StdioHost {
    fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
            stdout: std::io::stdout(),
        }
    }
}

impl IoHost for StdioHost {
    fn get_input_char(&mut self) -> InputEvent {
        let mut byte = [0u8; 1];
        match self.stdin.lock().read(&mut byte) {
            Ok(0) => InputEvent::EndOfStream,
            Ok(_) => InputEvent::Value(byte[0]),
            Err(_) => InputEvent::EndOfStream,
        }
    }

    fn put_output_char(&mut self, b: u8) {
        let _ = self.stdout.lock().write_all(&[b]);
        if b == b'\n' {
            let _ = self.stdout.lock().flush();
        }
    }

    fn show_command_prompt(&mut self) {
        print!("> ");
        let _ = self.stdout.lock().flush();
    }

    fn show_input_prompt(&mut self) {
        print!("? ");
        let _ = self.stdout.lock().flush();
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn show_debug_trace(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn bye(&mut self) {
        println!("bye");
    }

    fn host_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Help => println!(
                "PRINT LET INPUT IF GOTO GOSUB RETURN END CLEAR RUN LIST SAVE LOAD DIM REM TRON TROFF BYE"
            ),
            HostCommand::Files | HostCommand::ClipSave | HostCommand::ClipLoad => {
                self.show_error("?? unsupported in batch mode");
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut engine = Engine::new(cli.array_size);
    engine.set_trace_on(cli.trace);
    let mut host = StdioHost::new();

    if let Some(path) = &cli.program {
        if let Err(err) = engine.load_from_file(&path.to_string_lossy(), &mut host) {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }

    loop {
        if engine.state() == tiny_basic::engine::State::Terminated {
            break;
        }
        engine.step(&mut host);
    }
}
