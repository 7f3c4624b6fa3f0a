//! Host I/O interface.
//!
//! The engine never reads stdin, writes stdout, or touches the filesystem
//! directly: every visible effect crosses this trait. That keeps the engine
//! usable from a blocking batch loop or an event-driven GUI without change —
//! `step` never blocks, so a host that has nothing to offer yet returns
//! [`InputEvent::Waiting`] and the engine simply yields.

/// One character read from the host's input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Value(u8),
    EndOfStream,
    /// No input available right now; the host will be asked again on a
    /// later `step`. The engine's state is unchanged.
    Waiting,
}

/// A statement whose behavior the engine has no standard implementation
/// for and leaves entirely up to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Help,
    Files,
    ClipSave,
    ClipLoad,
}

/// Everything the engine needs from its host. The engine calls these; the
/// host never calls into the engine except via [`crate::engine::Engine::step`].
pub trait IoHost {
    fn get_input_char(&mut self) -> InputEvent;
    fn put_output_char(&mut self, b: u8);

    fn show_command_prompt(&mut self);
    fn show_input_prompt(&mut self);
    fn show_error(&mut self, message: &str);
    fn show_debug_trace(&mut self, message: &str);

    /// Requested shutdown. The engine transitions to its terminated state
    /// immediately after calling this; what the host does (exit the
    /// process, close a window, ...) is its own business.
    fn bye(&mut self);

    /// `HELP`/`FILES`/`CLIPSAVE`/`CLIPLOAD` — the spec delegates these to
    /// the host without defining a payload; a batch host can reasonably
    /// decline `FILES`/`CLIPSAVE`/`CLIPLOAD` while still answering `HELP`.
    fn host_command(&mut self, command: HostCommand);

    /// Convenience used by the engine to emit `s` one byte at a time. Does
    /// not append a newline; callers (`exec_print`, `exec_list`) add their
    /// own line endings explicitly.
    fn put_output_str(&mut self, s: &str) {
        for b in s.bytes() {
            self.put_output_char(b);
        }
    }
}
