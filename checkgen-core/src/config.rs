/// The system call number used to write to a file descriptor.
pub const SYS_WRITE: u16 = 5;
/// The system call number used to terminate the program.
pub const SYS_EXIT: u16 = 1;
/// The file descriptor of the standard output stream.
pub const STDOUT_FILENO: u32 = 1;

/// The value written to the sentinel register when a branch is taken.
pub const TAKEN_SENTINEL: u32 = 0xc001_c001;
/// The value written to the sentinel register when a branch falls through.
pub const NOT_TAKEN_SENTINEL: u32 = 0xdead_beef;

/// The bytes consumed by the instrumentation between two program counter reads.
pub const PC_CORRECTION: i64 = 2;

/// Describes the target machine and the runtime environment of the generated program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetConfig {
    /// The machine name written in the program header.
    pub machine: String,
    /// The string written to standard output when every check passes.
    pub pass_message: String,
    /// The string written to standard output when a check fails.
    pub fail_message: String,
    /// The linker provided symbol marking the start of the scratch buffer.
    pub buffer_symbol: String,
    /// The linker provided symbol marking the end of the scratch buffer.
    pub buffer_end_symbol: String,
    /// The distance into the buffer used by memory tests, so negative offsets stay inside it.
    pub buffer_bias: i64,
    pub sys_write: u16,
    pub sys_exit: u16,
    pub stdout_fd: u32,
    /// The exit status used by both the pass and the fail sequence.
    pub exit_status: u32,
}

impl TargetConfig {
    /// The pass message, escaped for a `.string` directive.
    pub fn escaped_pass_message(&self) -> String {
        self.pass_message.escape_default().to_string()
    }

    /// The fail message, escaped for a `.string` directive.
    pub fn escaped_fail_message(&self) -> String {
        self.fail_message.escape_default().to_string()
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            machine: String::from("brew"),
            pass_message: String::from("pass\n"),
            fail_message: String::from("fail\n"),
            buffer_symbol: String::from(".buffer"),
            buffer_end_symbol: String::from(".buffer_end"),
            buffer_bias: 128,
            sys_write: SYS_WRITE,
            sys_exit: SYS_EXIT,
            stdout_fd: STDOUT_FILENO,
            exit_status: 0,
        }
    }
}
