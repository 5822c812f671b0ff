//! Bounded subprocess capture with a wall-clock timeout.
//!
//! The command runs under `sh -c` with stdin from the null device and both
//! stdout and stderr dup'ed onto the write end of a single pipe, so the two
//! streams interleave exactly as the terminal would have seen them. A
//! dedicated reader thread drains the read end into a buffer capped at
//! `buffer_size − 1` bytes and hands the result over a channel; the caller
//! awaits it with a deadline. Timeout and partial output are mutually
//! exclusive: when the deadline fires, whatever was read is discarded and
//! the fixed diagnostic payload takes its place.
//!
//! The child is spawned as its own process group so the post-capture signal
//! sweep also reaches grandchildren holding the pipe open; every path
//! signals and reaps before returning.

use std::time::Duration;

use crate::core::errors::Result;

/// Replaces the buffer contents wholesale when the deadline fires.
pub const TIMEOUT_PAYLOAD: &[u8] = b"\n\n\t\tCOMMAND TIMED OUT";

/// Result of one capture cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The command finished (or filled the buffer) before the deadline.
    Completed(Vec<u8>),
    /// The deadline fired; the payload is the fixed diagnostic text.
    TimedOut(Vec<u8>),
}

impl CaptureOutcome {
    /// Captured bytes, whichever way the cycle ended.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Completed(b) | Self::TimedOut(b) => b,
        }
    }

    /// Whether this cycle hit the deadline.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

/// Run `command` through the shell and capture its merged output.
///
/// `buffer_size` bounds the capture (one byte is reserved, matching the
/// configured capacity contract); `timeout` bounds the wall-clock duration.
/// Buffer allocation failure is fatal; a command the shell cannot find is
/// not — the shell's own complaint becomes the captured output.
#[cfg(unix)]
pub fn run_capture(command: &str, buffer_size: usize, timeout: Duration) -> Result<CaptureOutcome> {
    use crossbeam_channel::{RecvTimeoutError, bounded};

    use crate::core::errors::VigilError;

    let cap = buffer_size.saturating_sub(1);
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(cap)
        .map_err(|_| VigilError::BufferAlloc { bytes: cap })?;

    let (mut child, pipe) = unix::spawn_shell(command)?;

    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        let _ = tx.send(drain(pipe, buffer, cap));
    });

    let outcome = match rx.recv_timeout(timeout) {
        Ok(bytes) => CaptureOutcome::Completed(bytes),
        Err(RecvTimeoutError::Timeout) => {
            let len = TIMEOUT_PAYLOAD.len().min(cap);
            CaptureOutcome::TimedOut(TIMEOUT_PAYLOAD[..len].to_vec())
        }
        Err(RecvTimeoutError::Disconnected) => {
            unix::signal_and_reap(&mut child);
            return Err(VigilError::ChannelClosed {
                component: "capture reader",
            });
        }
    };

    unix::signal_and_reap(&mut child);
    Ok(outcome)
}

/// Non-Unix platforms cannot merge stdout/stderr onto one pipe.
#[cfg(not(unix))]
pub fn run_capture(
    _command: &str,
    _buffer_size: usize,
    _timeout: Duration,
) -> Result<CaptureOutcome> {
    Err(crate::core::errors::VigilError::UnsupportedPlatform {
        details: "merged-pipe capture requires a Unix platform".to_string(),
    })
}

/// Read until end-of-stream or the buffer holds `cap` bytes.
#[cfg(unix)]
fn drain(mut pipe: std::fs::File, mut buffer: Vec<u8>, cap: usize) -> Vec<u8> {
    use std::io::Read;

    let mut chunk = [0u8; 64 * 1024];
    while buffer.len() < cap {
        match pipe.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let take = n.min(cap - buffer.len());
                buffer.extend_from_slice(&chunk[..take]);
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(_) => break,
        }
    }
    buffer
}

#[cfg(unix)]
mod unix {
    use std::fs::File;
    use std::os::unix::process::CommandExt;
    use std::process::{Child, Command, Stdio};

    use crate::core::errors::{Result, VigilError};

    /// Spawn `sh -c command` in its own process group, stdout+stderr on one
    /// shared pipe. Returns the child and the pipe's read end.
    pub(super) fn spawn_shell(command: &str) -> Result<(Child, File)> {
        let (read_fd, write_fd) = nix::unistd::pipe().map_err(|e| VigilError::Spawn {
            details: format!("pipe: {e}"),
        })?;
        let write_dup = write_fd.try_clone().map_err(|e| VigilError::Spawn {
            details: format!("dup: {e}"),
        })?;

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::from(write_fd))
            .stderr(Stdio::from(write_dup))
            .process_group(0)
            .spawn()
            .map_err(|e| VigilError::Spawn {
                details: e.to_string(),
            })?;

        Ok((child, File::from(read_fd)))
    }

    /// Terminate the child's whole process group and reap the child.
    /// Errors are ignored: the group is usually already gone on the
    /// normal-completion path.
    pub(super) fn signal_and_reap(child: &mut Child) {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(child.id()) {
            let pgid = Pid::from_raw(pid);
            let _ = killpg(pgid, Signal::SIGHUP);
            let _ = killpg(pgid, Signal::SIGKILL);
        }
        let _ = child.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = run_capture("printf 'hello'", 1024, Duration::from_secs(5)).unwrap();
        assert!(!out.timed_out());
        assert_eq!(out.bytes(), b"hello");
    }

    #[test]
    fn trailing_newline_is_preserved() {
        let out = run_capture("printf 'one\\ntwo\\n'", 1024, Duration::from_secs(5)).unwrap();
        assert_eq!(out.bytes(), b"one\ntwo\n");
    }

    #[test]
    fn stderr_is_merged_into_the_stream() {
        let out = run_capture("printf 'err' 1>&2", 1024, Duration::from_secs(5)).unwrap();
        assert_eq!(out.bytes(), b"err");
    }

    #[test]
    fn unknown_command_surfaces_shell_text() {
        let out = run_capture(
            "definitely_not_a_command_vgl_test",
            4096,
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(!out.timed_out());
        assert!(
            !out.bytes().is_empty(),
            "shell should have complained on the merged stream"
        );
    }

    #[test]
    fn buffer_cap_truncates_at_capacity_minus_one() {
        let out = run_capture("yes x | head -c 1000", 100, Duration::from_secs(5)).unwrap();
        assert!(!out.timed_out());
        assert_eq!(out.bytes().len(), 99);
    }

    #[test]
    fn exact_fit_output_is_not_truncated() {
        // 99 bytes of output into a 100-byte buffer: fits under the cap.
        let out = run_capture("yes x | head -c 99", 100, Duration::from_secs(5)).unwrap();
        assert!(!out.timed_out());
        assert_eq!(out.bytes().len(), 99);
    }

    #[test]
    fn timeout_discards_partial_output() {
        let out = run_capture(
            "printf 'partial'; sleep 5",
            1024,
            Duration::from_millis(200),
        )
        .unwrap();
        assert!(out.timed_out());
        assert_eq!(out.bytes(), TIMEOUT_PAYLOAD);
    }

    #[test]
    fn timeout_payload_respects_tiny_buffers() {
        let out = run_capture("sleep 5", 5, Duration::from_millis(200)).unwrap();
        assert!(out.timed_out());
        assert_eq!(out.bytes(), &TIMEOUT_PAYLOAD[..4]);
    }

    #[test]
    fn empty_output_completes() {
        let out = run_capture("true", 1024, Duration::from_secs(5)).unwrap();
        assert!(!out.timed_out());
        assert!(out.bytes().is_empty());
    }
}
