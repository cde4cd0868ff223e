//! Shared helpers used by sensor implementations.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::error::SensorError;

/// Interval between child-process polls while waiting for it to exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Check if a command exists by running `which`.
pub fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a subprocess and return its stdout, killing it if it outlives
/// `timeout`.
///
/// Stdout is drained on a reader thread while the child runs, so output
/// larger than the pipe buffer cannot stall it. The child is always reaped
/// before this returns: on success, on a non-zero exit, and on timeout.
pub fn run_command(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, SensorError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| SensorError::Launch {
            program: program.to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel();
    if let Some(mut stdout) = child.stdout.take() {
        std::thread::spawn(move || {
            let mut out = Vec::new();
            let result = stdout.read_to_end(&mut out).map(|_| out);
            let _ = tx.send(result);
        });
    }

    let start = Instant::now();
    let timed_out = || SensorError::Timeout {
        program: program.to_string(),
        timeout,
    };
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    return Err(SensorError::CommandFailed {
                        program: program.to_string(),
                        status: status.to_string(),
                    });
                }
                // A grandchild can keep the pipe open after the child exits.
                let remaining = timeout.saturating_sub(start.elapsed());
                let out = match rx.recv_timeout(remaining) {
                    Ok(result) => result.map_err(|source| SensorError::Output {
                        program: program.to_string(),
                        source,
                    })?,
                    Err(RecvTimeoutError::Timeout) => return Err(timed_out()),
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(SensorError::Output {
                            program: program.to_string(),
                            source: io::Error::other("stdout reader stopped"),
                        });
                    }
                };
                return Ok(String::from_utf8_lossy(&out).into_owned());
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(timed_out());
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SensorError::Launch {
                    program: program.to_string(),
                    source,
                });
            }
        }
    }
}

/// First `<digits>.<digit>` token in `text`, e.g. `47.0` out of
/// `"Thermal 1: ok, 47.0 degrees C"`.
pub fn first_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
            return text[start..i + 2].parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_decimal_takes_one_fraction_digit() {
        assert_eq!(first_decimal("Thermal 1: ok, 47.0 degrees C"), Some(47.0));
        assert_eq!(first_decimal("x 52.75 y"), Some(52.7));
        assert_eq!(first_decimal("temp=100.5"), Some(100.5));
    }

    #[test]
    fn first_decimal_skips_integers() {
        assert_eq!(first_decimal("Thermal 1: ok"), None);
        assert_eq!(first_decimal("Thermal 1: 3. then 61.2"), Some(61.2));
        assert_eq!(first_decimal(""), None);
        assert_eq!(first_decimal("12."), None);
    }

    #[test]
    fn run_command_reports_missing_program() {
        let err = run_command(
            "thermogov-definitely-not-a-program",
            &[],
            Duration::from_millis(200),
        )
        .unwrap_err();
        assert!(matches!(err, SensorError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn run_command_captures_stdout() {
        let out = run_command(
            "sh",
            &["-c", "echo 'Thermal 1: ok, 44.0 degrees C'"],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(first_decimal(&out), Some(44.0));
    }

    #[cfg(unix)]
    #[test]
    fn run_command_drains_output_larger_than_pipe_buffer() {
        let start = Instant::now();
        let out = run_command(
            "sh",
            &[
                "-c",
                "head -c 200000 /dev/zero | tr '\\0' 'x'; echo; echo 'Thermal 1: ok, 44.0 degrees C'",
            ],
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(out.len() > 200_000);
        let last = out.lines().last().unwrap();
        assert_eq!(first_decimal(last), Some(44.0));
    }

    #[cfg(unix)]
    #[test]
    fn run_command_reports_nonzero_exit() {
        let err = run_command("sh", &["-c", "exit 3"], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SensorError::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn run_command_kills_on_timeout() {
        let err = run_command("sleep", &["5"], Duration::from_millis(50)).unwrap_err();
        assert!(matches!(err, SensorError::Timeout { .. }));
    }
}
