use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Runs an external command in `working_dir`.
///
/// Output goes straight to the terminal unless `quiet`, in which case it is
/// captured, logged at debug level, and stderr is surfaced on failure. The
/// error string is meant for the final report, not for propagation.
pub fn run_command(
    program: &str,
    args: &[String],
    working_dir: &Path,
    quiet: bool,
) -> std::result::Result<(), String> {
    log::debug!("Executing: {} {}", program, args.join(" "));

    let mut command = Command::new(program);
    command.current_dir(working_dir).args(args);

    if !quiet {
        let status = command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| format!("failed to spawn '{program}': {e}"))?;

        return check_status(program, status, "");
    }

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("failed to spawn '{program}': {e}"))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        log::debug!("{line}");
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    check_status(program, output.status, stderr.trim())
}

fn check_status(program: &str, status: ExitStatus, detail: &str) -> std::result::Result<(), String> {
    if status.success() {
        return Ok(());
    }

    let code = status
        .code()
        .map_or_else(|| "a signal".to_string(), |code| format!("exit code {code}"));

    if detail.is_empty() {
        Err(format!("'{program}' failed with {code}"))
    } else {
        Err(format!("'{program}' failed with {code}: {detail}"))
    }
}
