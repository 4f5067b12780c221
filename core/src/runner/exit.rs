use std::process::ExitStatus;

/// Flatten an [`ExitStatus`] into a single code. Signal deaths map to the
/// conventional `128 + signal`.
pub fn normalize_exit(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
