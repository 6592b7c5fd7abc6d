// ─── Process Termination ───
// Graceful stop request for the server process. A process that is already
// gone is not an error.

#[cfg(unix)]
pub fn terminate(pid: u32) -> std::io::Result<()> {
    let pid = libc::pid_t::try_from(pid).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid pid {pid}"))
    })?;

    // SAFETY: kill(2) takes plain integers and has no memory-safety requirements.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(())
    } else {
        Err(err)
    }
}

/// `taskkill` without `/F` asks the process tree to close. Console
/// processes without a window refuse that request, so a forced kill follows.
#[cfg(windows)]
pub fn terminate(pid: u32) -> std::io::Result<()> {
    // 128: no such process
    const NOT_FOUND: i32 = 128;

    let pid = pid.to_string();
    let graceful = std::process::Command::new("taskkill")
        .args(["/PID", &pid, "/T"])
        .status()?;
    if graceful.success() || graceful.code() == Some(NOT_FOUND) {
        return Ok(());
    }

    tracing::warn!("Process {} refused a graceful close; forcing it", pid);
    let forced = std::process::Command::new("taskkill")
        .args(["/PID", &pid, "/T", "/F"])
        .status()?;
    if forced.success() || forced.code() == Some(NOT_FOUND) {
        Ok(())
    } else {
        Err(std::io::Error::other(format!(
            "taskkill for {pid} returned {:?}",
            forced.code()
        )))
    }
}
