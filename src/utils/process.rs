use anyhow::{anyhow, Result};
use log::debug;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::error::MapsError;

/// Finds a pid by name: an exact match on /proc/<pid>/comm, falling back
/// to a command-line substring match for interpreters and renamed threads.
pub fn get_pid_by_name(process_name: &str) -> Result<u32> {
    for entry in std::fs::read_dir("/proc")? {
        let entry = entry?;
        let Ok(pid) = entry.file_name().to_string_lossy().parse::<u32>() else {
            continue;
        };

        let comm = std::fs::read_to_string(format!("/proc/{}/comm", pid)).unwrap_or_default();
        if comm.trim_end() == process_name {
            debug!("resolved '{}' to pid {} via comm", process_name, pid);
            return Ok(pid);
        }

        let cmdline = std::fs::read_to_string(format!("/proc/{}/cmdline", pid)).unwrap_or_default();
        if !process_name.is_empty() && cmdline.contains(process_name) {
            debug!("resolved '{}' to pid {} via cmdline", process_name, pid);
            return Ok(pid);
        }
    }

    Err(anyhow!("Process {} not found", process_name))
}

/// Reads the raw maps text for `pid`, or for this process when `None`.
///
/// When diffing, read both raw snapshots before parsing either one: the
/// returned text is the only allocation the capture makes, and keeping
/// all parsing work after the second capture keeps it off the map being
/// measured.
pub fn read_maps(pid: Option<u32>) -> Result<String, MapsError> {
    let path = match pid {
        Some(pid) => format!("/proc/{}/maps", pid),
        None => "/proc/self/maps".to_string(),
    };
    Ok(std::fs::read_to_string(path)?)
}

/// Reads the maps text with the target stopped, so the layout cannot move
/// mid-read. The target is resumed even if the read fails.
pub fn read_maps_frozen(pid: u32) -> Result<String, MapsError> {
    signal_process(pid, Signal::SIGSTOP)?;
    debug!("process {} stopped for capture", pid);

    let result = read_maps(Some(pid));

    signal_process(pid, Signal::SIGCONT)?;
    debug!("process {} continued", pid);

    result
}

fn signal_process(pid: u32, signal: Signal) -> Result<(), MapsError> {
    kill(Pid::from_raw(pid as i32), signal)
        .map_err(|errno| std::io::Error::from_raw_os_error(errno as i32))?;
    Ok(())
}
