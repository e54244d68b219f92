use super::message::{AppMsg, LoopPlan};
use crate::shared::errors::RuntimeError;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const READ_CHUNK_BYTES: usize = 4096;
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Running loop command. Output arrives as `AppMsg::LogChunk`, followed by
/// exactly one `AppMsg::LoopExited`.
#[derive(Debug)]
pub struct LoopHandle {
    kill_requested: Arc<AtomicBool>,
    waiter: Option<JoinHandle<()>>,
}

impl LoopHandle {
    pub fn kill(&self) {
        self.kill_requested.store(true, Ordering::SeqCst);
    }

    /// Kills the process if it is still running and waits for the reader threads.
    pub fn shutdown(mut self) {
        self.kill();
        if let Some(waiter) = self.waiter.take() {
            let _ = waiter.join();
        }
    }
}

/// Starts `sh -c <plan.command>` in the project directory with the plan
/// exported through the environment. On unix the shell leads its own process
/// group so a kill reaches everything it started.
pub fn spawn_loop_process(plan: &LoopPlan, sender: Sender<AppMsg>) -> Result<LoopHandle, RuntimeError> {
    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(&plan.command)
        .current_dir(&plan.project.path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in plan.env() {
        command.env(key, value);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    let spawn_error = |source| RuntimeError::LoopSpawn {
        command: plan.command.clone(),
        source,
    };
    let mut child = command.spawn().map_err(spawn_error)?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| spawn_error(std::io::Error::other("missing stdout pipe")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| spawn_error(std::io::Error::other("missing stderr pipe")))?;

    let readers = vec![
        spawn_reader(stdout, sender.clone()),
        spawn_reader(stderr, sender.clone()),
    ];
    let kill_requested = Arc::new(AtomicBool::new(false));
    let waiter = {
        let kill_requested = Arc::clone(&kill_requested);
        thread::spawn(move || {
            let code = wait_for_exit(&mut child, &kill_requested);
            // A killed loop may leave descendants holding the pipes; its
            // readers are left to finish on their own.
            if !kill_requested.load(Ordering::SeqCst) {
                for reader in readers {
                    let _ = reader.join();
                }
            }
            let _ = sender.send(AppMsg::LoopExited(code));
        })
    };
    Ok(LoopHandle {
        kill_requested,
        waiter: Some(waiter),
    })
}

fn wait_for_exit(child: &mut Child, kill_requested: &AtomicBool) -> Option<i32> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status.code(),
            Ok(None) => {
                if kill_requested.load(Ordering::SeqCst) {
                    kill_process_group(child.id());
                    let _ = child.kill();
                    return child.wait().ok().and_then(|status| status.code());
                }
                thread::sleep(WAIT_POLL);
            }
            Err(_) => return None,
        }
    }
}

fn kill_process_group(pgid: u32) {
    #[cfg(unix)]
    {
        let _ = Command::new("kill")
            .arg("-KILL")
            .arg("--")
            .arg(format!("-{pgid}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }

    #[cfg(not(unix))]
    {
        let _ = pgid;
    }
}

fn spawn_reader<R>(mut source: R, sender: Sender<AppMsg>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0_u8; READ_CHUNK_BYTES];
        let mut pending = Vec::new();
        loop {
            let read = match source.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(read) => read,
            };
            pending.extend_from_slice(&buf[..read]);
            let text = drain_utf8(&mut pending);
            if !text.is_empty() && sender.send(AppMsg::LogChunk(text)).is_err() {
                return;
            }
        }
        if !pending.is_empty() {
            let text = String::from_utf8_lossy(&pending).into_owned();
            let _ = sender.send(AppMsg::LogChunk(text));
        }
    })
}

/// Decodes everything in `pending` except an incomplete multi-byte sequence
/// at the end, which stays buffered for the next read. Invalid bytes are
/// replaced one sequence at a time.
fn drain_utf8(pending: &mut Vec<u8>) -> String {
    let mut out = String::new();
    let mut start = 0;
    loop {
        match std::str::from_utf8(&pending[start..]) {
            Ok(text) => {
                out.push_str(text);
                start = pending.len();
                break;
            }
            Err(err) => {
                let valid = start + err.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&pending[start..valid]));
                match err.error_len() {
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        start = valid + len;
                    }
                    None => {
                        start = valid;
                        break;
                    }
                }
            }
        }
    }
    pending.drain(..start);
    out
}
