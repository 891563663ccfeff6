use std::{
    sync::mpsc::{channel, RecvTimeoutError, Sender},
    thread::JoinHandle,
    time::Duration,
};

use anyhow::Context;

/// Runs a callback on a worker thread once per interval until cancelled.
///
/// `cancel` joins the worker, so no callback is running or will run once it
/// returns. Dropping the task cancels it.
pub struct RepeatingTask {
    stop_sender: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl RepeatingTask {
    pub fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> anyhow::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_sender, stop_receiver) = channel::<()>();

        let worker = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || loop {
                match stop_receiver.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .with_context(|| format!("Failed to spawn {} thread", name))?;

        Ok(Self {
            stop_sender: Some(stop_sender),
            worker: Some(worker),
        })
    }

    pub fn cancel(&mut self) {
        if let Some(sender) = self.stop_sender.take() {
            // The worker may already be gone, in which case there is nothing to signal.
            let _ = sender.send(());
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Tick worker panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
