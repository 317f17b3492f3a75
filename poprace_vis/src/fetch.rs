//! One-shot dataset fetch on a worker thread.
//!
//! The render loop never blocks on the network: the request runs on its own
//! thread and the loop polls for the outcome once per frame. There is no
//! retry and no timeout beyond reqwest's defaults; a failed fetch is
//! terminal for the session.

use std::sync::mpsc;
use std::thread;

use poprace::dataset::YearlyDataset;

pub struct DatasetFetcher {
    rx_done: mpsc::Receiver<Result<YearlyDataset, String>>,
}

impl DatasetFetcher {
    /// Kick off `GET {base_url}/population` in the background.
    pub fn start(base_url: String) -> Self {
        let (tx_done, rx_done) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx_done.send(fetch_dataset(&base_url));
        });
        Self { rx_done }
    }

    pub fn poll_done(&self) -> Option<Result<YearlyDataset, String>> {
        self.rx_done.try_recv().ok()
    }
}

fn fetch_dataset(base_url: &str) -> Result<YearlyDataset, String> {
    let url = format!("{base_url}/population");
    let response =
        reqwest::blocking::get(&url).map_err(|e| format!("request failed: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("server returned {}", response.status()));
    }
    response
        .json::<YearlyDataset>()
        .map_err(|e| format!("invalid dataset: {e}"))
}
