use crate::input::Error;

use std::sync::mpsc::Receiver;
use tracing::warn;

// A bad row in a command script doesn't stop the run: it's logged, and
// the driver carries on with the next command.
pub fn sink(input_errors: Receiver<Error>) -> std::thread::JoinHandle<usize> {
    std::thread::spawn(move || {
        let mut count = 0;
        for err in input_errors {
            warn!(%err, "failed to read command");
            count += 1;
        }
        count
    })
}
