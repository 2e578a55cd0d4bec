//! Minimal synchronized example.
//!
//! Run with: `cargo run --example basic`

use std::sync::Arc;
use std::thread;

use synchronized::synchronized;

synchronized! {
    /// Per-endpoint request statistics shared between worker threads.
    struct Endpoint {
        #[locked(Checked)]
        let mut hits: u64 = 0;
        #[locked(CheckedOptional)]
        let mut last_status: Option<u16> = None;
        name: String,
    }
}

fn main() {
    let endpoint = Arc::new(Endpoint::new("/health".into()));

    let workers: Vec<_> = (0..4u16)
        .map(|i| {
            let endpoint = endpoint.clone();
            thread::spawn(move || {
                endpoint.set_hits(endpoint.hits() + 1);
                if endpoint.try_set_last_status(Some(200 + i)).is_err() {
                    println!("worker {i}: status lock busy, skipped");
                }
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            eprintln!("worker panicked");
        }
    }

    println!(
        "{}: {} hits, last status {:?}",
        endpoint.name,
        endpoint.hits(),
        endpoint.last_status()
    );
}
