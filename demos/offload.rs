/// Simulates failures in a batch offload, driven by the `ERRSIM`
/// environment variable.
///
/// ```shell
/// ERRSIM='EP_OFFLOAD=5:key2;EP_FLUSH=9@1' cargo run --example offload
/// ```
use errsim::{errsim_inject, errsim_inject_err, errsim_point};

errsim_point!(EP_OFFLOAD);
errsim_point!(EP_FLUSH);

#[derive(Debug, thiserror::Error)]
#[error("flush failed")]
struct FlushError;

struct Kv {
    key: String,
    value: Vec<u8>,
}

// Stores what it can and skips the entries whose offload "failed".
fn offload(batch: &[Kv]) -> Vec<&str> {
    let mut stored = Vec::new();
    for kv in batch {
        errsim_inject!(EP_OFFLOAD, kv.key, continue);
        tracing::debug!(key = %kv.key, len = kv.value.len(), "offloaded");
        stored.push(kv.key.as_str());
    }
    stored
}

fn flush(round: usize) -> Result<(), FlushError> {
    errsim_inject_err!(EP_FLUSH, "", FlushError);
    tracing::debug!(round, "flushed");
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let applied = errsim::activate_from_env()?;
    println!("activated {applied} point(s) from ${}", errsim::ENV_VAR);

    let batch: Vec<Kv> = (1..=4)
        .map(|i| Kv {
            key: format!("key{i}"),
            value: vec![0; i * 16],
        })
        .collect();

    for round in 0..2 {
        let stored = offload(&batch);
        println!("round {round}: stored {stored:?}");

        if let Err(e) = flush(round) {
            println!("round {round}: {e}");
        }
    }

    errsim::reset_all();
    Ok(())
}
