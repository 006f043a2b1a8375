//! Validate a batch of inbound frames and print the reply a broker would send.
//!
//! Run with: cargo run --example broker-replies

use std::sync::Arc;
use std::thread;

use pubsub_dialect::dialect::Message;
use pubsub_dialect::Dialect;

const FRAMES: &[&str] = &[
    r#"{"seq":1,"action":"session-uuid"}"#,
    r#"{"seq":2,"action":"subscribe","channel":"news"}"#,
    r#"{"seq":3,"action":"pub","chan":"news","msg":"hello"}"#,
    r#"{"seq":4,"action":"pub","chan":"","msg":"hello"}"#,
    r#"{"seq":5,"action":"teleport"}"#,
    "{not json",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dialect = Arc::new(Dialect::new()?);

    let workers: Vec<_> = FRAMES
        .iter()
        .map(|frame| {
            let dialect = Arc::clone(&dialect);
            thread::spawn(move || {
                let outcome = dialect.parse_and_auto_validate(frame);
                if let Some(reply) = outcome.reply() {
                    return format!("reply {reply}");
                }
                match outcome.message() {
                    Some(Message::Request { seq, action, body }) => {
                        format!("accept seq={seq} action={action} body={body:?}")
                    }
                    other => format!("accept {other:?}"),
                }
            })
        })
        .collect();

    for (frame, worker) in FRAMES.iter().zip(workers) {
        let line = worker.join().map_err(|_| "worker panicked")?;
        println!("{frame}\n  -> {line}");
    }

    Ok(())
}
