//! JSON-lines event feed.
//!
//! Replays recorded game events into the service, one JSON object per
//! line, optionally tailing the file for appended lines. This stands in
//! for a real transport during testing and replay sessions.

use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::{Duration, sleep};

use autoloot_core::{GameEvent, ServiceHandle};

/// Feed events from `path` into the service. With `follow`, keeps polling
/// the file for new lines the way a log tail does; otherwise stops at the
/// current end of file. Returns the number of events fed.
pub async fn feed_events(
    path: &Path,
    follow: bool,
    handle: ServiceHandle,
) -> std::io::Result<u64> {
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::Start(0)).await?;

    let mut line = String::new();
    let mut count = 0u64;

    loop {
        match reader.read_line(&mut line).await {
            Ok(0) => {
                if !follow {
                    break;
                }
                // No new data, wait briefly before checking again
                sleep(Duration::from_millis(100)).await;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    match serde_json::from_str::<GameEvent>(trimmed) {
                        Ok(event) => {
                            if handle.send_event(event).await.is_err() {
                                // Service is gone; stop feeding.
                                break;
                            }
                            count += 1;
                        }
                        Err(err) => {
                            tracing::warn!(%err, "skipping malformed event line");
                        }
                    }
                }
                line.clear();
            }
            Err(e) => return Err(e),
        }
    }

    Ok(count)
}
