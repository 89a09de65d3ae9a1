use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::error::{MongoDaoError, MongoResult};

/// Exponential backoff applied while waiting for the first successful ping.
struct PingBackoff {
    attempts: u32,
    delay: Duration,
}

impl PingBackoff {
    const MAX_ATTEMPTS: u32 = 10;
    const MAX_DELAY: Duration = Duration::from_secs(5);

    fn new() -> Self {
        Self {
            attempts: 0,
            delay: Duration::from_millis(250),
        }
    }

    /// Register a failure; returns the delay to wait, or `None` once attempts are exhausted.
    fn on_failure(&mut self) -> Option<Duration> {
        self.attempts += 1;
        if self.attempts >= Self::MAX_ATTEMPTS {
            return None;
        }
        let delay = self.delay;
        self.delay = (self.delay * 2).min(Self::MAX_DELAY);
        Some(delay)
    }
}

/// Build a client and wait until the database answers a ping.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);
    let mut backoff = PingBackoff::new();

    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                debug!(database = database_name, "MongoDB ping succeeded");
                return Ok((client, database));
            }
            Err(source) => match backoff.on_failure() {
                Some(delay) => {
                    warn!(
                        attempt = backoff.attempts,
                        error = %source,
                        "MongoDB ping failed, retrying"
                    );
                    sleep(delay).await;
                }
                None => {
                    return Err(MongoDaoError::InitialPing {
                        attempts: backoff.attempts,
                        source,
                    });
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped_then_gives_up() {
        let mut backoff = PingBackoff::new();
        let delays: Vec<_> = std::iter::from_fn(|| backoff.on_failure()).collect();

        assert_eq!(delays.len(), (PingBackoff::MAX_ATTEMPTS - 1) as usize);
        assert_eq!(delays[0], Duration::from_millis(250));
        assert_eq!(delays[1], Duration::from_millis(500));
        assert_eq!(*delays.last().unwrap(), PingBackoff::MAX_DELAY);
    }
}
