use std::{future::Future, sync::Arc, time::Duration};

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use super::{dispatcher::Dispatcher, errors::BotError};
use crate::{
    client::Generator,
    telegram::{Transport, UpdateSource, types::Update},
};

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Long-poll timeout of `getUpdates`
    pub timeout: Duration,
    /// Pause after a failed poll
    pub backoff: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            backoff: Duration::from_secs(5),
        }
    }
}

/// Poll `source` and handle every update in its own task until `shutdown` completes.
/// Updates still being handled at shutdown are awaited.
pub async fn run<G, T, S>(
    dispatcher: Arc<Dispatcher<G, T>>,
    source: S,
    options: PollOptions,
    shutdown: impl Future<Output = ()>,
) -> Result<(), BotError>
where
    G: Generator + 'static,
    T: Transport + 'static,
    S: UpdateSource,
{
    tokio::pin!(shutdown);

    let mut offset = None;
    let mut tasks = JoinSet::new();

    info!("🚀 Marketing Agent Bot started!");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            updates = source.get_updates(offset, options.timeout) => match updates {
                Ok(updates) => {
                    debug!(count = updates.len(), "Updates received");
                    offset = handle_batch(&mut tasks, &dispatcher, offset, &updates);
                }
                Err(e) => {
                    error!(%e, "Failed to fetch updates");
                    tokio::select! {
                        _ = &mut shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                        _ = tokio::time::sleep(options.backoff) => {}
                    }
                }
            },
        }

        while let Some(result) = tasks.try_join_next() {
            log_task(result);
        }
    }

    debug!(pending = tasks.len(), "Waiting for pending updates");
    while let Some(result) = tasks.join_next().await {
        log_task(result);
    }

    info!("Bot stopped");
    Ok(())
}

/// Spawn a task per update of one poll and return the offset of the next poll
fn handle_batch<G, T>(
    tasks: &mut JoinSet<Result<(), BotError>>,
    dispatcher: &Arc<Dispatcher<G, T>>,
    mut offset: Option<i64>,
    updates: &[Update],
) -> Option<i64>
where
    G: Generator + 'static,
    T: Transport + 'static,
{
    for update in updates {
        offset = Some(next_offset(offset, update));
        spawn_update(tasks, dispatcher, update);
    }
    offset
}

/// Completes on Ctrl-C
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(%e, "Failed to listen for Ctrl-C");
    }
}

fn next_offset(current: Option<i64>, update: &Update) -> i64 {
    current.map_or(update.update_id + 1, |offset| offset.max(update.update_id + 1))
}

fn spawn_update<G, T>(tasks: &mut JoinSet<Result<(), BotError>>, dispatcher: &Arc<Dispatcher<G, T>>, update: &Update)
where
    G: Generator + 'static,
    T: Transport + 'static,
{
    let (Some(message), Some((chat_id, text))) = (update.message.as_ref(), update.text_message()) else {
        debug!(update_id = update.update_id, "Skipping update without text");
        return;
    };

    debug!(
        update_id = update.update_id,
        message_id = message.message_id,
        user_id = message.from.as_ref().map(|u| u.id),
        username = message.from.as_ref().and_then(|u| u.username.as_deref()),
        "Handling message"
    );

    let text = text.to_string();
    let dispatcher = Arc::clone(dispatcher);
    tasks.spawn(async move { dispatcher.handle(chat_id, &text).await });
}

fn log_task(result: Result<Result<(), BotError>, tokio::task::JoinError>) {
    match result.map_err(BotError::from) {
        Ok(Ok(())) => {}
        Ok(Err(e)) | Err(e) => error!(%e, "Failed to handle update"),
    }
}
