use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::poller::PollOutcome;
use crate::modules::data_import::domain::ProgressId;
use crate::log_error;
use crate::shared::errors::{AppError, AppResult};

/// Sole owner of a running poll chain
///
/// Dropping the handle before the chain finishes cancels it, which is how a
/// front-end abandons an import it is no longer showing.
#[derive(Debug)]
pub struct PollHandle {
    progress_id: ProgressId,
    cancel: CancellationToken,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    pub(crate) fn new(
        progress_id: ProgressId,
        cancel: CancellationToken,
        task: JoinHandle<PollOutcome>,
    ) -> Self {
        Self {
            progress_id,
            cancel,
            task: Some(task),
        }
    }

    pub fn progress_id(&self) -> &ProgressId {
        &self.progress_id
    }

    /// Stop polling at the next await point
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait for the chain to end and return how it ended
    pub async fn wait(mut self) -> AppResult<PollOutcome> {
        let outcome = match self.task.as_mut() {
            Some(task) => task.await.map_err(|e| {
                log_error!("Poll task for {} failed: {}", self.progress_id, e);
                AppError::from(e)
            })?,
            None => {
                return Err(AppError::InternalError(format!(
                    "Poll task for {} already consumed",
                    self.progress_id
                )))
            }
        };
        self.task = None;
        Ok(outcome)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicked_task_is_an_internal_error() {
        let task: JoinHandle<PollOutcome> = tokio::spawn(async {
            panic!("poll loop blew up");
        });
        let handle = PollHandle::new(
            ProgressId::new("abc").unwrap(),
            CancellationToken::new(),
            task,
        );

        let err = handle.wait().await.unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_dropping_unfinished_handle_cancels() {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            token.cancelled().await;
            PollOutcome::Cancelled
        });
        let handle = PollHandle::new(ProgressId::new("abc").unwrap(), cancel.clone(), task);

        assert!(!handle.is_finished());
        drop(handle);
        assert!(cancel.is_cancelled());
    }
}
