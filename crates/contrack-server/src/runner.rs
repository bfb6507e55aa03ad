use std::sync::Arc;

use contrack_engine::{ScriptedPrompt, Tracker, TrackerError};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// What one tracker invocation produced, including everything it told the user
#[derive(Debug, Serialize)]
pub struct Invocation<T> {
    #[serde(flatten)]
    pub result: T,
    pub alerts: Vec<String>,
    pub questions: Vec<String>,
}

/// Run `work` against a workbook while holding its lock.
///
/// The workbook is loaded, handed to a [`Tracker`] on the blocking pool
/// (mail delivery blocks), and stored again only when `work` succeeds.
/// A failure still reports the alerts raised before it.
/// `answer` is the reply given to any confirmation the work asks for.
pub async fn run_tracker<T, F>(state: &AppState, id: Uuid, answer: bool, work: F) -> Result<Invocation<T>, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut Tracker<'_>) -> Result<T, TrackerError> + Send + 'static,
{
    let lock = state.locks.get_or_create(id).await;
    let _guard = lock.lock().await;

    let mut workbook = state.db.load_workbook(id, &state.settings).await?;
    let settings = Arc::clone(&state.settings);
    let mailer = Arc::clone(&state.mailer);
    let today = chrono::Local::now().date_naive();

    let (workbook, prompt, result) = tokio::task::spawn_blocking(move || {
        let mut prompt = ScriptedPrompt::answering(answer);
        let result = {
            let mut tracker = Tracker::new(&mut workbook, mailer.as_ref(), &mut prompt, &settings, today);
            work(&mut tracker)
        };
        (workbook, prompt, result)
    })
    .await?;

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(workbook = %id, error = %e, "tracker invocation failed; changes discarded");
            return Err(AppError::Tracker {
                error: e,
                alerts: prompt.alerts,
            });
        }
    };
    state.db.store_workbook(id, &workbook).await?;

    Ok(Invocation {
        result,
        alerts: prompt.alerts,
        questions: prompt.questions,
    })
}
