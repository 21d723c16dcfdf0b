//! The student creation form.
//!
//! [`RecordCreationForm`] holds the draft being edited and the banner shown
//! to the user. Submitting validates the draft and, if it is complete,
//! spawns the create call on the injected [`RecordService`]. The outcome is
//! applied to the form when the call resolves:
//!
//! - success: success banner, draft cleared, banner auto-clears after
//!   [`FormConfig::success_clear_ms`];
//! - failure: error banner carrying the reason, draft kept for a retry.
//!
//! The auto-clear timer is scoped to the form. A later submit attempt or
//! dropping the form cancels it.
//!
//! All methods that submit must be called from within a Tokio runtime.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::FormConfig;
use crate::error::{Error, Result, ValidationError};
use crate::record::{DraftRecord, Field, Grade, Student};
use crate::service::{DatabaseHandle, RecordService};

/// Banner text for a rejected draft.
pub const VALIDATION_MESSAGE: &str = "Por favor, preencha todos os campos.";

/// Banner text after a student is created.
pub const SUCCESS_MESSAGE: &str = "Aluno criado com sucesso!";

/// Banner text prefix when the create call fails.
pub const SUBMISSION_ERROR_PREFIX: &str = "Não foi possível criar o aluno";

/// Transient message shown above the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Banner {
    /// Nothing to report.
    #[default]
    Idle,
    /// The last submission created a record.
    Success(String),
    /// The last submission was rejected or failed.
    Error(String),
}

impl Banner {
    /// The banner text, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Success(message) | Self::Error(message) => Some(message),
        }
    }

    /// Whether this is a success banner.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether this is an error banner.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// What a call to [`RecordCreationForm::submit`] did.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The draft is incomplete; the service was not called.
    Rejected(ValidationError),
    /// A previous create call is still outstanding; nothing was sent.
    InFlight,
    /// The create call was started.
    Pending(PendingSubmission),
}

/// A create call that has been started by the form.
///
/// Dropping it does not cancel the call; the form still applies the outcome.
#[derive(Debug)]
pub struct PendingSubmission {
    handle: JoinHandle<Result<Student>>,
}

impl PendingSubmission {
    /// Wait for the create call and for the form to apply its outcome.
    ///
    /// # Errors
    ///
    /// Returns the create call's error, or an internal error if the task
    /// was lost.
    pub async fn wait(self) -> Result<Student> {
        self.handle
            .await
            .map_err(|e| Error::internal(format!("submission task failed: {e}")))?
    }
}

#[derive(Debug, Default)]
struct FormState {
    draft: DraftRecord,
    banner: Banner,
    in_flight: usize,
    clear_timer: Option<CancellationToken>,
}

impl FormState {
    fn cancel_clear_timer(&mut self) {
        if let Some(timer) = self.clear_timer.take() {
            timer.cancel();
        }
    }
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    // The state stays consistent across a panic in another holder, so a
    // poisoned lock is still usable.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Form for creating one student at a time.
pub struct RecordCreationForm<D, R>
where
    D: DatabaseHandle,
    R: RecordService<D::Session>,
{
    database: Arc<D>,
    service: Arc<R>,
    config: FormConfig,
    state: Arc<Mutex<FormState>>,
    scope: CancellationToken,
}

impl<D, R> RecordCreationForm<D, R>
where
    D: DatabaseHandle,
    R: RecordService<D::Session>,
{
    /// Create an empty form bound to `database` and `service`.
    #[must_use]
    pub fn new(database: Arc<D>, service: Arc<R>, config: FormConfig) -> Self {
        Self {
            database,
            service,
            config,
            state: Arc::new(Mutex::new(FormState::default())),
            scope: CancellationToken::new(),
        }
    }

    /// Set a text field verbatim.
    pub fn update_field(&self, field: Field, value: impl Into<String>) {
        lock(&self.state).draft.set(field, value);
    }

    /// Set the grade from raw input, clamped into the grade range.
    ///
    /// Blank or non-numeric input empties the grade. Returns what was stored.
    pub fn update_grade(&self, raw: &str) -> Option<Grade> {
        let grade = Grade::parse(raw);
        if grade.is_none() && !raw.trim().is_empty() {
            debug!(raw, "Non-numeric grade input; grade emptied");
        }
        lock(&self.state).draft.grade_index = grade;
        grade
    }

    /// A copy of the current draft.
    #[must_use]
    pub fn draft(&self) -> DraftRecord {
        lock(&self.state).draft.clone()
    }

    /// The current banner.
    #[must_use]
    pub fn banner(&self) -> Banner {
        lock(&self.state).banner.clone()
    }

    /// The success text, or empty.
    #[must_use]
    pub fn success_message(&self) -> String {
        match &lock(&self.state).banner {
            Banner::Success(message) => message.clone(),
            _ => String::new(),
        }
    }

    /// The error text, or empty.
    #[must_use]
    pub fn error_message(&self) -> String {
        match &lock(&self.state).banner {
            Banner::Error(message) => message.clone(),
            _ => String::new(),
        }
    }

    /// Whether a create call is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        lock(&self.state).in_flight > 0
    }

    /// Validate the draft and start the create call.
    ///
    /// Returns immediately. Any pending success auto-clear is cancelled.
    #[must_use = "a pending submission should be awaited or explicitly dropped"]
    pub fn submit(&self) -> SubmitOutcome {
        let mut state = lock(&self.state);

        if self.config.block_resubmit && state.in_flight > 0 {
            debug!("Submission refused; create call outstanding");
            return SubmitOutcome::InFlight;
        }

        state.cancel_clear_timer();

        let payload = match state.draft.validate() {
            Ok(payload) => payload,
            Err(reason) => {
                debug!(%reason, "Draft rejected");
                state.banner = Banner::Error(VALIDATION_MESSAGE.to_string());
                return SubmitOutcome::Rejected(reason);
            }
        };

        // Its timer is gone; don't leave it up indefinitely.
        if state.banner.is_success() {
            state.banner = Banner::Idle;
        }
        state.in_flight += 1;
        drop(state);

        info!(course = %payload.course, "Submitting student");

        let database = Arc::clone(&self.database);
        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let scope = self.scope.clone();
        let delay = self.config.success_clear_delay();

        let handle = tokio::spawn(async move {
            let result = match database.session() {
                Ok(session) => service.create(session, payload).await,
                Err(e) => Err(e),
            };
            apply_outcome(&state, &scope, delay, &result);
            result
        });

        SubmitOutcome::Pending(PendingSubmission { handle })
    }

    /// Tear the form down, cancelling its timer and detaching outstanding
    /// create calls. Same as dropping it.
    pub fn teardown(self) {
        drop(self);
    }
}

fn apply_outcome(
    state_ref: &Arc<Mutex<FormState>>,
    scope: &CancellationToken,
    delay: Duration,
    result: &Result<Student>,
) {
    let mut state = lock(state_ref);
    state.in_flight = state.in_flight.saturating_sub(1);

    if scope.is_cancelled() {
        debug!("Form torn down; outcome not applied");
        return;
    }

    match result {
        Ok(student) => {
            info!(id = student.id, "Student created");
            state.banner = Banner::Success(SUCCESS_MESSAGE.to_string());
            state.draft.clear();
            state.cancel_clear_timer();

            let timer = scope.child_token();
            state.clear_timer = Some(timer.clone());
            spawn_clear_timer(Arc::downgrade(state_ref), timer, Instant::now() + delay);
        }
        Err(e) => {
            warn!(error = %e, "Student creation failed");
            // An earlier success may still have its timer armed.
            state.cancel_clear_timer();
            state.banner = Banner::Error(format!("{SUBMISSION_ERROR_PREFIX}: {}", e.reason()));
        }
    }
}

fn spawn_clear_timer(state: Weak<Mutex<FormState>>, timer: CancellationToken, deadline: Instant) {
    tokio::spawn(async move {
        tokio::select! {
            () = timer.cancelled() => {}
            () = tokio::time::sleep_until(deadline) => {
                if let Some(state) = state.upgrade() {
                    let mut state = lock(&state);
                    // A submit may have cancelled us while we waited for the lock.
                    if !timer.is_cancelled() && state.banner.is_success() {
                        state.banner = Banner::Idle;
                        state.clear_timer = None;
                    }
                }
            }
        }
    });
}

impl<D, R> Drop for RecordCreationForm<D, R>
where
    D: DatabaseHandle,
    R: RecordService<D::Session>,
{
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

impl<D, R> fmt::Debug for RecordCreationForm<D, R>
where
    D: DatabaseHandle,
    R: RecordService<D::Session>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("RecordCreationForm")
            .field("draft", &state.draft)
            .field("banner", &state.banner)
            .field("in_flight", &state.in_flight)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
