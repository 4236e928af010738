//! Client-side contact form.
//!
//! `ContactForm` owns the form fields and the submission status and publishes
//! both through a `watch` channel. UI code reads `state()` or `subscribe()`s
//! and never mutates the state directly.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──2xx──▶ Success ──(revert window)──▶ Idle
//!                       │
//!                       └──non-2xx / network error / cancelled──▶ Error
//! ```

use crate::core::{ContactFormData, ContactTransport, FormField, SubmissionStatus};
use crate::utils::error::SiteError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_REVERT_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub data: ContactFormData,
    pub status: SubmissionStatus,
}

impl FormState {
    /// 送出中時按鈕應停用
    pub fn can_submit(&self) -> bool {
        self.status != SubmissionStatus::Submitting
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
    /// A submission was already in flight; no request was issued.
    Ignored,
    /// Required fields (wire names) were empty; no request was issued.
    Invalid(Vec<&'static str>),
}

pub struct ContactForm<T: ContactTransport> {
    transport: T,
    state: Arc<watch::Sender<FormState>>,
    revert_after: Duration,
    revert_task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: ContactTransport> ContactForm<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            transport,
            state: Arc::new(state),
            revert_after: DEFAULT_REVERT_AFTER,
            revert_task: Mutex::new(None),
        }
    }

    pub fn with_revert_after(mut self, revert_after: Duration) -> Self {
        self.revert_after = revert_after;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.borrow().status
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        self.state.send_if_modified(|state| {
            if state.data.get(field) == value {
                return false;
            }
            state.data.set(field, value);
            true
        });
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let missing = self.state.borrow().data.missing_fields();
        if !missing.is_empty() {
            return SubmitOutcome::Invalid(missing);
        }

        // 檢查與設定在同一次鎖定內完成，避免重複送出
        let entered = self.state.send_if_modified(|state| {
            if state.status == SubmissionStatus::Submitting {
                return false;
            }
            state.status = SubmissionStatus::Submitting;
            true
        });
        if !entered {
            tracing::debug!("Submission already in flight, ignoring submit");
            return SubmitOutcome::Ignored;
        }
        let mut guard = SubmittingGuard::new(&self.state);
        self.cancel_revert();

        let data = self.state.borrow().data.clone();
        let result = self.transport.send(&data).await.and_then(|status| {
            if (200..300).contains(&status) {
                Ok(())
            } else {
                Err(SiteError::HttpStatusError { status })
            }
        });
        guard.disarm();

        match result {
            Ok(()) => {
                self.state.send_modify(|state| {
                    state.status = SubmissionStatus::Success;
                    state.data = ContactFormData::default();
                });
                self.schedule_revert();
                SubmitOutcome::Sent
            }
            Err(e) => {
                tracing::error!("Form submission error: {} (Category: {:?})", e, e.category());
                self.state.send_modify(|state| state.status = SubmissionStatus::Error);
                SubmitOutcome::Failed
            }
        }
    }

    fn schedule_revert(&self) {
        let state = Arc::downgrade(&self.state);
        let revert_after = self.revert_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(revert_after).await;
            if let Some(state) = state.upgrade() {
                state.send_if_modified(|s| {
                    if s.status != SubmissionStatus::Success {
                        return false;
                    }
                    s.status = SubmissionStatus::Idle;
                    true
                });
            }
        });

        if let Ok(mut slot) = self.revert_task.lock() {
            if let Some(previous) = slot.replace(handle) {
                previous.abort();
            }
        }
    }

    fn cancel_revert(&self) {
        if let Ok(mut slot) = self.revert_task.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }

    /// True while an auto-revert timer is pending.
    pub fn revert_pending(&self) -> bool {
        self.revert_task
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }
}

/// 送出的 future 在完成前被丟棄時，狀態改為 `Error`
struct SubmittingGuard<'a> {
    state: &'a watch::Sender<FormState>,
    armed: bool,
}

impl<'a> SubmittingGuard<'a> {
    fn new(state: &'a watch::Sender<FormState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!("Submission cancelled before the endpoint answered");
        self.state.send_if_modified(|state| {
            if state.status != SubmissionStatus::Submitting {
                return false;
            }
            state.status = SubmissionStatus::Error;
            true
        });
    }
}

impl<T: ContactTransport> Drop for ContactForm<T> {
    fn drop(&mut self) {
        self.cancel_revert();
    }
}
