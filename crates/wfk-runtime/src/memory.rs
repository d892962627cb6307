//! Memory Coordinator (§4.2).
//!
//! The sole writer of [`SessionState`]: no other component persists steps,
//! plans or facts (§3 "Ownership").

use std::sync::Arc;

use wfk_kernel::error::KernelResult;
use wfk_kernel::event::{event_type, Event, EventEmitterHandle, NullEventEmitter};
use wfk_kernel::goal::Goal;
use wfk_kernel::plan::{Plan, StepRecord};
use wfk_kernel::session::{Document, RagStore, SessionState, SessionStore};

/// Number of RAG documents retrieved per `loadState` call (§4.2).
const MAX_RETRIEVED_DOCUMENTS: usize = 5;

pub struct MemoryCoordinator {
    session_store: Arc<dyn SessionStore>,
    rag_store: Option<Arc<dyn RagStore>>,
    /// Live lifecycle-event sink (§2 "every meaningful transition emits an
    /// event through the Streaming Manager"). Defaults to a no-op sink so
    /// callers that only need the persisted event log don't have to wire
    /// one up.
    emitter: EventEmitterHandle,
}

impl MemoryCoordinator {
    pub fn new(session_store: Arc<dyn SessionStore>, rag_store: Option<Arc<dyn RagStore>>) -> Self {
        Self { session_store, rag_store, emitter: Arc::new(NullEventEmitter) }
    }

    /// Wires a live event sink (typically a `wfk_streaming::StreamingManager`)
    /// so `plan-created`/`step-completed` events reach subscribers, not just
    /// the persisted per-session event log.
    pub fn with_emitter(mut self, emitter: EventEmitterHandle) -> Self {
        self.emitter = emitter;
        self
    }

    /// Returns persisted session state (or a fresh one) plus up to
    /// [`MAX_RETRIEVED_DOCUMENTS`] RAG documents. RAG failure degrades to an
    /// empty context with a warning; a missing RAG adapter degrades
    /// silently (§4.2).
    pub async fn load_state(&self, goal: &Goal) -> KernelResult<(SessionState, Vec<Document>)> {
        let state = self
            .session_store
            .load(&goal.session_id)
            .await?
            .unwrap_or_else(|| SessionState::fresh(wfk_kernel::now_ms()));

        let context = match &self.rag_store {
            None => Vec::new(),
            Some(rag) => {
                let query = goal.retrieval_query();
                match rag.retrieve(&query, MAX_RETRIEVED_DOCUMENTS).await {
                    Ok(docs) => docs,
                    Err(error) => {
                        tracing::warn!(%error, session_id = %goal.session_id, "RAG retrieval failed, returning empty context");
                        Vec::new()
                    }
                }
            }
        };

        Ok((state, context))
    }

    /// Writes `plan.steps` and `plan.reasoning` into session state and
    /// appends a `plan-created` event carrying the ordered capability list.
    pub async fn persist_plan(&self, plan: &Plan) -> KernelResult<()> {
        let session_id = &plan.goal.session_id;
        let mut state = self
            .session_store
            .load(session_id)
            .await?
            .unwrap_or_else(|| SessionState::fresh(wfk_kernel::now_ms()));

        state.steps = plan.steps.clone();
        state.reasoning = Some(serde_json::to_value(&plan.reasoning).unwrap_or(serde_json::Value::Null));
        state.last_updated = wfk_kernel::now_ms();

        self.session_store.save(session_id, state).await?;

        let capabilities: Vec<&str> = plan.steps.iter().map(|s| s.capability.as_str()).collect();
        let payload = serde_json::json!({ "steps": capabilities });
        self.session_store
            .append_event(session_id, event_type::PLAN_CREATED, payload.clone())
            .await?;
        self.emitter
            .emit(Event::new(event_type::PLAN_CREATED, session_id.clone(), payload, wfk_kernel::now_utc()))
            .await;

        tracing::info!(session_id, steps = plan.steps.len(), "persisted plan");
        Ok(())
    }

    /// Upserts the step record for `stepResult.capability` and appends a
    /// `step-completed` event.
    pub async fn persist_step(&self, goal: &Goal, step: StepRecord) -> KernelResult<()> {
        let session_id = &goal.session_id;
        let mut state = self
            .session_store
            .load(session_id)
            .await?
            .unwrap_or_else(|| SessionState::fresh(wfk_kernel::now_ms()));

        state.upsert_step(step.clone());
        state.last_updated = wfk_kernel::now_ms();

        self.session_store.save(session_id, state).await?;

        let payload = serde_json::to_value(&step).unwrap_or(serde_json::Value::Null);
        self.session_store
            .append_event(session_id, event_type::STEP_COMPLETED, payload.clone())
            .await?;
        self.emitter
            .emit(Event::new(event_type::STEP_COMPLETED, session_id.clone(), payload, wfk_kernel::now_utc()))
            .await;

        Ok(())
    }
}
