//! Worker Runner (§4.5): sequentially walks a [`Plan`], gating each step on
//! approval, invoking its worker, and persisting the result.

use std::sync::Arc;

use wfk_kernel::approval::{ApprovalDecision, ApprovalGate, ApprovalRequest};
use wfk_kernel::error::{KernelError, KernelResult};
use wfk_kernel::event::{event_type, Event, EventEmitterHandle, NullEventEmitter};
use wfk_kernel::goal::Goal;
use wfk_kernel::plan::{Plan, ReasoningTrace, StepRecord};
use wfk_kernel::registry::WorkerRegistry;
use wfk_kernel::session::Document;
use wfk_kernel::tool::ToolRouterHandle;
use wfk_kernel::worker::{WorkerContext, WorkerInput};

use crate::memory::MemoryCoordinator;
use crate::planner::Planner;

/// The result of a full `prepare -> run` cycle (§4.5 `run(goal)` return
/// value).
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExecutionResult {
    pub goal: Goal,
    pub steps: Vec<StepRecord>,
    pub context: Vec<Document>,
    pub reasoning: ReasoningTrace,
}

pub struct WorkerRunner {
    registry: Arc<dyn WorkerRegistry>,
    memory: Arc<MemoryCoordinator>,
    approval: Arc<dyn ApprovalGate>,
    tools: ToolRouterHandle,
    /// Live lifecycle-event sink for `node_start`/`node_finish`/`error`
    /// events (§2 "every meaningful transition emits an event through the
    /// Streaming Manager"). Defaults to a no-op sink.
    emitter: EventEmitterHandle,
}

impl WorkerRunner {
    pub fn new(
        registry: Arc<dyn WorkerRegistry>,
        memory: Arc<MemoryCoordinator>,
        approval: Arc<dyn ApprovalGate>,
        tools: ToolRouterHandle,
    ) -> Self {
        Self { registry, memory, approval, tools, emitter: Arc::new(NullEventEmitter) }
    }

    /// Wires a live event sink (typically a `wfk_streaming::StreamingManager`)
    /// so per-step lifecycle events reach subscribers.
    pub fn with_emitter(mut self, emitter: EventEmitterHandle) -> Self {
        self.emitter = emitter;
        self
    }

    /// Composed `run(goal)` entry point (§4.5): prepare the plan, then
    /// dispatch it to the Worker Runner. Equivalent to calling
    /// [`Planner::prepare`] followed by [`WorkerRunner::run`] by hand.
    pub async fn run_goal(&self, planner: &Planner, goal: Goal) -> KernelResult<ExecutionResult> {
        let plan = planner.prepare(goal).await?;
        self.run(plan).await
    }

    /// Execute every step of `plan` strictly in order. A step failure
    /// propagates immediately — no subsequent step runs (§4.5, property 3).
    pub async fn run(&self, plan: Plan) -> KernelResult<ExecutionResult> {
        let goal = plan.goal.clone();
        let mut steps = plan.steps;

        for step in steps.iter_mut() {
            self.gate_approval(&goal, step).await?;

            let worker = self
                .registry
                .find_by_capability(&step.capability)
                .await
                .ok_or_else(|| KernelError::NoWorkerForCapability(step.capability.clone()))?;

            let (memory_state, context_documents) = self.memory.load_state(&goal).await?;
            let ctx = WorkerContext {
                tools: self.tools.clone(),
                goal: goal.clone(),
                memory: memory_state,
                context_documents,
            };
            let worker_input = WorkerInput { capability: step.capability.clone(), input: step.input.clone() };

            self.emitter
                .emit(Event::new(
                    event_type::NODE_START,
                    goal.session_id.clone(),
                    serde_json::json!({ "capability": step.capability, "worker": worker.name }),
                    wfk_kernel::now_utc(),
                ))
                .await;

            match worker.handler.handle(worker_input, &ctx).await {
                Ok(output) => {
                    step.complete(output, wfk_kernel::now_ms());
                    self.memory.persist_step(&goal, step.clone()).await?;
                    tracing::info!(capability = %step.capability, worker = %worker.name, "step completed");
                    self.emitter
                        .emit(Event::new(
                            event_type::NODE_FINISH,
                            goal.session_id.clone(),
                            serde_json::json!({ "capability": step.capability, "worker": worker.name }),
                            wfk_kernel::now_utc(),
                        ))
                        .await;
                }
                Err(error) => {
                    step.fail(error.to_string(), wfk_kernel::now_ms());
                    self.memory.persist_step(&goal, step.clone()).await?;
                    tracing::error!(capability = %step.capability, worker = %worker.name, %error, "step failed");
                    self.emitter
                        .emit(Event::new(
                            event_type::ERROR,
                            goal.session_id.clone(),
                            serde_json::json!({ "capability": step.capability, "worker": worker.name, "error": error.to_string() }),
                            wfk_kernel::now_utc(),
                        ))
                        .await;
                    return Err(error);
                }
            }
        }

        Ok(ExecutionResult { goal, steps, context: plan.retrieved_context, reasoning: plan.reasoning })
    }

    async fn gate_approval(&self, goal: &Goal, step: &StepRecord) -> KernelResult<()> {
        let request = ApprovalRequest {
            goal_id: goal.session_id.clone(),
            capability: step.capability.clone(),
            input: step.input.clone(),
            session_id: goal.session_id.clone(),
        };
        match self.approval.decide(&request).await? {
            ApprovalDecision::Approved => Ok(()),
            ApprovalDecision::Denied => Err(KernelError::ApprovalDenied(step.capability.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryWorkerRegistry;
    use crate::session_store::InMemorySessionStore;
    use async_trait::async_trait;
    use wfk_kernel::approval::AlwaysApprove;
    use wfk_kernel::error::TransportError;
    use wfk_kernel::plan::{ReasoningTrace, StepStatus};
    use wfk_kernel::tool::{ToolInvocationRequest, ToolInvocationResult, ToolRouter};
    use wfk_kernel::worker::{WorkerDefinition, WorkerHandler};

    struct RecordingHandler {
        order: Arc<tokio::sync::Mutex<Vec<String>>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl WorkerHandler for RecordingHandler {
        async fn handle(&self, input: WorkerInput, _ctx: &WorkerContext) -> KernelResult<serde_json::Value> {
            self.order.lock().await.push(input.capability.clone());
            if self.fail_on.as_deref() == Some(input.capability.as_str()) {
                return Err(KernelError::Internal("deliberate failure".into()));
            }
            Ok(serde_json::json!({ "done": input.capability }))
        }
    }

    struct DenyingGate(String);
    #[async_trait]
    impl ApprovalGate for DenyingGate {
        async fn decide(&self, request: &ApprovalRequest) -> KernelResult<ApprovalDecision> {
            if request.capability == self.0 {
                Ok(ApprovalDecision::Denied)
            } else {
                Ok(ApprovalDecision::Approved)
            }
        }
    }

    struct NoopRouter;
    #[async_trait]
    impl ToolRouter for NoopRouter {
        async fn invoke(&self, _r: ToolInvocationRequest) -> KernelResult<ToolInvocationResult> {
            Err(KernelError::Transport(TransportError::Io("unused in this test".into())))
        }
    }

    struct RecordingEmitter(tokio::sync::Mutex<Vec<String>>);
    #[async_trait]
    impl wfk_kernel::event::EventEmitter for RecordingEmitter {
        async fn emit(&self, event: Event) {
            self.0.lock().await.push(event.event_type);
        }
    }

    fn plan(goal: Goal, caps_and_workers: &[(&str, &str)]) -> Plan {
        Plan {
            goal,
            steps: caps_and_workers
                .iter()
                .map(|(cap, w)| StepRecord::pending(*cap, *w, serde_json::json!({})))
                .collect(),
            retrieved_context: vec![],
            reasoning: ReasoningTrace { strategy: "chain-of-thought".into(), thoughts: vec![], alternatives: vec![], vendor_weighting: None },
        }
    }

    async fn registry_with(order: Arc<tokio::sync::Mutex<Vec<String>>>, fail_on: Option<&str>) -> Arc<InMemoryWorkerRegistry> {
        let registry = Arc::new(InMemoryWorkerRegistry::new());
        registry
            .register(WorkerDefinition::new(
                "A",
                "",
                vec!["draft".into()],
                Arc::new(RecordingHandler { order: order.clone(), fail_on: fail_on.filter(|f| *f == "draft").map(|s| s.to_string()) }),
            ))
            .await
            .unwrap();
        registry
            .register(WorkerDefinition::new(
                "B",
                "",
                vec!["review".into()],
                Arc::new(RecordingHandler { order: order.clone(), fail_on: fail_on.filter(|f| *f == "review").map(|s| s.to_string()) }),
            ))
            .await
            .unwrap();
        registry
    }

    /// `run_goal` composes `prepare` and `run` into a single entry point
    /// (§4.5 `run(goal)`).
    #[tokio::test]
    async fn run_goal_composes_prepare_and_run() {
        let order = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let registry = registry_with(order.clone(), None).await;
        let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
        let planner = crate::planner::Planner::new(registry.clone(), memory.clone());
        let runner = WorkerRunner::new(registry, memory, Arc::new(AlwaysApprove), Arc::new(NoopRouter));

        let goal = Goal::new("s", "obj", vec!["draft".into(), "review".into()]);
        let result = runner.run_goal(&planner, goal).await.unwrap();

        assert_eq!(*order.lock().await, vec!["draft", "review"]);
        assert!(result.steps.iter().all(|s| s.status == StepStatus::Completed));
    }

    /// Property 3: step i starts only after step i-1 reports completed.
    #[tokio::test]
    async fn steps_execute_strictly_in_order() {
        let order = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let registry = registry_with(order.clone(), None).await;
        let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
        let runner = WorkerRunner::new(registry, memory, Arc::new(AlwaysApprove), Arc::new(NoopRouter));

        let goal = Goal::new("s", "obj", vec!["draft".into(), "review".into()]);
        let result = runner.run(plan(goal, &[("draft", "A"), ("review", "B")])).await.unwrap();

        assert_eq!(*order.lock().await, vec!["draft", "review"]);
        assert!(result.steps.iter().all(|s| s.status == StepStatus::Completed));
    }

    /// A step failure propagates and no subsequent step runs.
    #[tokio::test]
    async fn failure_stops_subsequent_steps() {
        let order = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let registry = registry_with(order.clone(), Some("draft")).await;
        let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
        let runner = WorkerRunner::new(registry, memory, Arc::new(AlwaysApprove), Arc::new(NoopRouter));

        let goal = Goal::new("s", "obj", vec!["draft".into(), "review".into()]);
        let err = runner.run(plan(goal, &[("draft", "A"), ("review", "B")])).await.unwrap_err();

        assert!(matches!(err, KernelError::Internal(_)));
        assert_eq!(*order.lock().await, vec!["draft"], "review must never run");
    }

    /// S5: approval denial aborts with ApprovalDenied and nothing after it runs.
    #[tokio::test]
    async fn s5_approval_denial_aborts_run() {
        let order = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let registry = registry_with(order.clone(), None).await;
        let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
        let runner = WorkerRunner::new(registry, memory, Arc::new(DenyingGate("review".into())), Arc::new(NoopRouter));

        let goal = Goal::new("s", "obj", vec!["draft".into(), "review".into()]);
        let err = runner.run(plan(goal, &[("draft", "A"), ("review", "B")])).await.unwrap_err();

        assert!(matches!(err, KernelError::ApprovalDenied(c) if c == "review"));
        assert_eq!(*order.lock().await, vec!["draft"], "review's handler must never run once denied");
    }

    /// `with_emitter` makes `run` emit `node_start`/`node_finish` per step.
    #[tokio::test]
    async fn wired_emitter_receives_node_lifecycle_events() {
        let order = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let registry = registry_with(order.clone(), None).await;
        let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
        let emitter = Arc::new(RecordingEmitter(tokio::sync::Mutex::new(Vec::new())));
        let runner = WorkerRunner::new(registry, memory, Arc::new(AlwaysApprove), Arc::new(NoopRouter))
            .with_emitter(emitter.clone());

        let goal = Goal::new("s", "obj", vec!["draft".into(), "review".into()]);
        runner.run(plan(goal, &[("draft", "A"), ("review", "B")])).await.unwrap();

        let recorded = emitter.0.lock().await;
        assert_eq!(*recorded, vec!["node_start", "node_finish", "node_start", "node_finish"]);
    }

    #[tokio::test]
    async fn missing_worker_at_run_time_is_fatal() {
        let registry = Arc::new(InMemoryWorkerRegistry::new());
        let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
        let runner = WorkerRunner::new(registry, memory, Arc::new(AlwaysApprove), Arc::new(NoopRouter));

        let goal = Goal::new("s", "obj", vec!["draft".into()]);
        let err = runner.run(plan(goal, &[("draft", "ghost")])).await.unwrap_err();
        assert!(matches!(err, KernelError::NoWorkerForCapability(c) if c == "draft"));
    }
}
