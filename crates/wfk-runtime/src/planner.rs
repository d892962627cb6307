//! Planner (§4.5): goal -> ordered, worker-bound [`Plan`] with a reasoning
//! trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use wfk_kernel::error::{KernelError, KernelResult};
use wfk_kernel::goal::{Goal, Strategy};
use wfk_kernel::plan::{AlternativePath, Plan, ReasoningTrace, StepRecord, Thought};
use wfk_kernel::registry::WorkerRegistry;

use crate::memory::MemoryCoordinator;

/// Above this many steps, tree-of-thought is used even if the goal asked
/// for chain-of-thought (§4.5).
const TREE_OF_THOUGHT_STEP_THRESHOLD: usize = 3;

const PRIMARY_PATH_SCORE: f64 = 0.7;
const ALTERNATIVE_PATH_SCORE: f64 = 0.5;

pub struct Planner {
    registry: Arc<dyn WorkerRegistry>,
    memory: Arc<MemoryCoordinator>,
}

impl Planner {
    pub fn new(registry: Arc<dyn WorkerRegistry>, memory: Arc<MemoryCoordinator>) -> Self {
        Self { registry, memory }
    }

    /// Normalize the goal, bind every required capability to a worker,
    /// load session context, compute the reasoning trace, and persist the
    /// resulting plan.
    pub async fn prepare(&self, goal: Goal) -> KernelResult<Plan> {
        let mut steps = Vec::with_capacity(goal.required_capabilities.len());
        for capability in &goal.required_capabilities {
            let worker = self
                .registry
                .find_by_capability(capability)
                .await
                .ok_or_else(|| KernelError::CapabilityUnassigned(capability.clone()))?;

            let input = serde_json::Value::Object(goal.input.clone());
            steps.push(StepRecord::pending(capability.clone(), worker.name.clone(), input));
        }

        let (_state, context) = self.memory.load_state(&goal).await?;
        let reasoning = build_reasoning(&goal, &steps);

        let plan = Plan {
            goal: goal.clone(),
            steps,
            retrieved_context: context,
            reasoning,
        };

        self.memory.persist_plan(&plan).await?;
        tracing::info!(session_id = %goal.session_id, strategy = %plan.reasoning.strategy, "prepared plan");
        Ok(plan)
    }
}

fn build_reasoning(goal: &Goal, steps: &[StepRecord]) -> ReasoningTrace {
    let use_tree = goal.strategy == Strategy::TreeOfThought || steps.len() > TREE_OF_THOUGHT_STEP_THRESHOLD;

    let (strategy, thoughts, alternatives) = if use_tree {
        let thoughts: Vec<Thought> = steps
            .iter()
            .map(|s| Thought {
                capability: s.capability.clone(),
                text: format!("Branch: resolve `{}` via `{}`.", s.capability, s.worker_name),
            })
            .collect();

        let primary_order: Vec<String> = steps.iter().map(|s| s.capability.clone()).collect();
        let reversed_order: Vec<String> = primary_order.iter().rev().cloned().collect();

        let mut alternatives = vec![AlternativePath { order: primary_order.clone(), score: PRIMARY_PATH_SCORE }];
        if reversed_order != primary_order {
            alternatives.push(AlternativePath { order: reversed_order, score: ALTERNATIVE_PATH_SCORE });
        }

        ("tree-of-thought".to_string(), thoughts, alternatives)
    } else {
        let thoughts: Vec<Thought> = steps
            .iter()
            .map(|s| Thought {
                capability: s.capability.clone(),
                text: format!("Next, handle `{}` via `{}`.", s.capability, s.worker_name),
            })
            .collect();
        ("chain-of-thought".to_string(), thoughts, Vec::new())
    };

    let vendor_weighting = goal.provider().and_then(vendor_weights_for);

    ReasoningTrace { strategy, thoughts, alternatives, vendor_weighting }
}

/// Known provider -> raw model weights. Weights are renormalised to sum to
/// `1.0` and rounded to 4 decimal places before being attached to the
/// reasoning trace (§4.5).
fn vendor_weights_for(provider: &str) -> Option<BTreeMap<String, f64>> {
    let raw: &[(&str, f64)] = match provider {
        "anthropic" => &[("claude-3-5-sonnet", 0.62), ("claude-3-5-haiku", 0.38)],
        "openai" => &[("gpt-4o", 0.6), ("gpt-4o-mini", 0.4)],
        "google" => &[("gemini-1-5-pro", 0.55), ("gemini-1-5-flash", 0.45)],
        _ => return None,
    };
    Some(normalize_weights(raw))
}

fn normalize_weights(raw: &[(&str, f64)]) -> BTreeMap<String, f64> {
    let total: f64 = raw.iter().map(|(_, w)| w).sum();
    raw.iter()
        .map(|(name, w)| {
            let normalized = if total > 0.0 { w / total } else { 0.0 };
            (name.to_string(), (normalized * 10_000.0).round() / 10_000.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryWorkerRegistry;
    use crate::session_store::InMemorySessionStore;
    use async_trait::async_trait;
    use wfk_kernel::worker::{WorkerContext, WorkerDefinition, WorkerHandler, WorkerInput};

    struct Noop;
    #[async_trait]
    impl WorkerHandler for Noop {
        async fn handle(&self, _i: WorkerInput, _c: &WorkerContext) -> KernelResult<serde_json::Value> {
            Ok(serde_json::json!({}))
        }
    }

    async fn planner_with(workers: &[(&str, &[&str])]) -> Planner {
        let registry = Arc::new(InMemoryWorkerRegistry::new());
        for (name, caps) in workers {
            registry
                .register(WorkerDefinition::new(
                    *name,
                    "",
                    caps.iter().map(|s| s.to_string()).collect(),
                    Arc::new(Noop),
                ))
                .await
                .unwrap();
        }
        let memory = Arc::new(MemoryCoordinator::new(Arc::new(InMemorySessionStore::new()), None));
        Planner::new(registry, memory)
    }

    /// S1: chain planning.
    #[tokio::test]
    async fn s1_chain_planning() {
        let planner = planner_with(&[("A", &["draft"]), ("B", &["review"])]).await;
        let goal = Goal::new("s", "write docs", vec!["draft".into(), "review".into()]);
        let plan = planner.prepare(goal).await.unwrap();

        assert_eq!(plan.reasoning.strategy, "chain-of-thought");
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].capability, "draft");
        assert_eq!(plan.steps[0].worker_name, "A");
        assert_eq!(plan.steps[1].capability, "review");
        assert_eq!(plan.steps[1].worker_name, "B");
        assert!(plan.steps.iter().all(|s| s.status == wfk_kernel::plan::StepStatus::Pending));
    }

    /// S2: tree planning with at least one alternative path.
    #[tokio::test]
    async fn s2_tree_planning() {
        let planner = planner_with(&[
            ("I", &["ingest"]),
            ("S", &["summarise"]),
            ("V", &["validate"]),
            ("D", &["deploy"]),
        ])
        .await;
        let goal = Goal::new(
            "s",
            "ship a report",
            vec!["ingest".into(), "summarise".into(), "validate".into(), "deploy".into()],
        );
        let plan = planner.prepare(goal).await.unwrap();

        assert_eq!(plan.reasoning.strategy, "tree-of-thought");
        assert!(plan.reasoning.alternatives.len() >= 2);
    }

    /// S3: vendor weighting for a known provider renormalises to sum 1.0.
    #[tokio::test]
    async fn s3_vendor_weighting() {
        let planner = planner_with(&[("A", &["draft"])]).await;
        let mut goal = Goal::new("s", "obj", vec!["draft".into()]);
        goal.input.insert("provider".into(), serde_json::Value::String("anthropic".into()));
        let plan = planner.prepare(goal).await.unwrap();

        let weights = plan.reasoning.vendor_weighting.expect("vendor weighting attached");
        assert_eq!(weights.get("claude-3-5-sonnet"), Some(&0.62));
        assert_eq!(weights.get("claude-3-5-haiku"), Some(&0.38));
        let sum: f64 = weights.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_capability_is_fatal() {
        let planner = planner_with(&[("A", &["draft"])]).await;
        let goal = Goal::new("s", "obj", vec!["nonexistent".into()]);
        let err = planner.prepare(goal).await.unwrap_err();
        assert!(matches!(err, KernelError::CapabilityUnassigned(c) if c == "nonexistent"));
    }

    #[test]
    fn normalize_weights_sums_to_one() {
        let w = normalize_weights(&[("a", 1.0), ("b", 1.0), ("c", 2.0)]);
        let sum: f64 = w.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
