//! Evaluation Gates (§4.6): the four checks the Evaluation phase must pass
//! before a PRP run may be promoted.

use wfk_kernel::prp::Verdict;

/// Inputs to the TDD gate. `tests_failing` being `Some(0)` (or absent test
/// runs reporting zero failures) is what "tests pass" means here — any
/// nonzero failing count is a blocker.
#[derive(Debug, Clone)]
pub struct TddEvidence {
    pub test_files_present: bool,
    pub tests_failing: u32,
    pub coverage_percent: f64,
    /// True when test-run output lines or commit messages mention
    /// `test|tdd|red|green|refactor` (§4.6).
    pub tdd_evidence_observable: bool,
}

/// Inputs to the review gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewEvidence {
    pub blockers: u32,
    pub majors: u32,
}

/// Inputs to the budget gates.
#[derive(Debug, Clone, Copy)]
pub struct BudgetEvidence {
    pub accessibility: f64,
    pub performance: f64,
    pub security: f64,
}

/// Inputs to pre-promotion readiness.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessEvidence {
    pub prior_phases_passed: bool,
    pub evidence_count: usize,
}

/// Runs all four evaluation gates and folds their findings into one
/// [`Verdict`] (§4.6: "the phase verdict is `passed = (blockers == 0) &&
/// (len(majors) <= 3)`").
pub fn evaluate(
    tdd: &TddEvidence,
    review: ReviewEvidence,
    budget: BudgetEvidence,
    readiness: ReadinessEvidence,
    evidence_ids: Vec<String>,
    timestamp: impl Into<String>,
) -> Verdict {
    let mut blockers = Vec::new();
    let mut majors = Vec::new();

    tdd_gate(tdd, &mut blockers);
    review_gate(review, &mut blockers, &mut majors);
    budget_gates(budget, &mut blockers, &mut majors);
    readiness_gate(readiness, &mut blockers);

    Verdict::compute(blockers, majors, evidence_ids, timestamp)
}

fn tdd_gate(tdd: &TddEvidence, blockers: &mut Vec<String>) {
    if !tdd.test_files_present {
        blockers.push("tdd: no test files present".into());
    }
    if tdd.tests_failing > 0 {
        blockers.push(format!("tdd: {} failing tests", tdd.tests_failing));
    }
    if tdd.coverage_percent < 80.0 {
        blockers.push(format!("tdd: coverage {:.1}% below 80%", tdd.coverage_percent));
    }
    if !tdd.tdd_evidence_observable {
        blockers.push("tdd: no observable red/green/refactor evidence".into());
    }
}

fn review_gate(review: ReviewEvidence, blockers: &mut Vec<String>, majors: &mut Vec<String>) {
    if review.blockers > 0 {
        blockers.push(format!("review: {} blocking findings", review.blockers));
    }
    if review.majors > 3 {
        majors.push(format!("review: {} major findings exceeds 3", review.majors));
    }
}

fn budget_gates(budget: BudgetEvidence, blockers: &mut Vec<String>, majors: &mut Vec<String>) {
    if budget.accessibility < 90.0 {
        majors.push(format!("budget: accessibility {:.1} below 90", budget.accessibility));
    }
    if budget.performance < 85.0 {
        majors.push(format!("budget: performance {:.1} below 85", budget.performance));
    }
    if budget.security < 80.0 {
        blockers.push(format!("budget: security {:.1} below 80", budget.security));
    }
}

fn readiness_gate(readiness: ReadinessEvidence, blockers: &mut Vec<String>) {
    if !readiness.prior_phases_passed {
        blockers.push("readiness: a prior phase did not pass".into());
    }
    if readiness.evidence_count < 5 {
        blockers.push(format!("readiness: only {} evidence records, need >= 5", readiness.evidence_count));
    }
}
