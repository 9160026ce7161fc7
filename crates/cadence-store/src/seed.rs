//! Demo data for a fresh workspace.
//!
//! Four members, two weekly updates each. Timestamps step back one week
//! per update so the analytics windows have something to chew on right
//! after `cadence seed`.

use time::{Duration, OffsetDateTime};

use cadence_core::{format_rfc3339, new_update_at, ExtractedFields, Member};

use crate::lock::WorkspaceLock;
use crate::store::Store;

/// Fill an empty workspace with the demo roster and updates.
///
/// Returns `(members, updates)` written. The store is append-only, so
/// seeding over existing data would interleave with it; refuse instead.
pub fn seed_workspace(store: &Store) -> anyhow::Result<(usize, usize)> {
    let _lock = WorkspaceLock::acquire(&store.paths)?;
    if !store.members()?.is_empty() || !store.updates()?.is_empty() {
        anyhow::bail!("workspace already has data; seeding only fills an empty workspace");
    }

    let members = demo_members();
    for member in &members {
        store.append_member(member)?;
    }

    let now = OffsetDateTime::now_utc();
    let mut written = 0;
    for (author, updates) in demo_updates() {
        for (i, (text, analysis)) in updates.into_iter().enumerate() {
            let ts = format_rfc3339(now - Duration::days(7 * i as i64));
            let update = new_update_at(author, text, analysis, &ts);
            store.append_update(&update)?;
            written += 1;
        }
    }
    tracing::info!(members = members.len(), updates = written, "seeded workspace");
    Ok((members.len(), written))
}

fn demo_members() -> Vec<Member> {
    // Departments are set directly for the demo roster; note that the
    // role map would file a DevOps Engineer under Development.
    [
        ("Sarah Chen - Product Manager", "Product Manager", "Product Management"),
        ("Alex Kumar - Senior Developer", "Senior Developer", "Development"),
        ("Maria Garcia - Solutions Architect", "Solutions Architect", "Solutions"),
        ("James Wilson - DevOps Engineer", "DevOps Engineer", "Platform Engineering"),
    ]
    .into_iter()
    .map(|(name, role, department)| Member {
        name: name.to_string(),
        role: role.to_string(),
        department: department.to_string(),
    })
    .collect()
}

fn fields(
    completed: &[&str],
    progress: &[&str],
    goals: &[&str],
    blockers: &[&str],
    plans: &[&str],
    score: f64,
) -> ExtractedFields {
    let strs = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
    ExtractedFields {
        completed_tasks: strs(completed),
        project_progress: strs(progress),
        goals_status: strs(goals),
        blockers: strs(blockers),
        next_week_plans: strs(plans),
        productivity_score: score,
    }
}

/// Per author: newest update first, then one week earlier.
fn demo_updates() -> Vec<(&'static str, Vec<(&'static str, ExtractedFields)>)> {
    vec![
        (
            "Sarah Chen - Product Manager",
            vec![
                (
                    "Completed user research for mobile app redesign with 50 participants. \
                     Product requirements document for payment gateway integration is 80% \
                     complete. Led 3 stakeholder meetings for Q2 roadmap planning.",
                    fields(
                        &[
                            "Conducted user research with 50 participants",
                            "Led 3 stakeholder meetings",
                            "Drafted 80% of payment gateway PRD",
                        ],
                        &[
                            "Mobile App Redesign: Research phase complete",
                            "Payment Gateway Integration: PRD 80% complete",
                            "Q2 Roadmap: Stakeholder alignment in progress",
                        ],
                        &[
                            "Q1 Goal 1: User research completed",
                            "Q1 Goal 2: PRD development on track",
                        ],
                        &[
                            "Waiting for legal review on payment gateway requirements",
                            "Resource constraints in design team",
                        ],
                        &[
                            "Finalize PRD for payment gateway",
                            "Start user story mapping for inventory module",
                            "Conduct competitor analysis",
                        ],
                        0.85,
                    ),
                ),
                (
                    "Kicked off user research recruiting for the mobile app redesign, 30 of 50 \
                     participants scheduled. Drafted the outline for the payment gateway PRD. \
                     Aligned with design on Q2 roadmap themes.",
                    fields(
                        &[
                            "Recruited 30 research participants",
                            "Outlined payment gateway PRD",
                        ],
                        &[
                            "Mobile App Redesign: Research recruiting underway",
                            "Payment Gateway Integration: PRD outline drafted",
                        ],
                        &[
                            "Q1 Goal 1: User research underway",
                            "Q1 Goal 2: PRD outline ready",
                        ],
                        &["Waiting for legal review on payment gateway requirements"],
                        &[
                            "Finish participant recruiting",
                            "Expand PRD draft",
                            "Schedule stakeholder meetings",
                        ],
                        0.82,
                    ),
                ),
            ],
        ),
        (
            "Alex Kumar - Senior Developer",
            vec![
                (
                    "Implemented new authentication system with 99.9% success rate. Reduced API \
                     response time by 40% through optimization. Mentored 2 junior developers on \
                     best practices.",
                    fields(
                        &[
                            "Implemented authentication system",
                            "Optimized API performance",
                            "Conducted 4 mentoring sessions",
                        ],
                        &[
                            "Auth System: 100% complete",
                            "API Optimization: 90% complete",
                            "Team Training: Ongoing",
                        ],
                        &[
                            "Q1 Goal 1: Auth system deployed",
                            "Q1 Goal 2: Performance optimization ahead of schedule",
                        ],
                        &[
                            "Waiting for security team review",
                            "Test environment stability issues",
                        ],
                        &[
                            "Complete API optimization",
                            "Start work on data migration tool",
                            "Review junior developers' PRs",
                        ],
                        0.92,
                    ),
                ),
                (
                    "Built out the token issuance flow for the new authentication system and \
                     added integration tests. Profiled the slowest API endpoints ahead of \
                     optimization work. Paired with junior developers on code review habits.",
                    fields(
                        &[
                            "Built token issuance flow",
                            "Profiled slow API endpoints",
                            "Paired with 2 junior developers",
                        ],
                        &[
                            "Auth System: 70% complete",
                            "API Optimization: Profiling done",
                        ],
                        &[
                            "Q1 Goal 1: Auth system on track",
                            "Q1 Goal 2: Optimization targets identified",
                        ],
                        &["Test environment stability issues"],
                        &[
                            "Finish auth system rollout",
                            "Start API optimization",
                            "Schedule mentoring sessions",
                        ],
                        0.87,
                    ),
                ),
            ],
        ),
        (
            "Maria Garcia - Solutions Architect",
            vec![
                (
                    "Designed scalable architecture for new microservices platform. Completed \
                     technical documentation for 3 major systems. Resolved 2 critical production \
                     issues.",
                    fields(
                        &[
                            "Completed microservices architecture design",
                            "Documented 3 major systems",
                            "Resolved 2 P1 issues",
                        ],
                        &[
                            "Microservices Platform: Design phase complete",
                            "System Documentation: 85% complete",
                            "Production Stability: Improved by 30%",
                        ],
                        &[
                            "Q1 Goal 1: Architecture design completed",
                            "Q1 Goal 2: Documentation in progress",
                        ],
                        &[
                            "Pending infrastructure cost approval",
                            "Team bandwidth for implementation",
                        ],
                        &[
                            "Start implementation planning",
                            "Conduct architecture review",
                            "Create migration strategy",
                        ],
                        0.88,
                    ),
                ),
                (
                    "Evaluated service boundaries for the microservices platform and drew up two \
                     candidate architectures. Started documentation for the billing system. \
                     Investigated a recurring latency issue in production.",
                    fields(
                        &[
                            "Compared two candidate architectures",
                            "Started billing system documentation",
                        ],
                        &[
                            "Microservices Platform: Boundary analysis complete",
                            "System Documentation: 40% complete",
                        ],
                        &[
                            "Q1 Goal 1: Architecture design in progress",
                            "Q1 Goal 2: Documentation started",
                        ],
                        &["Pending infrastructure cost approval"],
                        &[
                            "Settle on final architecture",
                            "Document two more systems",
                            "Root-cause production latency",
                        ],
                        0.84,
                    ),
                ),
            ],
        ),
        (
            "James Wilson - DevOps Engineer",
            vec![
                (
                    "Automated deployment pipeline reducing deploy time by 60%. Implemented new \
                     monitoring system with 99.9% accuracy. Set up disaster recovery system with \
                     15-minute RPO.",
                    fields(
                        &[
                            "Automated deployment pipeline",
                            "Implemented new monitoring system",
                            "Set up disaster recovery",
                        ],
                        &[
                            "CI/CD Automation: 100% complete",
                            "Monitoring System: 95% complete",
                            "DR Setup: Testing phase",
                        ],
                        &[
                            "Q1 Goal 1: Deployment automation complete",
                            "Q1 Goal 2: Monitoring system nearly complete",
                        ],
                        &[
                            "Cloud provider quota limits",
                            "Pending security review for DR process",
                        ],
                        &[
                            "Complete monitoring system rollout",
                            "Start load testing framework",
                            "Document DR procedures",
                        ],
                        0.90,
                    ),
                ),
                (
                    "Wired the build stage of the deployment pipeline into CI and cut manual \
                     steps in half. Evaluated monitoring vendors and picked the metrics stack. \
                     Sketched the disaster recovery runbook.",
                    fields(
                        &[
                            "Automated pipeline build stage",
                            "Selected monitoring stack",
                            "Sketched DR runbook",
                        ],
                        &[
                            "CI/CD Automation: 60% complete",
                            "Monitoring System: Vendor selected",
                            "DR Setup: Planning",
                        ],
                        &[
                            "Q1 Goal 1: Deployment automation on track",
                            "Q1 Goal 2: Monitoring kickoff done",
                        ],
                        &["Cloud provider quota limits"],
                        &[
                            "Automate deploy and rollback stages",
                            "Install monitoring agents",
                            "Draft DR procedures",
                        ],
                        0.86,
                    ),
                ),
            ],
        ),
    ]
}
