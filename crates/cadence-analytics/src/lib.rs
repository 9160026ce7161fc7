//! Read-only rollups over the stored update history.
//!
//! Everything here is a pure function over an
//! [`UpdateSource`](cadence_core::UpdateSource): fetch a window, group,
//! average, and hand back serializable response structs. Each surface
//! has an `_at` variant taking an explicit `now` so tests (and anything
//! else that cares about reproducibility) can pin the clock.

pub mod departments;
pub mod history;
pub mod overview;
pub mod performance;
mod rollup;
pub mod team;
pub mod trends;
pub mod velocity;

#[cfg(test)]
mod testutil;

pub use departments::{department_list, department_metrics, department_metrics_at, DepartmentMetrics};
pub use history::{update_history, update_history_at};
pub use overview::{
    analytics_overview, analytics_overview_at, AnalyticsOverview, DepartmentStat, OverviewPeriod,
};
pub use performance::{
    calculate_metrics, calculate_overall_score, employee_ratings, employee_ratings_at,
    EmployeePerformance, PerformanceMetrics, PerformanceReport, RatingsPeriod,
};
pub use team::{team_overview, team_overview_at, DepartmentOverview, MemberOverview, TeamOverview};
pub use trends::{productivity_trends, productivity_trends_at, TimeRange, TrendBucket};
pub use velocity::{team_velocity, team_velocity_at, VelocityBucket};
