//! Financial analytics core
//!
//! Pure calculators over borrowed snapshots and entities. Nothing in here
//! performs I/O or returns an error: degenerate arithmetic resolves to the
//! documented defaults of [`numeric`].

pub mod comparative;
pub mod forecast;
pub mod health;
pub mod numeric;
pub mod patterns;
pub mod progress;
pub mod trend;

pub use comparative::{
    category_trends, compare_periods, compare_periods_with, compare_values, CategoryTrend,
    ComparisonConfig, Metric, MetricComparison, PeriodComparison, Sentiment,
};
pub use forecast::{
    forecast, forecast_with, BudgetRisk, Forecast, ForecastConfig, ForecastHorizon, Horizon,
    Recommendation, SeasonalTable,
};
pub use health::{
    commitment_outlook, score_health, CommitmentOutlook, HealthInputs, HealthReport, HealthScore,
    HealthTier,
};
pub use patterns::{analyze_patterns, EfficiencyScore, PatternInsight, SpendingPatterns};
pub use progress::{
    budget_usage, summarize_goals, track_progress, track_progress_with, BudgetState, BudgetUsage,
    GoalSummary, ProgressConfig, ProgressReport, ProgressStatus, Trackable,
};
pub use trend::{analyze_trend, analyze_trend_with, TrendConfig, TrendDirection, TrendResult};
