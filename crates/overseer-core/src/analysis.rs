//! Pattern analysis over a snapshot of job records.
//!
//! Pure functions: the same snapshot always produces the same report.
//! Predicates only look at a job's name and arguments, never at its status
//! or timing.

use crate::domain::{JobPattern, JobRecord, JobStats, JobStatus};

struct Predicate {
    description: &'static str,
    matches: fn(&JobRecord) -> bool,
}

const PREDICATES: [Predicate; 5] = [
    Predicate {
        description: "Job name length > 10",
        matches: |job| job.name.chars().count() > 10,
    },
    Predicate {
        description: "Job name contains digits",
        matches: |job| job.name.chars().any(|c| c.is_ascii_digit()),
    },
    Predicate {
        description: "Argument count > 2",
        matches: |job| job.arguments.len() > 2,
    },
    Predicate {
        description: "Job name is all lowercase",
        matches: |job| job.name == job.name.to_lowercase(),
    },
    Predicate {
        description: "Job name contains special characters",
        matches: |job| job.name.chars().any(|c| !c.is_ascii_alphanumeric()),
    },
];

/// Overall success rate plus the five fixed pattern reports.
pub fn compute_stats(jobs: &[JobRecord]) -> JobStats {
    let overall_success_rate = success_rate(jobs.iter());

    let patterns = PREDICATES
        .iter()
        .map(|predicate| analyze(jobs, predicate, overall_success_rate))
        .collect();

    JobStats {
        total_jobs: jobs.len(),
        overall_success_rate,
        patterns,
    }
}

fn analyze(jobs: &[JobRecord], predicate: &Predicate, overall: f64) -> JobPattern {
    let matching: Vec<&JobRecord> = jobs.iter().filter(|job| (predicate.matches)(job)).collect();
    let rate = success_rate(matching.iter().copied());

    JobPattern {
        pattern: predicate.description.to_string(),
        match_count: matching.len(),
        success_rate: rate,
        difference_from_average: difference_from_average(rate, overall),
    }
}

/// Completed share of `jobs`; 0 for an empty set.
fn success_rate<'a>(jobs: impl Iterator<Item = &'a JobRecord>) -> f64 {
    let (total, completed) = jobs.fold((0usize, 0usize), |(total, completed), job| {
        let done = usize::from(job.status == JobStatus::Completed);
        (total + 1, completed + done)
    });
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    }
}

/// `(rate - overall) / overall * 100`, rounded, with a trailing `%`.
///
/// With an overall rate of 0 no job completed, so every subgroup rate is 0
/// too and the difference is reported as `0%`.
pub fn difference_from_average(rate: f64, overall: f64) -> String {
    if overall == 0.0 {
        return "0%".to_string();
    }
    let percent = ((rate - overall) / overall * 100.0).round() as i64;
    format!("{percent}%")
}
