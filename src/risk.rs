use crate::models::{DelayCategory, Role};

/// Inclusive upper bounds of the `Normal` and `Medium` tiers. Anything below
/// zero is on track, anything above `medium_max` is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub normal_max: i64,
    pub medium_max: i64,
}

const HEAVY: Thresholds = Thresholds {
    normal_max: 68,
    medium_max: 101,
};

const LIGHT: Thresholds = Thresholds {
    normal_max: 10,
    medium_max: 34,
};

pub fn thresholds(role: Role) -> Thresholds {
    match role {
        Role::Supervisor => HEAVY,
        Role::Analyst | Role::Team => LIGHT,
    }
}

/// Backlog is quota minus completed; a negative backlog is ahead of pace.
/// Meeting quota exactly (backlog 0) is already a normal delay.
pub fn classify(backlog: i64, role: Role) -> DelayCategory {
    let limits = thresholds(role);
    match backlog {
        b if b < 0 => DelayCategory::OnTrack,
        b if b <= limits.normal_max => DelayCategory::Normal,
        b if b <= limits.medium_max => DelayCategory::Medium,
        _ => DelayCategory::High,
    }
}

pub fn backlog(quota: i64, completed: i64) -> i64 {
    quota.saturating_sub(completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_role_boundaries_are_exact() {
        for role in [Role::Analyst, Role::Team] {
            assert_eq!(classify(-1, role), DelayCategory::OnTrack);
            assert_eq!(classify(0, role), DelayCategory::Normal);
            assert_eq!(classify(10, role), DelayCategory::Normal);
            assert_eq!(classify(11, role), DelayCategory::Medium);
            assert_eq!(classify(34, role), DelayCategory::Medium);
            assert_eq!(classify(35, role), DelayCategory::High);
        }
    }

    #[test]
    fn heavy_role_boundaries_are_exact() {
        assert_eq!(classify(-1, Role::Supervisor), DelayCategory::OnTrack);
        assert_eq!(classify(0, Role::Supervisor), DelayCategory::Normal);
        assert_eq!(classify(68, Role::Supervisor), DelayCategory::Normal);
        assert_eq!(classify(69, Role::Supervisor), DelayCategory::Medium);
        assert_eq!(classify(101, Role::Supervisor), DelayCategory::Medium);
        assert_eq!(classify(102, Role::Supervisor), DelayCategory::High);
    }

    #[test]
    fn categories_are_monotonic_in_backlog() {
        for role in Role::ALL {
            let mut previous = classify(-500, role);
            for value in -499..=500 {
                let current = classify(value, role);
                assert!(current >= previous, "{role} regressed at {value}");
                previous = current;
            }
            assert_eq!(classify(i64::MIN, role), DelayCategory::OnTrack);
            assert_eq!(classify(i64::MAX, role), DelayCategory::High);
        }
    }

    #[test]
    fn analyst_scenarios() {
        let quota = 10 * 17;
        assert_eq!(classify(backlog(quota, 160), Role::Analyst), DelayCategory::Normal);
        assert_eq!(classify(backlog(quota, 200), Role::Analyst), DelayCategory::OnTrack);
        assert_eq!(classify(backlog(quota, 130), Role::Analyst), DelayCategory::High);
    }

    #[test]
    fn supervisor_scenario() {
        let quota = 20 * 34;
        assert_eq!(backlog(quota, 600), 80);
        assert_eq!(classify(backlog(quota, 600), Role::Supervisor), DelayCategory::Medium);
    }

    #[test]
    fn extreme_quotas_do_not_overflow() {
        assert_eq!(backlog(i64::MIN, 5), i64::MIN);
        assert_eq!(backlog(i64::MAX, -5), i64::MAX);
        assert_eq!(classify(backlog(i64::MIN, 5), Role::Analyst), DelayCategory::OnTrack);
    }

    #[test]
    fn classification_is_repeatable() {
        for value in [-30, 0, 10, 40, 80, 200] {
            for role in Role::ALL {
                assert_eq!(classify(value, role), classify(value, role));
            }
        }
    }
}
