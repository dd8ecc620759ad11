//! One pure function per scoring axis. Each is built from additive point
//! rules; evidence strings are emitted in rule-declaration order.

pub mod accessibility;
pub mod best_practices;
pub mod content;
pub mod domain_trust;
pub mod online_presence;
pub mod performance;
pub mod security;
pub mod seo;
pub mod technology;

use sitelens_common::{AuditBundle, Axis, BandTable, CategoryScore};

/// Score one axis.
pub fn score_axis(axis: Axis, bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    match axis {
        Axis::Performance => performance::score(bundle, bands),
        Axis::Seo => seo::score(bundle, bands),
        Axis::Security => security::score(bundle, bands),
        Axis::Accessibility => accessibility::score(bundle, bands),
        Axis::BestPractices => best_practices::score(bundle, bands),
        Axis::DomainTrust => domain_trust::score(bundle, bands),
        Axis::Content => content::score(bundle, bands),
        Axis::Technology => technology::score(bundle, bands),
        Axis::OnlinePresence => online_presence::score(bundle, bands),
    }
}

/// Running point total for one axis.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    points: u32,
    cap: Option<u32>,
    details: Vec<String>,
}

impl Tally {
    pub(crate) fn award(&mut self, points: u32, detail: impl Into<String>) {
        self.points += points;
        self.details.push(detail.into());
    }

    pub(crate) fn note(&mut self, detail: impl Into<String>) {
        self.details.push(detail.into());
    }

    /// Award `points` and `pass` evidence when `condition` holds, else `fail` evidence.
    pub(crate) fn check(&mut self, condition: bool, points: u32, pass: &str, fail: &str) {
        if condition {
            self.award(points, pass);
        } else {
            self.note(fail);
        }
    }

    /// Hard ceiling regardless of points earned. The lowest cap wins.
    pub(crate) fn cap(&mut self, ceiling: u32, detail: impl Into<String>) {
        self.cap = Some(self.cap.map_or(ceiling, |c| c.min(ceiling)));
        self.details.push(detail.into());
    }

    pub(crate) fn finish(self, bands: &BandTable) -> CategoryScore {
        let mut score = self.points.min(100);
        if let Some(cap) = self.cap {
            score = score.min(cap);
        }
        CategoryScore::scored(score as u8, self.details, bands)
    }
}

/// Points proportional to a 0.0-1.0 ratio, rounded.
pub(crate) fn proportional(ratio: f64, max: u32) -> u32 {
    (ratio.clamp(0.0, 1.0) * max as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_limits_score() {
        let mut t = Tally::default();
        t.award(80, "lots");
        t.cap(20, "capped");
        t.cap(40, "looser cap ignored");
        let c = t.finish(&BandTable::default());
        assert_eq!(c.score, 20);
        assert_eq!(c.details, vec!["lots", "capped", "looser cap ignored"]);
    }

    #[test]
    fn points_never_exceed_hundred() {
        let mut t = Tally::default();
        t.award(70, "a");
        t.award(70, "b");
        assert_eq!(t.finish(&BandTable::default()).score, 100);
    }

    #[test]
    fn proportional_rounds_and_clamps() {
        assert_eq!(proportional(0.5, 15), 8);
        assert_eq!(proportional(1.7, 10), 10);
        assert_eq!(proportional(-1.0, 10), 0);
    }
}
