use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::Tally;

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    let Some(speed) = &bundle.speed else {
        return CategoryScore::no_data("No speed test result available");
    };

    let mut t = Tally::default();
    let lab = speed.performance_score.min(100) as u32;
    t.award(
        (lab as f64 * 0.6).round() as u32,
        format!("Lab performance score {lab}/100"),
    );

    match speed.lcp_ms {
        Some(lcp) if lcp <= 2500 => t.award(15, format!("Largest Contentful Paint {lcp}ms (good)")),
        Some(lcp) if lcp <= 4000 => {
            t.award(8, format!("Largest Contentful Paint {lcp}ms (needs improvement)"))
        }
        Some(lcp) => t.note(format!("Largest Contentful Paint {lcp}ms (poor)")),
        None => t.note("Largest Contentful Paint not reported"),
    }

    match speed.cls {
        Some(cls) if cls <= 0.1 => t.award(10, format!("Cumulative Layout Shift {cls:.2} (good)")),
        Some(cls) if cls <= 0.25 => {
            t.award(5, format!("Cumulative Layout Shift {cls:.2} (needs improvement)"))
        }
        Some(cls) => t.note(format!("Cumulative Layout Shift {cls:.2} (poor)")),
        None => t.note("Cumulative Layout Shift not reported"),
    }

    match speed.tbt_ms {
        Some(tbt) if tbt <= 200 => t.award(10, format!("Total Blocking Time {tbt}ms (good)")),
        Some(tbt) if tbt <= 600 => {
            t.award(5, format!("Total Blocking Time {tbt}ms (needs improvement)"))
        }
        Some(tbt) => t.note(format!("Total Blocking Time {tbt}ms (poor)")),
        None => t.note("Total Blocking Time not reported"),
    }

    match speed.ttfb_ms {
        Some(ttfb) if ttfb <= 800 => t.award(5, format!("Time to First Byte {ttfb}ms")),
        Some(ttfb) => t.note(format!("Slow Time to First Byte {ttfb}ms")),
        None => t.note("Time to First Byte not reported"),
    }

    t.finish(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::{Snapshot, SpeedResult};

    #[test]
    fn missing_speed_result_is_no_data() {
        let bundle = AuditBundle::from_snapshot(Snapshot::new("https://example.com"));
        let c = score(&bundle, &BandTable::default());
        assert!(c.no_data);
    }

    #[test]
    fn fast_page_scores_full_marks() {
        let mut bundle = AuditBundle::from_snapshot(Snapshot::new("https://example.com"));
        bundle.speed = Some(SpeedResult {
            performance_score: 100,
            lcp_ms: Some(1200),
            cls: Some(0.01),
            tbt_ms: Some(50),
            ttfb_ms: Some(200),
        });
        let c = score(&bundle, &BandTable::default());
        assert_eq!(c.score, 100);
        assert!(!c.no_data);
    }

    #[test]
    fn weak_but_present_result_still_scores() {
        let mut bundle = AuditBundle::from_snapshot(Snapshot::new("https://example.com"));
        bundle.speed = Some(SpeedResult {
            performance_score: 10,
            ..Default::default()
        });
        let c = score(&bundle, &BandTable::default());
        assert!(!c.no_data);
        assert_eq!(c.score, 6);
        assert_eq!(c.details.len(), 5);
    }
}
