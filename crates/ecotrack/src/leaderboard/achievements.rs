//! Achievement predicates. Each one is independent and judged afresh from
//! the employee's calculation history, so evaluation is idempotent over
//! unchanged data.

use crate::footprint::domain::FootprintRecord;

use super::views::Achievement;

/// Evaluates every achievement against a newest-first history. An empty
/// history earns nothing.
pub(crate) fn evaluate(history: &[FootprintRecord]) -> Vec<Achievement> {
    let Some(latest) = history.first() else {
        return Vec::new();
    };
    let mut achievements = Vec::new();

    if let Some(oldest) = history.last() {
        achievements.push(Achievement {
            id: "first_calculation",
            name: "Getting Started",
            description: "Completed your first carbon footprint calculation",
            icon: "\u{1F331}",
            earned_at: oldest.calculated_at,
        });
    }

    if history.len() >= 5 {
        achievements.push(Achievement {
            id: "consistent_tracker",
            name: "Consistent Tracker",
            description: "Tracked your footprint 5 times",
            icon: "\u{1F4CA}",
            earned_at: history[4].calculated_at,
        });
    }

    if latest.total < 1000.0 {
        achievements.push(Achievement {
            id: "low_footprint",
            name: "Eco Warrior",
            description: "Maintained footprint under 1000 kg CO2",
            icon: "\u{1F30D}",
            earned_at: latest.calculated_at,
        });
    }

    if history.len() >= 3 {
        let declining = history
            .windows(2)
            .take(2)
            .all(|pair| pair[0].total < pair[1].total);
        if declining {
            achievements.push(Achievement {
                id: "improvement_trend",
                name: "Trending Down",
                description: "Reduced footprint for 3 consecutive months",
                icon: "\u{1F4C9}",
                earned_at: latest.calculated_at,
            });
        }
    }

    if latest.activity.recycles_everything() {
        achievements.push(Achievement {
            id: "active_recycler",
            name: "Recycling Champion",
            description: "Recycling all materials",
            icon: "\u{267B}\u{FE0F}",
            earned_at: latest.calculated_at,
        });
    }

    let transport = latest.activity.transport.as_deref();
    if matches!(transport, Some("public") | Some("walk/bicycle")) {
        achievements.push(Achievement {
            id: "green_commuter",
            name: "Green Commuter",
            description: "Using eco-friendly transportation",
            icon: "\u{1F6B4}",
            earned_at: latest.calculated_at,
        });
    }

    achievements
}
