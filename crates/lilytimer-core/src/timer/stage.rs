//! Presentation helpers: visual stage and `m:ss` text.

use serde::{Deserialize, Serialize};

use super::engine::Phase;

/// One of the five timer illustrations.
///
/// Stages 1-4 split the work interval into equal quartiles; stage 5 is
/// shown for the whole break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
}

impl Stage {
    const WORK_STAGES: [Stage; 4] = [Stage::Stage1, Stage::Stage2, Stage::Stage3, Stage::Stage4];

    /// Image asset name used by the UI.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Stage::Stage1 => "Stage1",
            Stage::Stage2 => "Stage2",
            Stage::Stage3 => "Stage3",
            Stage::Stage4 => "Stage4",
            Stage::Stage5 => "Stage5",
        }
    }
}

/// Pick the stage for the given work length, remaining seconds and phase.
pub fn derive_stage(work_secs: u64, remaining_secs: u64, phase: Phase) -> Stage {
    match phase {
        Phase::Break => Stage::Stage5,
        Phase::Idle => Stage::Stage1,
        Phase::Working if work_secs == 0 => Stage::Stage1,
        Phase::Working => {
            let elapsed = work_secs.saturating_sub(remaining_secs) as f64;
            let quartile = work_secs as f64 / 4.0;
            // elapsed == work_secs lands exactly on 4.0
            let index = (elapsed / quartile).floor().clamp(0.0, 3.0) as usize;
            Stage::WORK_STAGES[index]
        }
    }
}

/// Render seconds as `minutes:seconds` with the seconds zero-padded.
pub fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_of_an_hour() {
        assert_eq!(derive_stage(3600, 3600, Phase::Working), Stage::Stage1);
        assert_eq!(derive_stage(3600, 2701, Phase::Working), Stage::Stage1);
        assert_eq!(derive_stage(3600, 2700, Phase::Working), Stage::Stage2);
        assert_eq!(derive_stage(3600, 1800, Phase::Working), Stage::Stage3);
        assert_eq!(derive_stage(3600, 900, Phase::Working), Stage::Stage4);
    }

    #[test]
    fn finished_work_stays_on_last_work_stage() {
        assert_eq!(derive_stage(3600, 0, Phase::Working), Stage::Stage4);
        assert_eq!(derive_stage(7, 0, Phase::Working), Stage::Stage4);
    }

    #[test]
    fn break_is_always_stage5() {
        for remaining in [0, 1, 300, 1800] {
            assert_eq!(derive_stage(3600, remaining, Phase::Break), Stage::Stage5);
        }
    }

    #[test]
    fn idle_and_zero_work_are_stage1() {
        assert_eq!(derive_stage(3600, 0, Phase::Idle), Stage::Stage1);
        assert_eq!(derive_stage(0, 0, Phase::Working), Stage::Stage1);
    }

    #[test]
    fn uneven_quartiles() {
        // quartile = 2.5s
        assert_eq!(derive_stage(10, 8, Phase::Working), Stage::Stage1);
        assert_eq!(derive_stage(10, 7, Phase::Working), Stage::Stage2);
        assert_eq!(derive_stage(10, 5, Phase::Working), Stage::Stage3);
        assert_eq!(derive_stage(10, 2, Phase::Working), Stage::Stage4);
    }

    #[test]
    fn format_pads_seconds_only() {
        assert_eq!(format_remaining(0), "0:00");
        assert_eq!(format_remaining(7), "0:07");
        assert_eq!(format_remaining(1445), "24:05");
        assert_eq!(format_remaining(3600), "60:00");
    }

    #[test]
    fn asset_names() {
        assert_eq!(Stage::Stage1.asset_name(), "Stage1");
        assert_eq!(Stage::Stage5.asset_name(), "Stage5");
    }
}
