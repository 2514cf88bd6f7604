// Console progress indicator
use crate::application::surface::ProgressIndicator;
use crate::domain::clock::format_sim_time;

#[derive(Debug, Default)]
pub struct ConsoleProgress {
    last_percent: Option<i64>,
}

pub fn format_progress(percent: f64, sim_seconds: f64) -> String {
    format!("{:.2}% ({})", percent, format_sim_time(sim_seconds))
}

impl ProgressIndicator for ConsoleProgress {
    fn set_progress(&mut self, percent: f64, sim_seconds: f64) {
        let line = format_progress(percent, sim_seconds);
        // Whole-percent steps at info, everything else at debug
        let whole = percent.floor() as i64;
        if self.last_percent != Some(whole) {
            self.last_percent = Some(whole);
            tracing::info!("Progress {}", line);
        } else {
            tracing::debug!("Progress {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progress() {
        assert_eq!(format_progress(12.345, 3600.0), "12.35% (0 days, 1 Hrs, 0 Minutes)");
        assert_eq!(format_progress(0.0, 0.0), "0.00% (0 days, 0 Hrs, 0 Minutes)");
    }

    #[test]
    fn test_tracks_whole_percent() {
        let mut progress = ConsoleProgress::default();
        progress.set_progress(1.5, 60.0);
        progress.set_progress(1.9, 120.0);
        assert_eq!(progress.last_percent, Some(1));
        progress.set_progress(0.0, 0.0);
        assert_eq!(progress.last_percent, Some(0));
    }
}
