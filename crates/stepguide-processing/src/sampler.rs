//! Fixed-cadence frame sampling.

use stepguide_models::Step;

use crate::error::{ProcessingError, ProcessingResult};

/// Picks frame timestamps at a fixed cadence and turns them into steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    /// Seconds between two sampled frames
    pub cadence_secs: u32,
    /// Timestamp of the first sampled frame
    pub offset_secs: u32,
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self {
            cadence_secs: 5,
            offset_secs: 5,
        }
    }
}

impl FrameSampler {
    pub fn new(cadence_secs: u32, offset_secs: u32) -> Self {
        Self {
            cadence_secs,
            offset_secs,
        }
    }

    /// Timestamps of every frame that fits in `duration_secs`, capped at `max_frames`.
    pub fn timestamps(&self, duration_secs: u32, max_frames: usize) -> ProcessingResult<Vec<u32>> {
        if self.cadence_secs == 0 {
            return Err(ProcessingError::sampling("cadence must be at least one second"));
        }

        let seconds: Vec<u32> = (0..)
            .map_while(|n: u32| {
                n.checked_mul(self.cadence_secs)
                    .and_then(|delta| delta.checked_add(self.offset_secs))
            })
            .take_while(|second| *second <= duration_secs)
            .take(max_frames)
            .collect();

        if seconds.is_empty() {
            return Err(ProcessingError::sampling(format!(
                "video of {}s is shorter than the first sample at {}s",
                duration_secs, self.offset_secs
            )));
        }

        Ok(seconds)
    }

    /// Build steps for `duration_secs` of video, resolving an image URL per frame.
    ///
    /// `image_url` receives the 1-based step index and the frame timestamp.
    pub fn sample<F>(&self, duration_secs: u32, max_frames: usize, image_url: F) -> ProcessingResult<Vec<Step>>
    where
        F: Fn(u32, u32) -> String,
    {
        let steps = self
            .timestamps(duration_secs, max_frames)?
            .into_iter()
            .enumerate()
            .map(|(position, second)| {
                let index = position as u32 + 1;
                Step::new(index, second, format_frame_title(second), image_url(index, second))
            })
            .collect();

        Ok(steps)
    }
}

/// `Frame MM:SS`, or `Frame H:MM:SS` past the first hour.
pub fn format_frame_title(second: u32) -> String {
    let hours = second / 3600;
    let minutes = (second % 3600) / 60;
    let secs = second % 60;
    if hours > 0 {
        format!("Frame {}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("Frame {:02}:{:02}", minutes, secs)
    }
}
