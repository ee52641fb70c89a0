use std::collections::VecDeque;

/// Rolling frame-time window.
///
/// Frame statistics live here, outside the scene update loop: the embedding
/// loop records one sample per frame and whatever overlay wants an FPS
/// readout queries this collector.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl FrameTimer {
    /// A 60-sample window (one second at 60 fps).
    pub fn new() -> Self {
        Self::with_capacity(60)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record one frame's duration in seconds.
    pub fn record(&mut self, dt: f32) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    /// Mean frame time over the window, 0.0 before any sample.
    pub fn average_frame_time(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn fps(&self) -> f32 {
        let avg = self.average_frame_time();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
