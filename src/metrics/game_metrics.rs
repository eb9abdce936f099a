use std::time::{Duration, Instant};

/// Per-process play statistics shown in the header. Nothing is saved.
pub struct GameMetrics {
    last_update: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    /// Advance the play clock; time only counts while `running`
    pub fn update(&mut self, running: bool) {
        self.update_at(running, Instant::now());
    }

    pub fn update_at(&mut self, running: bool, now: Instant) {
        if running {
            self.elapsed_time += now.saturating_duration_since(self.last_update);
        }
        self.last_update = now;
    }

    pub fn on_game_start(&mut self) {
        self.on_game_start_at(Instant::now());
    }

    pub fn on_game_start_at(&mut self, now: Instant) {
        self.last_update = now;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
