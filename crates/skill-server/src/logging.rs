/// Initialise the logger with the timestamped line format.
pub fn init_logging(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}] {} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .init();
}

/// Measures one skill turn. Turns slower than the threshold are logged on drop.
pub struct Timer {
    name: String,
    start: std::time::Instant,
    slow_after_ms: u128,
}

impl Timer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: std::time::Instant::now(),
            slow_after_ms: 1000,
        }
    }

    /// Override the slow-turn threshold.
    pub fn with_threshold(mut self, slow_after_ms: u128) -> Self {
        self.slow_after_ms = slow_after_ms;
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    pub fn is_slow(&self) -> bool {
        self.elapsed_ms() > self.slow_after_ms
    }

    pub fn debug(&self, user_id: &str) {
        log::debug!("[{}] {} completed in {}ms", user_id, self.name, self.elapsed_ms());
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if self.is_slow() {
            log::warn!("{} took {}ms (slow!)", self.name, self.elapsed_ms());
        }
    }
}
