use std::thread;
use std::time::Duration;

/// Fixed-delay pacing between geocoding requests.
///
/// Nominatim allows at most one request per second, and bursts after an
/// error can get the client blocked, so errors get a longer cooldown.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
    cooldown: Duration,
    waited: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration, cooldown: Duration) -> Self {
        Self {
            delay,
            cooldown,
            waited: Duration::ZERO,
        }
    }

    /// Wait the normal inter-request delay
    pub fn pause(&mut self) {
        let delay = self.delay;
        self.sleep(delay);
    }

    /// Wait the extended delay used after a failed request
    pub fn cool_down(&mut self) {
        let cooldown = self.cooldown;
        self.sleep(cooldown);
    }

    /// Total time spent waiting so far
    pub fn waited(&self) -> Duration {
        self.waited
    }

    fn sleep(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        log::debug!("Rate limiting: sleeping {:?}", duration);
        thread::sleep(duration);
        self.waited += duration;
    }
}
