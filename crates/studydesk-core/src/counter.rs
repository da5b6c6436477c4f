#![forbid(unsafe_code)]

//! Count-up animation for statistic figures such as `500+`.

use core::time::Duration;

/// One running count-up.
///
/// The target is the number formed by every ASCII digit of the original text
/// and the suffix is whatever remains once the digits are removed, so
/// `"1,200+"` counts to `1200` rendered with the suffix `",+"`.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: u64,
    suffix: String,
    current: f64,
    increment: f64,
}

/// Rendered state after one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterFrame {
    pub text: String,
    pub done: bool,
}

impl CounterAnimation {
    /// Returns `None` when `text` contains no digits or the digits overflow.
    #[must_use]
    pub fn new(text: &str, duration: Duration, frame: Duration) -> Option<Self> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let target: u64 = digits.parse().ok()?;
        let suffix = text.chars().filter(|c| !c.is_ascii_digit()).collect();

        let frame_ms = frame.as_secs_f64() * 1000.0;
        let frames = if frame_ms > 0.0 {
            duration.as_secs_f64() * 1000.0 / frame_ms
        } else {
            1.0
        };
        let increment = if frames > 0.0 {
            target as f64 / frames
        } else {
            target as f64
        };

        Some(Self {
            target,
            suffix,
            current: 0.0,
            increment,
        })
    }

    #[must_use]
    pub fn target(&self) -> u64 {
        self.target
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Advance one frame.
    pub fn step(&mut self) -> CounterFrame {
        self.current += self.increment;
        let done = self.current >= self.target as f64;
        if done {
            self.current = self.target as f64;
        }
        CounterFrame {
            text: format!("{}{}", self.current.floor() as u64, self.suffix),
            done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stock(text: &str) -> Option<CounterAnimation> {
        CounterAnimation::new(text, Duration::from_millis(2000), Duration::from_millis(16))
    }

    #[test]
    fn parses_target_and_suffix() {
        let counter = stock("500+").unwrap();
        assert_eq!(counter.target(), 500);
        assert_eq!(counter.suffix(), "+");

        let counter = stock("1,200+").unwrap();
        assert_eq!(counter.target(), 1200);
        assert_eq!(counter.suffix(), ",+");
    }

    #[test]
    fn text_without_digits_is_not_animated() {
        assert!(stock("many").is_none());
        assert!(stock("").is_none());
    }

    #[test]
    fn reaches_target_in_expected_frame_count() {
        let mut counter = stock("500+").unwrap();
        let mut frames = 0;
        let last = loop {
            frames += 1;
            let frame = counter.step();
            if frame.done {
                break frame;
            }
            assert!(frames < 1000, "counter never finished");
        };
        assert_eq!(last.text, "500+");
        assert_eq!(frames, 125);
    }

    #[test]
    fn first_frame_is_floored() {
        let mut counter = stock("50%").unwrap();
        // 50 / 125 = 0.4 per frame.
        assert_eq!(counter.step().text, "0%");
        counter.step();
        assert_eq!(counter.step().text, "1%");
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut counter = stock("0").unwrap();
        assert_eq!(
            counter.step(),
            CounterFrame {
                text: "0".into(),
                done: true
            }
        );
    }
}
