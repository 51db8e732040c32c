use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const FADE_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerPhase {
    Shown,
    Fading,
}

impl BannerPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            BannerPhase::Shown => "shown",
            BannerPhase::Fading => "fading",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerView {
    pub id: u64,
    pub message: String,
    pub phase: BannerPhase,
}

#[derive(Debug, Clone)]
struct Banner {
    id: u64,
    message: String,
    shown_at: Instant,
}

/// Transient error banners, newest first.
///
/// A banner stays for `ttl`, fades for [`FADE_DURATION`] and is then dropped.
/// Identical messages are not merged.
#[derive(Debug, Clone)]
pub struct BannerStack {
    ttl: Duration,
    next_id: u64,
    banners: VecDeque<Banner>,
}

impl BannerStack {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            banners: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.banners.push_front(Banner {
            id,
            message: message.into(),
            shown_at: now,
        });
        id
    }

    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.ttl + FADE_DURATION;
        self.banners
            .retain(|banner| now.saturating_duration_since(banner.shown_at) < lifetime);
    }

    pub fn visible(&mut self, now: Instant) -> Vec<BannerView> {
        self.prune(now);
        self.banners
            .iter()
            .map(|banner| BannerView {
                id: banner.id,
                message: banner.message.clone(),
                phase: if now.saturating_duration_since(banner.shown_at) < self.ttl {
                    BannerPhase::Shown
                } else {
                    BannerPhase::Fading
                },
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banners_fade_then_disappear() {
        let start = Instant::now();
        let mut stack = BannerStack::new(Duration::from_secs(5));
        stack.push("Failed to load statistics. Please try again.", start);

        let shown = stack.visible(start + Duration::from_secs(1));
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].phase, BannerPhase::Shown);

        let fading = stack.visible(start + Duration::from_millis(5100));
        assert_eq!(fading[0].phase, BannerPhase::Fading);

        assert!(stack.visible(start + Duration::from_millis(5300)).is_empty());
        assert!(stack.is_empty());
    }

    #[test]
    fn each_error_gets_its_own_banner_newest_first() {
        let start = Instant::now();
        let mut stack = BannerStack::new(Duration::from_secs(5));
        stack.push("same", start);
        stack.push("same", start + Duration::from_secs(2));

        let views = stack.visible(start + Duration::from_secs(2));
        assert_eq!(views.len(), 2);
        assert!(views[0].id > views[1].id);

        let later = stack.visible(start + Duration::from_millis(5400));
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].id, views[0].id);
    }
}
