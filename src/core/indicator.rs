//! 列表 UI 的去抖動「篩選中」旗標
//!
//! 推導本身是同步的，旗標不代表有實際工作在跑；
//! 只在最後一次篩選變更後維持一段時間，讓 UI 顯示短暫的載入遮罩。

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct FilteringIndicator {
    window: Duration,
    state: Arc<watch::Sender<bool>>,
    pending: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
    settled: Arc<AtomicUsize>,
}

impl FilteringIndicator {
    pub fn new(window: Duration) -> Self {
        let (state, _) = watch::channel(false);
        Self {
            window,
            state: Arc::new(state),
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
            settled: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 舉起旗標並重新計時，先取消之前的計時器
    ///
    /// 沒有 tokio runtime 時無法排程，旗標維持放下
    pub fn arm(&mut self) {
        self.abort_pending();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::debug!("No async runtime, skipping filtering indicator");
                return;
            }
        };

        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(true);

        let state = Arc::clone(&self.state);
        let generation = Arc::clone(&self.generation);
        let settled = Arc::clone(&self.settled);
        let window = self.window;

        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(window).await;

            // 世代不符代表已被重新觸發或取消
            let lowered = state.send_if_modified(|filtering| {
                if generation.load(Ordering::SeqCst) != mine {
                    return false;
                }
                let changed = *filtering;
                *filtering = false;
                changed
            });

            if lowered {
                settled.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(window_ms = window.as_millis() as u64, "Filtering settled");
            }
        }));
    }

    /// 取消計時器並放下旗標，不計入完成次數
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.state.send_replace(false);
    }

    fn abort_pending(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    pub fn is_filtering(&self) -> bool {
        *self.state.borrow()
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending
            .as_ref()
            .map(|pending| !pending.is_finished())
            .unwrap_or(false)
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// 篩選中 -> 完成 的轉換次數
    pub fn settle_count(&self) -> usize {
        self.settled.load(Ordering::SeqCst)
    }
}

impl Default for FilteringIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for FilteringIndicator {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_flag_clears_after_window() {
        let mut indicator = FilteringIndicator::default();
        assert_eq!(indicator.window(), DEFAULT_DEBOUNCE);
        indicator.arm();
        assert!(indicator.is_filtering());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(indicator.is_filtering());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!indicator.is_filtering());
        assert_eq!(indicator.settle_count(), 1);
        assert!(!indicator.has_pending_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_collapses_into_one_settle() {
        let mut indicator = FilteringIndicator::default();

        indicator.arm();
        tokio::time::sleep(Duration::from_millis(100)).await;
        indicator.arm();
        tokio::time::sleep(Duration::from_millis(100)).await;
        indicator.arm();

        // 第一次觸發後 300ms，但最後一次觸發才過 100ms
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(indicator.is_filtering());
        assert_eq!(indicator.settle_count(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!indicator.is_filtering());
        assert_eq!(indicator.settle_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_settle() {
        let mut indicator = FilteringIndicator::new(Duration::from_millis(50));
        indicator.arm();
        indicator.cancel();
        assert!(!indicator.is_filtering());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(indicator.settle_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_transitions() {
        let mut indicator = FilteringIndicator::default();
        let mut rx = indicator.subscribe();

        indicator.arm();
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());

        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn test_arm_without_runtime_keeps_flag_lowered() {
        let mut indicator = FilteringIndicator::default();
        indicator.arm();
        assert!(!indicator.is_filtering());
        assert!(!indicator.has_pending_timer());
    }
}
