//! 全局通知
//!
//! 右上角 toast（3 秒后自动消失）与离线数据横幅。

use crate::components::icons::WifiOff;
use leptos::prelude::*;

/// 一条 toast，`seq` 每条递增
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    seq: u64,
    message: String,
    is_error: bool,
}

/// 只清除计时器对应的那条 toast，之后弹出的新 toast 保留
fn dismiss(current: &mut Option<Notice>, seq: u64) -> bool {
    if current.as_ref().is_some_and(|n| n.seq == seq) {
        *current = None;
        true
    } else {
        false
    }
}

/// 通知上下文
#[derive(Clone, Copy)]
pub struct NotifyContext {
    notification: ReadSignal<Option<Notice>>,
    set_notification: WriteSignal<Option<Notice>>,
    next_seq: StoredValue<u64>,
    /// 当前页面展示的是离线样例数据
    offline: ReadSignal<bool>,
    set_offline: WriteSignal<bool>,
}

impl NotifyContext {
    pub fn new() -> Self {
        let (notification, set_notification) = signal(Option::<Notice>::None);
        let (offline, set_offline) = signal(false);
        Self {
            notification,
            set_notification,
            next_seq: StoredValue::new(0),
            offline,
            set_offline,
        }
    }

    fn show(&self, message: String, is_error: bool) {
        self.next_seq.update_value(|n| *n += 1);
        self.set_notification.set(Some(Notice {
            seq: self.next_seq.get_value(),
            message,
            is_error,
        }));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.show(msg.into(), false);
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.show(msg.into(), true);
    }

    pub fn set_offline(&self, offline: bool) {
        self.set_offline.set(offline);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.get()
    }
}

pub fn use_notify() -> NotifyContext {
    use_context::<NotifyContext>().expect("NotifyContext should be provided")
}

#[component]
pub fn Toast() -> impl IntoView {
    let ctx = use_notify();
    let notification = ctx.notification;
    let set_notification = ctx.set_notification;

    // 3秒后清除通知
    Effect::new(move |_| {
        if let Some(seq) = notification.with(|n| n.as_ref().map(|n| n.seq)) {
            set_timeout(
                move || set_notification.maybe_update(|n| dismiss(n, seq)),
                std::time::Duration::from_secs(3),
            );
        }
    });

    move || {
        notification.get().map(|Notice { message, is_error, .. }| {
            let class = if is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{message}</span>
                    </div>
                </div>
            }
        })
    }
}

#[component]
pub fn OfflineBanner() -> impl IntoView {
    let ctx = use_notify();

    view! {
        <Show when=move || ctx.is_offline()>
            <div role="alert" class="alert alert-warning rounded-none justify-center py-2 text-sm">
                <WifiOff attr:class="h-4 w-4" />
                <span>"Offline: the clinic server is unreachable, showing sample data. Changes are disabled."</span>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(seq: u64) -> Option<Notice> {
        Some(Notice {
            seq,
            message: format!("toast {}", seq),
            is_error: false,
        })
    }

    #[test]
    fn dismiss_clears_matching_toast() {
        let mut current = notice(1);
        assert!(dismiss(&mut current, 1));
        assert_eq!(current, None);
    }

    #[test]
    fn stale_timer_keeps_newer_toast() {
        // "Logged in" 之后马上弹出拒绝提示，第一条的计时器到期
        let mut current = notice(2);
        assert!(!dismiss(&mut current, 1));
        assert_eq!(current, notice(2));

        assert!(dismiss(&mut current, 2));
        assert_eq!(current, None);
    }

    #[test]
    fn dismiss_after_already_cleared() {
        let mut current = None;
        assert!(!dismiss(&mut current, 3));
    }
}
