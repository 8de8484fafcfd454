//! Browser timers as futures

use js_sys::Promise;
use wasm_bindgen_futures::JsFuture;

/// Resolves after `ms` milliseconds via `setTimeout`
pub async fn sleep_ms(ms: u32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        let Some(window) = web_sys::window() else {
            log::warn!("no window for setTimeout, timer will not fire");
            return;
        };
        let delay = i32::try_from(ms).unwrap_or(i32::MAX);
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay)
            .is_err()
        {
            log::warn!("setTimeout failed, timer will not fire");
        }
    });
    let _ = JsFuture::from(promise).await;
}
