use std::time::Duration;

use shipsfrom_engine::Timer;

pub(crate) struct GlooTimer;

#[async_trait::async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
