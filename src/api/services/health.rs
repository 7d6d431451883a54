use poem_openapi::payload::PlainText;

use crate::config::Config;

pub struct HealthService<'a> {
    pub config: &'a Config,
}

impl<'a> HealthService<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> PlainText<String> {
        PlainText(format!(
            "ok version={} transitions={:?}",
            env!("CARGO_PKG_VERSION"),
            self.config.transition_policy
        ))
    }
}
