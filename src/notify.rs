/// Host notification collaborator. Informed of exactly two terminal
/// events: a download finished, or a download failed. Fire-and-forget;
/// cancellation is not reported.
pub trait Notifier: Send + Sync {
    fn download_completed(&self, model_id: &str);
    fn download_failed(&self, reason: &str);
}

/// Notifier that drops everything; used headless and in tests.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn download_completed(&self, _model_id: &str) {}
    fn download_failed(&self, _reason: &str) {}
}
