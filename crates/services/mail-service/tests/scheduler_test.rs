use std::sync::Arc;

use mail_service_lib::{
    DispatchConfig, DispatchScheduler, LocalLease, LogMailSender, MailError,
    VerificationDispatcher,
};
use user_service_lib::service::MockVerificationService;

fn dispatcher() -> Arc<VerificationDispatcher> {
    let mut verifications = MockVerificationService::new();
    verifications.expect_list_pending().returning(|| Ok(vec![]));

    Arc::new(VerificationDispatcher::new(
        Arc::new(verifications),
        Arc::new(LogMailSender),
        Arc::new(LocalLease::new()),
        &DispatchConfig::default(),
    ))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scheduler_starts_and_shuts_down() {
    let scheduler = DispatchScheduler::start(dispatcher(), "0 * * * * *")
        .await
        .unwrap();

    assert!(!scheduler.job_id().is_nil());
    scheduler.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_cron_is_rejected() {
    let result = DispatchScheduler::start(dispatcher(), "every minute please").await;

    assert!(matches!(result, Err(MailError::Scheduler(_))));
}
