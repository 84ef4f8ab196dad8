//! Job lifecycle integration tests
//!
//! Drive jobs from submission to completion through the controller and
//! check the persisted rows, counters and progress events.

#[cfg(test)]
mod tests {
    use crate::common::{ControllerFactory, MockUpstream, addresses, wait_for_terminal};
    use balance_batch::{
        AddressStatus, ExportFormat, JobStatus, NewJob, ProgressEvent, ResultOrder,
    };
    use serde_json::json;

    fn job_at(rate_limit: u32) -> NewJob {
        NewJob {
            name: Some("integration".to_string()),
            rate_limit: Some(rate_limit),
            target_token: None,
        }
    }

    #[tokio::test]
    async fn test_three_addresses_one_upstream_failure() {
        let upstream = MockUpstream::start().await;
        upstream.respond("addrB", 500, json!({"error": "boom"})).await;
        upstream.default_balance().await;

        let controller = ControllerFactory::create(&upstream.base_url());
        let job = controller
            .submit(job_at(5), addresses(&["addrA", "addrB", "addrC"]))
            .await
            .unwrap();

        let job = wait_for_terminal(&controller, &job.id).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.total_addresses, 3);
        assert_eq!(job.processed_addresses, 3);
        assert_eq!(job.successful_lookups, 2);
        assert_eq!(job.failed_lookups, 1);
        assert!(job.completed_at.is_some());

        let rows = controller
            .list_results(&job.id, ResultOrder::Inserted)
            .await
            .unwrap();
        let failed = rows.iter().find(|r| r.address == "addrB").unwrap();
        assert_eq!(failed.status, AddressStatus::Failed);
        assert!(!failed.error_message.as_deref().unwrap_or("").is_empty());
        assert!(failed.payload.is_none());

        for row in rows.iter().filter(|r| r.address != "addrB") {
            assert_eq!(row.status, AddressStatus::Success);
            assert_eq!(row.payload, Some(json!({"sol": 1.0})));
        }
        assert_eq!(upstream.hits("addrB").await, 1);
    }

    #[tokio::test]
    async fn test_throttled_address_recovers() {
        let upstream = MockUpstream::start().await;
        upstream.throttle("addrA", 3).await;
        upstream.default_balance().await;

        let controller = ControllerFactory::create(&upstream.base_url());
        let job = controller
            .submit(job_at(100), addresses(&["addrA"]))
            .await
            .unwrap();

        let job = wait_for_terminal(&controller, &job.id).await;
        assert_eq!(job.successful_lookups, 1);
        assert_eq!(upstream.hits("addrA").await, 4);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_counts_failures_and_completes() {
        let controller = ControllerFactory::offline();
        let job = controller
            .submit(job_at(100), addresses(&["addrA", "addrB"]))
            .await
            .unwrap();

        let job = wait_for_terminal(&controller, &job.id).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.failed_lookups, 2);

        let rows = controller
            .list_results(&job.id, ResultOrder::Inserted)
            .await
            .unwrap();
        for row in rows {
            let message = row.error_message.unwrap();
            assert!(message.starts_with("retries exhausted after 4 attempts"));
        }
    }

    #[tokio::test]
    async fn test_progress_events_cover_every_address() {
        let upstream = MockUpstream::start().await;
        upstream.default_balance().await;

        let controller = ControllerFactory::create(&upstream.base_url());
        let mut events = controller.subscribe();
        let job = controller
            .submit(job_at(100), addresses(&["addrA", "addrB", "addrC"]))
            .await
            .unwrap();

        let mut indices = Vec::new();
        loop {
            match events.recv().await.unwrap() {
                ProgressEvent::AddressProcessed { address_index, .. } => {
                    indices.push(address_index)
                }
                ProgressEvent::RunFinished { job_id, status, counters } => {
                    assert_eq!(job_id, job.id);
                    assert_eq!(status, JobStatus::Completed);
                    assert_eq!(counters.processed, 3);
                    break;
                }
                ProgressEvent::RunStarted { .. } => {}
            }
        }
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_listing_and_export_are_idempotent() {
        let upstream = MockUpstream::start().await;
        upstream.default_balance().await;

        let controller = ControllerFactory::create(&upstream.base_url());
        let job = controller
            .submit(job_at(100), addresses(&["addrA", "addrB"]))
            .await
            .unwrap();
        wait_for_terminal(&controller, &job.id).await;

        let first = controller
            .list_results(&job.id, ResultOrder::Processed)
            .await
            .unwrap();
        let second = controller
            .list_results(&job.id, ResultOrder::Processed)
            .await
            .unwrap();
        assert_eq!(first, second);

        for format in [ExportFormat::Csv, ExportFormat::Json] {
            let a = controller.export(&job.id, format).await.unwrap();
            let b = controller.export(&job.id, format).await.unwrap();
            assert_eq!(a, b);
        }
    }

    #[tokio::test]
    async fn test_completed_job_cannot_restart() {
        let upstream = MockUpstream::start().await;
        upstream.default_balance().await;

        let controller = ControllerFactory::create(&upstream.base_url());
        let job = controller
            .submit(job_at(100), addresses(&["addrA"]))
            .await
            .unwrap();
        wait_for_terminal(&controller, &job.id).await;

        let err = controller
            .start_job(&job.id, addresses(&["addrZ"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            balance_batch::BatchError::InvalidTransition(_)
        ));
    }
}
