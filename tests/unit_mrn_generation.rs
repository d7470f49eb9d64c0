use std::sync::atomic::{AtomicUsize, Ordering};

use caredesk::modules::users::service::generate_unique_mrn;
use caredesk_core::mrn::{MRN_MAX_ATTEMPTS, MRN_PREFIX, generate_mrn};

#[test]
fn generated_mrn_has_expected_shape() {
    let mrn = generate_mrn();
    assert!(mrn.starts_with(MRN_PREFIX));
    assert_eq!(mrn, mrn.to_uppercase());
    // prefix + 13-digit millisecond timestamp + 8 random chars + checksum
    assert_eq!(mrn.len(), 25);
}

#[tokio::test]
async fn first_free_candidate_is_returned() {
    let mrn = generate_unique_mrn(|_| async { Ok(false) }).await.unwrap();
    assert!(mrn.starts_with(MRN_PREFIX));
}

#[tokio::test]
async fn retries_past_collisions() {
    let calls = AtomicUsize::new(0);

    let mrn = generate_unique_mrn(|_| {
        let attempt = calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok(attempt < 2) }
    })
    .await
    .unwrap();

    assert!(mrn.starts_with(MRN_PREFIX));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gives_up_after_the_attempt_cap() {
    let calls = AtomicUsize::new(0);

    let result = generate_unique_mrn(|_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(true) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), MRN_MAX_ATTEMPTS as usize);
}

#[tokio::test]
async fn lookup_errors_propagate_immediately() {
    let calls = AtomicUsize::new(0);

    let result = generate_unique_mrn(|_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async {
            Err(caredesk_core::errors::AppError::internal(anyhow::anyhow!(
                "store unavailable"
            )))
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
