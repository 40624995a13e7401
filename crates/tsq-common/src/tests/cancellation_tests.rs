use super::*;

#[test]
fn test_checkpoint_polls_at_interval() {
    let token = CancellationToken::new();
    let mut checkpoint = token.checkpoint();
    token.cancel();

    for _ in 1..CANCELLATION_POLL_INTERVAL {
        assert_eq!(checkpoint.tick(), Ok(()), "flag must not be read between polls");
    }
    assert_eq!(checkpoint.tick(), Err(Cancelled));
}

#[test]
fn test_clones_share_the_flag() {
    let token = CancellationToken::new();
    let other = token.clone();
    assert!(other.check().is_ok());

    token.cancel();
    assert!(other.is_cancelled());
    assert_eq!(other.check(), Err(Cancelled));
}

#[test]
fn test_cancel_from_another_thread() {
    let token = CancellationToken::new();
    let remote = token.clone();
    std::thread::spawn(move || remote.cancel())
        .join()
        .expect("cancel thread panicked");
    assert!(token.is_cancelled());
}
