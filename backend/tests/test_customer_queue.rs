//! Tests for the FIFO customer queue

use pizza_shop_core_rs::CustomerQueue;

#[test]
fn test_queue_serves_in_arrival_order() {
    let mut queue = CustomerQueue::new();
    queue.admit(3);

    let served: Vec<u64> = std::iter::from_fn(|| queue.pop_oldest())
        .map(|c| c.id)
        .collect();
    assert_eq!(served, vec![1, 2, 3]);
}

#[test]
fn test_aging_increments_every_customer() {
    let mut queue = CustomerQueue::new();
    queue.admit(2);
    queue.age_and_drop_impatient(10);
    queue.admit(1);
    queue.age_and_drop_impatient(10);

    let waited: Vec<u32> = queue.iter().map(|c| c.waited).collect();
    assert_eq!(waited, vec![2, 2, 1]);
}

#[test]
fn test_impatient_customers_leave_survivors_keep_order() {
    let mut queue = CustomerQueue::new();
    queue.admit(2); // ids 1, 2
    for _ in 0..5 {
        queue.age_and_drop_impatient(10);
    }
    queue.admit(2); // ids 3, 4
    for _ in 0..4 {
        queue.age_and_drop_impatient(10);
    }

    // ids 1 and 2 have waited 9; one more tick sends them home
    let left = queue.age_and_drop_impatient(10);
    let left_ids: Vec<u64> = left.iter().map(|c| c.id).collect();
    assert_eq!(left_ids, vec![1, 2]);

    let remaining: Vec<u64> = queue.iter().map(|c| c.id).collect();
    assert_eq!(remaining, vec![3, 4]);
}

#[test]
fn test_head_is_longest_waiting() {
    let mut queue = CustomerQueue::new();
    queue.admit(1);
    queue.age_and_drop_impatient(10);
    queue.admit(1);

    let max_waited = queue.iter().map(|c| c.waited).max().unwrap();
    assert_eq!(queue.front().unwrap().waited, max_waited);
}
