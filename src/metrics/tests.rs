use std::time::Duration;

use super::*;

fn ok(status: u16, bytes: u64, ms: u64) -> RequestOutcome {
    RequestOutcome::response(status, bytes, Duration::from_millis(ms))
}

fn refused(ms: u64) -> RequestOutcome {
    RequestOutcome::failed(
        AttemptError::new(AttemptErrorKind::Connect, "connection refused"),
        Duration::from_millis(ms),
    )
}

fn fold(outcomes: &[RequestOutcome]) -> Aggregate {
    let mut aggregate = Aggregate::new();
    for outcome in outcomes {
        aggregate.merge(outcome);
    }
    aggregate
}

#[test]
fn empty_aggregate_has_no_fastest() -> Result<(), String> {
    let aggregate = Aggregate::new();
    if aggregate.fastest().is_some() || aggregate.slowest().is_some() {
        return Err("Expected unset fastest/slowest".to_owned());
    }
    if aggregate.requests() != 0 || aggregate.errors() != 0 {
        return Err("Expected zero counters".to_owned());
    }
    Ok(())
}

#[test]
fn status_404_counts_as_error() -> Result<(), String> {
    let aggregate = fold(&[ok(404, 9, 3)]);
    if aggregate.errors() != 1 {
        return Err(format!("Expected 1 error, got {}", aggregate.errors()));
    }
    if aggregate.transport_errors() != 0 {
        return Err("404 is not a transport error".to_owned());
    }
    Ok(())
}

#[test]
fn status_200_is_not_an_error() -> Result<(), String> {
    let aggregate = fold(&[ok(200, 2, 3), ok(302, 0, 1)]);
    if aggregate.errors() != 0 {
        return Err(format!("Expected 0 errors, got {}", aggregate.errors()));
    }
    if aggregate.bytes() != 2 {
        return Err(format!("Expected 2 bytes, got {}", aggregate.bytes()));
    }
    Ok(())
}

#[test]
fn transport_error_counts_without_status() -> Result<(), String> {
    let aggregate = fold(&[refused(1), ok(200, 5, 2)]);
    if aggregate.requests() != 2 {
        return Err(format!("Expected 2 requests, got {}", aggregate.requests()));
    }
    if aggregate.errors() != 1 || aggregate.transport_errors() != 1 {
        return Err(format!(
            "Expected 1 error/1 transport error, got {}/{}",
            aggregate.errors(),
            aggregate.transport_errors()
        ));
    }
    Ok(())
}

#[test]
fn truncated_body_counts_once() -> Result<(), String> {
    let outcome = RequestOutcome::truncated(
        200,
        AttemptError::new(AttemptErrorKind::Body, "connection reset"),
        128,
        Duration::from_millis(4),
    );
    let aggregate = fold(&[outcome]);
    if aggregate.errors() != 1 {
        return Err(format!("Expected 1 error, got {}", aggregate.errors()));
    }
    if aggregate.transport_errors() != 0 {
        return Err("A received status is not a transport error".to_owned());
    }
    if aggregate.bytes() != 128 {
        return Err(format!("Expected partial bytes, got {}", aggregate.bytes()));
    }
    Ok(())
}

#[test]
fn fastest_never_exceeds_slowest() -> Result<(), String> {
    let outcomes = [ok(200, 1, 7), ok(200, 1, 2), refused(11), ok(500, 1, 5)];
    let mut aggregate = Aggregate::new();
    for outcome in &outcomes {
        aggregate.merge(outcome);
        match (aggregate.fastest(), aggregate.slowest()) {
            (Some(fastest), Some(slowest)) if fastest <= slowest => {}
            other => return Err(format!("Invariant broken: {:?}", other)),
        }
    }
    if aggregate.fastest() != Some(Duration::from_millis(2)) {
        return Err(format!("Unexpected fastest {:?}", aggregate.fastest()));
    }
    if aggregate.slowest() != Some(Duration::from_millis(11)) {
        return Err(format!("Unexpected slowest {:?}", aggregate.slowest()));
    }
    Ok(())
}

#[test]
fn merge_order_does_not_matter() -> Result<(), String> {
    let outcomes = vec![ok(200, 10, 4), refused(9), ok(503, 3, 1), ok(201, 7, 6)];
    let forward = fold(&outcomes);

    let mut reversed = outcomes.clone();
    reversed.reverse();
    let backward = fold(&reversed);

    let mut rotated = outcomes;
    rotated.rotate_left(2);
    let shuffled = fold(&rotated);

    if forward != backward || forward != shuffled {
        return Err(format!(
            "Order changed aggregate: {:?} vs {:?} vs {:?}",
            forward, backward, shuffled
        ));
    }
    Ok(())
}

#[test]
fn finalize_computes_rps() -> Result<(), String> {
    let outcomes: Vec<RequestOutcome> = (0..10).map(|_| ok(200, 1, 1)).collect();
    let summary = fold(&outcomes).finalize(Duration::from_secs(4));
    if summary.rps_x100 != 250 {
        return Err(format!("Expected 2.50 rps, got x100={}", summary.rps_x100));
    }
    if summary.duration != Duration::from_secs(4) {
        return Err("Duration not recorded".to_owned());
    }
    Ok(())
}

#[test]
fn finalize_handles_zero_elapsed() -> Result<(), String> {
    let summary = fold(&[ok(200, 1, 0)]).finalize(Duration::ZERO);
    if summary.rps_x100 == 0 {
        return Err("Expected a non-zero rate for a zero-length run".to_owned());
    }
    Ok(())
}

#[test]
fn success_rate_reflects_errors() -> Result<(), String> {
    let summary = fold(&[ok(200, 0, 1), ok(200, 0, 1), ok(200, 0, 1), ok(500, 0, 1)])
        .finalize(Duration::from_secs(1));
    if summary.success_rate_x100() != 7_500 {
        return Err(format!(
            "Expected 75.00%, got x100={}",
            summary.success_rate_x100()
        ));
    }
    let empty = Aggregate::new().finalize(Duration::from_secs(1));
    if empty.success_rate_x100() != 0 {
        return Err("Empty run should report 0%".to_owned());
    }
    Ok(())
}

#[test]
fn round_to_micros_rounds_half_up() -> Result<(), String> {
    let cases = [
        (Duration::from_nanos(1_499), Duration::from_micros(1)),
        (Duration::from_nanos(1_500), Duration::from_micros(2)),
        (Duration::from_nanos(999), Duration::from_micros(1)),
        (Duration::from_nanos(1_234_567), Duration::from_micros(1_235)),
    ];
    for (input, expected) in cases {
        let rounded = round_to_micros(input);
        if rounded != expected {
            return Err(format!(
                "round({:?}) = {:?}, expected {:?}",
                input, rounded, expected
            ));
        }
    }
    Ok(())
}
