use crate::schedule::schedule::{CascadeRecord, Schedule};
use crate::schedule::tests::utils::{add_flight, at, flight};

#[test]
fn test_two_flights_same_aircraft() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "FLIGHT_1", "A1", "2024-01-01 09:00", Some(10));
    add_flight(&mut flights, "FLIGHT_2", "A1", "2024-01-01 09:30", Some(0));

    let schedule = Schedule::new(flights);
    let scores = schedule.cascade_scores(120);

    assert_eq!(1, scores[0].downstream);
    assert_eq!(10, scores[0].score);
    assert_eq!(0, scores[1].downstream);
    assert_eq!(0, scores[1].score);
}

#[test]
fn test_window_boundary() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), Some(7)),
        flight("FLIGHT_2", "A1", at(120), None),
        flight("FLIGHT_3", "A1", at(121), None),
    ]);
    let scores = schedule.cascade_scores(120);

    assert_eq!(1, scores[0].downstream);
    assert_eq!(7, scores[0].score);
    // 120 -> 121 is within FLIGHT_2's own window
    assert_eq!(1, scores[1].downstream);
    assert_eq!(0, scores[1].score);
}

#[test]
fn test_same_instant_not_downstream() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(60), Some(5)),
        flight("FLIGHT_2", "A1", at(60), Some(5)),
    ]);
    let scores = schedule.cascade_scores(120);

    assert!(scores.iter().all(|s| s.downstream == 0 && s.score == 0));
}

#[test]
fn test_other_aircraft_ignored() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), Some(20)),
        flight("FLIGHT_2", "B1", at(30), None),
        flight("FLIGHT_3", "B1", at(45), None),
        flight("FLIGHT_4", "A1", at(90), None),
    ]);
    let scores = schedule.cascade_scores(120);

    assert_eq!("FLIGHT_1", &*scores[0].flight.id);
    assert_eq!(1, scores[0].downstream);
    assert_eq!(20, scores[0].score);
}

#[test]
fn test_negative_delay_not_clamped() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), Some(-4)),
        flight("FLIGHT_2", "A1", at(30), None),
        flight("FLIGHT_3", "A1", at(60), None),
    ]);
    let top = schedule.top_cascade(120, 3);

    assert_eq!(-8, schedule.cascade_scores(120)[0].score);
    assert_eq!("FLIGHT_1", &*top[2].flight.id);
}

#[test]
fn test_huge_delay_score_saturates() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), Some(i64::MAX)),
        flight("FLIGHT_2", "A1", at(10), None),
        flight("FLIGHT_3", "A1", at(20), None),
        flight("FLIGHT_4", "A1", at(30), Some(i64::MIN)),
        flight("FLIGHT_5", "A1", at(40), None),
        flight("FLIGHT_6", "A1", at(50), None),
    ]);
    let scores = schedule.cascade_scores(120);

    assert_eq!(i64::MAX, scores[0].score);
    assert_eq!(i64::MIN, scores[3].score);
    assert_eq!("FLIGHT_1", &*schedule.top_cascade(120, 1)[0].flight.id);
}

#[test]
fn test_null_delay_scores_zero() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), None),
        flight("FLIGHT_2", "A1", at(30), None),
    ]);
    let scores = schedule.cascade_scores(120);

    assert_eq!(1, scores[0].downstream);
    assert_eq!(0, scores[0].score);
}

#[test]
fn test_flights_sorted_by_departure() {
    let schedule = Schedule::new(vec![
        flight("LATE", "A1", at(300), None),
        flight("EARLY", "A1", at(0), None),
        flight("MID", "B1", at(100), None),
    ]);
    let ids = schedule.flights.iter().map(|f| &*f.id).collect::<Vec<_>>();

    assert_eq!(vec!["EARLY", "MID", "LATE"], ids);
}

#[test]
fn test_top_cascade_order_and_ties() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), Some(10)),
        flight("FLIGHT_2", "B1", at(10), Some(10)),
        flight("FLIGHT_3", "A1", at(20), Some(30)),
        flight("FLIGHT_4", "B1", at(40), Some(1)),
        flight("FLIGHT_5", "A1", at(50), None),
    ]);
    let top = schedule.top_cascade(120, 3);
    let ids = top.iter().map(|s| &*s.flight.id).collect::<Vec<_>>();

    // FLIGHT_3: 30 * 1, FLIGHT_1: 10 * 2, FLIGHT_2: 10 * 1
    assert_eq!(vec!["FLIGHT_3", "FLIGHT_1", "FLIGHT_2"], ids);
    assert_eq!(vec![30, 20, 10], top.iter().map(|s| s.score).collect::<Vec<_>>());
}

#[test]
fn test_top_cascade_ties_keep_schedule_order() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), Some(5)),
        flight("FLIGHT_2", "B1", at(5), Some(5)),
        flight("FLIGHT_3", "A1", at(10), None),
        flight("FLIGHT_4", "B1", at(15), None),
    ]);
    let top = schedule.top_cascade(120, 10);
    let ids = top.iter().map(|s| &*s.flight.id).collect::<Vec<_>>();

    assert_eq!(vec!["FLIGHT_1", "FLIGHT_2", "FLIGHT_3", "FLIGHT_4"], ids);
}

#[test]
fn test_top_cascade_truncates() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(0), Some(5)),
        flight("FLIGHT_2", "A1", at(5), Some(5)),
    ]);

    assert_eq!(1, schedule.top_cascade(120, 1).len());
    assert!(schedule.top_cascade(120, 0).is_empty());
    assert!(Schedule::new(vec![]).top_cascade(120, 10).is_empty());
}

#[test]
fn test_cascade_record_serialization() {
    let schedule = Schedule::new(vec![
        flight("FLIGHT_1", "A1", at(9 * 60), Some(10)),
        flight("FLIGHT_2", "A1", at(9 * 60 + 30), None),
    ]);
    let records = schedule
        .top_cascade(120, 2)
        .iter()
        .map(CascadeRecord::from)
        .collect::<Vec<_>>();
    let json = serde_json::to_value(&records).unwrap();

    assert_eq!("FLIGHT_1", json[0]["Flight_ID"]);
    assert_eq!("2024-01-01 09:00:00", json[0]["Scheduled_Departure"]);
    assert_eq!(10, json[0]["cascade_score"]);
    assert!(json[1]["Delay_Minutes"].is_null());
}
