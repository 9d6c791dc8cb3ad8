//! Decoding of backend payload shapes seen in practice.

use mymind_core::{ChildInfo, DayOfWeek, Emotion, MoodEntry, RoutineId, RoutineItem, RoutineLog, UserId};
use rstest::rstest;

#[rstest]
#[case::full(
    r#"{"id":5,"title":"양치하기","time":"08:00","dayOfWeek":"MONDAY","ownerAccount":"kid01"}"#,
    Some(5),
    "08:00",
    Some(DayOfWeek::Monday),
    "kid01"
)]
#[case::numeric_owner(
    r#"{"id":6,"title":"숙제","time":"17:30","dayOfWeek":"FRIDAY","ownerAccount":12}"#,
    Some(6),
    "17:30",
    Some(DayOfWeek::Friday),
    "12"
)]
#[case::title_only(r#"{"title":"할 일 3"}"#, None, "", None, "")]
#[case::explicit_nulls(
    r#"{"id":1,"title":"양치하기","time":null,"dayOfWeek":null,"ownerAccount":null}"#,
    Some(1),
    "",
    None,
    ""
)]
fn routine_item_decodes(
    #[case] json: &str,
    #[case] id: Option<i64>,
    #[case] time: &str,
    #[case] day: Option<DayOfWeek>,
    #[case] owner: &str,
) {
    let item: RoutineItem = serde_json::from_str(json).expect("decode");
    assert_eq!(item.id, id.map(RoutineId));
    assert_eq!(item.time, time);
    assert_eq!(item.day_of_week, day);
    assert_eq!(item.owner_account, UserId::from(owner));
}

#[test]
fn routine_list_preserves_server_order() {
    let json = r#"[{"id":2,"title":"B"},{"id":1,"title":"A"}]"#;
    let items: Vec<RoutineItem> = serde_json::from_str(json).expect("decode");
    let ids: Vec<_> = items.iter().filter_map(|i| i.id).collect();
    assert_eq!(ids, vec![RoutineId(2), RoutineId(1)]);
}

#[test]
fn null_fields_in_child_and_log_payloads_decode() {
    let child: ChildInfo =
        serde_json::from_str(r#"{"name":"Mina","birthYear":null,"uniqueId":null,"userId":null}"#)
            .expect("decode child");
    assert_eq!(child.birth_year, "");
    assert_eq!(child.user_id, None);

    let log: RoutineLog =
        serde_json::from_str(r#"{"routineId":3,"userId":31,"isCompleted":null}"#).expect("decode log");
    assert!(!log.is_completed);
}

#[test]
fn child_list_decodes_with_numeric_user_id() {
    let json = r#"[{"name":"Mina","birthYear":"2016","birthMonth":"3","birthDay":"9","uniqueId":"mina16","userId":31}]"#;
    let children: Vec<ChildInfo> = serde_json::from_str(json).expect("decode");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].user_id, Some(UserId::from("31")));
    assert!(children[0].missing_fields().is_empty());
}

#[test]
fn child_body_omits_absent_user_id() {
    let child = ChildInfo {
        name: "Joon".into(),
        birth_year: "2018".into(),
        birth_month: "11".into(),
        birth_day: "2".into(),
        unique_id: "joon18".into(),
        user_id: None,
    };
    let value = serde_json::to_value(&child).expect("encode");
    assert!(value.get("userId").is_none());
    assert_eq!(value["uniqueId"], "joon18");
    assert_eq!(value["birthMonth"], "11");
}

#[test]
fn routine_log_decodes_camel_case() {
    let json = r#"{"routineId":4,"userId":"31","isCompleted":true}"#;
    let log: RoutineLog = serde_json::from_str(json).expect("decode");
    assert_eq!(log.routine_id, RoutineId(4));
    assert!(log.is_completed);
}

#[test]
fn mood_entry_body_matches_backend_names() {
    let entry = MoodEntry {
        user_id: 31,
        reason: "밥이 맛없었다".into(),
        mood_type_name: Emotion::Sad,
    };
    let value = serde_json::to_value(&entry).expect("encode");
    assert_eq!(value["userId"], 31);
    assert_eq!(value["moodTypeName"], "SAD");
    assert_eq!(value["reason"], "밥이 맛없었다");
}
