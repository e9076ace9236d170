//! Dropping any single optional key from an otherwise complete record must
//! leave the matching output field empty (or at its documented default) and
//! never fail the decode.

use compass_client::{
    Result, academic_groups, calendar, campuses, feed, group_activities, learning_tasks, lessons,
    locations, news, staff, subjects, tasks, terms, user, year_levels,
};
use compass_session::Url;
use serde::Serialize;
use serde_json::{Value, json};

/// `(raw key, JSON pointer into the normalized record, expected value)`.
type Case<'a> = (&'a str, &'a str, Value);

fn base() -> Url {
    Url::parse("https://school.example").unwrap()
}

fn first<T: Serialize>(records: Vec<T>) -> Value {
    to_value(records.into_iter().next().expect("one record"))
}

fn to_value<T: Serialize>(record: T) -> Value {
    serde_json::to_value(record).unwrap()
}

/// Records with at most this many keys are also checked with every subset
/// of keys removed.
const SUBSET_LIMIT: usize = 4;

/// `wrap` turns a single raw record into a full response envelope.
fn sweep(
    name: &str,
    record: &Value,
    wrap: impl Fn(Value) -> Value,
    decode: impl Fn(Value) -> Result<Value>,
    cases: &[Case<'_>],
) {
    let complete = decode(wrap(record.clone())).unwrap();
    for (key, pointer, expected) in cases {
        assert_ne!(
            complete.pointer(pointer),
            Some(expected),
            "{name}: fixture must populate {pointer}"
        );

        let mut partial = record.clone();
        assert!(
            partial.as_object_mut().unwrap().remove(*key).is_some(),
            "{name}: fixture has no `{key}`"
        );
        let decoded = decode(wrap(partial))
            .unwrap_or_else(|e| panic!("{name}: decode without `{key}` failed: {e}"));
        assert_eq!(
            decoded.pointer(pointer),
            Some(expected),
            "{name}: dropping `{key}` should leave {pointer} = {expected}"
        );
    }

    if cases.len() > SUBSET_LIMIT {
        return;
    }
    for mask in 1..(1_u32 << cases.len()) {
        let dropped: Vec<&Case<'_>> = cases
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, case)| case)
            .collect();
        let mut partial = record.clone();
        for (key, _, _) in &dropped {
            partial.as_object_mut().unwrap().remove(*key);
        }
        let decoded = decode(wrap(partial)).unwrap();
        for (key, pointer, expected) in dropped {
            assert_eq!(
                decoded.pointer(pointer),
                Some(expected),
                "{name}: `{key}` dropped with others (mask {mask:#b})"
            );
        }
    }
}

fn list(record: Value) -> Value {
    json!({ "d": [record] })
}

fn page(record: Value) -> Value {
    json!({ "d": { "data": [record] } })
}

fn object(record: Value) -> Value {
    json!({ "d": record })
}

#[test]
fn locations() {
    sweep(
        "locations",
        &json!({
            "__type": "LC",
            "archived": false,
            "building": "Science",
            "id": 12,
            "longName": "Room A03",
            "n": "A03",
            "roomName": "A03"
        }),
        list,
        |r| locations::decode(r).map(first),
        &[
            ("__type", "/typeTag", Value::Null),
            ("archived", "/archived", Value::Null),
            ("building", "/building", Value::Null),
            ("id", "/id", Value::Null),
            ("longName", "/longName", Value::Null),
            ("n", "/name", Value::Null),
            ("roomName", "/roomName", Value::Null),
        ],
    );
}

#[test]
fn staff() {
    sweep(
        "staff",
        &json!({
            "id": 301,
            "displayCode": "JHD",
            "campusId": 2,
            "fn": "Jane",
            "ln": "Hart",
            "n": "Hart, Jane",
            "ce": "jhd@school.example",
            "start": "2015-01-27T00:00:00Z"
        }),
        list,
        |r| staff::decode(r).map(first),
        &[
            ("id", "/id", Value::Null),
            ("displayCode", "/displayCode", Value::Null),
            ("campusId", "/campusId", Value::Null),
            ("fn", "/firstName", Value::Null),
            ("ln", "/lastName", Value::Null),
            ("n", "/fullName", Value::Null),
            ("ce", "/email", Value::Null),
            ("start", "/joinDate", Value::Null),
        ],
    );
}

#[test]
fn terms() {
    sweep(
        "terms",
        &json!({
            "id": 41,
            "cy": 2024,
            "n": "Term 1",
            "s": "2024-01-30T00:00:00Z",
            "f": "2024-03-28T00:00:00Z",
            "sl": "30/01/2024"
        }),
        list,
        |r| terms::decode(r).map(first),
        &[
            ("id", "/id", Value::Null),
            ("cy", "/year", Value::Null),
            ("n", "/name", Value::Null),
            ("s", "/startDate", Value::Null),
            ("f", "/endDate", Value::Null),
            ("sl", "/startDateFormatted", Value::Null),
        ],
    );
}

#[test]
fn year_levels_and_academic_groups() {
    sweep(
        "year_levels",
        &json!({ "k": "Year 11", "v": 11 }),
        list,
        |r| year_levels::decode(r).map(first),
        &[("k", "/name", Value::Null), ("v", "/id", Value::Null)],
    );
    sweep(
        "academic_groups",
        &json!({ "id": 17, "name": "2024 Academic" }),
        list,
        |r| academic_groups::decode(r).map(first),
        &[("id", "/id", Value::Null), ("name", "/name", Value::Null)],
    );
}

#[test]
fn campuses_default_flags_to_false() {
    sweep(
        "campuses",
        &json!({
            "campusName": "Senior Campus",
            "name": "Example Secondary College",
            "active": true,
            "archived": true,
            "defaultCampus": true,
            "campusGuid": "8c1f4c5e",
            "campusId": 2
        }),
        list,
        |r| campuses::decode(r).map(first),
        &[
            ("campusName", "/name", Value::Null),
            ("name", "/instituteName", Value::Null),
            ("active", "/active", json!(false)),
            ("archived", "/archived", json!(false)),
            ("defaultCampus", "/defaultCampus", json!(false)),
            ("campusGuid", "/uuid", Value::Null),
            ("campusId", "/id", Value::Null),
        ],
    );
}

#[test]
fn subjects() {
    sweep(
        "subjects",
        &json!({ "subjectName": "Year 11: Chemistry", "ids": [301] }),
        list,
        |r| subjects::decode(r).map(first),
        &[
            ("subjectName", "/name", Value::Null),
            ("ids", "/teacherIds", json!([])),
        ],
    );
}

#[test]
fn calendar_events() {
    sweep(
        "calendar",
        &json!({
            "activityId": 5521,
            "instanceId": "a1b2",
            "allDay": false,
            "start": "2024-02-05T10:30:00Z",
            "end": "2024-02-05T11:20:00Z",
            "locations": [{ "locationID": 12, "locationName": "A03" }],
            "managers": [{ "managerUserID": 301, "managerImportIdentifier": "JHD" }],
            "longTitle": "10:30: 2 - 3MATA",
            "longTitleWithoutTime": "2 - 3MATA",
            "period": 2,
            "rollMarked": true,
            "subjectLongName": "Year 3: Mathematics",
            "title": "3MATA"
        }),
        list,
        |r| calendar::decode(r).map(first),
        &[
            ("activityId", "/activityId", Value::Null),
            ("instanceId", "/instanceId", Value::Null),
            ("allDay", "/allDay", Value::Null),
            ("start", "/start", Value::Null),
            ("end", "/end", Value::Null),
            ("locations", "/locations", json!([])),
            ("managers", "/managers", json!([])),
            ("longTitle", "/longTitle", Value::Null),
            ("longTitleWithoutTime", "/longTitleWithoutTime", Value::Null),
            ("period", "/period", Value::Null),
            ("rollMarked", "/rollMarked", Value::Null),
            ("subjectLongName", "/subjectLongName", Value::Null),
            ("title", "/subjectTitle", Value::Null),
        ],
    );
}

#[test]
fn feed_items() {
    sweep(
        "feed",
        &json!({
            "feedItemId": 88,
            "title": "Athletics carnival",
            "itemContent": "<p>Bring a hat.</p>",
            "userIdCreator": 301,
            "createdUserName": "Jane Hart",
            "userPhotoPath": "/photo/jhd.jpg",
            "createdTimestamp": "2024-02-01T22:10:00Z",
            "canReact": true,
            "isSaved": true,
            "isViewed": true,
            "attachments": [{ "attachmentId": 1, "name": "map.png", "path": "/map.png", "type": 1 }]
        }),
        list,
        |r| feed::decode(r, &base()).map(first),
        &[
            ("feedItemId", "/id", Value::Null),
            ("title", "/title", Value::Null),
            ("itemContent", "/content", Value::Null),
            ("userIdCreator", "/author/id", Value::Null),
            ("createdUserName", "/author/name", Value::Null),
            ("userPhotoPath", "/author/photoUrl", Value::Null),
            ("createdTimestamp", "/createdTime", Value::Null),
            ("canReact", "/canReact", json!(false)),
            ("isSaved", "/isSaved", json!(false)),
            ("isViewed", "/isViewed", json!(false)),
            ("attachments", "/attachments", json!([])),
        ],
    );
}

#[test]
fn group_activities() {
    sweep(
        "group_activities",
        &json!({
            "AcademicYearLevel": 11,
            "ActivityDisplayName": "Chemistry Exam",
            "ActivityManagerId": 301,
            "ActivityId": 7001,
            "ActivityDefaultLocationId": 12,
            "IsExam": true,
            "IsClub": false,
            "IsMeeting": false,
            "ActivityStart": "2024-06-10T09:00:00Z",
            "ActivityFinish": "2024-06-10T11:00:00Z"
        }),
        list,
        |r| group_activities::decode(r).map(first),
        &[
            ("AcademicYearLevel", "/yearLevel", Value::Null),
            ("ActivityDisplayName", "/name", Value::Null),
            ("ActivityManagerId", "/managerId", Value::Null),
            ("ActivityId", "/activityId", Value::Null),
            ("ActivityDefaultLocationId", "/defaultLocationId", Value::Null),
            ("IsExam", "/isExam", Value::Null),
            ("IsClub", "/isClub", Value::Null),
            ("IsMeeting", "/isMeeting", Value::Null),
            ("ActivityStart", "/start", Value::Null),
            ("ActivityFinish", "/finish", Value::Null),
        ],
    );
}

#[test]
fn learning_tasks() {
    sweep(
        "learning_tasks",
        &json!({
            "id": 4410,
            "name": "Titration practical",
            "description": "<p>Write up the lab.</p>",
            "groupName": "CHEM4",
            "subjectName": "Year 11: Chemistry",
            "important": true,
            "activityStart": "2024-03-01T00:00:00Z",
            "dueDateTimestamp": "2024-03-15T12:59:00Z",
            "submittedTimestamp": "2024-03-14T08:00:00Z",
            "gradingItems": [{ "id": 1, "name": "Percentage" }],
            "students": [{ "results": [{ "id": 1, "result": 87 }] }]
        }),
        page,
        |r| learning_tasks::decode(r).map(first),
        &[
            ("id", "/id", Value::Null),
            ("name", "/name", Value::Null),
            ("description", "/description", Value::Null),
            ("groupName", "/groupName", Value::Null),
            ("subjectName", "/subjectName", Value::Null),
            ("important", "/important", Value::Null),
            ("activityStart", "/startDate", Value::Null),
            ("dueDateTimestamp", "/dueDate", Value::Null),
            ("submittedTimestamp", "/submittedTimestamp", Value::Null),
            ("gradingItems", "/gradingItems", json!([])),
            ("students", "/results", json!([])),
        ],
    );
}

#[test]
fn task_items() {
    sweep(
        "tasks",
        &json!({ "id": 3, "taskName": "Return book", "dueDate": "2024-02-09T00:00:00Z", "status": true }),
        list,
        |r| tasks::decode(r).map(first),
        &[
            ("id", "/id", Value::Null),
            ("taskName", "/name", Value::Null),
            ("dueDate", "/due", Value::Null),
            ("status", "/completed", Value::Null),
        ],
    );
}

#[test]
fn news_items() {
    sweep(
        "news",
        &json!({
            "Attachments": [{ "Id": 1 }],
            "CreatedByAdmin": true,
            "EmailSentDate": "2024-02-05T01:00:00Z",
            "Start": "2024-02-05T00:00:00Z",
            "Finish": "2024-02-19T00:00:00Z",
            "Locked": true,
            "Priority": true,
            "CommunicationType": 1,
            "NewsItemId": "n-1",
            "UserName": "Jane Hart",
            "UserImageUrl": "/photo/jhd.jpg",
            "Title": "Excursion",
            "Content1": "<p>Forms due.</p>",
            "Content2": "<p>Bring lunch.</p>"
        }),
        page,
        |r| news::decode(r, &base()).map(first),
        &[
            ("Attachments", "/attachmentCount", json!(0)),
            ("CreatedByAdmin", "/createdByAdmin", Value::Null),
            ("EmailSentDate", "/emailSentDate", Value::Null),
            ("Start", "/start", Value::Null),
            ("Finish", "/finish", Value::Null),
            ("Locked", "/locked", Value::Null),
            ("Priority", "/priority", Value::Null),
            ("CommunicationType", "/communicationType", Value::Null),
            ("NewsItemId", "/id", Value::Null),
            ("UserName", "/author/name", Value::Null),
            ("UserImageUrl", "/author/photoUrl", Value::Null),
            ("Title", "/title", Value::Null),
            ("Content1", "/content", Value::Null),
            ("Content2", "/secondaryContent", Value::Null),
        ],
    );
}

#[test]
fn user_details() {
    sweep(
        "user_details",
        &json!({
            "age": "15 years",
            "birthday": "10 Jan 2009",
            "gender": "M",
            "userCompassPersonId": "90210",
            "userDisplayCode": "DOE0001",
            "userEmail": "jdoe@school.example",
            "userFirstName": "John",
            "userLastName": "Doe",
            "userFullName": "John Doe",
            "userPreferredName": "Johnny",
            "userPreferredLastName": "Doe",
            "userFormGroup": "10A",
            "userHouse": "Banksia",
            "userPhotoPath": "/photo/4821.jpg",
            "userYearLevelId": 10
        }),
        object,
        |r| user::decode_details(r, &base()).map(to_value),
        &[
            ("age", "/verboseAge", Value::Null),
            ("birthday", "/birthday", Value::Null),
            ("gender", "/gender", Value::Null),
            ("userCompassPersonId", "/compassId", Value::Null),
            ("userDisplayCode", "/displayCode", Value::Null),
            ("userEmail", "/email", Value::Null),
            ("userFirstName", "/firstName", Value::Null),
            ("userLastName", "/lastName", Value::Null),
            ("userFullName", "/fullName", Value::Null),
            ("userPreferredName", "/preferredName", Value::Null),
            ("userPreferredLastName", "/preferredLastName", Value::Null),
            ("userFormGroup", "/formGroup", Value::Null),
            ("userHouse", "/house", Value::Null),
            ("userPhotoPath", "/photoUrl", Value::Null),
            ("userYearLevelId", "/yearLevel", Value::Null),
        ],
    );
}

#[test]
fn lesson_info() {
    sweep(
        "lessons",
        &json!({
            "ActivityId": 5521,
            "ActivityDisplayName": "3MATA",
            "SubjectId": 88,
            "SubjectName": "Year 3: Mathematics",
            "AttendeeCount": 3,
            "AttendeeUserIdList": [4821],
            "CoveringPhotoPath": "/cover.jpg",
            "LocationId": 12,
            "LocationDetails": { "longName": "Room A03" },
            "ManagerTextReadable": "Jane Hart",
            "ManagerPhotoPath": "/jhd.jpg",
            "mi": 301,
            "lp": { "fileAssetId": "asset-9", "name": "plan.docx" }
        }),
        object,
        |r| lessons::decode(r, &base()).map(to_value),
        &[
            ("ActivityId", "/activityId", Value::Null),
            ("ActivityDisplayName", "/activityDisplayName", Value::Null),
            ("SubjectId", "/subjectId", Value::Null),
            ("SubjectName", "/subjectName", Value::Null),
            ("AttendeeCount", "/attendeeCount", Value::Null),
            ("AttendeeUserIdList", "/attendeeUserIds", json!([])),
            ("CoveringPhotoPath", "/coverPhotoUrl", Value::Null),
            ("LocationId", "/location/id", Value::Null),
            ("LocationDetails", "/location/name", Value::Null),
            ("ManagerTextReadable", "/teacher/name", Value::Null),
            ("ManagerPhotoPath", "/teacher/photoUrl", Value::Null),
            ("mi", "/teacher/id", Value::Null),
            ("lp", "/lessonPlan", Value::Null),
        ],
    );
}
