#![allow(dead_code)]
use chrono::{NaiveDate, Weekday};
use suppleance::model::{
    ClassId, JointPeriod, JointPeriodId, SchoolClass, SchoolData, SlotEntry, Subject,
    SubjectAssignment, SubjectId, Teacher, TeacherId,
};

/// Lundi.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn tid(s: &str) -> TeacherId {
    TeacherId::new(s)
}

pub fn cid(s: &str) -> ClassId {
    ClassId::new(s)
}

fn entry(subject: &str, teacher: &str) -> SlotEntry {
    SlotEntry::new(SubjectId::new(subject), TeacherId::new(teacher))
}

fn teacher(id: &str, name: &str) -> Teacher {
    Teacher {
        id: tid(id),
        name: name.into(),
        short_name: None,
        contact: None,
    }
}

fn assignment(subject: &str, teacher: &str) -> SubjectAssignment {
    SubjectAssignment {
        subject: SubjectId::new(subject),
        teacher: tid(teacher),
        periods_per_week: 3,
    }
}

/// Lundi :
///
/// ```text
///        P1          P2            P3                   P4
/// 7A     Maths(Y)    English(S)    Science(X) [J1]      -
/// 7B     -           History(Z)    Science(X) [J1]      -
/// 8C     -           -             Music(S)             Maths(X)
/// ```
pub fn fixture() -> SchoolData {
    let mut data = SchoolData::default();
    let school = &mut data.school;

    school.teachers = vec![
        teacher("X", "Xavier"),
        teacher("Y", "Yasmine"),
        teacher("S", "Sophie"),
        teacher("Z", "Zoé"),
    ];
    school.subjects = [
        ("MATH", "Maths"),
        ("ENG", "English"),
        ("SCI", "Science"),
        ("HIST", "History"),
        ("MUS", "Music"),
    ]
    .into_iter()
    .map(|(id, name)| Subject {
        id: SubjectId::new(id),
        name: name.into(),
    })
    .collect();
    school.joint_periods = vec![JointPeriod {
        id: JointPeriodId::new("J1"),
        name: "Science 7A/7B".into(),
    }];

    let joint = JointPeriodId::new("J1");

    let mut a = SchoolClass::new("7A", "Seventh A");
    a.in_charge = Some(tid("Y"));
    a.set_slot(Weekday::Mon, 0, vec![entry("MATH", "Y")]);
    a.set_slot(Weekday::Mon, 1, vec![entry("ENG", "S")]);
    a.set_slot(Weekday::Mon, 2, vec![entry("SCI", "X").joint(joint.clone())]);
    a.subjects = vec![
        assignment("MATH", "Y"),
        assignment("ENG", "S"),
        assignment("SCI", "X"),
    ];

    let mut b = SchoolClass::new("7B", "Seventh B");
    b.set_slot(Weekday::Mon, 1, vec![entry("HIST", "Z")]);
    b.set_slot(Weekday::Mon, 2, vec![entry("SCI", "X").joint(joint)]);
    b.subjects = vec![assignment("HIST", "Z"), assignment("SCI", "X")];

    let mut c = SchoolClass::new("8C", "Eighth C");
    c.in_charge = Some(tid("Z"));
    c.set_slot(Weekday::Mon, 2, vec![entry("MUS", "S")]);
    c.set_slot(Weekday::Mon, 3, vec![entry("MATH", "X")]);
    c.subjects = vec![assignment("MUS", "S"), assignment("MATH", "X")];

    school.classes = vec![a, b, c];
    data
}
