#![forbid(unsafe_code)]
mod common;

use common::{cid, fixture, monday, tid};
use suppleance::{
    model::{AbsentEntity, Leave, SlotEntry, SubjectId},
    SchedError, Scheduler,
};

fn scheduler_with_x_absent() -> Scheduler {
    let mut s = Scheduler::with_data(fixture());
    s.data_mut()
        .absences
        .record_leave(AbsentEntity::Teacher(tid("X")), Leave::Full, monday(), monday())
        .unwrap();
    s
}

#[test]
fn joint_gap_creates_one_adjustment_per_class() {
    let mut s = scheduler_with_x_absent();
    let gap = s.resolve_gaps(monday())[0].clone();

    let created = s.assign(&gap, Some(&tid("Y"))).unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].class_id, cid("7A"));
    assert_eq!(created[1].class_id, cid("7B"));
    for adj in &created {
        assert_eq!(adj.original_teacher, tid("X"));
        assert_eq!(adj.substitute, tid("Y"));
        assert_eq!(adj.period, 2);
        assert_eq!(adj.subject_id, SubjectId::new("SCI"));
        assert!(adj.conflict_details.is_none());
    }
    assert_eq!(s.data().adjustments.on(monday()).count(), 2);
    assert!(s.uncovered(monday()).iter().all(|g| g.period != 2));
}

#[test]
fn subject_is_resolved_per_class() {
    let mut s = Scheduler::with_data(fixture());
    {
        let school = &mut s.data_mut().school;
        let b = school.find_class_mut(&cid("7B")).unwrap();
        let mut slot = b.slot(chrono::Weekday::Mon, 2).to_vec();
        slot[0].subject = SubjectId::new("PHYS");
        b.set_slot(chrono::Weekday::Mon, 2, slot);
    }
    s.data_mut()
        .absences
        .record_leave(AbsentEntity::Teacher(tid("X")), Leave::Full, monday(), monday())
        .unwrap();

    let gap = s.resolve_gaps(monday())[0].clone();
    let created = s.assign(&gap, Some(&tid("Z"))).unwrap();
    let subjects: Vec<&str> = created.iter().map(|a| a.subject_id.as_str()).collect();
    assert_eq!(subjects, vec!["SCI", "PHYS"]);
}

#[test]
fn double_booked_substitute_is_recorded_with_conflict() {
    let mut s = scheduler_with_x_absent();
    let gap = s.resolve_gaps(monday())[0].clone();

    let created = s.assign(&gap, Some(&tid("S"))).unwrap();
    assert_eq!(created.len(), 2);
    for adj in &created {
        let details = adj.conflict_details.as_ref().unwrap();
        assert_eq!(details.class_id, cid("8C"));
    }
}

#[test]
fn reassigning_replaces_previous_choice() {
    let mut s = scheduler_with_x_absent();
    let gap = s.resolve_gaps(monday())[0].clone();

    s.assign(&gap, Some(&tid("S"))).unwrap();
    s.assign(&gap, Some(&tid("Y"))).unwrap();

    let subs: Vec<_> = s.substitutes_for(&gap);
    assert_eq!(subs.len(), 2);
    assert!(subs.iter().all(|a| a.substitute == tid("Y")));
    assert!(subs.iter().all(|a| a.conflict_details.is_none()));
}

#[test]
fn retraction_leaves_nothing_behind() {
    let mut s = scheduler_with_x_absent();
    let gap = s.resolve_gaps(monday())[0].clone();

    s.assign(&gap, Some(&tid("Y"))).unwrap();
    let created = s.assign(&gap, None).unwrap();
    assert!(created.is_empty());
    assert!(s.substitutes_for(&gap).is_empty());
    assert!(s.data().adjustments.days.is_empty());

    // idempotent
    s.assign(&gap, None).unwrap();
    assert_eq!(s.data().adjustments.on(monday()).count(), 0);
}

#[test]
fn retraction_only_touches_its_own_gap() {
    let mut s = scheduler_with_x_absent();
    let gaps = s.resolve_gaps(monday());
    s.assign(&gaps[0], Some(&tid("Y"))).unwrap();
    s.assign(&gaps[1], Some(&tid("Z"))).unwrap();

    s.assign(&gaps[0], None).unwrap();
    let left: Vec<_> = s.data().adjustments.on(monday()).collect();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].class_id, cid("8C"));
    assert_eq!(left[0].substitute, tid("Z"));
}

#[test]
fn legacy_gap_can_be_reassigned_from_stored_subjects() {
    let mut s = scheduler_with_x_absent();
    let gap = s.resolve_gaps(monday())[1].clone();
    s.assign(&gap, Some(&tid("Y"))).unwrap();
    s.data_mut()
        .school
        .find_class_mut(&cid("8C"))
        .unwrap()
        .set_slot(chrono::Weekday::Mon, 3, Vec::new());

    let legacy = s
        .resolve_gaps(monday())
        .into_iter()
        .find(|g| g.is_legacy)
        .unwrap();
    let created = s.assign(&legacy, Some(&tid("Z"))).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].subject_id, SubjectId::new("MATH"));
    assert_eq!(created[0].substitute, tid("Z"));
}

#[test]
fn rejects_class_gaps_and_unknown_teachers() {
    let mut s = Scheduler::with_data(fixture());
    s.data_mut()
        .absences
        .record_leave(AbsentEntity::Class(cid("8C")), Leave::Full, monday(), monday())
        .unwrap();
    let class_gap = s.resolve_gaps(monday())[0].clone();
    assert!(matches!(
        s.assign(&class_gap, Some(&tid("Y"))),
        Err(SchedError::NotATeacherGap(_))
    ));

    let mut s = scheduler_with_x_absent();
    let gap = s.resolve_gaps(monday())[0].clone();
    assert!(matches!(
        s.assign(&gap, Some(&tid("NOBODY"))),
        Err(SchedError::UnknownTeacher(_))
    ));
    assert_eq!(s.data().adjustments.on(monday()).count(), 0);
}

fn absent_x_and_z(s: &mut Scheduler) {
    for id in ["X", "Z"] {
        s.data_mut()
            .absences
            .record_leave(AbsentEntity::Teacher(tid(id)), Leave::Full, monday(), monday())
            .unwrap();
    }
}

fn gap_of(s: &Scheduler, teacher: &str, period: usize) -> suppleance::CoverageGap {
    s.resolve_gaps(monday())
        .into_iter()
        .find(|g| g.period == period && g.absent_teacher() == Some(&tid(teacher)))
        .unwrap()
}

#[test]
fn other_teacher_assignment_keeps_stranded_adjustment() {
    let mut s = Scheduler::with_data(fixture());
    absent_x_and_z(&mut s);
    s.assign(&gap_of(&s, "X", 3), Some(&tid("Y"))).unwrap();

    // le créneau 8C/P4 passe à Z
    s.data_mut()
        .school
        .find_class_mut(&cid("8C"))
        .unwrap()
        .set_slot(
            chrono::Weekday::Mon,
            3,
            vec![SlotEntry::new(SubjectId::new("MATH"), tid("Z"))],
        );
    s.assign(&gap_of(&s, "Z", 3), Some(&tid("S"))).unwrap();

    let at_p4: Vec<(&str, &str)> = s
        .data()
        .adjustments
        .on(monday())
        .filter(|a| a.period == 3)
        .map(|a| (a.original_teacher.as_str(), a.substitute.as_str()))
        .collect();
    assert_eq!(at_p4, vec![("X", "Y"), ("Z", "S")]);

    let legacy: Vec<_> = s
        .resolve_gaps(monday())
        .into_iter()
        .filter(|g| g.is_legacy)
        .collect();
    assert_eq!(legacy.len(), 1);
    assert_eq!(legacy[0].absent, AbsentEntity::Teacher(tid("X")));
}

#[test]
fn co_taught_slot_keeps_one_adjustment_per_absent_teacher() {
    let mut s = Scheduler::with_data(fixture());
    s.data_mut()
        .school
        .find_class_mut(&cid("8C"))
        .unwrap()
        .set_slot(
            chrono::Weekday::Mon,
            3,
            vec![
                SlotEntry::new(SubjectId::new("MATH"), tid("X")),
                SlotEntry::new(SubjectId::new("MATH"), tid("Z")),
            ],
        );
    absent_x_and_z(&mut s);

    s.assign(&gap_of(&s, "X", 3), Some(&tid("Y"))).unwrap();
    s.assign(&gap_of(&s, "Z", 3), Some(&tid("S"))).unwrap();
    assert_eq!(
        s.data()
            .adjustments
            .on(monday())
            .filter(|a| a.period == 3)
            .count(),
        2
    );

    // un fichier rechargé garde les deux suppléances
    let json = serde_json::to_string(s.data()).unwrap();
    let reloaded: suppleance::SchoolData = serde_json::from_str(&json).unwrap();
    assert_eq!(&reloaded, s.data());

    s.assign(&gap_of(&s, "X", 3), None).unwrap();
    let left: Vec<_> = s.data().adjustments.on(monday()).collect();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].original_teacher, tid("Z"));
}
