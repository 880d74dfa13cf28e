use super::{util, CoverageGap};
use crate::model::{
    AbsentEntity, ClassId, JointPeriodId, Leave, SchoolClass, SchoolData, SlotEntry, SubjectId,
    TeacherId,
};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Calcule les créneaux à couvrir pour une date.
///
/// Ordre : par créneau croissant ; à créneau égal, absences d'enseignants,
/// puis absences de classes, puis créneaux hérités (tri stable).
pub(super) fn resolve_gaps(data: &SchoolData, date: NaiveDate) -> Vec<CoverageGap> {
    if !data.is_teaching_date(date) {
        return Vec::new();
    }
    let day = date.weekday();

    let records = data.absences.on(date);
    let mut gaps = Vec::new();

    for record in records {
        let AbsentEntity::Teacher(teacher) = &record.entity else {
            continue;
        };
        if data.school.find_teacher(teacher).is_none() || !record.leave.is_well_formed() {
            debug_event!(teacher = %teacher, %date, "skipping unusable teacher leave");
            continue;
        }
        teacher_gaps(data, date, day, teacher, &record.leave, &mut gaps);
    }

    for record in records {
        let AbsentEntity::Class(class_id) = &record.entity else {
            continue;
        };
        let Some(class) = data.school.find_class(class_id) else {
            debug_event!(class = %class_id, %date, "skipping leave for unknown class");
            continue;
        };
        if !record.leave.is_well_formed() {
            debug_event!(class = %class_id, %date, "skipping malformed class leave");
            continue;
        }
        class_gaps(data, date, day, class, &record.leave, &mut gaps);
    }

    legacy_gaps(data, date, day, &mut gaps);

    gaps.sort_by_key(|g| g.period);
    gaps
}

fn teacher_gaps(
    data: &SchoolData,
    date: NaiveDate,
    day: Weekday,
    teacher: &TeacherId,
    leave: &Leave,
    gaps: &mut Vec<CoverageGap>,
) {
    let school = &data.school;

    let mut by_period: BTreeMap<usize, Vec<(&ClassId, &SlotEntry)>> = BTreeMap::new();
    for class in &school.classes {
        for (period, slot) in class.periods(day).iter().enumerate() {
            if !leave.cancels(period) {
                continue;
            }
            for entry in slot.iter().filter(|e| &e.teacher == teacher) {
                by_period
                    .entry(period)
                    .or_default()
                    .push((&class.id, entry));
            }
        }
    }

    for (period, hits) in by_period {
        // cours communs : une seule entrée par identifiant, dans l'ordre de rencontre
        let mut joint_index: Vec<(&JointPeriodId, usize)> = Vec::new();

        for (class_id, entry) in hits {
            match &entry.joint_period {
                Some(joint) => {
                    if let Some(&(_, idx)) = joint_index.iter().find(|(j, _)| *j == joint) {
                        let gap: &mut CoverageGap = &mut gaps[idx];
                        if !gap.class_ids.contains(class_id) {
                            gap.class_ids.push(class_id.clone());
                        }
                        continue;
                    }
                    gaps.push(CoverageGap {
                        date,
                        day,
                        absent: AbsentEntity::Teacher(teacher.clone()),
                        period,
                        class_ids: vec![class_id.clone()],
                        subject_label: school.joint_period_name(joint).to_string(),
                        is_legacy: false,
                    });
                    joint_index.push((joint, gaps.len() - 1));
                }
                None => {
                    let duplicate = gaps.iter().any(|g| {
                        g.period == period
                            && g.absent_teacher() == Some(teacher)
                            && g.class_ids.len() == 1
                            && &g.class_ids[0] == class_id
                    });
                    if duplicate {
                        continue;
                    }
                    gaps.push(CoverageGap {
                        date,
                        day,
                        absent: AbsentEntity::Teacher(teacher.clone()),
                        period,
                        class_ids: vec![class_id.clone()],
                        subject_label: school.subject_name(&entry.subject).to_string(),
                        is_legacy: false,
                    });
                }
            }
        }
    }
}

fn class_gaps(
    data: &SchoolData,
    date: NaiveDate,
    day: Weekday,
    class: &SchoolClass,
    leave: &Leave,
    gaps: &mut Vec<CoverageGap>,
) {
    for (period, slot) in class.periods(day).iter().enumerate() {
        if slot.is_empty() || !leave.cancels(period) {
            continue;
        }
        gaps.push(CoverageGap {
            date,
            day,
            absent: AbsentEntity::Class(class.id.clone()),
            period,
            class_ids: vec![class.id.clone()],
            subject_label: util::slot_label(&data.school, slot),
            is_legacy: false,
        });
    }
}

/// Fait remonter les suppléances dont le cours d'origine n'existe plus.
fn legacy_gaps(data: &SchoolData, date: NaiveDate, day: Weekday, gaps: &mut Vec<CoverageGap>) {
    let absent: Vec<&TeacherId> = data
        .absences
        .on(date)
        .iter()
        .filter_map(|r| r.entity.teacher())
        .collect();
    if absent.is_empty() {
        return;
    }

    let mut orphans: Vec<(CoverageGap, Vec<&SubjectId>)> = Vec::new();
    for adjustment in data.adjustments.on(date) {
        if !absent.contains(&&adjustment.original_teacher) {
            continue;
        }
        if gaps.iter().any(|g| g.owns(adjustment)) {
            continue;
        }
        debug_event!(
            class = %adjustment.class_id,
            period = adjustment.period,
            %date,
            "adjustment no longer matches the timetable"
        );
        let existing = orphans.iter_mut().find(|(g, _)| {
            g.period == adjustment.period
                && g.absent_teacher() == Some(&adjustment.original_teacher)
        });
        match existing {
            Some((gap, subjects)) => {
                if !gap.class_ids.contains(&adjustment.class_id) {
                    gap.class_ids.push(adjustment.class_id.clone());
                }
                if !subjects.contains(&&adjustment.subject_id) {
                    subjects.push(&adjustment.subject_id);
                }
            }
            None => orphans.push((
                CoverageGap {
                    date,
                    day,
                    absent: AbsentEntity::Teacher(adjustment.original_teacher.clone()),
                    period: adjustment.period,
                    class_ids: vec![adjustment.class_id.clone()],
                    subject_label: String::new(),
                    is_legacy: true,
                },
                vec![&adjustment.subject_id],
            )),
        }
    }

    gaps.extend(orphans.into_iter().map(|(mut gap, subjects)| {
        gap.subject_label = subjects
            .iter()
            .map(|s| data.school.subject_name(s))
            .collect::<Vec<_>>()
            .join(" / ");
        gap
    }));
}
