use super::{history, util, CoverageGap, RankedCandidate, TeacherStatus, Unavailability};
use crate::model::{SchoolData, TeacherId};

/// Classe les suppléants possibles pour un créneau.
///
/// Les enseignants indisponibles restent listés (avec la raison) pour que
/// l'opérateur puisse passer outre.
pub(super) fn rank_candidates(data: &SchoolData, gap: &CoverageGap) -> Vec<RankedCandidate> {
    let absent_teacher = gap.absent_teacher();
    let history = history::history_window(data, gap.date);

    let mut ranked: Vec<RankedCandidate> = data
        .school
        .teachers
        .iter()
        .filter(|t| Some(&t.id) != absent_teacher)
        .filter(|t| !data.absences.is_teacher_absent(gap.date, &t.id))
        .map(|t| RankedCandidate {
            teacher: t.id.clone(),
            name: t.name.clone(),
            status: teacher_status(data, gap, &t.id),
            recent_load: history.for_teacher(&t.id).map_or(0, |l| l.total()),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Statut d'un enseignant vis-à-vis d'un créneau.
pub(super) fn teacher_status(
    data: &SchoolData,
    gap: &CoverageGap,
    teacher: &TeacherId,
) -> TeacherStatus {
    // les suppléances de ce créneau-ci ne comptent pas
    let substituting = data
        .adjustments
        .on(gap.date)
        .any(|a| &a.substitute == teacher && a.period == gap.period && !gap.owns(a));
    if substituting {
        return TeacherStatus::Unavailable(Unavailability::Substitution);
    }

    let busy_in = data.school.classes.iter().find(|class| {
        class
            .slot(gap.day, gap.period)
            .iter()
            .any(|e| &e.teacher == teacher)
            && !util::class_cancelled(&data.absences, gap.date, &class.id, gap.period)
    });
    if let Some(class) = busy_in {
        return TeacherStatus::Unavailable(Unavailability::DoubleBook {
            conflict_class: class.id.clone(),
        });
    }

    let gap_classes: Vec<_> = gap
        .class_ids
        .iter()
        .filter_map(|id| data.school.find_class(id))
        .collect();

    if gap_classes
        .iter()
        .any(|c| c.in_charge.as_ref() == Some(teacher))
    {
        TeacherStatus::InCharge
    } else if gap_classes.iter().any(|c| c.is_taught_by(teacher)) {
        TeacherStatus::TeachesClass
    } else {
        TeacherStatus::Available
    }
}
