use super::{candidates, CoverageGap, SchedError, Scheduler};
use crate::model::{Adjustment, ClassId, ConflictDetails, School, SubjectId, TeacherId};

/// Remplace (ou retire si `substitute` est `None`) les suppléances d'un créneau.
///
/// Une suppléance est créée par classe du créneau ; la matière est relue dans
/// l'emploi du temps de chaque classe.
pub(super) fn assign(
    scheduler: &mut Scheduler,
    gap: &CoverageGap,
    substitute: Option<&TeacherId>,
) -> Result<Vec<Adjustment>, SchedError> {
    let Some(original) = gap.absent_teacher() else {
        return Err(SchedError::NotATeacherGap(gap.absent.to_string()));
    };
    if let Some(sub) = substitute {
        if scheduler.data.school.find_teacher(sub).is_none() {
            return Err(SchedError::UnknownTeacher(sub.as_str().to_string()));
        }
    }

    let removed = scheduler
        .data
        .adjustments
        .remove_where(gap.date, |a| gap.owns(a));

    let Some(substitute) = substitute else {
        debug_event!(
            teacher = %original,
            period = gap.period,
            removed = removed.len(),
            "substitution retracted"
        );
        return Ok(Vec::new());
    };

    let status = candidates::teacher_status(&scheduler.data, gap, substitute);
    let conflict_details = status.conflict_class().map(|class_id| ConflictDetails {
        class_id: class_id.clone(),
    });

    let school = &scheduler.data.school;
    let created: Vec<Adjustment> = gap
        .class_ids
        .iter()
        .filter_map(|class_id| {
            let subject_id = scheduled_subject(school, gap, class_id, original).or_else(|| {
                removed
                    .iter()
                    .find(|a| &a.class_id == class_id)
                    .map(|a| a.subject_id.clone())
            })?;
            Some(Adjustment {
                class_id: class_id.clone(),
                subject_id,
                original_teacher: original.clone(),
                substitute: substitute.clone(),
                day: gap.day,
                period: gap.period,
                conflict_details: conflict_details.clone(),
            })
        })
        .collect();

    let day = scheduler.data.adjustments.day_mut(gap.date);
    for adjustment in &created {
        day.insert(adjustment.clone());
    }
    if day.is_empty() {
        scheduler.data.adjustments.days.remove(&gap.date);
    }

    debug_event!(
        teacher = %original,
        substitute = %substitute,
        period = gap.period,
        classes = created.len(),
        conflict = conflict_details.is_some(),
        "substitution recorded"
    );
    Ok(created)
}

fn scheduled_subject(
    school: &School,
    gap: &CoverageGap,
    class_id: &ClassId,
    teacher: &TeacherId,
) -> Option<SubjectId> {
    school
        .find_class(class_id)?
        .slot(gap.day, gap.period)
        .iter()
        .find(|e| &e.teacher == teacher)
        .map(|e| e.subject.clone())
}
