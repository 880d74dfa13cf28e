use crate::model::{AbsenceRegistry, ClassId, School, SlotEntry};
use chrono::NaiveDate;

/// Le créneau de la classe est-il annulé par un congé de classe ce jour-là ?
pub(super) fn class_cancelled(
    absences: &AbsenceRegistry,
    date: NaiveDate,
    class: &ClassId,
    period: usize,
) -> bool {
    absences
        .class_leave(date, class)
        .is_some_and(|leave| leave.cancels(period))
}

/// "Matière (Enseignant)" pour chaque cours du créneau.
pub(super) fn slot_label(school: &School, entries: &[SlotEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                "{} ({})",
                school.subject_name(&e.subject),
                school.teacher_name(&e.teacher)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
