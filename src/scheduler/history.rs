use super::{HistoryWindow, TeacherLoad, HISTORY_DAYS};
use crate::model::SchoolData;
use chrono::{Days, NaiveDate};

/// Nombre de suppléances assurées par enseignant sur les 7 jours se terminant à `date`.
pub(super) fn history_window(data: &SchoolData, date: NaiveDate) -> HistoryWindow {
    let dates: Vec<NaiveDate> = (0..HISTORY_DAYS as u64)
        .rev()
        .filter_map(|back| date.checked_sub_days(Days::new(back)))
        .collect();

    let labels = dates
        .iter()
        .map(|d| d.format("%a %-d").to_string())
        .collect();

    let per_teacher = data
        .school
        .teachers
        .iter()
        .map(|teacher| TeacherLoad {
            teacher: teacher.id.clone(),
            name: teacher.name.clone(),
            counts: dates
                .iter()
                .map(|d| {
                    data.adjustments
                        .on(*d)
                        .filter(|a| a.substitute == teacher.id)
                        .count() as u32
                })
                .collect(),
        })
        .collect();

    HistoryWindow {
        dates,
        labels,
        per_teacher,
    }
}
