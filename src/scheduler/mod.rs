mod candidates;
mod gaps;
mod history;
mod mutate;
mod types;
mod util;

pub use types::{
    CoverageGap, HistoryWindow, RankedCandidate, SchedError, TeacherLoad, TeacherStatus,
    Unavailability, HISTORY_DAYS,
};

use crate::model::{Adjustment, SchoolData, TeacherId};
use chrono::NaiveDate;

/// Scheduler : encapsule les données de l'établissement.
///
/// Les calculs (créneaux, candidats, historique) sont des fonctions pures
/// des données ; seul `assign` modifie le journal des suppléances.
#[derive(Debug, Default)]
pub struct Scheduler {
    data: SchoolData,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            data: SchoolData::default(),
        }
    }

    pub fn with_data(data: SchoolData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &SchoolData {
        &self.data
    }
    pub fn data_mut(&mut self) -> &mut SchoolData {
        &mut self.data
    }

    pub fn resolve_gaps(&self, date: NaiveDate) -> Vec<CoverageGap> {
        gaps::resolve_gaps(&self.data, date)
    }

    pub fn rank_candidates(&self, gap: &CoverageGap) -> Vec<RankedCandidate> {
        candidates::rank_candidates(&self.data, gap)
    }

    pub fn history_window(&self, date: NaiveDate) -> HistoryWindow {
        history::history_window(&self.data, date)
    }

    /// `substitute = None` retire la suppléance sans la remplacer.
    pub fn assign(
        &mut self,
        gap: &CoverageGap,
        substitute: Option<&TeacherId>,
    ) -> Result<Vec<Adjustment>, SchedError> {
        mutate::assign(self, gap, substitute)
    }

    /// Suppléances actuellement enregistrées pour ce créneau.
    pub fn substitutes_for(&self, gap: &CoverageGap) -> Vec<&Adjustment> {
        self.data
            .adjustments
            .on(gap.date)
            .filter(|a| gap.owns(a))
            .collect()
    }

    /// Créneaux d'enseignants absents dont au moins une classe n'a pas de suppléant.
    pub fn uncovered(&self, date: NaiveDate) -> Vec<CoverageGap> {
        self.resolve_gaps(date)
            .into_iter()
            .filter(|gap| gap.absent_teacher().is_some())
            .filter(|gap| {
                let covered = self.substitutes_for(gap);
                gap.class_ids
                    .iter()
                    .any(|c| !covered.iter().any(|a| &a.class_id == c))
            })
            .collect()
    }
}
