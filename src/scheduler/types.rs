use crate::model::{AbsentEntity, Adjustment, ClassId, TeacherId};
use chrono::{NaiveDate, Weekday};
use thiserror::Error;

/// Longueur de la fenêtre d'historique (jours calendaires, date choisie incluse).
pub const HISTORY_DAYS: usize = 7;

/// Créneau à couvrir (ou annulé) pour un enseignant ou une classe absente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageGap {
    pub date: NaiveDate,
    pub day: Weekday,
    pub absent: AbsentEntity,
    /// Index du créneau (base 0).
    pub period: usize,
    pub class_ids: Vec<ClassId>,
    pub subject_label: String,
    /// Reconstruit depuis une suppléance dont le cours a disparu de l'emploi du temps.
    pub is_legacy: bool,
}

impl CoverageGap {
    pub fn absent_teacher(&self) -> Option<&TeacherId> {
        self.absent.teacher()
    }

    /// Numéro affiché du créneau (base 1).
    pub fn period_number(&self) -> usize {
        self.period + 1
    }

    /// La suppléance appartient-elle à ce créneau ?
    pub fn owns(&self, adjustment: &Adjustment) -> bool {
        self.absent_teacher() == Some(&adjustment.original_teacher)
            && adjustment.period == self.period
            && self.class_ids.contains(&adjustment.class_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailability {
    /// Déjà suppléant sur ce créneau.
    Substitution,
    /// Cours régulier dans une autre classe au même créneau.
    DoubleBook { conflict_class: ClassId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeacherStatus {
    InCharge,
    TeachesClass,
    Available,
    Unavailable(Unavailability),
}

impl TeacherStatus {
    /// Rang de priorité, le plus petit d'abord.
    pub fn rank(&self) -> u8 {
        match self {
            TeacherStatus::InCharge => 0,
            TeacherStatus::TeachesClass => 1,
            TeacherStatus::Available => 2,
            TeacherStatus::Unavailable(_) => 3,
        }
    }

    pub fn conflict_class(&self) -> Option<&ClassId> {
        match self {
            TeacherStatus::Unavailable(Unavailability::DoubleBook { conflict_class }) => {
                Some(conflict_class)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub teacher: TeacherId,
    pub name: String,
    pub status: TeacherStatus,
    /// Suppléances déjà assurées sur la fenêtre d'historique (indicatif).
    pub recent_load: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherLoad {
    pub teacher: TeacherId,
    pub name: String,
    /// Alignées sur `HistoryWindow::dates`.
    pub counts: Vec<u32>,
}

impl TeacherLoad {
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryWindow {
    pub dates: Vec<NaiveDate>,
    pub labels: Vec<String>,
    pub per_teacher: Vec<TeacherLoad>,
}

impl HistoryWindow {
    pub fn for_teacher(&self, teacher: &TeacherId) -> Option<&TeacherLoad> {
        self.per_teacher.iter().find(|l| &l.teacher == teacher)
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("unknown teacher: {0}")]
    UnknownTeacher(String),
    #[error("gap is not a teacher absence: {0}")]
    NotATeacherGap(String),
}
