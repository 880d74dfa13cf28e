#![forbid(unsafe_code)]
//! Suppléance — bibliothèque de gestion des remplacements d'un établissement scolaire (sans BD).
//!
//! - Stockage fichier (JSON).
//! - Créneaux à couvrir à partir de l'emploi du temps et des absences.
//! - Classement des suppléants, détection des doubles cours.
//! - Historique glissant sur 7 jours pour répartir la charge.

#[cfg(feature = "logging")]
macro_rules! debug_event {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! debug_event {
    ($($arg:tt)*) => {};
}

pub mod model;
pub mod scheduler;
pub mod storage;

pub use model::{
    AbsenceRegistry, AbsentEntity, Adjustment, AdjustmentLedger, ClassId, ConflictDetails,
    JointPeriod, JointPeriodId, Leave, LeaveRecord, School, SchoolClass, SchoolData, SlotEntry,
    Subject, SubjectAssignment, SubjectId, Teacher, TeacherId,
};
pub use scheduler::{
    CoverageGap, HistoryWindow, RankedCandidate, SchedError, Scheduler, TeacherStatus,
    Unavailability,
};
pub use storage::{JsonStorage, Storage};
