use crate::schedule::ScheduledDose;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub taken: usize,
    pub total: usize,
    /// Rounded, halves up. Zero when nothing is scheduled.
    pub percentage: u8,
    pub complete: bool,
}

impl Progress {
    pub fn new(taken: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            let taken = taken.min(total);
            ((taken * 200 + total) / (total * 2)) as u8
        };

        Self {
            taken,
            total,
            percentage,
            complete: percentage == 100,
        }
    }

    pub fn from_doses(doses: &[ScheduledDose]) -> Self {
        let taken = doses.iter().filter(|dose| dose.is_taken()).count();
        Self::new(taken, doses.len())
    }
}
