//! Adding signatures to a pending schedule.

use crate::error::{Error, Result};
use crate::ids::ScheduleId;
use crate::proto::{ScheduleSignBody, TransactionData};

use super::builder::Transaction;
use super::kind::{KindTag, TransactionKind};

/// Signs the schedule `schedule_id` with whatever keys sign this
/// transaction.
///
/// Cannot itself be scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSign {
    schedule_id: Option<ScheduleId>,
}

/// A draft schedule signature.
pub type ScheduleSignTransaction = Transaction<ScheduleSign>;

impl ScheduleSign {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_id(mut self, schedule_id: ScheduleId) -> Self {
        self.schedule_id = Some(schedule_id);
        self
    }

    pub fn get_schedule_id(&self) -> Option<ScheduleId> {
        self.schedule_id
    }
}

impl TransactionKind for ScheduleSign {
    const TAG: KindTag = KindTag::ScheduleSign;
    const SCHEDULABLE: bool = false;

    fn validate(&self) -> Result<()> {
        match self.schedule_id {
            Some(_) => Ok(()),
            None => Err(Error::Validation(
                "schedule sign: schedule id is required".to_string(),
            )),
        }
    }

    fn build_data(&self) -> TransactionData {
        TransactionData::ScheduleSign(ScheduleSignBody {
            schedule_id: self.schedule_id.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_schedule_id() {
        assert!(ScheduleSign::new().validate().is_err());
        assert!(ScheduleSign::new()
            .schedule_id(ScheduleId::new(0, 0, 42))
            .validate()
            .is_ok());
    }

    #[test]
    fn cannot_be_scheduled() {
        let kind = ScheduleSign::new().schedule_id(ScheduleId::new(0, 0, 42));
        assert!(matches!(
            kind.build_scheduled_data(),
            Err(Error::SchedulingUnsupported(KindTag::ScheduleSign))
        ));
    }
}
