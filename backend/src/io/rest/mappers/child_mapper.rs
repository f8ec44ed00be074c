//! backend/src/io/rest/mappers/child_mapper.rs

use crate::domain::models::child::{Child, ScheduledChild};
use crate::domain::models::schedule::ScheduledDose;
use crate::domain::vaccination_schedule::VaccineRule;
use shared::{ChildRecord, SubmitChildResponse, VaccineInfo};

/// Mapper from domain models to shared DTOs.
pub struct ChildMapper;

impl ChildMapper {
    /// Acknowledgement for a freshly stored child
    pub fn to_submit_response(child: &Child) -> SubmitChildResponse {
        SubmitChildResponse {
            success: true,
            id: child.id.clone(),
            message: "Data submitted successfully".to_string(),
        }
    }

    /// Converts a child and its derived schedule to the listing DTO
    pub fn to_record_dto(scheduled: ScheduledChild) -> ChildRecord {
        let ScheduledChild { child, schedule } = scheduled;
        ChildRecord {
            id: child.id,
            child_name: child.name,
            parent_id: child.parent_id,
            parent_email: child.parent_email,
            gender: child.gender,
            dob: child.dob.format("%Y-%m-%d").to_string(),
            vaccination_schedule: schedule.iter().map(ScheduledDose::label).collect(),
        }
    }

    pub fn to_record_list_dto(children: Vec<ScheduledChild>) -> Vec<ChildRecord> {
        children.into_iter().map(Self::to_record_dto).collect()
    }

    pub fn to_vaccine_dto(rule: &VaccineRule) -> VaccineInfo {
        VaccineInfo {
            name: rule.name.clone(),
            doses: rule.doses.iter().map(ToString::to_string).collect(),
            genders: rule.genders.clone(),
        }
    }
}
