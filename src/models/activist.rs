use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::status::{self, Status};

/// Core identity columns of the `activists` table.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ActivistRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub facebook: Option<String>,
    pub location: Option<String>,
    pub dob: Option<String>,
    pub hidden: bool,
}

/// Membership columns plus the derived working-group/circle aggregates.
/// The list columns are read-only: they are computed by the listing query
/// and never written back.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ActivistMembershipRow {
    pub activist_level: Option<String>,
    pub source: Option<String>,
    pub hiatus: bool,
    pub working_group_list: String,
    pub circles_list: String,
}

/// Training/connection program columns.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ActivistConnectionRow {
    pub connector: Option<String>,
    pub training0: Option<String>,
    pub training1: Option<String>,
    pub training2: Option<String>,
    pub training3: Option<String>,
    pub training4: Option<String>,
    pub training5: Option<String>,
    pub training6: Option<String>,
    pub dev_application_date: Option<NaiveDate>,
    pub dev_application_type: Option<String>,
    pub dev_quiz: Option<String>,
    pub dev_manager: Option<String>,
    pub dev_interest: Option<String>,
    pub prospect_senior_organizer: bool,
    pub cm_first_email: Option<String>,
    pub cm_approval_email: Option<String>,
    pub cm_warning_email: Option<String>,
    pub cir_first_email: Option<String>,
    pub prospect_organizer: bool,
    pub prospect_chapter_member: bool,
    pub last_connection: Option<NaiveDate>,
    pub referral_friends: Option<String>,
    pub referral_apply: Option<String>,
    pub referral_outlet: Option<String>,
    pub circle_interest: bool,
    pub interest_date: Option<String>,
    pub survey_completion: Option<String>,
    pub mpi: bool,
    pub notes: Option<String>,
    pub mpp_requirements: Option<String>,
}

/// Attendance aggregates, derived per row by the listing query.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ActivistEventRow {
    pub first_event: Option<NaiveDate>,
    pub last_event: Option<NaiveDate>,
    pub first_event_name: Option<String>,
    pub last_event_name: Option<String>,
    pub total_events: i64,
    pub total_points: i64,
    pub active: bool,
}

/// Full activist record as returned by the extra listing query.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ActivistExtraRow {
    #[sqlx(flatten)]
    pub activist: ActivistRow,
    #[sqlx(flatten)]
    pub membership: ActivistMembershipRow,
    #[sqlx(flatten)]
    pub connection: ActivistConnectionRow,
    #[sqlx(flatten)]
    pub events: ActivistEventRow,
}

/// Id/name/email triple used by the roster queries.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct BasicActivistRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

/// Serialized form handed to the presentation layer, with the derived
/// engagement status attached.
#[derive(Debug, Clone, Serialize)]
pub struct ActivistView {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub facebook: Option<String>,
    pub location: Option<String>,
    pub dob: Option<String>,

    pub first_event: Option<NaiveDate>,
    pub last_event: Option<NaiveDate>,
    pub first_event_name: Option<String>,
    pub last_event_name: Option<String>,
    pub total_events: i64,
    pub total_points: i64,
    pub active: bool,
    pub status: Status,

    pub activist_level: Option<String>,
    pub source: Option<String>,
    pub hiatus: bool,
    pub working_group_list: String,
    pub circles_list: String,

    pub connector: Option<String>,
    pub training0: Option<String>,
    pub training1: Option<String>,
    pub training2: Option<String>,
    pub training3: Option<String>,
    pub training4: Option<String>,
    pub training5: Option<String>,
    pub training6: Option<String>,
    pub dev_application_date: Option<NaiveDate>,
    pub dev_application_type: Option<String>,
    pub dev_quiz: Option<String>,
    pub dev_manager: Option<String>,
    pub dev_interest: Option<String>,
    pub prospect_senior_organizer: bool,
    pub cm_first_email: Option<String>,
    pub cm_approval_email: Option<String>,
    pub cm_warning_email: Option<String>,
    pub cir_first_email: Option<String>,
    pub prospect_organizer: bool,
    pub prospect_chapter_member: bool,
    pub last_connection: Option<NaiveDate>,
    pub referral_friends: Option<String>,
    pub referral_apply: Option<String>,
    pub referral_outlet: Option<String>,
    pub circle_interest: bool,
    pub interest_date: Option<String>,
    pub survey_completion: Option<String>,
    pub mpi: bool,
    pub notes: Option<String>,
    pub mpp_requirements: Option<String>,
}

impl ActivistView {
    pub fn from_row(row: ActivistExtraRow, today: NaiveDate) -> Self {
        let ActivistExtraRow {
            activist: a,
            membership: m,
            connection: c,
            events: e,
        } = row;

        let status = status::classify(e.first_event, e.last_event, e.total_events, today);

        ActivistView {
            id: a.id,
            name: a.name,
            email: a.email,
            phone: a.phone,
            facebook: a.facebook,
            location: a.location,
            dob: a.dob,

            first_event: e.first_event,
            last_event: e.last_event,
            first_event_name: e.first_event_name,
            last_event_name: e.last_event_name,
            total_events: e.total_events,
            total_points: e.total_points,
            active: e.active,
            status,

            activist_level: m.activist_level,
            source: m.source,
            hiatus: m.hiatus,
            working_group_list: m.working_group_list,
            circles_list: m.circles_list,

            connector: c.connector,
            training0: c.training0,
            training1: c.training1,
            training2: c.training2,
            training3: c.training3,
            training4: c.training4,
            training5: c.training5,
            training6: c.training6,
            dev_application_date: c.dev_application_date,
            dev_application_type: c.dev_application_type,
            dev_quiz: c.dev_quiz,
            dev_manager: c.dev_manager,
            dev_interest: c.dev_interest,
            prospect_senior_organizer: c.prospect_senior_organizer,
            cm_first_email: c.cm_first_email,
            cm_approval_email: c.cm_approval_email,
            cm_warning_email: c.cm_warning_email,
            cir_first_email: c.cir_first_email,
            prospect_organizer: c.prospect_organizer,
            prospect_chapter_member: c.prospect_chapter_member,
            last_connection: c.last_connection,
            referral_friends: c.referral_friends,
            referral_apply: c.referral_apply,
            referral_outlet: c.referral_outlet,
            circle_interest: c.circle_interest,
            interest_date: c.interest_date,
            survey_completion: c.survey_completion,
            mpi: c.mpi,
            notes: c.notes,
            mpp_requirements: c.mpp_requirements,
        }
    }
}

/// Incoming create/update payload. All textual fields are optional;
/// normalization trims whitespace and maps empty strings to None before
/// validation or storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivistInput {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub facebook: Option<String>,
    pub location: Option<String>,
    pub dob: Option<String>,

    pub activist_level: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub hiatus: bool,

    pub connector: Option<String>,
    pub training0: Option<String>,
    pub training1: Option<String>,
    pub training2: Option<String>,
    pub training3: Option<String>,
    pub training4: Option<String>,
    pub training5: Option<String>,
    pub training6: Option<String>,
    pub dev_application_date: Option<NaiveDate>,
    pub dev_application_type: Option<String>,
    pub dev_quiz: Option<String>,
    pub dev_manager: Option<String>,
    pub dev_interest: Option<String>,
    #[serde(default)]
    pub prospect_senior_organizer: bool,
    pub cm_first_email: Option<String>,
    pub cm_approval_email: Option<String>,
    pub cm_warning_email: Option<String>,
    pub cir_first_email: Option<String>,
    #[serde(default)]
    pub prospect_organizer: bool,
    #[serde(default)]
    pub prospect_chapter_member: bool,
    pub referral_friends: Option<String>,
    pub referral_apply: Option<String>,
    pub referral_outlet: Option<String>,
    #[serde(default)]
    pub circle_interest: bool,
    pub interest_date: Option<String>,
    pub survey_completion: Option<String>,
    #[serde(default)]
    pub mpi: bool,
    pub notes: Option<String>,
}

impl ActivistInput {
    /// Trims every textual field and drops fields that trim to empty.
    pub fn normalize(mut self) -> Self {
        fn clean(field: &mut Option<String>) {
            if let Some(value) = field.take() {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    *field = Some(trimmed.to_string());
                }
            }
        }

        self.name = self.name.trim().to_string();
        for field in [
            &mut self.email,
            &mut self.phone,
            &mut self.facebook,
            &mut self.location,
            &mut self.dob,
            &mut self.activist_level,
            &mut self.source,
            &mut self.connector,
            &mut self.training0,
            &mut self.training1,
            &mut self.training2,
            &mut self.training3,
            &mut self.training4,
            &mut self.training5,
            &mut self.training6,
            &mut self.dev_application_type,
            &mut self.dev_quiz,
            &mut self.dev_manager,
            &mut self.dev_interest,
            &mut self.cm_first_email,
            &mut self.cm_approval_email,
            &mut self.cm_warning_email,
            &mut self.cir_first_email,
            &mut self.referral_friends,
            &mut self.referral_apply,
            &mut self.referral_outlet,
            &mut self.interest_date,
            &mut self.survey_completion,
            &mut self.notes,
        ] {
            clean(field);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_drops_empty() {
        let input = ActivistInput {
            name: "  Ada Lovelace ".to_string(),
            email: Some("   ".to_string()),
            phone: Some(" 555-0100 ".to_string()),
            ..Default::default()
        }
        .normalize();

        assert_eq!(input.name, "Ada Lovelace");
        assert_eq!(input.email, None);
        assert_eq!(input.phone.as_deref(), Some("555-0100"));
    }
}
